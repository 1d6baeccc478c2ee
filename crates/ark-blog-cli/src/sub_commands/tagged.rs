use anyhow::Result;
use ark_blog::api::BlogService;
use ark_blog::feed::Feed;
use clap::Args;

use crate::utils::print_post_list;

#[derive(Args)]
pub struct TaggedSubCommand {
    /// Tag name
    tag: String,
}

pub async fn tagged(
    blog: &BlogService,
    asset_base_url: &str,
    sub_command_args: &TaggedSubCommand,
) -> Result<()> {
    let feed = Feed::new(blog.clone(), asset_base_url);
    let mut list = feed.tagged(&sub_command_args.tag).await?;

    println!("Posts tagged \"{}\"", sub_command_args.tag);
    print_post_list(&mut list).await;

    Ok(())
}
