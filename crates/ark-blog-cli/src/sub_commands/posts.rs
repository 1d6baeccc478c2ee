use anyhow::{bail, Result};
use ark_blog::api::BlogService;
use ark_blog::feed::Feed;
use clap::Args;

use crate::utils::print_post_list;

#[derive(Args)]
pub struct PostsSubCommand {
    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    page: u32,
    /// Posts per page
    #[arg(short, long, default_value_t = 10)]
    limit: u32,
}

pub async fn posts(
    blog: &BlogService,
    asset_base_url: &str,
    sub_command_args: &PostsSubCommand,
) -> Result<()> {
    if sub_command_args.page == 0 || sub_command_args.limit == 0 {
        bail!("Page and limit start at 1");
    }

    let feed = Feed::new(blog.clone(), asset_base_url);
    let mut list = feed
        .published(sub_command_args.page, sub_command_args.limit)
        .await?;

    print_post_list(&mut list).await;

    Ok(())
}
