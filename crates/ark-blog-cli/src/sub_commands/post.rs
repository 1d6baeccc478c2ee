use std::sync::Arc;

use anyhow::Result;
use ark_blog::api::BlogService;
use ark_blog::hydrate::{hydrate, PostEnrichment, SharedPosts};
use ark_blog::text::html_to_text;
use clap::Args;
use tokio::sync::RwLock;

#[derive(Args)]
pub struct PostSubCommand {
    /// Post id
    id: String,
    /// Print the raw HTML content
    #[arg(long)]
    html: bool,
}

pub async fn post(
    blog: &BlogService,
    asset_base_url: &str,
    sub_command_args: &PostSubCommand,
) -> Result<()> {
    let post = blog.get_blog_post_by_id(&sub_command_args.id).await?;

    let posts: SharedPosts = Arc::new(RwLock::new(vec![post]));
    let source: Arc<dyn PostEnrichment> = Arc::new(blog.clone());
    hydrate(source, posts.clone(), asset_base_url).await;

    let posts = posts.read().await;
    for post in posts.iter() {
        println!("{}", post.title);

        if let Some(author) = &post.author_name {
            println!("by {}", author);
        }
        if let Some(published_at) = &post.published_at {
            println!("published {}", published_at);
        }
        if !post.is_published() {
            println!("(draft)");
        }
        if let Some(tags) = post.tags.as_ref().filter(|tags| !tags.is_empty()) {
            let names: Vec<&str> = tags.iter().map(|tag| tag.tag_name.as_str()).collect();
            println!("tags: {}", names.join(", "));
        }
        if let Some(url) = &post.cover_image_url {
            println!("cover: {}", url);
        }
        println!();

        if sub_command_args.html {
            println!("{}", post.content);
        } else {
            println!("{}", html_to_text(&post.content));
        }
    }

    Ok(())
}
