use anyhow::Result;
use ark_blog::api::BlogService;
use ark_blog::feed::{Feed, FeedSection};

use crate::utils::format_post;

pub async fn feed(blog: &BlogService, asset_base_url: &str) -> Result<()> {
    let feed = Feed::new(blog.clone(), asset_base_url);
    let mut home = feed.home().await;
    home.settle().await;

    for section in FeedSection::ALL {
        println!("== {} ==", section.title());

        let posts = home.section(section).snapshot().await;
        if posts.is_empty() {
            println!("No posts");
        }
        for post in posts {
            println!("{}", format_post(&post));
        }
        println!();
    }

    Ok(())
}
