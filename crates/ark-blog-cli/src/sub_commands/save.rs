use std::path::PathBuf;

use anyhow::{anyhow, Result};
use ark_blog::api::BlogService;
use ark_blog::editor::PostEditor;
use ark_blog::session::Session;
use clap::Args;

use super::new_post::write_and_submit;
use crate::utils::read_content;

#[derive(Args)]
pub struct SaveSubCommand {
    /// Post id
    id: String,
    /// New title, the stored one is kept otherwise
    #[arg(short, long)]
    title: Option<String>,
    /// New HTML content
    #[arg(long)]
    content: Option<String>,
    /// File holding the new HTML content
    #[arg(long)]
    content_file: Option<PathBuf>,
    /// New cover image, the stored one is kept otherwise
    #[arg(long)]
    cover: Option<PathBuf>,
    /// Images appended to the content, in order
    #[arg(short, long)]
    image: Vec<PathBuf>,
    /// Publish instead of saving a draft
    #[arg(long)]
    publish: bool,
}

pub async fn save(
    blog: &BlogService,
    session: &Session,
    asset_base_url: &str,
    sub_command_args: &SaveSubCommand,
) -> Result<()> {
    let author_id = session
        .user_id()?
        .ok_or(anyhow!("Not logged in, run `ark-blog login` first"))?;

    let content = read_content(
        sub_command_args.content.as_deref(),
        sub_command_args.content_file.as_deref(),
    )
    .await?;

    let stored = blog.get_blog_post_by_id(&sub_command_args.id).await?;

    let mut editor = PostEditor::resume(
        blog.clone(),
        asset_base_url,
        sub_command_args.id.clone(),
        author_id,
    );
    editor.set_title(sub_command_args.title.clone().unwrap_or(stored.title));
    editor.set_content(content.unwrap_or(stored.content));

    if sub_command_args.cover.is_none() {
        match blog.get_cover_image(&sub_command_args.id).await {
            Ok(image) => editor.set_cover_image_url(Some(image.resolve(asset_base_url))),
            Err(err) => tracing::debug!("No stored cover image: {}", err),
        }
    }

    write_and_submit(
        &mut editor,
        sub_command_args.cover.as_deref(),
        &sub_command_args.image,
        sub_command_args.publish,
    )
    .await
}
