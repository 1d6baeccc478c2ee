use std::path::{Path, PathBuf};

use anyhow::Result;
use ark_blog::api::BlogService;
use ark_blog::editor::PostEditor;
use ark_blog::session::Session;
use clap::Args;

use crate::utils::{read_content, read_file_part};

#[derive(Args)]
pub struct NewPostSubCommand {
    /// Title
    #[arg(short, long)]
    title: String,
    /// HTML content
    #[arg(long)]
    content: Option<String>,
    /// File holding the HTML content
    #[arg(long)]
    content_file: Option<PathBuf>,
    /// Cover image, required to publish
    #[arg(long)]
    cover: Option<PathBuf>,
    /// Images appended to the content, in order
    #[arg(short, long)]
    image: Vec<PathBuf>,
    /// Publish instead of saving a draft
    #[arg(long)]
    publish: bool,
}

pub async fn new_post(
    blog: &BlogService,
    session: &Session,
    asset_base_url: &str,
    sub_command_args: &NewPostSubCommand,
) -> Result<()> {
    let content = read_content(
        sub_command_args.content.as_deref(),
        sub_command_args.content_file.as_deref(),
    )
    .await?;

    let mut editor = PostEditor::open(blog.clone(), session, asset_base_url).await?;
    println!("Created post {}", editor.post_id());

    editor.set_title(sub_command_args.title.clone());
    if let Some(content) = content {
        editor.set_content(content);
    }

    write_and_submit(
        &mut editor,
        sub_command_args.cover.as_deref(),
        &sub_command_args.image,
        sub_command_args.publish,
    )
    .await
}

/// Upload images, then save as draft or publish
pub async fn write_and_submit(
    editor: &mut PostEditor,
    cover: Option<&Path>,
    images: &[PathBuf],
    publish: bool,
) -> Result<()> {
    for path in images {
        let url = editor.insert_image(read_file_part(path).await?).await?;
        println!("Inserted {}", url);
    }

    if let Some(path) = cover {
        let url = editor.upload_cover_image(read_file_part(path).await?).await?;
        println!("Cover image {}", url);
    }

    let (response, fallback) = if publish {
        (editor.publish().await?, "Post published successfully!")
    } else {
        (editor.save_draft().await?, "Draft saved successfully!")
    };

    println!("{}", response.message.unwrap_or_else(|| fallback.to_string()));

    Ok(())
}
