use std::path::PathBuf;

use anyhow::{anyhow, Result};
use ark_blog::api::BlogService;
use ark_blog::editor::validate_image;
use ark_blog::types::resolve_asset_url;
use clap::Args;

use crate::utils::read_file_part;

#[derive(Args)]
pub struct UploadImageSubCommand {
    /// Image file
    file: PathBuf,
    /// Upload as the cover image of the post
    #[arg(long)]
    featured: bool,
    /// Post the image belongs to
    #[arg(long)]
    post_id: Option<String>,
}

pub async fn upload_image(
    blog: &BlogService,
    asset_base_url: &str,
    sub_command_args: &UploadImageSubCommand,
) -> Result<()> {
    let file = read_file_part(&sub_command_args.file).await?;
    validate_image(&file)?;

    let response = blog
        .upload_image(
            file,
            sub_command_args.featured,
            sub_command_args.post_id.as_deref(),
        )
        .await?;

    let path = response
        .path_or_container
        .filter(|path| !path.trim().is_empty())
        .ok_or(anyhow!("Image upload failed: No path returned."))?;

    println!("{}", resolve_asset_url(asset_base_url, &path));

    Ok(())
}
