use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use ark_blog::api::BlogService;
use ark_blog::types::resolve_asset_url;
use clap::Args;

#[derive(Args)]
pub struct DownloadSubCommand {
    /// Absolute URL, or asset path relative to the asset base URL
    url: String,
    /// Output file, stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn download(
    blog: &BlogService,
    asset_base_url: &str,
    sub_command_args: &DownloadSubCommand,
) -> Result<()> {
    let url = resolve_asset_url(asset_base_url, &sub_command_args.url);
    let bytes = blog.download_asset(&url).await?;

    match &sub_command_args.output {
        Some(path) => {
            tokio::fs::write(path, &bytes).await?;
            println!("Wrote {} bytes to {}", bytes.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
