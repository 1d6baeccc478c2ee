use anyhow::{bail, Result};
use ark_blog::api::BlogService;
use clap::Args;

#[derive(Args)]
pub struct DeleteSubCommand {
    /// Post id
    id: String,
}

pub async fn delete(blog: &BlogService, sub_command_args: &DeleteSubCommand) -> Result<()> {
    let response = blog.delete_blog_post(&sub_command_args.id).await?;

    match response {
        Some(response) if response.succeeded == Some(false) => {
            bail!(response
                .message
                .unwrap_or_else(|| "Failed to delete post".to_string()))
        }
        Some(response) => match response.message {
            Some(message) => println!("{}", message),
            None => println!("Deleted post {}", sub_command_args.id),
        },
        None => println!("Deleted post {}", sub_command_args.id),
    }

    Ok(())
}
