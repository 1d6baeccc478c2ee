use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Result};
use ark_blog::editor::guess_mime_type;
use ark_blog::feed::PostList;
use ark_blog::text::excerpt;
use ark_blog::types::BlogPost;
use ark_http_client::FilePart;

/// Characters of content shown under a post title in lists
pub const EXCERPT_CHARS: usize = 120;

/// Helper function to get user input with a prompt
pub fn get_user_input(prompt: &str) -> Result<String> {
    println!("{prompt}");
    let mut user_input = String::new();
    io::stdout().flush()?;
    io::stdin().read_line(&mut user_input)?;
    Ok(user_input.trim().to_string())
}

/// The given value, or what the user types at the prompt
pub fn value_or_prompt(value: Option<&str>, prompt: &str) -> Result<String> {
    match value {
        Some(value) => Ok(value.to_string()),
        None => get_user_input(prompt),
    }
}

/// Read a file into an upload part named after the file
pub async fn read_file_part(path: &Path) -> Result<FilePart> {
    let bytes = tokio::fs::read(path).await?;

    let mut part = FilePart::new(bytes);
    if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
        if let Some(mime) = guess_mime_type(file_name) {
            part = part.with_mime_type(mime);
        }
        part = part.with_file_name(file_name);
    }

    Ok(part)
}

/// Content given inline or as a file, never both
pub async fn read_content(inline: Option<&str>, file: Option<&Path>) -> Result<Option<String>> {
    match (inline, file) {
        (Some(_), Some(_)) => bail!("Use either --content or --content-file"),
        (Some(content), None) => Ok(Some(content.to_string())),
        (None, Some(path)) => Ok(Some(tokio::fs::read_to_string(path).await?)),
        (None, None) => Ok(None),
    }
}

/// One list entry: id, title, tags, cover and an excerpt
pub fn format_post(post: &BlogPost) -> String {
    let id = post.id_segment().unwrap_or_else(|| "-".to_string());
    let mut lines = vec![format!("[{}] {}", id, post.title)];

    if let Some(tags) = post.tags.as_ref().filter(|tags| !tags.is_empty()) {
        let names: Vec<&str> = tags.iter().map(|tag| tag.tag_name.as_str()).collect();
        lines.push(format!("    tags: {}", names.join(", ")));
    }
    if let Some(url) = &post.cover_image_url {
        lines.push(format!("    cover: {}", url));
    }

    let text = excerpt(&post.content, EXCERPT_CHARS);
    if !text.is_empty() {
        lines.push(format!("    {}", text));
    }

    lines.join("\n")
}

/// Wait for the list's lookups and print every post
pub async fn print_post_list(list: &mut PostList) {
    let summary = list.settle().await;
    tracing::debug!(
        applied = summary.applied,
        failed = summary.failed,
        "Hydration finished"
    );

    let posts = list.snapshot().await;
    if posts.is_empty() {
        println!("No posts");
        return;
    }
    for post in posts {
        println!("{}", format_post(&post));
    }
}
