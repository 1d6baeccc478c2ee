//! Post editor workflow
//!
//! Opening the editor creates an empty post on the backend, the editor then
//! fills it in. Drafts need a title; publishing also needs content and a cover
//! image.

use ark_http_client::FilePart;
use tracing::instrument;

use crate::api::BlogService;
use crate::error::{Error, Result, ValidationError};
use crate::session::Session;
use crate::types::{resolve_asset_url, CreateBlogPostRequest, Identifier, UploadPostCommandResponse};

/// Longest accepted title, in characters
pub const MAX_TITLE_LEN: usize = 200;
/// Largest accepted image
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Media type for a file name, by extension
pub fn guess_mime_type(file_name: &str) -> Option<&'static str> {
    let (_, extension) = file_name.rsplit_once('.')?;
    let mime = match extension.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        _ => return None,
    };
    Some(mime)
}

/// Accept only `image/*` files up to [`MAX_IMAGE_BYTES`]
///
/// Without an explicit media type the file name decides.
pub fn validate_image(file: &FilePart) -> std::result::Result<(), ValidationError> {
    let mime = file
        .mime_type
        .as_deref()
        .or_else(|| file.file_name.as_deref().and_then(guess_mime_type));

    if !mime.is_some_and(|mime| mime.starts_with("image/")) {
        return Err(ValidationError::NotAnImage);
    }
    if file.len() > MAX_IMAGE_BYTES {
        return Err(ValidationError::FileTooLarge {
            max_bytes: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

/// Paragraph embedding the image at `url`
pub fn image_html(url: &str) -> String {
    format!(
        r#"<p><img src="{}" alt="Uploaded image"></p>"#,
        url.replace('"', "&quot;")
    )
}

fn validate_title(title: &str) -> std::result::Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TitleTooLong { max: MAX_TITLE_LEN });
    }
    Ok(())
}

/// Editing session for one post
#[derive(Debug)]
pub struct PostEditor {
    blog: BlogService,
    asset_base_url: String,
    post_id: String,
    post_identifier: Identifier,
    author_id: String,
    title: String,
    content: String,
    cover_image_url: Option<String>,
}

impl PostEditor {
    /// Create an empty post for the logged in user and edit it
    #[instrument(skip_all)]
    pub async fn open(
        blog: BlogService,
        session: &Session,
        asset_base_url: impl Into<String>,
    ) -> Result<Self> {
        let author_id = session.user_id()?.ok_or(Error::NotAuthenticated)?;

        let response = blog.create_empty_post(&author_id).await?;
        if !response.succeeded {
            return Err(Error::Rejected(response.message.unwrap_or_else(|| {
                "Failed to create a new post. Please try again.".to_string()
            })));
        }

        let (post_id, post_identifier) = response
            .id
            .and_then(|id| id.as_segment().map(|segment| (segment, id)))
            .ok_or_else(|| Error::InvalidResponse("No post ID found in response".to_string()))?;

        tracing::info!("Opened editor for new post {}", post_id);

        // Keep the id exactly as the backend typed it
        let mut editor = Self::resume(blog, asset_base_url, post_id, author_id);
        editor.post_identifier = post_identifier;
        Ok(editor)
    }

    /// Edit a post that already exists
    pub fn resume(
        blog: BlogService,
        asset_base_url: impl Into<String>,
        post_id: impl Into<String>,
        author_id: impl Into<String>,
    ) -> Self {
        let post_id = post_id.into();
        Self {
            blog,
            asset_base_url: asset_base_url.into(),
            post_identifier: Identifier::from(post_id.as_str()),
            post_id,
            author_id: author_id.into(),
            title: String::new(),
            content: String::new(),
            cover_image_url: None,
        }
    }

    /// Id of the edited post
    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    /// Author of the edited post
    pub fn author_id(&self) -> &str {
        &self.author_id
    }

    /// Current title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Current HTML content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the HTML content
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Uploaded cover image URL
    pub fn cover_image_url(&self) -> Option<&str> {
        self.cover_image_url.as_deref()
    }

    /// Reuse a cover image uploaded earlier
    pub fn set_cover_image_url(&mut self, url: Option<String>) {
        self.cover_image_url = url;
    }

    /// Checks run before saving a draft
    pub fn validate_draft(&self) -> std::result::Result<(), ValidationError> {
        validate_title(&self.title)
    }

    /// Checks run before publishing
    pub fn validate_publish(&self) -> std::result::Result<(), ValidationError> {
        validate_title(&self.title)?;
        if self.content.trim().is_empty() {
            return Err(ValidationError::MissingContent);
        }
        if self.cover_image_url.is_none() {
            return Err(ValidationError::MissingCover);
        }
        Ok(())
    }

    /// Save the post unpublished
    #[instrument(skip(self), fields(post_id = %self.post_id))]
    pub async fn save_draft(&self) -> Result<UploadPostCommandResponse> {
        self.validate_draft()?;
        self.submit(false, "Failed to save draft.").await
    }

    /// Publish the post
    #[instrument(skip(self), fields(post_id = %self.post_id))]
    pub async fn publish(&self) -> Result<UploadPostCommandResponse> {
        self.validate_publish()?;
        self.submit(true, "Failed to publish post.").await
    }

    async fn submit(&self, publish: bool, fallback: &str) -> Result<UploadPostCommandResponse> {
        let request = CreateBlogPostRequest {
            id: Some(self.post_identifier.clone()),
            title: self.title.clone(),
            content: self.content.clone(),
            author_id: Some(Identifier::from(self.author_id.as_str())),
            is_published: publish,
            ..Default::default()
        };

        let response = self.blog.create_blog_post(&request).await?;
        if !response.succeeded {
            return Err(Error::Rejected(
                response.message.unwrap_or_else(|| fallback.to_string()),
            ));
        }

        Ok(response)
    }

    /// Upload the cover image and remember its URL
    #[instrument(skip_all, fields(post_id = %self.post_id))]
    pub async fn upload_cover_image(&mut self, file: FilePart) -> Result<String> {
        let url = self.upload(file, true).await?;
        self.cover_image_url = Some(url.clone());
        Ok(url)
    }

    /// Upload an inline image and append it to the content
    #[instrument(skip_all, fields(post_id = %self.post_id))]
    pub async fn insert_image(&mut self, file: FilePart) -> Result<String> {
        let url = self.upload(file, false).await?;
        self.content.push_str(&image_html(&url));
        Ok(url)
    }

    async fn upload(&self, file: FilePart, is_featured: bool) -> Result<String> {
        validate_image(&file)?;

        let response = self
            .blog
            .upload_image(file, is_featured, Some(&self.post_id))
            .await?;

        let path = response
            .path_or_container
            .filter(|path| !path.trim().is_empty())
            .ok_or_else(|| {
                Error::InvalidResponse("Image upload failed: No path returned.".to_string())
            })?;

        Ok(resolve_asset_url(&self.asset_base_url, &path))
    }
}

#[cfg(test)]
mod tests {
    use ark_http_client::HttpClient;

    use super::*;

    fn editor() -> PostEditor {
        let blog = BlogService::new(HttpClient::new("http://unused.invalid"), Session::in_memory());
        PostEditor::resume(blog, "http://localhost:5055/", "7", "u-1")
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type("cover.PNG"), Some("image/png"));
        assert_eq!(guess_mime_type("a.b.jpeg"), Some("image/jpeg"));
        assert_eq!(guess_mime_type("notes.txt"), Some("text/plain"));
        assert_eq!(guess_mime_type("README"), None);
    }

    #[test]
    fn test_validate_image() {
        let png = FilePart::new(vec![0u8; 16]).with_mime_type("image/png");
        assert!(validate_image(&png).is_ok());

        let by_name = FilePart::new(vec![0u8; 16]).with_file_name("cover.jpg");
        assert!(validate_image(&by_name).is_ok());

        let pdf = FilePart::new(vec![0u8; 16]).with_mime_type("application/pdf");
        assert_eq!(validate_image(&pdf), Err(ValidationError::NotAnImage));

        let unknown = FilePart::new(vec![0u8; 16]);
        assert_eq!(validate_image(&unknown), Err(ValidationError::NotAnImage));
    }

    #[test]
    fn test_image_size_limit() {
        let at_limit = FilePart::new(vec![0u8; MAX_IMAGE_BYTES]).with_mime_type("image/png");
        assert!(validate_image(&at_limit).is_ok());

        let over = FilePart::new(vec![0u8; MAX_IMAGE_BYTES + 1]).with_mime_type("image/png");
        assert_eq!(
            validate_image(&over),
            Err(ValidationError::FileTooLarge {
                max_bytes: MAX_IMAGE_BYTES
            })
        );
    }

    #[test]
    fn test_draft_validation() {
        let mut editor = editor();
        assert_eq!(editor.validate_draft(), Err(ValidationError::MissingTitle));

        editor.set_title("   ");
        assert_eq!(editor.validate_draft(), Err(ValidationError::MissingTitle));

        editor.set_title("x".repeat(MAX_TITLE_LEN + 1));
        assert_eq!(
            editor.validate_draft(),
            Err(ValidationError::TitleTooLong { max: MAX_TITLE_LEN })
        );

        editor.set_title("ü".repeat(MAX_TITLE_LEN));
        assert!(editor.validate_draft().is_ok());
    }

    #[test]
    fn test_publish_validation_order() {
        let mut editor = editor();
        editor.set_title("Title");
        assert_eq!(editor.validate_publish(), Err(ValidationError::MissingContent));

        editor.set_content("<p>Body</p>");
        assert_eq!(editor.validate_publish(), Err(ValidationError::MissingCover));

        editor.set_cover_image_url(Some("http://localhost:5055/c.png".to_string()));
        assert!(editor.validate_publish().is_ok());

        editor.set_cover_image_url(None);
        assert_eq!(editor.validate_publish(), Err(ValidationError::MissingCover));
    }

    #[test]
    fn test_image_html_escapes_quotes() {
        assert_eq!(
            image_html(r#"http://x/a".png"#),
            r#"<p><img src="http://x/a&quot;.png" alt="Uploaded image"></p>"#
        );
    }

    #[tokio::test]
    async fn test_open_requires_user_id() {
        let session = Session::in_memory();
        let blog = BlogService::new(HttpClient::new("http://unused.invalid"), session.clone());
        let result = PostEditor::open(blog, &session, "http://localhost:5055/").await;
        assert!(matches!(result, Err(Error::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_invalid_upload_sends_nothing() {
        let mut editor = editor();
        let result = editor
            .upload_cover_image(FilePart::new(b"%PDF".to_vec()).with_mime_type("application/pdf"))
            .await;
        assert!(matches!(
            result,
            Err(Error::Validation(ValidationError::NotAnImage))
        ));
        assert!(editor.cover_image_url().is_none());
    }
}
