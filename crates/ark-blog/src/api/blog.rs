//! Post routes

use ark_http_client::{FilePart, HttpClient, RequestParameters};
use async_trait::async_trait;
use tracing::instrument;

use super::{authorized_route, route, TagService, POST_CONTROLLER};
use crate::error::Result;
use crate::hydrate::PostEnrichment;
use crate::session::Session;
use crate::types::{
    BlogPost, CommandResponse, CreateBlogPostRequest, Identifier, PostImageFile, PostTag,
    UpdateBlogPostRequest, UploadImageResponse, UploadPostCommandResponse,
};

/// Multipart field carrying the image
pub const IMAGE_FIELD: &str = "File";

/// Client for the `Post` controller
#[derive(Debug, Clone)]
pub struct BlogService {
    client: HttpClient,
    session: Session,
    tags: TagService,
}

impl BlogService {
    /// Create a new blog service
    pub fn new(client: HttpClient, session: Session) -> Self {
        let tags = TagService::new(client.clone(), session.clone());
        Self {
            client,
            session,
            tags,
        }
    }

    /// Tag routes over the same client and session
    pub fn tag_service(&self) -> &TagService {
        &self.tags
    }

    /// Create or publish a post
    #[instrument(skip_all)]
    pub async fn create_blog_post(
        &self,
        post: &CreateBlogPostRequest,
    ) -> Result<UploadPostCommandResponse> {
        let params = authorized_route(&self.session, POST_CONTROLLER, Some("Upload"));
        Ok(self.client.post(&params, post).await?)
    }

    /// Create an empty unpublished post owned by `author_id`
    #[instrument(skip(self))]
    pub async fn create_empty_post(&self, author_id: &str) -> Result<UploadPostCommandResponse> {
        let post = CreateBlogPostRequest {
            author_id: Some(Identifier::from(author_id)),
            is_published: false,
            ..Default::default()
        };
        self.create_blog_post(&post).await
    }

    /// Save a post as draft, the published flag is forced off
    #[instrument(skip_all)]
    pub async fn save_as_draft(
        &self,
        post: &CreateBlogPostRequest,
    ) -> Result<UploadPostCommandResponse> {
        let draft = CreateBlogPostRequest {
            is_published: false,
            ..post.clone()
        };
        let params = authorized_route(&self.session, POST_CONTROLLER, Some("SaveDraft"));
        Ok(self.client.post(&params, &draft).await?)
    }

    /// Update an existing post
    #[instrument(skip_all, fields(id = %post.id))]
    pub async fn update_blog_post(&self, post: &UpdateBlogPostRequest) -> Result<BlogPost> {
        let params = authorized_route(&self.session, POST_CONTROLLER, Some("Update"));
        Ok(self.client.put(&params, post).await?)
    }

    /// One page of all posts
    #[instrument(skip(self))]
    pub async fn get_blog_posts(&self, page: u32, limit: u32) -> Result<Vec<BlogPost>> {
        let params = route(POST_CONTROLLER, None)
            .with_query_pair("page", page)
            .with_query_pair("limit", limit);
        Ok(self.client.get(&params, None).await?)
    }

    /// One page of published posts
    #[instrument(skip(self))]
    pub async fn get_published_posts(&self, page: u32, limit: u32) -> Result<Vec<BlogPost>> {
        let params = route(POST_CONTROLLER, Some("Published"))
            .with_query_pair("page", page)
            .with_query_pair("limit", limit)
            .with_query_pair("isPublished", true);
        Ok(self.client.get(&params, None).await?)
    }

    /// Single post
    #[instrument(skip(self))]
    pub async fn get_blog_post_by_id(&self, id: &str) -> Result<BlogPost> {
        let params = route(POST_CONTROLLER, None);
        Ok(self.client.get(&params, Some(id)).await?)
    }

    /// Delete a post
    ///
    /// The backend may answer with an empty body, reported as `None`.
    #[instrument(skip(self))]
    pub async fn delete_blog_post(&self, id: &str) -> Result<Option<CommandResponse>> {
        let params = authorized_route(&self.session, POST_CONTROLLER, None);
        Ok(self.client.delete(&params, id).await?)
    }

    /// Most read posts
    #[instrument(skip(self))]
    pub async fn get_top_posts(&self, count: u32) -> Result<Vec<BlogPost>> {
        self.get_counted("GetTop", count).await
    }

    /// Editor's picks
    #[instrument(skip(self))]
    pub async fn get_editor_picks(&self, count: u32) -> Result<Vec<BlogPost>> {
        self.get_counted("GetEditorPicks", count).await
    }

    /// Latest posts
    #[instrument(skip(self))]
    pub async fn get_latest_posts(&self, count: u32) -> Result<Vec<BlogPost>> {
        self.get_counted("GetLatest", count).await
    }

    async fn get_counted(&self, action: &str, count: u32) -> Result<Vec<BlogPost>> {
        let params = route(POST_CONTROLLER, Some(action));
        Ok(self.client.get(&params, Some(&count.to_string())).await?)
    }

    /// Posts carrying `tag`
    #[instrument(skip(self))]
    pub async fn get_posts_by_tag(&self, tag: &str) -> Result<Vec<BlogPost>> {
        let params = route(POST_CONTROLLER, Some("GetPostsByTag"));
        Ok(self.client.get(&params, Some(tag)).await?)
    }

    /// Cover image reference of a post
    #[instrument(skip(self))]
    pub async fn get_cover_image(&self, id: &str) -> Result<PostImageFile> {
        let params = route(POST_CONTROLLER, Some("GetCoverImage"));
        Ok(self.client.get(&params, Some(id)).await?)
    }

    /// Upload an image, as cover when `is_featured`
    #[instrument(skip(self, file), fields(size = file.len()))]
    pub async fn upload_image(
        &self,
        file: FilePart,
        is_featured: bool,
        post_id: Option<&str>,
    ) -> Result<UploadImageResponse> {
        let params = authorized_route(&self.session, POST_CONTROLLER, Some("UploadImage"));

        let mut fields = vec![("IsFeaturedImage".to_string(), is_featured.to_string())];
        if let Some(post_id) = post_id.filter(|id| !id.is_empty()) {
            fields.push(("Id".to_string(), post_id.to_string()));
        }

        Ok(self
            .client
            .upload_file(&params, file, IMAGE_FIELD, fields)
            .await?)
    }

    /// Download a stored asset as raw bytes
    #[instrument(skip(self))]
    pub async fn download_asset(&self, url: &str) -> Result<Vec<u8>> {
        let params = RequestParameters::full_endpoint(url);
        Ok(self.client.download_file(&params, None).await?)
    }
}

#[async_trait]
impl PostEnrichment for BlogService {
    async fn cover_image(&self, post_id: &str) -> Result<PostImageFile> {
        self.get_cover_image(post_id).await
    }

    async fn tags(&self, post_id: &str) -> Result<Vec<PostTag>> {
        self.tags.get_tags_of_post(post_id).await
    }
}
