//! Tag routes

use ark_http_client::HttpClient;
use tracing::instrument;

use super::{authorized_route, route, TAG_CONTROLLER};
use crate::error::Result;
use crate::session::Session;
use crate::types::{AddTagsToPostRequest, CommandResponse, CreateTagRequest, PostTag};

/// Client for the `Tag` controller
#[derive(Debug, Clone)]
pub struct TagService {
    client: HttpClient,
    session: Session,
}

impl TagService {
    /// Create a new tag service
    pub fn new(client: HttpClient, session: Session) -> Self {
        Self { client, session }
    }

    /// Tags of a post
    #[instrument(skip(self))]
    pub async fn get_tags_of_post(&self, post_id: &str) -> Result<Vec<PostTag>> {
        let params = route(TAG_CONTROLLER, Some("GetTagsOfPost"));
        Ok(self.client.get(&params, Some(post_id)).await?)
    }

    /// Every known tag
    #[instrument(skip(self))]
    pub async fn get_tags(&self) -> Result<Vec<PostTag>> {
        let params = route(TAG_CONTROLLER, Some("GetTags"));
        Ok(self.client.get(&params, None).await?)
    }

    /// Create a tag
    #[instrument(skip(self))]
    pub async fn create_tag(&self, tag_name: &str) -> Result<Option<CommandResponse>> {
        let params = authorized_route(&self.session, TAG_CONTROLLER, Some("CreateTag"));
        let body = CreateTagRequest {
            tag_name: tag_name.to_string(),
        };
        Ok(self.client.post(&params, &body).await?)
    }

    /// Attach tags to a post
    #[instrument(skip_all, fields(post_id = %request.post_id))]
    pub async fn add_tags_to_post(
        &self,
        request: &AddTagsToPostRequest,
    ) -> Result<Option<CommandResponse>> {
        let params = authorized_route(&self.session, TAG_CONTROLLER, Some("AddTagsToPost"));
        Ok(self.client.post(&params, request).await?)
    }
}
