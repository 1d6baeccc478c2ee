//! Wire types for the blog API

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LEN: usize = 6;

/// Backend-assigned identifier, a number or a string on the wire
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Numeric id
    Number(i64),
    /// Textual id
    Text(String),
}

impl Identifier {
    /// Id as a path segment, `None` for an empty text id
    pub fn as_segment(&self) -> Option<String> {
        match self {
            Identifier::Number(n) => Some(n.to_string()),
            Identifier::Text(s) if s.trim().is_empty() => None,
            Identifier::Text(s) => Some(s.clone()),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{}", n),
            Identifier::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Identifier {
    fn from(n: i64) -> Self {
        Identifier::Number(n)
    }
}

/// Only canonical integers become numbers, so `"007"` or `"+5"` keep their text
impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Identifier::Number(n),
            _ => Identifier::Text(s.to_string()),
        }
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Identifier::from(s.as_str())
    }
}

/// Stored image reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostImageFile {
    /// Path relative to the asset host, may use `\` separators
    pub path: String,
}

impl PostImageFile {
    /// Absolute URL of the image under `asset_base_url`
    pub fn resolve(&self, asset_base_url: &str) -> String {
        resolve_asset_url(asset_base_url, &self.path)
    }
}

/// Join a backend-relative asset path onto the asset host
///
/// Backslashes become `/`. Paths that already carry a scheme are returned as is.
pub fn resolve_asset_url(asset_base_url: &str, path: &str) -> String {
    let path = path.replace('\\', "/");
    if path.starts_with("http://") || path.starts_with("https://") {
        return path;
    }
    format!(
        "{}/{}",
        asset_base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Tag attached to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostTag {
    /// Tag id, when the backend sends it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identifier>,
    /// Tag name
    pub tag_name: String,
}

/// Post as returned by list and detail endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// Post id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identifier>,
    /// Title
    #[serde(default)]
    pub title: String,
    /// HTML content
    #[serde(default)]
    pub content: String,
    /// Author id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<Identifier>,
    /// Author display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    /// Publication timestamp as sent by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// Published flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    /// Tags, filled in by hydration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<PostTag>>,
    /// Featured image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<PostImageFile>,
    /// Excerpt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// URL slug
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Absolute cover image URL, filled in by hydration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    /// View counter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_count: Option<u64>,
}

impl BlogPost {
    /// Id as a path segment, `None` when absent or empty
    pub fn id_segment(&self) -> Option<String> {
        self.id.as_ref().and_then(Identifier::as_segment)
    }

    /// True when the post is published
    pub fn is_published(&self) -> bool {
        self.is_published.unwrap_or(false)
    }
}

/// Body of `Post/Upload` and `Post/SaveDraft`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogPostRequest {
    /// Id of the post being filled in, when it already exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Identifier>,
    /// Title
    pub title: String,
    /// HTML content
    pub content: String,
    /// Author id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<Identifier>,
    /// Author display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    /// Tag names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Featured image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    /// Excerpt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Published flag
    pub is_published: bool,
}

/// Body of `Post/Update`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogPostRequest {
    /// Post id
    pub id: Identifier,
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New tag names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// New featured image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    /// New excerpt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// New published flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

impl UpdateBlogPostRequest {
    /// Update touching no field yet
    pub fn new(id: impl Into<Identifier>) -> Self {
        Self {
            id: id.into(),
            title: None,
            content: None,
            tags: None,
            featured_image: None,
            excerpt: None,
            is_published: None,
        }
    }
}

/// Answer to post creation and draft saving
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPostCommandResponse {
    /// Application level outcome
    pub succeeded: bool,
    /// Backend message
    #[serde(default)]
    pub message: Option<String>,
    /// Id of the created post
    #[serde(default)]
    pub id: Option<Identifier>,
}

/// Answer to `Post/UploadImage`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageResponse {
    /// Stored path relative to the asset host
    #[serde(default)]
    pub path_or_container: Option<String>,
}

/// Generic answer to tag commands and deletes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Application level outcome, when reported
    #[serde(default)]
    pub succeeded: Option<bool>,
    /// Backend message
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `Tag/CreateTag`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    /// Tag name
    pub tag_name: String,
}

/// Body of `Tag/AddTagsToPost`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTagsToPostRequest {
    /// Post id
    pub post_id: Identifier,
    /// Tag names to attach
    pub tag_names: Vec<String>,
}

/// Body of `api/AppUser/LogIn`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username or email
    #[serde(rename = "UsernameOrEmail")]
    pub username_or_email: String,
    /// Password
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username_or_email", &self.username_or_email)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl LoginRequest {
    /// Create a login request
    pub fn new(username_or_email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username_or_email: username_or_email.into(),
            password: password.into(),
        }
    }

    /// Both fields are required
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username_or_email.is_empty() {
            return Err(ValidationError::MissingField("UsernameOrEmail"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        Ok(())
    }
}

/// Access token issued at login
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    /// Bearer token
    pub access_token: String,
    /// Expiration as sent by the backend, never checked here
    #[serde(default)]
    pub expiration: Option<String>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[redacted]")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// User summary returned at login
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    /// User id
    #[serde(default)]
    pub id: Option<String>,
    /// Username
    #[serde(default)]
    pub user_name: Option<String>,
    /// Email
    #[serde(default)]
    pub email: Option<String>,
    /// Full name
    #[serde(default)]
    pub name_surname: Option<String>,
}

/// Answer to `api/AppUser/LogIn`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Application level outcome
    pub succeeded: bool,
    /// Issued token
    #[serde(default)]
    pub token: Option<AccessToken>,
    /// Logged in user
    #[serde(default)]
    pub user: Option<UserInfo>,
}

/// Body of `api/AppUser/Register`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterRequest {
    /// Full name
    pub name_surname: String,
    /// Username
    pub username: String,
    /// Email
    pub email: String,
    /// Password
    pub password: String,
    /// Password confirmation
    pub password_confirm: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name_surname", &self.name_surname)
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl RegisterRequest {
    /// Every field is required, the password must be long enough and confirmed
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("NameSurname", &self.name_surname),
            ("Username", &self.username),
            ("Email", &self.email),
            ("Password", &self.password),
            ("PasswordConfirm", &self.password_confirm),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, value)| value.is_empty()) {
            return Err(ValidationError::MissingField(*name));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        if self.password != self.password_confirm {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }
}

/// Answer to `api/AppUser/Register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Application level outcome
    pub succeeded: bool,
    /// Backend message
    #[serde(default)]
    pub message: Option<String>,
}
