//! Error types for the blog client

use ark_http_client::HttpError;
use thiserror::Error;

/// Result type for blog client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Input rejected before any request is sent
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty
    #[error("Please fill in all fields")]
    MissingField(&'static str),
    /// Password shorter than the minimum length
    #[error("Password must be at least {min} characters long")]
    PasswordTooShort {
        /// Minimum length
        min: usize,
    },
    /// Password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,
    /// Post title is missing
    #[error("Please enter a title for your post.")]
    MissingTitle,
    /// Post title is over the limit
    #[error("Title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum length in characters
        max: usize,
    },
    /// Post has no content
    #[error("Please add some content to your post.")]
    MissingContent,
    /// Publish attempted without a cover image
    #[error("Please select a cover image for your post.")]
    MissingCover,
    /// Uploaded file is not an image
    #[error("Please select an image file")]
    NotAnImage,
    /// Uploaded file is over the size limit
    #[error("Image size should be less than {max_bytes} bytes")]
    FileTooLarge {
        /// Limit in bytes
        max_bytes: usize,
    },
}

/// Blog client error
#[derive(Debug, Error)]
pub enum Error {
    /// Request failed after the retry
    #[error(transparent)]
    Http(#[from] HttpError),
    /// Input validation failed
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Backend answered with `succeeded: false`
    #[error("{0}")]
    Rejected(String),
    /// Operation needs a logged in user
    #[error("You must be logged in to create a post.")]
    NotAuthenticated,
    /// Response is well formed but misses what the workflow needs
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    /// Session store failure
    #[error("Session store error: {0}")]
    Session(String),
    /// IO error
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::MissingField("password").to_string(),
            "Please fill in all fields"
        );
        assert_eq!(
            ValidationError::PasswordTooShort { min: 6 }.to_string(),
            "Password must be at least 6 characters long"
        );
        assert_eq!(
            ValidationError::MissingCover.to_string(),
            "Please select a cover image for your post."
        );
    }

    #[test]
    fn test_http_error_is_transparent() {
        let err: Error = HttpError::Timeout.into();
        assert_eq!(err.to_string(), "Error: request timed out");
    }
}
