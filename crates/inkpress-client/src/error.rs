//! Error types for API and media host access.

use thiserror::Error;

/// Result type alias using `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures of a single client operation.
///
/// The `Display` text is what views show to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("HTTP error: {status}")]
    Status { status: u16 },

    /// The body is not JSON or lacks the `result` envelope.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The `result` collection is missing or empty.
    #[error("No article found")]
    NotFound,

    /// The fetched record lacks required fields.
    #[error("Incomplete article data")]
    IncompleteRecord,

    /// The media host rejected or failed the upload.
    #[error("Image upload failed: {0}")]
    Upload(String),

    /// The request body could not be built.
    #[error("Failed to encode request: {0}")]
    Encode(String),
}

impl ClientError {
    /// Create a status error from a raw HTTP status code.
    pub fn status(status: u16) -> Self {
        Self::Status { status }
    }

    /// Create an upload error.
    pub fn upload(message: impl Into<String>) -> Self {
        Self::Upload(message.into())
    }
}
