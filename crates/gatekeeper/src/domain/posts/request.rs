//! Post request DTOs.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create post request body.
///
/// A missing or non-string `body` deserializes to the empty string.
#[derive(Debug, Default, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub body: String,
}

impl CreatePostRequest {
    /// Lenient parse: malformed JSON is treated as an empty request.
    pub fn from_slice(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }
}

/// A validated post ready for insertion.
#[derive(Debug, Validate)]
pub struct NewPost {
    #[validate(length(min = 1, message = "Body must not be blank"))]
    pub body: String,
    pub author_id: Uuid,
}

impl NewPost {
    pub fn new(body: &str, author_id: Uuid) -> Self {
        Self {
            body: body.trim().to_string(),
            author_id,
        }
    }
}
