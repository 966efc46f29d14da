//! Post response DTOs.

use serde::Serialize;

use crate::db::PostRow;

/// Create post response
#[derive(Debug, Serialize)]
pub struct CreatePostResponse {
    pub ok: bool,
}

/// List posts response
#[derive(Debug, Serialize)]
pub struct ListPostsResponse {
    pub posts: Vec<PostRow>,
}
