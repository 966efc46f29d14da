//! Post handlers.

use axum::{body::Bytes, extract::State, Extension, Json};
use lilt::config::CREATE_POST;
use validator::Validate;

use crate::domain::authorization::require_action;
use crate::error::{ApiError, ApiResult};
use crate::middleware::identity::Identity;
use crate::state::AppState;

use super::request::{CreatePostRequest, NewPost};
use super::response::{CreatePostResponse, ListPostsResponse};

/// POST /api/posts - Create a post
///
/// The `create-post` rule runs before the request is even looked at, so a
/// denied caller learns nothing about whether the body would have passed.
pub async fn create_post(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Bytes,
) -> ApiResult<Json<CreatePostResponse>> {
    require_action(&state, &identity, CREATE_POST).await?;

    let payload = CreatePostRequest::from_slice(&body);
    let author_id = identity.caller.ok_or(ApiError::BadRequest)?;

    let post = NewPost::new(&payload.body, author_id);
    post.validate().map_err(|_| ApiError::BadRequest)?;

    state.posts.insert_post(&post.body, post.author_id).await?;
    tracing::info!(author_id = %post.author_id, "Created post");

    Ok(Json(CreatePostResponse { ok: true }))
}

/// GET /api/posts - List posts, newest first
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<ListPostsResponse>> {
    let posts = state.posts.list_posts().await?;
    Ok(Json(ListPostsResponse { posts }))
}
