//! Posts endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use alumnet_common::{AppResult, Page, PageQuery};
use alumnet_core::{CreateCommentInput, CreatePostInput, PostView};
use alumnet_db::entities::{comment, post, view::ViewableType};
use serde::Serialize;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Post response (creation result; listings use the assembled feed shape).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
}

impl From<post::Model> for PostResponse {
    fn from(post: post::Model) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            content: post.content,
            created_at: post.created_at.to_rfc3339(),
        }
    }
}

/// Comment response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
}

impl From<comment::Model> for CommentResponse {
    fn from(comment: comment::Model) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            content: comment.content,
            created_at: comment.created_at.to_rfc3339(),
        }
    }
}

/// Like toggle response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggleResponse {
    pub liked: bool,
    pub like_count: u64,
}

/// List posts (assembled, paginated, newest first).
async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Page<PostView>>> {
    let page = state.feed_service.home_page(query.page).await?;
    Ok(ApiResponse::ok(page))
}

/// Show one assembled post. Records a view for authenticated callers.
async fn show(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<ApiResponse<PostView>> {
    // Resolve the post before recording anything so a miss stays a plain 404
    let post = state.post_service.get(&post_id).await?;

    if let Some(ref user) = user {
        state
            .engagement_service
            .record_view(&user.id, ViewableType::Post, &post.id)
            .await?;
    }

    let view = state.feed_service.single(&post.id).await?;
    Ok(ApiResponse::ok(view))
}

/// Create a post.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePostInput>,
) -> AppResult<ApiResponse<PostResponse>> {
    let post = state.post_service.create(&user, input).await?;
    Ok(ApiResponse::ok(post.into()))
}

/// Delete a post. Owner or admin only.
async fn destroy(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.post_service.delete(&user, &post_id).await?;
    Ok(ApiResponse::ok(()))
}

/// Toggle the caller's like on a post.
async fn toggle_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<ApiResponse<LikeToggleResponse>> {
    let toggle = state
        .engagement_service
        .toggle_like(&user.id, &post_id)
        .await?;

    Ok(ApiResponse::ok(LikeToggleResponse {
        liked: toggle.liked,
        like_count: toggle.like_count,
    }))
}

/// Comment on a post.
async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Json(input): Json<CreateCommentInput>,
) -> AppResult<ApiResponse<CommentResponse>> {
    let comment = state
        .comment_service
        .create(&user, &post_id, input)
        .await?;
    Ok(ApiResponse::ok(comment.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", get(show).delete(destroy))
        .route("/{id}/like", post(toggle_like))
        .route("/{id}/comments", post(create_comment))
}
