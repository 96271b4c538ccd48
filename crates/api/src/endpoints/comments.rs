//! Comments endpoints.

use axum::{
    extract::{Path, State},
    routing::delete,
    Router,
};
use alumnet_common::AppResult;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Delete a comment. Author or admin only.
async fn destroy(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.comment_service.delete(&user, &comment_id).await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", delete(destroy))
}
