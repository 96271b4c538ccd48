//! Home feed endpoint.

use axum::{extract::Query, extract::State, routing::get, Router};
use alumnet_common::{AppResult, Page, PageQuery};
use alumnet_core::PostView;

use crate::{middleware::AppState, response::ApiResponse};

/// Get the assembled home feed, newest first.
async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Page<PostView>>> {
    let page = state.feed_service.home_page(query.page).await?;
    Ok(ApiResponse::ok(page))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}
