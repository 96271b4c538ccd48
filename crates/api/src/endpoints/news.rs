//! News endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use alumnet_common::{AppResult, Page, PageQuery};
use alumnet_core::{CreateNewsInput, NewsWithAuthor, UpdateNewsInput, UserSummary};
use alumnet_db::entities::{news, view::ViewableType};
use serde::Serialize;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// News article response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub published_at: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<UserSummary>,
    /// Distinct-viewer count; present on the show endpoint only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
}

impl From<news::Model> for NewsResponse {
    fn from(news: news::Model) -> Self {
        Self {
            id: news.id,
            title: news.title,
            content: news.content,
            image_url: news.image_url,
            is_published: news.is_published,
            published_at: news.published_at.map(|t| t.to_rfc3339()),
            created_at: news.created_at.to_rfc3339(),
            author: None,
            views: None,
        }
    }
}

impl From<NewsWithAuthor> for NewsResponse {
    fn from(item: NewsWithAuthor) -> Self {
        let author = UserSummary::from(&item.author);
        let mut response = Self::from(item.news);
        response.author = Some(author);
        response
    }
}

/// List published articles, newest publication first.
async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<Page<NewsResponse>>> {
    let page = state.news_service.list_published_page(query.page).await?;
    Ok(ApiResponse::ok(page.map(NewsResponse::from)))
}

/// Show an article. Unpublished articles are visible to the author and
/// admins only. Records a view for authenticated callers.
async fn show(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(news_id): Path<String>,
) -> AppResult<ApiResponse<NewsResponse>> {
    let news = state.news_service.get(user.as_ref(), &news_id).await?;

    if let Some(ref user) = user {
        state
            .engagement_service
            .record_view(&user.id, ViewableType::News, &news.id)
            .await?;
    }

    let views = state
        .engagement_service
        .view_count(ViewableType::News, &news.id)
        .await?;

    let mut response = NewsResponse::from(news);
    response.views = Some(views);

    Ok(ApiResponse::ok(response))
}

/// Create an article. Admin only.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateNewsInput>,
) -> AppResult<ApiResponse<NewsResponse>> {
    let news = state.news_service.create(&user, input).await?;
    Ok(ApiResponse::ok(news.into()))
}

/// Update an article. Admin only.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(news_id): Path<String>,
    Json(input): Json<UpdateNewsInput>,
) -> AppResult<ApiResponse<NewsResponse>> {
    let news = state.news_service.update(&user, &news_id, input).await?;
    Ok(ApiResponse::ok(news.into()))
}

/// Delete an article. Admin only.
async fn destroy(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(news_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.news_service.delete(&user, &news_id).await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index).post(create))
        .route("/{id}", get(show).put(update).delete(destroy))
}
