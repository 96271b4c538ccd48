//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use alumnet_core::{
    CommentService, EngagementService, EventService, FeedService, FriendshipService, NewsService,
    PostService, UserService,
};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub post_service: PostService,
    pub comment_service: CommentService,
    pub friendship_service: FriendshipService,
    pub engagement_service: EngagementService,
    pub feed_service: FeedService,
    pub news_service: NewsService,
    pub event_service: EventService,
}

/// Authentication middleware.
///
/// Resolves a bearer token to a user and stores it in request extensions;
/// anonymous requests pass through untouched and fail later only where an
/// endpoint demands an authenticated caller.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate_by_token(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
