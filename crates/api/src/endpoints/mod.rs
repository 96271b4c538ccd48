//! API endpoints.

mod comments;
mod events;
mod feed;
mod friendships;
mod news;
mod posts;
mod profile;
mod users;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/feed", feed::router())
        .nest("/posts", posts::router())
        .nest("/comments", comments::router())
        .nest("/friendships", friendships::router())
        .nest("/news", news::router())
        .nest("/events", events::router())
        .nest("/users", users::router())
        .nest("/profile", profile::router())
}
