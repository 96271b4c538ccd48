//! HTTP API layer for alumnet.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: feed, posts, comments, friendships, news, events, profiles
//! - **Extractors**: bearer-token authentication
//! - **Middleware**: application state and token resolution
//!
//! Built on Axum with a Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{auth_middleware, AppState};
