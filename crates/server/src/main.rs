//! Alumnet server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use alumnet_api::{middleware::AppState, router as api_router};
use alumnet_common::Config;
use alumnet_core::{
    CommentService, EngagementService, EventService, FeedService, FriendshipService, NewsService,
    PostService, UserService,
};
use alumnet_db::repositories::{
    CommentRepository, EventRepository, FriendshipRepository, LikeRepository, NewsRepository,
    PostMediaRepository, PostRepository, UserRepository, ViewRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alumnet=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting alumnet server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = alumnet_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    alumnet_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let media_repo = PostMediaRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));
    let view_repo = ViewRepository::new(Arc::clone(&db));
    let friendship_repo = FriendshipRepository::new(Arc::clone(&db));
    let news_repo = NewsRepository::new(Arc::clone(&db));
    let event_repo = EventRepository::new(Arc::clone(&db));

    // Initialize services
    let user_service = UserService::new(user_repo.clone());
    let post_service = PostService::new(post_repo.clone(), media_repo.clone());
    let comment_service = CommentService::new(comment_repo.clone(), post_repo.clone());
    let friendship_service = FriendshipService::new(friendship_repo, user_repo.clone());
    let engagement_service =
        EngagementService::new(like_repo.clone(), view_repo.clone(), post_repo.clone());
    let feed_service = FeedService::new(
        post_repo,
        user_repo.clone(),
        like_repo,
        comment_repo,
        media_repo,
        view_repo,
    );
    let news_service = NewsService::new(news_repo, user_repo);
    let event_service = EventService::new(event_repo);

    // Create app state
    let state = AppState {
        user_service,
        post_service,
        comment_service,
        friendship_service,
        engagement_service,
        feed_service,
        news_service,
        event_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            alumnet_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
