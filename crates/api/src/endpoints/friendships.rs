//! Friendships endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Router,
};
use alumnet_common::AppResult;
use alumnet_core::UserSummary;
use alumnet_db::entities::friendship;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Friendship row response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipResponse {
    pub id: String,
    pub requester_id: String,
    pub addressee_id: String,
    pub status: friendship::FriendshipStatus,
    pub created_at: String,
}

impl From<friendship::Model> for FriendshipResponse {
    fn from(f: friendship::Model) -> Self {
        Self {
            id: f.id,
            requester_id: f.user_id1,
            addressee_id: f.user_id2,
            status: f.status,
            created_at: f.created_at.to_rfc3339(),
        }
    }
}

/// A pending request with its requester.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequestResponse {
    pub id: String,
    pub requester: UserSummary,
    pub created_at: String,
}

/// Friends and pending received requests for the caller.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendshipIndexResponse {
    pub friends: Vec<UserSummary>,
    pub pending_requests: Vec<PendingRequestResponse>,
}

/// Get the caller's friends and pending requests.
async fn index(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<FriendshipIndexResponse>> {
    let friends = state
        .friendship_service
        .friends_of(&user.id)
        .await?
        .iter()
        .map(UserSummary::from)
        .collect();

    let pending_requests = state
        .friendship_service
        .pending_received(&user.id)
        .await?
        .into_iter()
        .map(|p| PendingRequestResponse {
            id: p.friendship.id,
            requester: UserSummary::from(&p.requester),
            created_at: p.friendship.created_at.to_rfc3339(),
        })
        .collect();

    Ok(ApiResponse::ok(FriendshipIndexResponse {
        friends,
        pending_requests,
    }))
}

/// Send a friendship request to a user.
async fn request(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<FriendshipResponse>> {
    let friendship = state.friendship_service.request(&user, &user_id).await?;
    Ok(ApiResponse::ok(friendship.into()))
}

/// Accept a pending request. Addressee only.
async fn accept(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(friendship_id): Path<String>,
) -> AppResult<ApiResponse<FriendshipResponse>> {
    let friendship = state
        .friendship_service
        .accept(&user, &friendship_id)
        .await?;
    Ok(ApiResponse::ok(friendship.into()))
}

/// Reject a pending request. Addressee only.
async fn reject(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(friendship_id): Path<String>,
) -> AppResult<ApiResponse<FriendshipResponse>> {
    let friendship = state
        .friendship_service
        .reject(&user, &friendship_id)
        .await?;
    Ok(ApiResponse::ok(friendship.into()))
}

/// Remove a friendship. Either party.
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(friendship_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state
        .friendship_service
        .remove(&user, &friendship_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/{id}", post(request).delete(remove))
        .route("/{id}/accept", put(accept))
        .route("/{id}/reject", put(reject))
}
