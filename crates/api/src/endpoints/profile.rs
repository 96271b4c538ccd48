//! Own-profile endpoints.

use axum::{extract::State, routing::put, Json, Router};
use alumnet_common::AppResult;
use alumnet_core::{ChangePasswordInput, UpdateProfileInput};

use crate::{
    endpoints::users::ProfileResponse, extractors::AuthUser, middleware::AppState,
    response::ApiResponse,
};

/// Update the caller's profile.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let updated = state.user_service.update_profile(&user, input).await?;
    Ok(ApiResponse::ok(updated.into()))
}

/// Change the caller's password.
async fn change_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordInput>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.change_password(&user, input).await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", put(update))
        .route("/password", put(change_password))
}
