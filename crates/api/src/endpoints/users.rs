//! User profile endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use alumnet_common::{AppResult, Page, PageQuery};
use alumnet_core::PostView;
use alumnet_db::entities::{friendship::FriendshipStatus, user};
use serde::Serialize;

use crate::{extractors::MaybeAuthUser, middleware::AppState, response::ApiResponse};

/// Public profile projection. Credentials never reach the wire.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub graduation_year: Option<i32>,
    pub course: Option<String>,
    pub current_job: Option<String>,
    pub current_company: Option<String>,
    pub linkedin_url: Option<String>,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<user::Model> for ProfileResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            profile_image: user.profile_image,
            bio: user.bio,
            graduation_year: user.graduation_year,
            course: user.course,
            current_job: user.current_job,
            current_company: user.current_company,
            linkedin_url: user.linkedin_url,
            is_admin: user.is_admin,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Profile page: the user, their assembled posts, and the friendship status
/// between the caller and the user.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePageResponse {
    pub user: ProfileResponse,
    pub posts: Page<PostView>,
    pub friendship_status: Option<FriendshipStatus>,
}

/// Show a user's profile with their posts.
async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<ApiResponse<ProfilePageResponse>> {
    let user = state.user_service.get(&user_id).await?;
    let posts = state.feed_service.user_page(&user.id, query.page).await?;

    // Friendship status only makes sense between two distinct users
    let friendship_status = match viewer {
        Some(ref viewer) if viewer.id != user.id => {
            state
                .friendship_service
                .status_between(&viewer.id, &user.id)
                .await?
        }
        _ => None,
    };

    Ok(ApiResponse::ok(ProfilePageResponse {
        user: user.into(),
        posts,
        friendship_status,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(show))
}
