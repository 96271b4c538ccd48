//! User service (profiles and token authentication).

use alumnet_common::{AppError, AppResult};
use alumnet_db::{entities::user, repositories::UserRepository};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Datelike, Utc};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for updating a profile.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(max = 1000))]
    pub bio: Option<String>,

    pub graduation_year: Option<i32>,

    #[validate(length(max = 255))]
    pub course: Option<String>,

    #[validate(length(max = 255))]
    pub current_job: Option<String>,

    #[validate(length(max = 255))]
    pub current_company: Option<String>,

    #[validate(url)]
    pub linkedin_url: Option<String>,

    /// Path of an already-stored profile image
    pub profile_image: Option<String>,
}

/// Input for changing the password.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordInput {
    pub current_password: String,

    #[validate(length(min = 8))]
    pub new_password: String,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Get a user by ID.
    pub async fn get(&self, user_id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(user_id).await
    }

    /// Authenticate a user by API token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Update the actor's own profile.
    pub async fn update_profile(
        &self,
        actor: &user::Model,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        if let Some(year) = input.graduation_year {
            let current_year = Utc::now().year();
            if !(1980..=current_year).contains(&year) {
                return Err(AppError::Validation(format!(
                    "Graduation year must be between 1980 and {current_year}"
                )));
            }
        }

        // Email stays unique across users
        if let Some(existing) = self.user_repo.find_by_email(&input.email).await?
            && existing.id != actor.id
        {
            return Err(AppError::Conflict(
                "Another account already uses this email".to_string(),
            ));
        }

        let mut model: user::ActiveModel = actor.clone().into();
        model.name = Set(input.name);
        model.email = Set(input.email);
        model.bio = Set(input.bio);
        model.graduation_year = Set(input.graduation_year);
        model.course = Set(input.course);
        model.current_job = Set(input.current_job);
        model.current_company = Set(input.current_company);
        model.linkedin_url = Set(input.linkedin_url);
        if input.profile_image.is_some() {
            model.profile_image = Set(input.profile_image);
        }
        model.updated_at = Set(Some(Utc::now().into()));

        let updated = self.user_repo.update(model).await?;

        tracing::debug!(user_id = %updated.id, "Updated profile");

        Ok(updated)
    }

    /// Change the actor's own password.
    pub async fn change_password(
        &self,
        actor: &user::Model,
        input: ChangePasswordInput,
    ) -> AppResult<()> {
        input.validate()?;

        if !verify_password(&input.current_password, &actor.password_hash)? {
            return Err(AppError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        let mut model: user::ActiveModel = actor.clone().into();
        model.password_hash = Set(hash_password(&input.new_password)?);
        model.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(model).await?;

        tracing::debug!(user_id = %actor.id, "Changed password");

        Ok(())
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a password against an Argon2 hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str, email: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            name: format!("User {id}"),
            email: email.to_string(),
            password_hash: hash_password("old-password").unwrap(),
            token: Some("token123".to_string()),
            profile_image: None,
            bio: None,
            graduation_year: None,
            course: None,
            current_job: None,
            current_company: None,
            linkedin_url: None,
            is_admin: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn update_input(email: &str) -> UpdateProfileInput {
        UpdateProfileInput {
            name: "New Name".to_string(),
            email: email.to_string(),
            bio: None,
            graduation_year: Some(2010),
            course: Some("Engineering".to_string()),
            current_job: None,
            current_company: None,
            linkedin_url: None,
            profile_image: None,
        }
    }

    #[test]
    fn test_hash_password_roundtrip() {
        let hash = hash_password("secret-password").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret-password", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_authenticate_by_token_unauthorized() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service.authenticate_by_token("badtoken").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_update_profile_email_collision_returns_conflict() {
        let other = create_test_user("u2", "taken@example.com");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[other]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let actor = create_test_user("u1", "u1@example.com");

        let result = service
            .update_profile(&actor, update_input("taken@example.com"))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_profile_rejects_future_graduation_year() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = UserService::new(UserRepository::new(db));
        let actor = create_test_user("u1", "u1@example.com");

        let mut input = update_input("u1@example.com");
        input.graduation_year = Some(Utc::now().year() + 1);

        let result = service.update_profile(&actor, input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_profile_keeps_own_email() {
        let actor = create_test_user("u1", "u1@example.com");
        let updated = actor.clone();

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // find_by_email returns the actor themself
                .append_query_results([[actor.clone()]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .append_query_results([[updated]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service
            .update_profile(&actor, update_input("u1@example.com"))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_change_password_wrong_current_returns_validation() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = UserService::new(UserRepository::new(db));
        let actor = create_test_user("u1", "u1@example.com");

        let result = service
            .change_password(
                &actor,
                ChangePasswordInput {
                    current_password: "not-the-password".to_string(),
                    new_password: "new-password-123".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_change_password_rejects_short_new_password() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = UserService::new(UserRepository::new(db));
        let actor = create_test_user("u1", "u1@example.com");

        let result = service
            .change_password(
                &actor,
                ChangePasswordInput {
                    current_password: "old-password".to_string(),
                    new_password: "short".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
