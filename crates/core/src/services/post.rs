//! Post service.

use crate::services::gate;
use alumnet_common::{AppError, AppResult, IdGenerator};
use alumnet_db::{
    entities::{post, post_media, post_media::MediaType, user},
    repositories::{PostMediaRepository, PostRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// One media attachment on a new post. The path points at an already-stored
/// file; file bytes never pass through here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInput {
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

/// Input for creating a new post.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostInput {
    #[validate(length(min = 1, max = 300))]
    pub content: String,

    #[serde(default)]
    pub media: Vec<MediaInput>,
}

/// Post service for business logic.
#[derive(Clone)]
pub struct PostService {
    post_repo: PostRepository,
    media_repo: PostMediaRepository,
    id_gen: IdGenerator,
}

impl PostService {
    /// Create a new post service.
    #[must_use]
    pub fn new(post_repo: PostRepository, media_repo: PostMediaRepository) -> Self {
        Self {
            post_repo,
            media_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new post with its media attachments.
    pub async fn create(&self, actor: &user::Model, input: CreatePostInput) -> AppResult<post::Model> {
        input.validate()?;

        if input.media.iter().any(|m| m.url.trim().is_empty()) {
            return Err(AppError::Validation(
                "Media attachments need a storage path".to_string(),
            ));
        }

        let model = post::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(actor.id.clone()),
            content: Set(input.content),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let created = self.post_repo.create(model).await?;

        for media in input.media {
            let model = post_media::ActiveModel {
                id: Set(self.id_gen.generate()),
                post_id: Set(created.id.clone()),
                url: Set(media.url),
                media_type: Set(media.media_type),
                created_at: Set(Utc::now().into()),
            };
            self.media_repo.create(model).await?;
        }

        tracing::debug!(post_id = %created.id, user_id = %actor.id, "Created post");

        Ok(created)
    }

    /// Get a post by ID.
    pub async fn get(&self, post_id: &str) -> AppResult<post::Model> {
        self.post_repo.get_by_id(post_id).await
    }

    /// Delete a post. Owner or admin only.
    ///
    /// Comments, likes, media, and view records cascade at the schema level.
    pub async fn delete(&self, actor: &user::Model, post_id: &str) -> AppResult<()> {
        let post = self.post_repo.get_by_id(post_id).await?;

        gate::ensure_owner_or_admin(actor, &post.user_id)?;

        self.post_repo.delete(&post.id).await?;

        tracing::debug!(post_id = %post.id, actor_id = %actor.id, "Deleted post");

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_user(id: &str, is_admin: bool) -> user::Model {
        user::Model {
            id: id.to_string(),
            name: format!("User {id}"),
            email: format!("{id}@example.com"),
            password_hash: "hash".to_string(),
            token: None,
            profile_image: None,
            bio: None,
            graduation_year: None,
            course: None,
            current_job: None,
            current_company: None,
            linkedin_url: None,
            is_admin,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_post(id: &str, user_id: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            content: "Hello".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_long_content() {
        let post_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let media_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = PostService::new(
            PostRepository::new(post_db),
            PostMediaRepository::new(media_db),
        );

        let actor = create_test_user("u1", false);
        let input = CreatePostInput {
            content: "x".repeat(301),
            media: vec![],
        };

        let result = service.create(&actor, input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_media_path() {
        let post_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let media_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = PostService::new(
            PostRepository::new(post_db),
            PostMediaRepository::new(media_db),
        );

        let actor = create_test_user("u1", false);
        let input = CreatePostInput {
            content: "Look at this".to_string(),
            media: vec![MediaInput {
                url: "  ".to_string(),
                media_type: MediaType::Image,
            }],
        };

        let result = service.create(&actor, input).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_inserts_post_and_media() {
        let created_post = create_test_post("p1", "u1");
        let created_media = post_media::Model {
            id: "m1".to_string(),
            post_id: "p1".to_string(),
            url: "post-media/m1.jpg".to_string(),
            media_type: MediaType::Image,
            created_at: Utc::now().into(),
        };

        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created_post]])
                .into_connection(),
        );
        let media_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created_media]])
                .into_connection(),
        );

        let service = PostService::new(
            PostRepository::new(post_db),
            PostMediaRepository::new(media_db),
        );

        let actor = create_test_user("u1", false);
        let input = CreatePostInput {
            content: "Look at this".to_string(),
            media: vec![MediaInput {
                url: "post-media/m1.jpg".to_string(),
                media_type: MediaType::Image,
            }],
        };

        let result = service.create(&actor, input).await.unwrap();

        assert_eq!(result.id, "p1");
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_returns_forbidden() {
        let post = create_test_post("p1", "u1");

        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[post]])
                .into_connection(),
        );
        let media_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = PostService::new(
            PostRepository::new(post_db),
            PostMediaRepository::new(media_db),
        );

        let actor = create_test_user("u2", false);
        let result = service.delete(&actor, "p1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_by_admin_is_allowed() {
        let post = create_test_post("p1", "u1");

        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // get_by_id for the gate, then find_by_id inside delete
                .append_query_results([[post.clone()], [post]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let media_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = PostService::new(
            PostRepository::new(post_db),
            PostMediaRepository::new(media_db),
        );

        let actor = create_test_user("admin", true);
        assert!(service.delete(&actor, "p1").await.is_ok());
    }
}
