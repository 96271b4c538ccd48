//! Comment service.

use crate::services::gate;
use alumnet_common::{AppResult, IdGenerator};
use alumnet_db::{
    entities::{comment, user},
    repositories::{CommentRepository, PostRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Input for creating a comment.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 500))]
    pub content: String,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(comment_repo: CommentRepository, post_repo: PostRepository) -> Self {
        Self {
            comment_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Comment on a post.
    pub async fn create(
        &self,
        actor: &user::Model,
        post_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        // Post must exist
        let post = self.post_repo.get_by_id(post_id).await?;

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            post_id: Set(post.id.clone()),
            user_id: Set(actor.id.clone()),
            content: Set(input.content),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let created = self.comment_repo.create(model).await?;

        tracing::debug!(comment_id = %created.id, post_id = %post.id, "Created comment");

        Ok(created)
    }

    /// Delete a comment. Author or admin only.
    pub async fn delete(&self, actor: &user::Model, comment_id: &str) -> AppResult<()> {
        let comment = self.comment_repo.get_by_id(comment_id).await?;

        gate::ensure_owner_or_admin(actor, &comment.user_id)?;

        self.comment_repo.delete(&comment.id).await?;

        tracing::debug!(comment_id = %comment.id, actor_id = %actor.id, "Deleted comment");

        Ok(())
    }
}
