//! Engagement service (per-user views and like toggles).

use alumnet_common::{AppError, AppResult, IdGenerator};
use alumnet_db::{
    entities::{like, view, view::ViewableType},
    repositories::{LikeRepository, PostRepository, ViewRepository},
};
use chrono::Utc;
use sea_orm::Set;

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy)]
pub struct LikeToggle {
    /// Whether the post is liked by the actor after the toggle.
    pub liked: bool,
    /// Like count derived from rows after the toggle.
    pub like_count: u64,
}

/// Engagement service for business logic.
#[derive(Clone)]
pub struct EngagementService {
    like_repo: LikeRepository,
    view_repo: ViewRepository,
    post_repo: PostRepository,
    id_gen: IdGenerator,
}

impl EngagementService {
    /// Create a new engagement service.
    #[must_use]
    pub fn new(
        like_repo: LikeRepository,
        view_repo: ViewRepository,
        post_repo: PostRepository,
    ) -> Self {
        Self {
            like_repo,
            view_repo,
            post_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Record that a user has seen an item.
    ///
    /// Idempotent upsert by (user, viewable): the first view inserts a row,
    /// every later view refreshes its timestamp. N views leave exactly one
    /// row carrying the latest timestamp.
    pub async fn record_view(
        &self,
        actor_id: &str,
        viewable_type: ViewableType,
        viewable_id: &str,
    ) -> AppResult<view::Model> {
        let now = Utc::now().into();

        if let Some(existing) = self
            .view_repo
            .find_by_user_and_viewable(actor_id, viewable_type, viewable_id)
            .await?
        {
            return self.view_repo.touch(existing, now).await;
        }

        let model = view::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(actor_id.to_string()),
            viewable_type: Set(viewable_type),
            viewable_id: Set(viewable_id.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match self.view_repo.create(model).await {
            Ok(created) => Ok(created),
            // Lost an insert race on the natural key: the row exists now,
            // fold into the update path
            Err(AppError::Conflict(_)) => {
                let existing = self
                    .view_repo
                    .find_by_user_and_viewable(actor_id, viewable_type, viewable_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal("View vanished after conflicting insert".to_string())
                    })?;
                self.view_repo.touch(existing, now).await
            }
            Err(e) => Err(e),
        }
    }

    /// Toggle the actor's like on a post.
    ///
    /// Each call is a full state flip: a present like is removed, an absent
    /// one is created. The returned count is derived from rows.
    pub async fn toggle_like(&self, actor_id: &str, post_id: &str) -> AppResult<LikeToggle> {
        // Post must exist
        let post = self.post_repo.get_by_id(post_id).await?;

        let liked = match self
            .like_repo
            .find_by_user_and_post(actor_id, &post.id)
            .await?
        {
            Some(existing) => {
                self.like_repo.delete(&existing.id).await?;
                tracing::debug!(user_id = %actor_id, post_id = %post.id, "Removed like");
                false
            }
            None => {
                let model = like::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    post_id: Set(post.id.clone()),
                    user_id: Set(actor_id.to_string()),
                    created_at: Set(Utc::now().into()),
                };

                match self.like_repo.create(model).await {
                    Ok(_) => {}
                    // A concurrent toggle inserted first; the post-race
                    // state is "liked", which is what this call wanted
                    Err(AppError::Conflict(_)) => {}
                    Err(e) => return Err(e),
                }
                tracing::debug!(user_id = %actor_id, post_id = %post.id, "Added like");
                true
            }
        };

        let like_count = self.like_repo.count_by_post(&post.id).await?;

        Ok(LikeToggle { liked, like_count })
    }

    /// Count views of a viewable item.
    pub async fn view_count(
        &self,
        viewable_type: ViewableType,
        viewable_id: &str,
    ) -> AppResult<u64> {
        self.view_repo
            .count_for_viewable(viewable_type, viewable_id)
            .await
    }
}
