//! Feed assembly.
//!
//! Takes a page of posts and reshapes it into the flat projection the
//! rendering layer consumes: author summary, likes, comments with author
//! summaries, media, and a per-post view count. Related rows are loaded with
//! one batched query per relation; pagination metadata passes through
//! unmodified.

use alumnet_common::{AppResult, Page, PAGE_SIZE};
use alumnet_db::{
    entities::{comment, like, post, post_media, user, view::ViewableType},
    repositories::{
        CommentRepository, LikeRepository, PostMediaRepository, PostRepository, UserRepository,
        ViewRepository,
    },
};
use serde::Serialize;
use std::collections::HashMap;

/// Compact author projection used across the feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

impl From<&user::Model> for UserSummary {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            avatar_url: user.profile_image.clone(),
        }
    }
}

/// Like projection: just enough for the UI to know who liked.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeView {
    pub id: String,
    pub user_id: String,
}

impl From<&like::Model> for LikeView {
    fn from(like: &like::Model) -> Self {
        Self {
            id: like.id.clone(),
            user_id: like.user_id.clone(),
        }
    }
}

/// Comment projection with its author resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub content: String,
    pub user: UserSummary,
    pub created_at: String,
}

/// Media attachment projection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaView {
    pub id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: post_media::MediaType,
}

impl From<&post_media::Model> for MediaView {
    fn from(media: &post_media::Model) -> Self {
        Self {
            id: media.id.clone(),
            url: media.url.clone(),
            media_type: media.media_type.clone(),
        }
    }
}

/// A fully assembled post, ready for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub content: String,
    pub created_at: String,
    pub user: UserSummary,
    pub likes: Vec<LikeView>,
    pub comments: Vec<CommentView>,
    /// Carried for wire compatibility; sharing was never implemented
    pub shares: u64,
    pub views: u64,
    pub media: Vec<MediaView>,
}

/// Feed service for assembling view-ready post collections.
#[derive(Clone)]
pub struct FeedService {
    post_repo: PostRepository,
    user_repo: UserRepository,
    like_repo: LikeRepository,
    comment_repo: CommentRepository,
    media_repo: PostMediaRepository,
    view_repo: ViewRepository,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(
        post_repo: PostRepository,
        user_repo: UserRepository,
        like_repo: LikeRepository,
        comment_repo: CommentRepository,
        media_repo: PostMediaRepository,
        view_repo: ViewRepository,
    ) -> Self {
        Self {
            post_repo,
            user_repo,
            like_repo,
            comment_repo,
            media_repo,
            view_repo,
        }
    }

    /// Assemble one page of the home feed, newest first.
    pub async fn home_page(&self, page: u64) -> AppResult<Page<PostView>> {
        let page = page.max(1);
        let total_items = self.post_repo.count().await?;
        let posts = self.post_repo.find_page(page - 1).await?;
        let items = self.assemble(posts).await?;

        Ok(Page::new(
            items,
            page,
            total_items,
            total_items.div_ceil(PAGE_SIZE),
        ))
    }

    /// Assemble one page of a single user's posts, newest first.
    pub async fn user_page(&self, user_id: &str, page: u64) -> AppResult<Page<PostView>> {
        let page = page.max(1);
        let total_items = self.post_repo.count_by_user(user_id).await?;
        let posts = self.post_repo.find_page_by_user(user_id, page - 1).await?;
        let items = self.assemble(posts).await?;

        Ok(Page::new(
            items,
            page,
            total_items,
            total_items.div_ceil(PAGE_SIZE),
        ))
    }

    /// Assemble a single post.
    pub async fn single(&self, post_id: &str) -> AppResult<PostView> {
        let post = self.post_repo.get_by_id(post_id).await?;
        let id = post.id.clone();
        let mut items = self.assemble(vec![post]).await?;

        items.pop()
            .ok_or_else(|| alumnet_common::AppError::PostNotFound(id))
    }

    /// Reshape a post collection into the flat view projection.
    ///
    /// One batched query per relation, keyed back to posts in memory.
    async fn assemble(&self, posts: Vec<post::Model>) -> AppResult<Vec<PostView>> {
        if posts.is_empty() {
            return Ok(vec![]);
        }

        let post_ids: Vec<String> = posts.iter().map(|p| p.id.clone()).collect();

        let likes = self.like_repo.find_by_posts(&post_ids).await?;
        let comments = self.comment_repo.find_by_posts(&post_ids).await?;
        let media = self.media_repo.find_by_posts(&post_ids).await?;
        let view_counts: HashMap<String, i64> = self
            .view_repo
            .count_for_viewables(ViewableType::Post, &post_ids)
            .await?
            .into_iter()
            .collect();

        // Post authors and comment authors resolve through one user fetch
        let mut author_ids: Vec<String> = posts.iter().map(|p| p.user_id.clone()).collect();
        author_ids.extend(comments.iter().map(|c| c.user_id.clone()));
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<String, user::Model> = self
            .user_repo
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        let mut likes_by_post: HashMap<String, Vec<LikeView>> = HashMap::new();
        for like in &likes {
            likes_by_post
                .entry(like.post_id.clone())
                .or_default()
                .push(like.into());
        }

        let mut comments_by_post: HashMap<String, Vec<CommentView>> = HashMap::new();
        for comment in &comments {
            let Some(author) = authors.get(&comment.user_id) else {
                continue;
            };
            comments_by_post
                .entry(comment.post_id.clone())
                .or_default()
                .push(comment_view(comment, author));
        }

        let mut media_by_post: HashMap<String, Vec<MediaView>> = HashMap::new();
        for item in &media {
            media_by_post
                .entry(item.post_id.clone())
                .or_default()
                .push(item.into());
        }

        let views = posts
            .into_iter()
            .filter_map(|post| {
                let author = authors.get(&post.user_id)?;
                Some(PostView {
                    user: author.into(),
                    likes: likes_by_post.remove(&post.id).unwrap_or_default(),
                    comments: comments_by_post.remove(&post.id).unwrap_or_default(),
                    shares: 0,
                    views: view_counts
                        .get(&post.id)
                        .copied()
                        .unwrap_or(0)
                        .try_into()
                        .unwrap_or(0),
                    media: media_by_post.remove(&post.id).unwrap_or_default(),
                    created_at: post.created_at.to_rfc3339(),
                    id: post.id,
                    content: post.content,
                })
            })
            .collect();

        Ok(views)
    }
}

fn comment_view(comment: &comment::Model, author: &user::Model) -> CommentView {
    CommentView {
        id: comment.id.clone(),
        content: comment.content.clone(),
        user: author.into(),
        created_at: comment.created_at.to_rfc3339(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, name: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{id}@example.com"),
            password_hash: "hash".to_string(),
            token: None,
            profile_image: Some(format!("profiles/{id}.jpg")),
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

    fn create_test_post(id: &str, user_id: &str, content: &str) -> post::Model {
        post::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn service_with(
        post_db: Arc<sea_orm::DatabaseConnection>,
        user_db: Arc<sea_orm::DatabaseConnection>,
        like_db: Arc<sea_orm::DatabaseConnection>,
        comment_db: Arc<sea_orm::DatabaseConnection>,
        media_db: Arc<sea_orm::DatabaseConnection>,
        view_db: Arc<sea_orm::DatabaseConnection>,
    ) -> FeedService {
        FeedService::new(
            PostRepository::new(post_db),
            UserRepository::new(user_db),
            LikeRepository::new(like_db),
            CommentRepository::new(comment_db),
            PostMediaRepository::new(media_db),
            ViewRepository::new(view_db),
        )
    }

    #[tokio::test]
    async fn test_home_page_assembles_posts() {
        let author = create_test_user("u1", "Alice");
        let post = create_test_post("p1", "u1", "Hello!");
        let like = like::Model {
            id: "l1".to_string(),
            post_id: "p1".to_string(),
            user_id: "u2".to_string(),
            created_at: Utc::now().into(),
        };
        let comment = comment::Model {
            id: "c1".to_string(),
            post_id: "p1".to_string(),
            user_id: "u1".to_string(),
            content: "First!".to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        };
        let media = post_media::Model {
            id: "m1".to_string(),
            post_id: "p1".to_string(),
            url: "post-media/m1.jpg".to_string(),
            media_type: post_media::MediaType::Image,
            created_at: Utc::now().into(),
        };

        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .append_query_results([[post]])
                .into_connection(),
        );
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[author]])
                .into_connection(),
        );
        let like_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like]])
                .into_connection(),
        );
        let comment_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[comment]])
                .into_connection(),
        );
        let media_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[media]])
                .into_connection(),
        );
        let view_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // `count_for_viewables` decodes `(String, i64)` by column index.
                // MockDatabase resolves an index via sorted-by-key iteration, so the
                // String `viewable_id` key must sort before the count key to land at
                // index 0 (matching the real `SELECT viewable_id, COUNT(id)` order).
                .append_query_results([[maplit::btreemap! {
                    "viewable_id" => sea_orm::Value::String(Some(Box::new("p1".to_string()))),
                    "viewable_id_count" => sea_orm::Value::BigInt(Some(3))
                }]])
                .into_connection(),
        );

        let service = service_with(post_db, user_db, like_db, comment_db, media_db, view_db);
        let page = service.home_page(1).await.unwrap();

        assert_eq!(page.total_items, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items.len(), 1);

        let view = &page.items[0];
        assert_eq!(view.id, "p1");
        assert_eq!(view.user.name, "Alice");
        assert_eq!(view.likes.len(), 1);
        assert_eq!(view.likes[0].user_id, "u2");
        assert_eq!(view.comments.len(), 1);
        assert_eq!(view.comments[0].user.id, "u1");
        assert_eq!(view.media.len(), 1);
        assert_eq!(view.views, 3);
        assert_eq!(view.shares, 0);
    }

    #[tokio::test]
    async fn test_home_page_preserves_pagination_metadata() {
        let posts: Vec<post::Model> = Vec::new();

        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(23))
                }]])
                .append_query_results([posts])
                .into_connection(),
        );
        let empty =
            || Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(post_db, empty(), empty(), empty(), empty(), empty());
        let page = service.home_page(3).await.unwrap();

        assert_eq!(page.page, 3);
        assert_eq!(page.per_page, PAGE_SIZE);
        assert_eq!(page.total_items, 23);
        assert_eq!(page.total_pages, 3);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_single_missing_post() {
        let post_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<post::Model>::new()])
                .into_connection(),
        );
        let empty =
            || Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = service_with(post_db, empty(), empty(), empty(), empty(), empty());
        let result = service.single("ghost").await;

        assert!(result.is_err());
    }
}
