//! News service.

use crate::services::gate;
use alumnet_common::{AppError, AppResult, IdGenerator, Page, PAGE_SIZE};
use alumnet_db::{
    entities::{news, user},
    repositories::{NewsRepository, UserRepository},
};
use chrono::Utc;
use sea_orm::Set;
use serde::Deserialize;
use std::collections::HashMap;
use validator::Validate;

/// A news article with its author resolved.
#[derive(Debug, Clone)]
pub struct NewsWithAuthor {
    pub news: news::Model,
    pub author: user::Model,
}

/// Input for creating a news article.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewsInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,

    pub image_url: Option<String>,

    #[serde(default)]
    pub is_published: bool,
}

/// Input for updating a news article.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNewsInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(min = 1))]
    pub content: String,

    pub image_url: Option<String>,

    #[serde(default)]
    pub is_published: bool,
}

/// News service for business logic.
#[derive(Clone)]
pub struct NewsService {
    news_repo: NewsRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl NewsService {
    /// Create a new news service.
    #[must_use]
    pub fn new(news_repo: NewsRepository, user_repo: UserRepository) -> Self {
        Self {
            news_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get one page of published articles with authors, newest first.
    pub async fn list_published_page(&self, page: u64) -> AppResult<Page<NewsWithAuthor>> {
        let page = page.max(1);
        let total_items = self.news_repo.count_published().await?;
        let articles = self.news_repo.find_published_page(page - 1).await?;

        let author_ids: Vec<String> = articles.iter().map(|n| n.author_id.clone()).collect();
        let authors: HashMap<String, user::Model> = self
            .user_repo
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        let items = articles
            .into_iter()
            .filter_map(|news| {
                let author = authors.get(&news.author_id)?.clone();
                Some(NewsWithAuthor { news, author })
            })
            .collect();

        Ok(Page::new(
            items,
            page,
            total_items,
            total_items.div_ceil(PAGE_SIZE),
        ))
    }

    /// Get an article.
    ///
    /// An unpublished article is visible to its author and admins only;
    /// everyone else gets `NotFound` so its existence is not leaked.
    pub async fn get(&self, actor: Option<&user::Model>, news_id: &str) -> AppResult<news::Model> {
        let news = self.news_repo.get_by_id(news_id).await?;

        if !news.is_published {
            let allowed = actor.is_some_and(|a| a.is_admin || a.id == news.author_id);
            if !allowed {
                return Err(AppError::NotFound(format!("News not found: {news_id}")));
            }
        }

        Ok(news)
    }

    /// Create an article. Admin only.
    pub async fn create(&self, actor: &user::Model, input: CreateNewsInput) -> AppResult<news::Model> {
        gate::ensure_admin(actor)?;
        input.validate()?;

        let now = Utc::now().into();
        let model = news::ActiveModel {
            id: Set(self.id_gen.generate()),
            author_id: Set(actor.id.clone()),
            title: Set(input.title),
            content: Set(input.content),
            image_url: Set(input.image_url),
            is_published: Set(input.is_published),
            published_at: Set(input.is_published.then_some(now)),
            created_at: Set(now),
            ..Default::default()
        };

        let created = self.news_repo.create(model).await?;

        tracing::debug!(news_id = %created.id, published = created.is_published, "Created news");

        Ok(created)
    }

    /// Update an article. Admin only.
    ///
    /// Publishing a previously unpublished article stamps `published_at`
    /// once; re-saving a published article never re-stamps it.
    pub async fn update(
        &self,
        actor: &user::Model,
        news_id: &str,
        input: UpdateNewsInput,
    ) -> AppResult<news::Model> {
        gate::ensure_admin(actor)?;
        input.validate()?;

        let existing = self.news_repo.get_by_id(news_id).await?;
        let newly_published = input.is_published && !existing.is_published;
        let published_at = if newly_published {
            Some(Utc::now().into())
        } else {
            existing.published_at
        };

        let mut model: news::ActiveModel = existing.into();
        model.title = Set(input.title);
        model.content = Set(input.content);
        model.image_url = Set(input.image_url);
        model.is_published = Set(input.is_published);
        model.published_at = Set(published_at);
        model.updated_at = Set(Some(Utc::now().into()));

        let updated = self.news_repo.update(model).await?;

        tracing::debug!(news_id = %updated.id, published = updated.is_published, "Updated news");

        Ok(updated)
    }

    /// Delete an article. Admin only.
    pub async fn delete(&self, actor: &user::Model, news_id: &str) -> AppResult<()> {
        gate::ensure_admin(actor)?;

        let news = self.news_repo.get_by_id(news_id).await?;
        self.news_repo.delete(&news.id).await?;

        tracing::debug!(news_id = %news.id, actor_id = %actor.id, "Deleted news");

        Ok(())
    }
}
