//! Knowledge-base article CRUD: filtered listing, view counting, and the
//! authorship contribution log.

use serde::Deserialize;
use sqlx::Row;

use super::contributions::{log_contribution, ContributionType};
use super::models::Article;
use super::query_builder::{bind_values, bind_values_as, SetBuilder, WhereBuilder};
use super::{Database, DatabaseError};

const ARTICLE_SELECT: &str = "SELECT a.*, m.name AS author_name
     FROM articles a
     LEFT JOIN members m ON a.author_id = m.member_id";

#[derive(Debug, Default, Deserialize)]
pub struct ArticleFilter {
    pub r#type: Option<String>,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub search: Option<String>,
}

/// Partial update payload: absent fields leave their columns unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub r#type: Option<String>,
    pub category: Option<String>,
    pub competition_year: Option<i32>,
}

impl Database {
    /// List articles, newest first. Filters are conjunctive; the free-text
    /// search matches title or content case-insensitively.
    pub async fn list_articles(&self, filter: &ArticleFilter) -> Result<Vec<Article>, DatabaseError> {
        let mut where_builder = WhereBuilder::new();
        if let Some(ref article_type) = filter.r#type {
            where_builder.eq("a.type", article_type.as_str());
        }
        if let Some(ref category) = filter.category {
            where_builder.eq("a.category", category.as_str());
        }
        if let Some(year) = filter.year {
            where_builder.eq("a.competition_year", year);
        }
        if let Some(ref search) = filter.search {
            where_builder.search(&["a.title", "a.content"], search);
        }

        let sql = format!(
            "{ARTICLE_SELECT}{} ORDER BY a.created_at DESC",
            where_builder.clause()
        );
        let articles = bind_values_as(sqlx::query_as::<_, Article>(&sql), where_builder.params())
            .fetch_all(self.pool())
            .await?;
        Ok(articles)
    }

    /// Bump the view counter. Deliberately a statement of its own, issued
    /// before the read; it is not rolled back if the read fails.
    pub async fn increment_article_views(&self, id: i32) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE articles SET view_count = view_count + 1 WHERE article_id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    pub async fn get_article(&self, id: i32) -> Result<Option<Article>, DatabaseError> {
        let sql = format!("{ARTICLE_SELECT} WHERE a.article_id = $1");
        let article = sqlx::query_as::<_, Article>(&sql)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(article)
    }

    /// Insert an article and credit the author, both in one transaction.
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_article(
        &self,
        title: &str,
        content: Option<&str>,
        author_id: i32,
        article_type: &str,
        category: Option<&str>,
        competition_year: Option<i32>,
        file_path: Option<&str>,
    ) -> Result<i32, DatabaseError> {
        let mut tx = self.pool().begin().await?;

        let article_id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO articles (title, content, author_id, type, category, competition_year, file_path)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING article_id",
        )
        .bind(title)
        .bind(content)
        .bind(author_id)
        .bind(article_type)
        .bind(category)
        .bind(competition_year)
        .bind(file_path)
        .fetch_one(&mut *tx)
        .await?;

        log_contribution(&mut *tx, author_id, ContributionType::Article, article_id).await?;

        tx.commit().await?;
        Ok(article_id)
    }

    /// Partial update; a newly stored attachment path replaces the old one
    /// (the previous blob is left on disk). Returns `None` when the id does
    /// not exist.
    pub async fn update_article(
        &self,
        id: i32,
        update: ArticleUpdate,
        new_file_path: Option<&str>,
    ) -> Result<Option<Article>, DatabaseError> {
        let mut set = SetBuilder::new();
        if let Some(title) = update.title {
            set.set("title", title);
        }
        if let Some(content) = update.content {
            set.set("content", content);
        }
        if let Some(article_type) = update.r#type {
            set.set("type", article_type);
        }
        if let Some(category) = update.category {
            set.set("category", category);
        }
        if let Some(competition_year) = update.competition_year {
            set.set("competition_year", competition_year);
        }
        if let Some(file_path) = new_file_path {
            set.set("file_path", file_path);
        }

        if set.is_empty() {
            return self.get_article(id).await;
        }
        set.set_raw("updated_at = NOW()");

        let sql = format!(
            "UPDATE articles {} WHERE article_id = ${} RETURNING article_id",
            set.clause(),
            set.next_index()
        );
        let updated = bind_values(sqlx::query(&sql), set.params())
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        if updated.is_none() {
            return Ok(None);
        }
        self.get_article(id).await
    }

    /// Delete an article row, returning the stored attachment path so the
    /// caller can remove the blob after the row is gone. Outer `None` means
    /// the id did not exist.
    pub async fn delete_article(&self, id: i32) -> Result<Option<Option<String>>, DatabaseError> {
        let row = sqlx::query("DELETE FROM articles WHERE article_id = $1 RETURNING file_path")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        match row {
            Some(row) => Ok(Some(row.try_get("file_path")?)),
            None => Ok(None),
        }
    }
}
