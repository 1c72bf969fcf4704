use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::{Article, NewArticle};

/// Filter evaluated by the store, so callers never pull the whole table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleQuery {
    /// Case-sensitive substring that must appear in the title or the content.
    pub search: Option<String>,
}

impl ArticleQuery {
    /// An empty term matches every article; callers wanting "no term, no
    /// results" must filter empty terms out before building the query.
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
        }
    }

    pub fn matches(&self, article: &Article) -> bool {
        match &self.search {
            Some(term) => {
                article.title.contains(term.as_str()) || article.content.contains(term.as_str())
            }
            None => true,
        }
    }
}

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn query(&self, query: &ArticleQuery) -> Result<Vec<Article>>;
    async fn get(&self, id: i64) -> Result<Option<Article>>;
    /// Stores a new article, assigning its id and timestamps.
    async fn insert(&self, article: NewArticle) -> Result<Article>;
    /// Persists title and content and refreshes `updated_at`. `None` when the
    /// article no longer exists.
    async fn update(&self, article: &Article) -> Result<Option<Article>>;
    async fn delete(&self, article: &Article) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SqliteArticleRepository {
    pool: SqlitePool,
}

impl SqliteArticleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleRepository for SqliteArticleRepository {
    async fn query(&self, query: &ArticleQuery) -> Result<Vec<Article>> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT id, title, content, created_at, updated_at FROM articles",
        );
        if let Some(term) = &query.search {
            // instr() keeps the match case-sensitive, unlike LIKE.
            qb.push(" WHERE instr(title, ")
                .push_bind(term.clone())
                .push(") > 0 OR instr(content, ")
                .push_bind(term.clone())
                .push(") > 0");
        }
        qb.push(" ORDER BY id");

        let articles = qb
            .build_query_as::<Article>()
            .fetch_all(&self.pool)
            .await
            .context("Failed to query articles")?;
        Ok(articles)
    }

    async fn get(&self, id: i64) -> Result<Option<Article>> {
        let article = sqlx::query_as::<Sqlite, Article>(
            r#"
            SELECT id, title, content, created_at, updated_at
            FROM articles
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to load article {id}"))?;
        Ok(article)
    }

    async fn insert(&self, NewArticle { title, content }: NewArticle) -> Result<Article> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let article = sqlx::query_as::<Sqlite, Article>(
            r#"
            INSERT INTO articles (title, content, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, title, content, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(content)
        .bind(now)
        .bind(now)
        .fetch_one(&mut tx)
        .await
        .context("Failed to insert article")?;
        tx.commit().await?;
        Ok(article)
    }

    async fn update(&self, article: &Article) -> Result<Option<Article>> {
        let mut base = article.base.clone();
        base.touch(Utc::now());

        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<Sqlite, Article>(
            r#"
            UPDATE articles
            SET title = ?, content = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, title, content, created_at, updated_at
            "#,
        )
        .bind(article.title.clone())
        .bind(article.content.clone())
        .bind(base.updated_at)
        .bind(base.id)
        .fetch_optional(&mut tx)
        .await
        .with_context(|| format!("Failed to update article {}", base.id))?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, article: &Article) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(article.id())
            .execute(&mut tx)
            .await
            .with_context(|| format!("Failed to delete article {}", article.id()))?;
        tx.commit().await?;
        Ok(())
    }
}
