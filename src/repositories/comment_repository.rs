use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::{Comment, NewComment};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentQuery {
    pub article_id: Option<i64>,
    pub id: Option<i64>,
}

impl CommentQuery {
    pub fn for_article(article_id: i64) -> Self {
        Self {
            article_id: Some(article_id),
            id: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn matches(&self, comment: &Comment) -> bool {
        self.article_id.map_or(true, |id| comment.article_id == id)
            && self.id.map_or(true, |id| comment.id() == id)
    }
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn query(&self, query: &CommentQuery) -> Result<Vec<Comment>>;
    async fn get(&self, id: i64) -> Result<Option<Comment>>;
    /// Stores a new comment, assigning its id and timestamps. The parent
    /// article is expected to have been checked by the caller.
    async fn insert(&self, comment: NewComment) -> Result<Comment>;
    /// `None` when the comment no longer exists.
    async fn update(&self, comment: &Comment) -> Result<Option<Comment>>;
    async fn delete(&self, comment: &Comment) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SqliteCommentRepository {
    pool: SqlitePool,
}

impl SqliteCommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for SqliteCommentRepository {
    async fn query(&self, query: &CommentQuery) -> Result<Vec<Comment>> {
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT id, article_id, title, content, created_at, updated_at FROM comments",
        );
        let mut seperator = " WHERE ";
        if let Some(article_id) = query.article_id {
            qb.push(seperator).push("article_id = ").push_bind(article_id);
            seperator = " AND ";
        }
        if let Some(id) = query.id {
            qb.push(seperator).push("id = ").push_bind(id);
        }
        qb.push(" ORDER BY id");

        let comments = qb
            .build_query_as::<Comment>()
            .fetch_all(&self.pool)
            .await
            .context("Failed to query comments")?;
        Ok(comments)
    }

    async fn get(&self, id: i64) -> Result<Option<Comment>> {
        let comment = sqlx::query_as::<Sqlite, Comment>(
            r#"
            SELECT id, article_id, title, content, created_at, updated_at
            FROM comments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to load comment {id}"))?;
        Ok(comment)
    }

    async fn insert(
        &self,
        NewComment {
            article_id,
            title,
            content,
        }: NewComment,
    ) -> Result<Comment> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        let comment = sqlx::query_as::<Sqlite, Comment>(
            r#"
            INSERT INTO comments (article_id, title, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, article_id, title, content, created_at, updated_at
            "#,
        )
        .bind(article_id)
        .bind(title)
        .bind(content)
        .bind(now)
        .bind(now)
        .fetch_one(&mut tx)
        .await
        .with_context(|| format!("Failed to insert comment for article {article_id}"))?;
        tx.commit().await?;
        Ok(comment)
    }

    async fn update(&self, comment: &Comment) -> Result<Option<Comment>> {
        let mut base = comment.base.clone();
        base.touch(Utc::now());

        let mut tx = self.pool.begin().await?;
        let updated = sqlx::query_as::<Sqlite, Comment>(
            r#"
            UPDATE comments
            SET title = ?, content = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, article_id, title, content, created_at, updated_at
            "#,
        )
        .bind(comment.title.clone())
        .bind(comment.content.clone())
        .bind(base.updated_at)
        .bind(base.id)
        .fetch_optional(&mut tx)
        .await
        .with_context(|| format!("Failed to update comment {}", base.id))?;
        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, comment: &Comment) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(comment.id())
            .execute(&mut tx)
            .await
            .with_context(|| format!("Failed to delete comment {}", comment.id()))?;
        tx.commit().await?;
        Ok(())
    }
}
