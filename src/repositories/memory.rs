//! Repositories backed by process memory. Ids are handed out from 0 upward.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{Article, BaseEntity, Comment, NewArticle, NewComment};

use super::{ArticleQuery, ArticleRepository, CommentQuery, CommentRepository};

struct Table<T> {
    next_id: i64,
    rows: Vec<T>,
}

impl<T> Table<T> {
    fn seeded(rows: Vec<T>, id_of: impl Fn(&T) -> i64) -> Self {
        let next_id = rows.iter().map(id_of).max().map_or(0, |id| id + 1);
        Self { next_id, rows }
    }

    fn allocate(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

pub struct InMemoryArticleRepository {
    table: RwLock<Table<Article>>,
}

impl InMemoryArticleRepository {
    pub fn new() -> Self {
        Self::with_articles(Vec::new())
    }

    pub fn with_articles(articles: Vec<Article>) -> Self {
        Self {
            table: RwLock::new(Table::seeded(articles, Article::id)),
        }
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryArticleRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn query(&self, query: &ArticleQuery) -> Result<Vec<Article>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|article| query.matches(article))
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Article>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|article| article.id() == id).cloned())
    }

    async fn insert(&self, NewArticle { title, content }: NewArticle) -> Result<Article> {
        let mut table = self.table.write().await;
        let article = Article {
            base: BaseEntity::new(table.allocate(), Utc::now()),
            title,
            content,
        };
        table.rows.push(article.clone());
        Ok(article)
    }

    async fn update(&self, article: &Article) -> Result<Option<Article>> {
        let mut table = self.table.write().await;
        let stored = match table.rows.iter_mut().find(|stored| stored.id() == article.id()) {
            Some(stored) => stored,
            None => return Ok(None),
        };
        stored.title = article.title.clone();
        stored.content = article.content.clone();
        stored.base.touch(Utc::now());
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, article: &Article) -> Result<()> {
        let mut table = self.table.write().await;
        table.rows.retain(|stored| stored.id() != article.id());
        Ok(())
    }
}

pub struct InMemoryCommentRepository {
    table: RwLock<Table<Comment>>,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self::with_comments(Vec::new())
    }

    pub fn with_comments(comments: Vec<Comment>) -> Self {
        Self {
            table: RwLock::new(Table::seeded(comments, Comment::id)),
        }
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryCommentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn query(&self, query: &CommentQuery) -> Result<Vec<Comment>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .iter()
            .filter(|comment| query.matches(comment))
            .cloned()
            .collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Comment>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|comment| comment.id() == id).cloned())
    }

    async fn insert(
        &self,
        NewComment {
            article_id,
            title,
            content,
        }: NewComment,
    ) -> Result<Comment> {
        let mut table = self.table.write().await;
        let comment = Comment {
            base: BaseEntity::new(table.allocate(), Utc::now()),
            article_id,
            title,
            content,
        };
        table.rows.push(comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: &Comment) -> Result<Option<Comment>> {
        let mut table = self.table.write().await;
        let stored = match table.rows.iter_mut().find(|stored| stored.id() == comment.id()) {
            Some(stored) => stored,
            None => return Ok(None),
        };
        stored.title = comment.title.clone();
        stored.content = comment.content.clone();
        stored.base.touch(Utc::now());
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, comment: &Comment) -> Result<()> {
        let mut table = self.table.write().await;
        table.rows.retain(|stored| stored.id() != comment.id());
        Ok(())
    }
}
