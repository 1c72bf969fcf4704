use std::sync::Arc;

use crate::{
    data_formats::{check, comment_location, CommentListModel, CommentModel, Created},
    errors::RequestError,
    models::{Article, Comment, NewComment},
    repositories::{ArticleRepository, CommentQuery, CommentRepository},
};

/// Comment reads and writes, always scoped to an existing parent article.
#[derive(Clone)]
pub struct CommentsHandler {
    articles: Arc<dyn ArticleRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentsHandler {
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self { articles, comments }
    }

    pub async fn list(&self, article_id: i64) -> Result<CommentListModel, RequestError> {
        self.require_article(article_id).await?;
        let comments = self
            .comments
            .query(&CommentQuery::for_article(article_id))
            .await?;
        Ok(CommentListModel::wrap(comments))
    }

    pub async fn get(&self, article_id: i64, comment_id: i64) -> Result<Comment, RequestError> {
        self.require_article(article_id).await?;
        self.comments
            .query(&CommentQuery::for_article(article_id).with_id(comment_id))
            .await?
            .into_iter()
            .next()
            .ok_or(RequestError::NotFound)
    }

    pub async fn post(
        &self,
        article_id: i64,
        model: CommentModel,
    ) -> Result<Created<Comment>, RequestError> {
        check(&model)?;
        self.require_article(article_id).await?;

        let CommentModel { title, content } = model;
        let comment = self
            .comments
            .insert(NewComment {
                article_id,
                title,
                content,
            })
            .await?;
        tracing::info!(article_id, comment_id = comment.id(), "comment created");
        Ok(Created::new(
            comment_location(article_id, comment.id()),
            comment,
        ))
    }

    async fn require_article(&self, article_id: i64) -> Result<Article, RequestError> {
        self.articles
            .get(article_id)
            .await?
            .ok_or(RequestError::NotFound)
    }
}
