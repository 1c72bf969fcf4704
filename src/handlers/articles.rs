use std::sync::Arc;

use crate::{
    data_formats::{article_location, check, ArticleListModel, ArticleModel, Created},
    errors::RequestError,
    models::{Article, NewArticle},
    repositories::{ArticleQuery, ArticleRepository},
};

/// Article CRUD and search on top of an [`ArticleRepository`].
#[derive(Clone)]
pub struct ArticlesHandler {
    articles: Arc<dyn ArticleRepository>,
}

impl ArticlesHandler {
    pub fn new(articles: Arc<dyn ArticleRepository>) -> Self {
        Self { articles }
    }

    /// An empty or absent term matches nothing.
    pub async fn search(&self, term: Option<&str>) -> Result<ArticleListModel, RequestError> {
        let term = match term {
            Some(term) if !term.is_empty() => term,
            _ => return Ok(ArticleListModel::default()),
        };
        let articles = self.articles.query(&ArticleQuery::search(term)).await?;
        Ok(ArticleListModel::wrap(articles))
    }

    pub async fn get(&self, id: i64) -> Result<Article, RequestError> {
        self.articles
            .get(id)
            .await?
            .ok_or(RequestError::NotFound)
    }

    pub async fn post(&self, model: ArticleModel) -> Result<Created<Article>, RequestError> {
        check(&model)?;
        let ArticleModel { title, content } = model;
        let article = self.articles.insert(NewArticle { title, content }).await?;
        tracing::info!(article_id = article.id(), "article created");
        Ok(Created::new(article_location(article.id()), article))
    }

    pub async fn put(&self, id: i64, model: ArticleModel) -> Result<Article, RequestError> {
        check(&model)?;
        let mut article = self.get(id).await?;
        article.title = model.title;
        article.content = model.content;
        // The row can vanish between the lookup and the write.
        let article = self
            .articles
            .update(&article)
            .await?
            .ok_or(RequestError::NotFound)?;
        tracing::info!(article_id = id, "article updated");
        Ok(article)
    }

    pub async fn delete(&self, id: i64) -> Result<(), RequestError> {
        let article = self.get(id).await?;
        self.articles.delete(&article).await?;
        tracing::info!(article_id = id, "article deleted");
        Ok(())
    }
}
