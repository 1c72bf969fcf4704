mod articles;
mod comments;

pub use articles::ArticlesHandler;
pub use comments::CommentsHandler;

use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    http::{StatusCode, Uri},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    data_formats::{
        ArticleListModel, ArticleModel, CommentListModel, CommentModel, Created, SearchParams,
    },
    errors::RequestError,
    models::{Article, Comment},
};

type JsonResult<T> = Result<Json<T>, RequestError>;

// ----------------- Helper Handlers -----------------
pub async fn alive() -> Json<Value> {
    Json(json!({ "status": "alive" }))
}

pub async fn not_found(uri: Uri) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    )
}

fn payload<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, RequestError> {
    payload
        .map(|Json(model)| model)
        .map_err(|rejection| RequestError::MalformedBody(rejection.body_text()))
}

// ----------------- Article Handlers -----------------
pub async fn search_articles(
    Extension(handler): Extension<ArticlesHandler>,
    Query(params): Query<SearchParams>,
) -> JsonResult<ArticleListModel> {
    Ok(Json(handler.search(params.search.as_deref()).await?))
}

pub async fn get_article(
    Extension(handler): Extension<ArticlesHandler>,
    Path(id): Path<i64>,
) -> JsonResult<Article> {
    Ok(Json(handler.get(id).await?))
}

pub async fn create_article(
    Extension(handler): Extension<ArticlesHandler>,
    request: Result<Json<ArticleModel>, JsonRejection>,
) -> Result<Created<Article>, RequestError> {
    handler.post(payload(request)?).await
}

pub async fn update_article(
    Extension(handler): Extension<ArticlesHandler>,
    Path(id): Path<i64>,
    request: Result<Json<ArticleModel>, JsonRejection>,
) -> JsonResult<Article> {
    Ok(Json(handler.put(id, payload(request)?).await?))
}

pub async fn delete_article(
    Extension(handler): Extension<ArticlesHandler>,
    Path(id): Path<i64>,
) -> Result<StatusCode, RequestError> {
    handler.delete(id).await?;
    Ok(StatusCode::OK)
}

// ----------------- Comment Handlers -----------------
pub async fn list_comments(
    Extension(handler): Extension<CommentsHandler>,
    Path(article_id): Path<i64>,
) -> JsonResult<CommentListModel> {
    Ok(Json(handler.list(article_id).await?))
}

pub async fn get_comment(
    Extension(handler): Extension<CommentsHandler>,
    Path((article_id, comment_id)): Path<(i64, i64)>,
) -> JsonResult<Comment> {
    Ok(Json(handler.get(article_id, comment_id).await?))
}

pub async fn create_comment(
    Extension(handler): Extension<CommentsHandler>,
    Path(article_id): Path<i64>,
    request: Result<Json<CommentModel>, JsonRejection>,
) -> Result<Created<Comment>, RequestError> {
    handler.post(article_id, payload(request)?).await
}
