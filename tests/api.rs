use std::net::SocketAddr;

use crossblog::{
    bind_free_port, connect_in_memory, run_app, sqlite_router, Article, ArticleListModel,
    Comment, CommentListModel,
};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

struct TestApp {
    address: SocketAddr,
    client: Client,
}

impl TestApp {
    async fn spawn() -> Self {
        let pool = connect_in_memory().await.unwrap();
        let listener = bind_free_port().unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(run_app(sqlite_router(pool), listener));
        Self {
            address,
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.address, path)
    }

    async fn create_article(&self, title: &str, content: &str) -> Article {
        let response = self
            .client
            .post(self.url("/articles"))
            .json(&json!({ "title": title, "content": content }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.unwrap()
    }
}

#[tokio::test]
async fn health_check_answers() {
    let app = TestApp::spawn().await;
    let response = app.client.get(app.url("/check_health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = TestApp::spawn().await;
    let response = app.client.get(app.url("/nowhere")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_then_fetch_article() {
    let app = TestApp::spawn().await;
    let response = app
        .client
        .post(app.url("/articles"))
        .json(&json!({ "title": "Hello", "content": "World" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()["location"].to_str().unwrap().to_owned();
    let created: Article = response.json().await.unwrap();
    assert_eq!(location, format!("articles/{}", created.id()));
    assert_eq!(created.base.created_at, created.base.updated_at);

    let response = app
        .client
        .get(app.url(&format!("/{location}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Article = response.json().await.unwrap();
    assert_eq!(fetched.title, "Hello");
    assert_eq!(fetched.content, "World");
}

#[tokio::test]
async fn create_article_without_title_is_bad_request() {
    let app = TestApp::spawn().await;
    let response = app
        .client
        .post(app.url("/articles"))
        .json(&json!({ "content": "World" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["errors"]["title"].is_array());
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = TestApp::spawn().await;
    let response = app
        .client
        .post(app.url("/articles"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["errors"]["body"].is_array());
}

#[tokio::test]
async fn missing_article_is_not_found_without_body() {
    let app = TestApp::spawn().await;
    let response = app.client.get(app.url("/articles/42")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn search_filters_on_title_and_content() {
    let app = TestApp::spawn().await;
    app.create_article("Title1", "first body").await;
    app.create_article("Title2", "second body").await;
    app.create_article("Title3", "third body").await;

    let search = |term: &str| {
        app.client
            .get(app.url("/articles"))
            .query(&[("search", term)])
            .send()
    };

    let all: ArticleListModel = search("Title").await.unwrap().json().await.unwrap();
    assert_eq!(all.articles.len(), 3);

    let by_content: ArticleListModel = search("second").await.unwrap().json().await.unwrap();
    assert_eq!(by_content.articles.len(), 1);
    assert_eq!(by_content.articles[0].title, "Title2");

    let case_sensitive: ArticleListModel = search("title").await.unwrap().json().await.unwrap();
    assert!(case_sensitive.articles.is_empty());

    let response = search("NoMatch").await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let none: ArticleListModel = response.json().await.unwrap();
    assert!(none.articles.is_empty());

    let response = app.client.get(app.url("/articles")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let empty: ArticleListModel = response.json().await.unwrap();
    assert!(empty.articles.is_empty());
}

#[tokio::test]
async fn update_article() {
    let app = TestApp::spawn().await;
    let article = app.create_article("Old", "Text").await;

    let response = app
        .client
        .put(app.url(&format!("/articles/{}", article.id())))
        .json(&json!({ "title": "New", "content": "Words" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Article = response.json().await.unwrap();
    assert_eq!(updated.id(), article.id());
    assert_eq!(updated.title, "New");
    assert_eq!(updated.base.created_at, article.base.created_at);
    assert!(updated.base.updated_at >= updated.base.created_at);

    let response = app
        .client
        .put(app.url(&format!("/articles/{}", article.id())))
        .json(&json!({ "title": "New", "content": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .client
        .put(app.url("/articles/999"))
        .json(&json!({ "title": "New", "content": "Words" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_article() {
    let app = TestApp::spawn().await;
    let article = app.create_article("Doomed", "Text").await;
    let path = format!("/articles/{}", article.id());

    let response = app.client.delete(app.url(&path)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.client.get(app.url(&path)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.client.delete(app.url(&path)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_lifecycle() {
    let app = TestApp::spawn().await;
    let article = app.create_article("With comments", "Text").await;
    let other = app.create_article("Other", "Text").await;
    let comments_path = format!("/articles/{}/comments", article.id());

    let response = app
        .client
        .post(app.url(&comments_path))
        .json(&json!({ "title": "T", "content": "C" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()["location"].to_str().unwrap().to_owned();
    let created: Comment = response.json().await.unwrap();
    assert_eq!(
        location,
        format!("articles/{}/comments/{}", article.id(), created.id())
    );
    assert_eq!(created.article_id, article.id());

    let listed: CommentListModel = app
        .client
        .get(app.url(&comments_path))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.comments, vec![created.clone()]);

    let response = app
        .client
        .get(app.url(&format!("/{location}")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: Comment = response.json().await.unwrap();
    assert_eq!(fetched.title, "T");

    let response = app
        .client
        .get(app.url(&format!(
            "/articles/{}/comments/{}",
            other.id(),
            created.id()
        )))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_require_an_existing_article() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/articles/7/comments"))
        .json(&json!({ "title": "T", "content": "C" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .client
        .get(app.url("/articles/7/comments"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .client
        .get(app.url("/articles/7/comments/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_without_content_is_bad_request() {
    let app = TestApp::spawn().await;
    let article = app.create_article("A", "B").await;
    let response = app
        .client
        .post(app.url(&format!("/articles/{}/comments", article.id())))
        .json(&json!({ "title": "T" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["errors"]["content"].is_array());
}

#[tokio::test]
async fn deleting_an_article_with_comments_succeeds() {
    let app = TestApp::spawn().await;
    let article = app.create_article("A", "B").await;
    let response = app
        .client
        .post(app.url(&format!("/articles/{}/comments", article.id())))
        .json(&json!({ "content": "C" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .client
        .delete(app.url(&format!("/articles/{}", article.id())))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
