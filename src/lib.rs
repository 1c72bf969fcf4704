mod config;
mod data_formats;
mod errors;
mod handlers;
pub mod logging;
mod models;
mod repositories;

use anyhow::Context;
pub use anyhow::Result;
use axum::{routing::*, Extension, Router};
pub use config::Config;
pub use data_formats::*;
pub use errors::{FieldErrors, RequestError};
use handlers::*;
pub use handlers::{ArticlesHandler, CommentsHandler};
pub use models::*;
pub use repositories::*;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
use std::{net::TcpListener, sync::Arc};

pub async fn run_app(app: Router, listener: TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    tracing::info!(%address, "server started");
    axum::Server::from_tcp(listener)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

pub async fn init_db(config: &Config) -> Result<SqlitePool> {
    let db_url = config.database_url.as_str();
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        tracing::info!(db_url, "creating database");
        Sqlite::create_database(db_url)
            .await
            .context("Failed to create database")?;
    } else {
        tracing::info!(db_url, "database already exists");
    }
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(db_url)
        .await
        .context("Failed to connect to database")?;
    migrate(&pool).await?;
    Ok(pool)
}

/// A private database living as long as the returned pool.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    // Every new connection to `sqlite::memory:` sees a fresh database, so keep exactly one alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .context("Failed to open in-memory database")?;
    migrate(&pool).await?;
    Ok(pool)
}

async fn migrate(pool: &SqlitePool) -> Result<()> {
    tracing::debug!("running migrations");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    tracing::debug!("migrations completed");
    Ok(())
}

pub fn bind_free_port() -> Result<TcpListener> {
    TcpListener::bind("127.0.0.1:0").context("Could not get a free port")
}

pub fn sqlite_router(pool: SqlitePool) -> Router {
    make_router(
        Arc::new(SqliteArticleRepository::new(pool.clone())),
        Arc::new(SqliteCommentRepository::new(pool)),
    )
}

pub fn make_router(
    articles: Arc<dyn ArticleRepository>,
    comments: Arc<dyn CommentRepository>,
) -> Router {
    let articles_handler = ArticlesHandler::new(articles.clone());
    let comments_handler = CommentsHandler::new(articles, comments);
    Router::new()
        .route("/check_health", get(alive))
        .route("/articles", get(search_articles).post(create_article))
        .route(
            "/articles/:id",
            get(get_article).put(update_article).delete(delete_article),
        )
        .route(
            "/articles/:id/comments",
            get(list_comments).post(create_comment),
        )
        .route("/articles/:id/comments/:comment_id", get(get_comment))
        .fallback(not_found)
        .layer(Extension(articles_handler))
        .layer(Extension(comments_handler))
}
