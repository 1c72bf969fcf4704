use serde::{Deserialize, Serialize};

use crate::models::{Article, Comment};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ArticleListModel {
    pub articles: Vec<Article>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CommentListModel {
    pub comments: Vec<Comment>,
}

impl ArticleListModel {
    pub fn wrap(articles: Vec<Article>) -> ArticleListModel {
        ArticleListModel { articles }
    }
}

impl CommentListModel {
    pub fn wrap(comments: Vec<Comment>) -> CommentListModel {
        CommentListModel { comments }
    }
}
