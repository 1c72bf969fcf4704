mod article_repository;
mod comment_repository;
mod memory;

pub use article_repository::*;
pub use comment_repository::*;
pub use memory::*;
