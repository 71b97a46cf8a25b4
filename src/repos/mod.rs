pub mod cat_repo;
pub mod error;
pub mod user_repo;
