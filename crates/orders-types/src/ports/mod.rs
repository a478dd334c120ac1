pub mod order_repository;
pub mod user_repository;

pub use order_repository::OrderRepository;
pub use user_repository::UserRepository;

#[derive(thiserror::Error, Debug)]
pub enum RepoError {
    #[error("db error: {0}")]
    DbError(String),

    #[error("duplicate email: {0}")]
    DuplicateEmail(String),
}

/// Storage backend able to serve both users and orders.
pub trait Repository: UserRepository + OrderRepository {}

impl<T: UserRepository + OrderRepository> Repository for T {}
