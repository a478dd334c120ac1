use async_trait::async_trait;

use super::RepoError;
use crate::domain::user::{NewUser, User};

#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Returns the user with exactly this email, inserting it first when absent.
    async fn find_or_create(&self, email: &str) -> Result<User, RepoError>;
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError>;
    async fn list_users(&self) -> Result<Vec<User>, RepoError>;
}
