use async_trait::async_trait;

use super::RepoError;
use crate::domain::order::{NewOrder, StoredOrder};

#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    async fn create_order(&self, order: NewOrder) -> Result<StoredOrder, RepoError>;
    /// Orders of one user, oldest first.
    async fn list_by_user(&self, userid: i64) -> Result<Vec<StoredOrder>, RepoError>;
}
