use crate::errors::AppError;
use orders_types::domain::order::{NewOrder, Order};
use orders_types::domain::user::{NewUser, User};
use orders_types::ports::Repository;

/// Data access for users and orders.
///
/// Every operation returns domain data or an [`AppError`] that already
/// carries its status; raw repository errors never leave this type.
pub struct DataService<R: Repository> {
    repo: R,
}

impl<R: Repository> DataService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.repo.list_users().await.map_err(|e| {
            tracing::debug!(error = %e, "list users failed");
            AppError::new("Failed to retrieve users")
        })
    }

    pub async fn find_or_save_user(&self, email: &str) -> Result<User, AppError> {
        let user = self.repo.find_or_create(email).await.map_err(|e| {
            tracing::debug!(error = %e, "find or create user failed");
            AppError::new(format!(
                "Failed to retrieve or save user with email: {email}"
            ))
        })?;
        tracing::info!("User located or created with email: {}", email);
        Ok(user)
    }

    pub async fn save_user(&self, data: Option<NewUser>) -> Result<User, AppError> {
        let data = data.ok_or_else(|| AppError::new("Failed to save user"))?;
        self.repo.create_user(data).await.map_err(|e| {
            tracing::debug!(error = %e, "create user failed");
            AppError::new("Failed to save user")
        })
    }

    pub async fn list_orders(&self, user_id: i64) -> Result<Vec<Order>, AppError> {
        let failed = || AppError::new(format!("Failed to retrieve orders for user: {user_id}"));
        let rows = self.repo.list_by_user(user_id).await.map_err(|e| {
            tracing::debug!(error = %e, "list orders failed");
            failed()
        })?;
        rows.into_iter()
            .map(|row| {
                let id = row.id;
                row.decode().map_err(|e| {
                    tracing::debug!(order_id = id, error = %e, "stored products are not decodable");
                    failed()
                })
            })
            .collect()
    }

    pub async fn save_order(&self, data: Option<NewOrder>) -> Result<Order, AppError> {
        let data = data.ok_or_else(|| AppError::new("Failed to save order"))?;
        let stored = self.repo.create_order(data.clone()).await.map_err(|e| {
            tracing::debug!(error = %e, "create order failed");
            AppError::new("Failed to save order")
        })?;
        tracing::info!(data = ?data, "New order saved");
        stored.decode().map_err(|e| {
            tracing::debug!(error = %e, "saved products are not decodable");
            AppError::new("Failed to save order")
        })
    }
}
