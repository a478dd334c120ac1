use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use orders_types::domain::order::{NewOrder, StoredOrder};
use orders_types::domain::user::{NewUser, User};
use orders_types::ports::{OrderRepository, RepoError, UserRepository};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct InMemoryRepo {
    pub users: Arc<DashMap<String, User>>,
    pub orders: Arc<DashMap<i64, StoredOrder>>,
    next_user_id: Arc<AtomicI64>,
    next_order_id: Arc<AtomicI64>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            users: Arc::new(DashMap::new()),
            orders: Arc::new(DashMap::new()),
            next_user_id: Arc::new(AtomicI64::new(1)),
            next_order_id: Arc::new(AtomicI64::new(1)),
        }
    }

    fn new_user(&self, email: String) -> User {
        User {
            id: self.next_user_id.fetch_add(1, Ordering::SeqCst),
            email,
            created_at: Utc::now(),
        }
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryRepo {
    async fn find_or_create(&self, email: &str) -> Result<User, RepoError> {
        // The entry guard holds the shard lock, so concurrent callers with the
        // same email observe a single insert.
        let user = self
            .users
            .entry(email.to_string())
            .or_insert_with(|| self.new_user(email.to_string()))
            .clone();
        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(RepoError::DuplicateEmail(user.email)),
            Entry::Vacant(slot) => Ok(slot.insert(self.new_user(user.email)).clone()),
        }
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        let mut users: Vec<User> = self.users.iter().map(|kv| kv.value().clone()).collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepo {
    async fn create_order(&self, order: NewOrder) -> Result<StoredOrder, RepoError> {
        // Same guarantee the sqlite foreign key gives.
        if !self.users.iter().any(|kv| kv.value().id == order.userid) {
            return Err(RepoError::DbError(format!(
                "no user with id {}",
                order.userid
            )));
        }
        let stored = StoredOrder {
            id: self.next_order_id.fetch_add(1, Ordering::SeqCst),
            userid: order.userid,
            products: order.products,
            created_at: Utc::now(),
        };
        self.orders.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list_by_user(&self, userid: i64) -> Result<Vec<StoredOrder>, RepoError> {
        let mut orders: Vec<StoredOrder> = self
            .orders
            .iter()
            .filter(|kv| kv.value().userid == userid)
            .map(|kv| kv.value().clone())
            .collect();
        orders.sort_by_key(|o| o.id);
        Ok(orders)
    }
}
