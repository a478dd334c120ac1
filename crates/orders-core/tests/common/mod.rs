//! Shared test doubles and server bootstrapping.
#![allow(dead_code)]

use async_trait::async_trait;
use orders_core::application::data_service::DataService;
use orders_core::inbound::http::{HttpServer, HttpServerConfig};
use orders_types::domain::order::{NewOrder, StoredOrder};
use orders_types::domain::user::{NewUser, User};
use orders_types::ports::{OrderRepository, RepoError, Repository, UserRepository};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Repository that serves a fixed user and can be told to fail either side.
#[derive(Clone, Default)]
pub struct FailingRepo {
    pub fail_users: bool,
    pub fail_orders: bool,
    pub calls: Arc<AtomicUsize>,
}

impl FailingRepo {
    pub fn orders_down() -> Self {
        Self {
            fail_orders: true,
            ..Self::default()
        }
    }

    pub fn users_down() -> Self {
        Self {
            fail_users: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, fail: bool) -> Result<(), RepoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if fail {
            return Err(RepoError::DbError("connection refused".into()));
        }
        Ok(())
    }
}

fn fixed_user(email: &str) -> User {
    User {
        id: 1,
        email: email.to_string(),
        created_at: chrono::Utc::now(),
    }
}

#[async_trait]
impl UserRepository for FailingRepo {
    async fn find_or_create(&self, email: &str) -> Result<User, RepoError> {
        self.enter(self.fail_users)?;
        Ok(fixed_user(email))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        self.enter(self.fail_users)?;
        Ok(fixed_user(&user.email))
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        self.enter(self.fail_users)?;
        Ok(Vec::new())
    }
}

#[async_trait]
impl OrderRepository for FailingRepo {
    async fn create_order(&self, order: NewOrder) -> Result<StoredOrder, RepoError> {
        self.enter(self.fail_orders)?;
        Ok(StoredOrder {
            id: 1,
            userid: order.userid,
            products: order.products,
            created_at: chrono::Utc::now(),
        })
    }

    async fn list_by_user(&self, _userid: i64) -> Result<Vec<StoredOrder>, RepoError> {
        self.enter(self.fail_orders)?;
        Ok(Vec::new())
    }
}

pub fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Starts the server on a free port and returns its base url.
pub async fn spawn_server<R: Repository>(
    repo: R,
) -> (String, tokio::task::JoinHandle<()>) {
    let port = find_free_port();
    let config = HttpServerConfig {
        port: port.to_string(),
    };
    let server = HttpServer::new(DataService::new(repo), config).await.unwrap();
    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });

    // Give the server a moment to start.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    (format!("http://127.0.0.1:{}", port), handle)
}
