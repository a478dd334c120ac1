#[cfg(not(any(feature = "memory", feature = "sqlite")))]
compile_error!("Enable a repo feature: `memory` or `sqlite`.");

use orders_types::domain::order::{NewOrder, StoredOrder};
use orders_types::domain::user::{NewUser, User};
use orders_types::ports::{OrderRepository, RepoError, UserRepository};

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
const DEFAULT_SQLITE_URL: &str = "sqlite://orders.db";

/// The storage adapter selected at build time.
pub enum Repo {
    #[cfg(feature = "memory")]
    Memory(memory::InMemoryRepo),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite::SqliteRepo),
}

pub async fn build_repo(url: Option<&str>) -> anyhow::Result<Repo> {
    Repo::build_repo(url).await
}

impl Repo {
    #[cfg(all(feature = "memory", not(feature = "sqlite")))]
    pub async fn build_repo(_: Option<&str>) -> anyhow::Result<Self> {
        Ok(Self::Memory(memory::InMemoryRepo::new()))
    }

    #[cfg(all(feature = "sqlite", not(feature = "memory")))]
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        let url = database_url.unwrap_or(DEFAULT_SQLITE_URL);
        Ok(Self::Sqlite(sqlite::SqliteRepo::new(url).await?))
    }

    // Both features: an explicit URL picks SQLite, otherwise stay in memory.
    #[cfg(all(feature = "sqlite", feature = "memory"))]
    pub async fn build_repo(database_url: Option<&str>) -> anyhow::Result<Self> {
        match database_url {
            Some(url) => Ok(Self::Sqlite(sqlite::SqliteRepo::new(url).await?)),
            None => Ok(Self::Memory(memory::InMemoryRepo::new())),
        }
    }

    pub fn backend(&self) -> &'static str {
        match self {
            #[cfg(feature = "memory")]
            Repo::Memory(_) => "memory",
            #[cfg(feature = "sqlite")]
            Repo::Sqlite(_) => "sqlite",
        }
    }
}

macro_rules! delegate {
    ($self:ident, $repo:ident => $call:expr) => {
        match $self {
            #[cfg(feature = "memory")]
            Repo::Memory($repo) => $call,
            #[cfg(feature = "sqlite")]
            Repo::Sqlite($repo) => $call,
        }
    };
}

#[async_trait::async_trait]
impl UserRepository for Repo {
    async fn find_or_create(&self, email: &str) -> Result<User, RepoError> {
        delegate!(self, repo => repo.find_or_create(email).await)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        delegate!(self, repo => repo.create_user(user).await)
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        delegate!(self, repo => repo.list_users().await)
    }
}

#[async_trait::async_trait]
impl OrderRepository for Repo {
    async fn create_order(&self, order: NewOrder) -> Result<StoredOrder, RepoError> {
        delegate!(self, repo => repo.create_order(order).await)
    }

    async fn list_by_user(&self, userid: i64) -> Result<Vec<StoredOrder>, RepoError> {
        delegate!(self, repo => repo.list_by_user(userid).await)
    }
}
