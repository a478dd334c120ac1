use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orders_types::domain::order::{NewOrder, ProductsBlob, StoredOrder};
use orders_types::domain::user::{NewUser, User};
use orders_types::ports::{OrderRepository, RepoError, UserRepository};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;

const MIGRATIONS: [&str; 2] = [
    include_str!("../migrations/0001_create_users.sql"),
    include_str!("../migrations/0002_create_orders.sql"),
];

pub struct SqliteRepo {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct DbUser {
    id: i64,
    email: String,
    created_at: String,
}

#[derive(FromRow)]
struct DbOrder {
    id: i64,
    userid: i64,
    products: String,
    created_at: String,
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .map_err(|e| RepoError::DbError(e.to_string()))?
        .with_timezone(&Utc))
}

fn db_error(e: sqlx::Error) -> RepoError {
    RepoError::DbError(e.to_string())
}

impl DbUser {
    fn into_user(self) -> Result<User, RepoError> {
        Ok(User {
            id: self.id,
            email: self.email,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl DbOrder {
    fn into_stored(self) -> Result<StoredOrder, RepoError> {
        Ok(StoredOrder {
            id: self.id,
            userid: self.userid,
            products: ProductsBlob::from_stored(self.products),
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl SqliteRepo {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options).await?;

        for ddl in MIGRATIONS {
            sqlx::query(ddl).execute(&pool).await?;
        }

        Ok(Self { pool })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let row: Option<DbUser> =
            sqlx::query_as("SELECT id, email, created_at FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;
        row.map(DbUser::into_user).transpose()
    }
}

#[async_trait]
impl UserRepository for SqliteRepo {
    async fn find_or_create(&self, email: &str) -> Result<User, RepoError> {
        sqlx::query("INSERT INTO users (email, created_at) VALUES (?, ?) ON CONFLICT(email) DO NOTHING")
            .bind(email)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        self.find_by_email(email)
            .await?
            .ok_or_else(|| RepoError::DbError(format!("user {email} vanished after insert")))
    }

    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        let created_at = Utc::now();
        let res = sqlx::query("INSERT INTO users (email, created_at) VALUES (?, ?)")
            .bind(&user.email)
            .bind(created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    RepoError::DuplicateEmail(user.email.clone())
                }
                other => db_error(other),
            })?;
        Ok(User {
            id: res.last_insert_rowid(),
            email: user.email,
            created_at,
        })
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        let rows: Vec<DbUser> =
            sqlx::query_as("SELECT id, email, created_at FROM users ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(db_error)?;
        rows.into_iter().map(DbUser::into_user).collect()
    }
}

#[async_trait]
impl OrderRepository for SqliteRepo {
    async fn create_order(&self, order: NewOrder) -> Result<StoredOrder, RepoError> {
        let created_at = Utc::now();
        let res = sqlx::query("INSERT INTO orders (userid, products, created_at) VALUES (?, ?, ?)")
            .bind(order.userid)
            .bind(order.products.as_str())
            .bind(created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(StoredOrder {
            id: res.last_insert_rowid(),
            userid: order.userid,
            products: order.products,
            created_at,
        })
    }

    async fn list_by_user(&self, userid: i64) -> Result<Vec<StoredOrder>, RepoError> {
        let rows: Vec<DbOrder> = sqlx::query_as(
            "SELECT id, userid, products, created_at FROM orders WHERE userid = ? ORDER BY id",
        )
        .bind(userid)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(DbOrder::into_stored).collect()
    }
}
