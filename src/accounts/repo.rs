use std::fmt;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::accounts::repo_types::{Account, NewAccount};

pub const CREATE_ACCOUNTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS accounts (
        username          TEXT PRIMARY KEY,
        password_hash     TEXT NOT NULL,
        email             TEXT NOT NULL UNIQUE,
        security_question TEXT,
        security_answer   TEXT,
        created_at        TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

/// Which unique column an insert collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Username,
    Email,
    /// The store reported a unique violation without a known constraint name.
    Unknown,
}

impl DuplicateField {
    fn from_constraint(name: Option<&str>) -> Self {
        match name {
            Some("accounts_pkey") => Self::Username,
            Some("accounts_email_key") => Self::Email,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for DuplicateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username => f.write_str("username"),
            Self::Email => f.write_str("email"),
            Self::Unknown => f.write_str("username or email"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} already registered")]
    Duplicate(DuplicateField),

    #[error("{0}")]
    Unavailable(#[source] sqlx::Error),
}

impl StoreError {
    /// Separates unique violations from every other sqlx failure.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::Duplicate(DuplicateField::from_constraint(db_err.constraint()));
            }
        }
        Self::Unavailable(err)
    }
}

/// Append-only persistence for accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Creates the accounts table if it does not exist. Safe to call repeatedly.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Inserts one account in a single statement.
    async fn insert(&self, account: &NewAccount) -> Result<Account, StoreError>;
}

pub struct PgAccountStore {
    pool: PgPool,
    schema: OnceCell<()>,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema: OnceCell::new(),
        }
    }

    /// Runs the DDL. Losing a concurrent `CREATE TABLE IF NOT EXISTS` race
    /// with another process counts as success.
    async fn create_table(&self) -> Result<(), StoreError> {
        match sqlx::query(CREATE_ACCOUNTS_TABLE).execute(&self.pool).await {
            Ok(_) => {
                info!("accounts table verified");
                Ok(())
            }
            Err(e) if lost_create_race(&e) => {
                debug!(error = %e, "accounts table created concurrently");
                Ok(())
            }
            Err(e) => Err(StoreError::Unavailable(e)),
        }
    }
}

/// Postgres reports a concurrent `CREATE TABLE IF NOT EXISTS` either as
/// `duplicate_table` or as a unique violation on the row type's catalog entry.
fn lost_create_race(err: &sqlx::Error) -> bool {
    let sqlx::Error::Database(db_err) = err else {
        return false;
    };
    match db_err.code().as_deref() {
        Some("42P07") => true,
        Some("23505") => db_err.constraint() == Some("pg_type_typname_nsp_index"),
        _ => false,
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        // A failed attempt leaves the cell empty so the next caller retries.
        self.schema
            .get_or_try_init(|| self.create_table())
            .await
            .map(|_| ())
    }

    async fn insert(&self, account: &NewAccount) -> Result<Account, StoreError> {
        // Startup initialization may have failed or not finished yet.
        self.ensure_schema().await?;

        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts
                (username, password_hash, email, security_question, security_answer)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING
                username, password_hash, email, security_question, security_answer, created_at
            "#,
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(&account.email)
        .bind(&account.security_question)
        .bind(&account.security_answer)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)
    }
}
