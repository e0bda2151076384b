use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::accounts::{
    repo::{AccountStore, DuplicateField, StoreError},
    repo_types::{Account, NewAccount},
};

/// In-memory store with the same uniqueness rules as the accounts table.
#[derive(Default)]
pub struct FakeAccountStore {
    rows: Mutex<HashMap<String, Account>>,
    unavailable: bool,
    insert_calls: AtomicUsize,
}

impl FakeAccountStore {
    /// A store whose every operation fails like an unreachable database.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn get(&self, username: &str) -> Option<Account> {
        self.rows.lock().unwrap().get(username).cloned()
    }

    fn refused() -> StoreError {
        StoreError::Unavailable(sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "connection refused",
        )))
    }
}

#[async_trait]
impl AccountStore for FakeAccountStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(Self::refused());
        }
        Ok(())
    }

    async fn insert(&self, account: &NewAccount) -> Result<Account, StoreError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.ensure_schema().await?;

        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&account.username) {
            return Err(StoreError::Duplicate(DuplicateField::Username));
        }
        if rows.values().any(|a| a.email == account.email) {
            return Err(StoreError::Duplicate(DuplicateField::Email));
        }

        let row = Account {
            username: account.username.clone(),
            password_hash: account.password_hash.clone(),
            email: account.email.clone(),
            security_question: account.security_question.clone(),
            security_answer: account.security_answer.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        rows.insert(row.username.clone(), row.clone());
        Ok(row)
    }
}
