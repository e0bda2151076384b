use std::sync::Arc;

use crate::accounts::repo::AccountStore;

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
}

impl AppState {
    pub fn with_store<S>(store: Arc<S>) -> Self
    where
        S: AccountStore + 'static,
    {
        Self { accounts: store }
    }
}
