//! Session context: who is logged in.

use std::sync::{PoisonError, RwLock};

use domain::AccountKey;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Session capability provided by the authentication layer.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait SessionContext: Send + Sync {
    /// Account bound to the current session, if any
    fn current_account_key(&self) -> Option<AccountKey>;

    /// Bind an account to the current session
    fn set_current_account_key(&self, account: AccountKey);
}

/// Single session kept in memory
#[derive(Debug, Default)]
pub struct MemorySession {
    account: RwLock<Option<AccountKey>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionContext for MemorySession {
    fn current_account_key(&self) -> Option<AccountKey> {
        self.account
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_current_account_key(&self, account: AccountKey) {
        *self.account.write().unwrap_or_else(PoisonError::into_inner) = Some(account);
    }
}
