//! In-memory account directory with a bidirectional membership graph.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use common::{AppError, AppResult, OptionExt};
use domain::{Account, AccountGroup, AccountKey, GroupKey};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account directory trait for dependency injection.
///
/// Adjacency reads return snapshots: later attach/detach calls never show
/// through a set that was already handed out.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait AccountStore: Send + Sync {
    /// Number of registered accounts
    fn accounts_count(&self) -> AppResult<usize>;

    /// Number of registered groups
    fn groups_count(&self) -> AppResult<usize>;

    /// Whether an account with this key was ever saved
    fn exists(&self, account: &AccountKey) -> AppResult<bool>;

    /// Find account by key
    fn get_account(&self, account: &AccountKey) -> AppResult<Account>;

    /// Insert or update accounts; new keys start with no groups
    fn save_accounts(&self, accounts: Vec<Account>) -> AppResult<()>;

    /// Find group by key
    fn get_group(&self, group: &GroupKey) -> AppResult<AccountGroup>;

    /// List every registered group
    fn get_all_groups(&self) -> AppResult<Vec<AccountGroup>>;

    /// Register a group; its key must not be an account key
    fn save_group(&self, group: AccountGroup) -> AppResult<()>;

    /// Make an account member of a group
    fn attach(&self, account: &AccountKey, group: &GroupKey) -> AppResult<()>;

    /// Remove an account from a group
    fn detach(&self, account: &AccountKey, group: &GroupKey) -> AppResult<()>;

    /// Groups the account belongs to
    fn get_group_keys(&self, account: &AccountKey) -> AppResult<HashSet<GroupKey>>;

    /// Accounts belonging to the group
    fn get_account_keys(&self, group: &GroupKey) -> AppResult<HashSet<AccountKey>>;
}

/// The four directory maps, always locked as one unit.
#[derive(Debug, Default)]
struct Directory {
    accounts: HashMap<AccountKey, Account>,
    groups: HashMap<GroupKey, AccountGroup>,
    groups_by_account: HashMap<AccountKey, HashSet<GroupKey>>,
    accounts_by_group: HashMap<GroupKey, HashSet<AccountKey>>,
}

impl Directory {
    /// Both adjacency sets, or `NotFound` naming the missing side.
    fn adjacency_mut(
        &mut self,
        account: &AccountKey,
        group: &GroupKey,
    ) -> AppResult<(&mut HashSet<GroupKey>, &mut HashSet<AccountKey>)> {
        let groups = self
            .groups_by_account
            .get_mut(account)
            .ok_or_not_found(format!("account {}", account))?;
        let accounts = self
            .accounts_by_group
            .get_mut(group)
            .ok_or_not_found(format!("group {}", group))?;
        Ok((groups, accounts))
    }
}

/// Account directory kept in process memory.
///
/// A single lock guards every map, so a reader never sees an account listed
/// in a group whose member set does not list it back.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    directory: RwLock<Directory>,
}

impl MemoryAccountStore {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> AppResult<RwLockReadGuard<'_, Directory>> {
        self.directory
            .read()
            .map_err(|_| AppError::internal("account directory lock poisoned"))
    }

    fn write(&self) -> AppResult<RwLockWriteGuard<'_, Directory>> {
        self.directory
            .write()
            .map_err(|_| AppError::internal("account directory lock poisoned"))
    }
}

impl AccountStore for MemoryAccountStore {
    fn accounts_count(&self) -> AppResult<usize> {
        Ok(self.read()?.accounts.len())
    }

    fn groups_count(&self) -> AppResult<usize> {
        Ok(self.read()?.groups.len())
    }

    fn exists(&self, account: &AccountKey) -> AppResult<bool> {
        Ok(self.read()?.accounts.contains_key(account))
    }

    fn get_account(&self, account: &AccountKey) -> AppResult<Account> {
        self.read()?
            .accounts
            .get(account)
            .cloned()
            .ok_or_not_found(format!("account {}", account))
    }

    fn save_accounts(&self, accounts: Vec<Account>) -> AppResult<()> {
        let mut directory = self.write()?;
        for account in accounts {
            let key = account.id.clone();
            if directory.accounts.insert(key.clone(), account).is_none() {
                directory.groups_by_account.insert(key.clone(), HashSet::new());
                debug!(account = %key, "Account created");
            } else {
                debug!(account = %key, "Account updated");
            }
        }
        Ok(())
    }

    fn get_group(&self, group: &GroupKey) -> AppResult<AccountGroup> {
        self.read()?
            .groups
            .get(group)
            .cloned()
            .ok_or_not_found(format!("group {}", group))
    }

    fn get_all_groups(&self) -> AppResult<Vec<AccountGroup>> {
        Ok(self.read()?.groups.values().cloned().collect())
    }

    fn save_group(&self, group: AccountGroup) -> AppResult<()> {
        let mut directory = self.write()?;
        // Only the account key space is guarded; re-saving a group replaces it
        // and resets its members.
        if directory.accounts.contains_key(group.id.as_str()) {
            return Err(AppError::already_exists(format!("account key {}", group.id)));
        }

        let key = group.id.clone();
        directory.accounts_by_group.insert(key.clone(), HashSet::new());
        directory.groups.insert(key.clone(), group);
        debug!(group = %key, "Group saved");
        Ok(())
    }

    fn attach(&self, account: &AccountKey, group: &GroupKey) -> AppResult<()> {
        let mut directory = self.write()?;
        let (groups, accounts) = directory.adjacency_mut(account, group)?;
        groups.insert(group.clone());
        accounts.insert(account.clone());
        debug!(account = %account, group = %group, "Account attached");
        Ok(())
    }

    fn detach(&self, account: &AccountKey, group: &GroupKey) -> AppResult<()> {
        let mut directory = self.write()?;
        let (groups, accounts) = directory.adjacency_mut(account, group)?;
        groups.remove(group);
        accounts.remove(account);
        debug!(account = %account, group = %group, "Account detached");
        Ok(())
    }

    fn get_group_keys(&self, account: &AccountKey) -> AppResult<HashSet<GroupKey>> {
        self.read()?
            .groups_by_account
            .get(account)
            .cloned()
            .ok_or_not_found(format!("account {}", account))
    }

    fn get_account_keys(&self, group: &GroupKey) -> AppResult<HashSet<AccountKey>> {
        self.read()?
            .accounts_by_group
            .get(group)
            .cloned()
            .ok_or_not_found(format!("group {}", group))
    }
}
