//! Facade over the account directory and the notification store.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use account_service::{AccountStore, MemoryAccountStore, MemoryPhotoStore, PhotoStore};
use common::{AppError, AppResult};
use domain::{
    Account, AccountGroup, AccountKey, GroupKey, Notification, NotificationEvent, Photo,
    TypeTarget,
};
use notification_service::{KvNotificationStore, NotificationStore, RedisTransport};

use crate::config::FacadeConfig;
use crate::photo::{EmbeddedPhotoProvider, FilePhotoProvider, PhotoProvider};
use crate::session::SessionContext;

/// Entry point for the application layer.
pub struct Facade {
    accounts: Arc<dyn AccountStore>,
    photos: Arc<dyn PhotoStore>,
    notifications: Arc<dyn NotificationStore>,
    session: Arc<dyn SessionContext>,
    default_photo: Photo,
}

impl Facade {
    /// Assemble a facade and load the default photo.
    ///
    /// Fails, and nothing is built, when the default photo can't be loaded.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        photos: Arc<dyn PhotoStore>,
        notifications: Arc<dyn NotificationStore>,
        session: Arc<dyn SessionContext>,
        photo_provider: &dyn PhotoProvider,
    ) -> AppResult<Self> {
        let default_photo = photo_provider.load_default_photo()?;
        Ok(Self::with_default_photo(
            accounts,
            photos,
            notifications,
            session,
            default_photo,
        ))
    }

    fn with_default_photo(
        accounts: Arc<dyn AccountStore>,
        photos: Arc<dyn PhotoStore>,
        notifications: Arc<dyn NotificationStore>,
        session: Arc<dyn SessionContext>,
        default_photo: Photo,
    ) -> Self {
        info!(
            photo = %default_photo.name,
            size = default_photo.len(),
            "Facade ready"
        );
        Self {
            accounts,
            photos,
            notifications,
            session,
            default_photo,
        }
    }

    /// Build the production facade: in-memory directory, Redis notifications.
    pub async fn connect(config: &FacadeConfig, session: Arc<dyn SessionContext>) -> AppResult<Self> {
        let provider: Box<dyn PhotoProvider> = match &config.default_photo_path {
            Some(path) => Box::new(FilePhotoProvider::new(path)),
            None => Box::new(EmbeddedPhotoProvider),
        };
        // Load the photo first so a bad path fails before any connection is made
        let default_photo = provider.load_default_photo()?;

        let transport = RedisTransport::connect(&config.redis).await?;
        Ok(Self::with_default_photo(
            Arc::new(MemoryAccountStore::new()),
            Arc::new(MemoryPhotoStore::new()),
            Arc::new(KvNotificationStore::new(Arc::new(transport))),
            session,
            default_photo,
        ))
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Bind an account to the current session
    pub fn login(&self, account: AccountKey) {
        self.session.set_current_account_key(account);
    }

    /// Account bound to the current session
    pub fn logged_account(&self) -> AppResult<AccountKey> {
        self.session
            .current_account_key()
            .ok_or(AppError::Unauthorized)
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    pub fn accounts_count(&self) -> AppResult<usize> {
        self.accounts.accounts_count()
    }

    pub fn exists(&self, account: &AccountKey) -> AppResult<bool> {
        self.accounts.exists(account)
    }

    pub fn get_account(&self, account: &AccountKey) -> AppResult<Account> {
        self.accounts.get_account(account)
    }

    pub fn save_accounts(&self, accounts: Vec<Account>) -> AppResult<()> {
        self.accounts.save_accounts(accounts)
    }

    // =========================================================================
    // Groups
    // =========================================================================

    pub fn groups_count(&self) -> AppResult<usize> {
        self.accounts.groups_count()
    }

    pub fn get_all_groups(&self) -> AppResult<Vec<AccountGroup>> {
        self.accounts.get_all_groups()
    }

    pub fn get_group(&self, group: &GroupKey) -> AppResult<AccountGroup> {
        self.accounts.get_group(group)
    }

    pub fn save_group(&self, group: AccountGroup) -> AppResult<()> {
        self.accounts.save_group(group)
    }

    pub fn attach(&self, account: &AccountKey, group: &GroupKey) -> AppResult<()> {
        self.accounts.attach(account, group)
    }

    pub fn detach(&self, account: &AccountKey, group: &GroupKey) -> AppResult<()> {
        self.accounts.detach(account, group)
    }

    pub fn get_group_keys(&self, account: &AccountKey) -> AppResult<HashSet<GroupKey>> {
        self.accounts.get_group_keys(account)
    }

    pub fn get_account_keys(&self, group: &GroupKey) -> AppResult<HashSet<AccountKey>> {
        self.accounts.get_account_keys(group)
    }

    // =========================================================================
    // Photos
    // =========================================================================

    pub fn set_photo(&self, account: &AccountKey, photo: Photo) -> AppResult<()> {
        self.photos.set_photo(account, photo)
    }

    /// Photo of the account, or the default photo when it has none
    pub fn get_photo(&self, account: &AccountKey) -> AppResult<Photo> {
        Ok(self
            .photos
            .get_photo(account)?
            .unwrap_or_else(|| self.default_photo.clone()))
    }

    pub fn default_photo(&self) -> &Photo {
        &self.default_photo
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub async fn send(
        &self,
        notification: Notification,
        to_accounts: BTreeSet<AccountKey>,
    ) -> AppResult<()> {
        self.notifications
            .send(NotificationEvent::new(notification, to_accounts))
            .await
    }

    pub async fn get_current_notifications(
        &self,
        account: &AccountKey,
    ) -> AppResult<Vec<Notification>> {
        self.notifications.get_current_notifications(account).await
    }

    /// Inbox of the logged account
    pub async fn logged_notifications(&self) -> AppResult<Vec<Notification>> {
        let account = self.logged_account()?;
        self.notifications.get_current_notifications(&account).await
    }

    pub async fn get_notification(&self, uuid: Uuid) -> AppResult<Option<Notification>> {
        self.notifications.get_notification(uuid).await
    }

    pub async fn remove(&self, account: &AccountKey, uuid: Uuid) -> AppResult<()> {
        self.notifications.remove(account, uuid).await
    }

    pub async fn remove_all(&self, type_target: &TypeTarget) -> AppResult<()> {
        self.notifications.remove_all(type_target).await
    }
}
