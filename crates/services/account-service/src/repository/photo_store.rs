//! Account photo storage.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use common::{AppError, AppResult};
use domain::{AccountKey, Photo};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Photo storage trait.
///
/// Photos are independent from the directory: setting one never checks
/// that the account exists.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait PhotoStore: Send + Sync {
    /// Store or replace the photo of an account
    fn set_photo(&self, account: &AccountKey, photo: Photo) -> AppResult<()>;

    /// Photo of an account, `None` when none was ever set
    fn get_photo(&self, account: &AccountKey) -> AppResult<Option<Photo>>;
}

/// Photo storage kept in process memory
#[derive(Debug, Default)]
pub struct MemoryPhotoStore {
    photos: RwLock<HashMap<AccountKey, Photo>>,
}

impl MemoryPhotoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PhotoStore for MemoryPhotoStore {
    fn set_photo(&self, account: &AccountKey, photo: Photo) -> AppResult<()> {
        let mut photos = self
            .photos
            .write()
            .map_err(|_| AppError::internal("photo store lock poisoned"))?;
        debug!(account = %account, size = photo.len(), "Photo stored");
        photos.insert(account.clone(), photo);
        Ok(())
    }

    fn get_photo(&self, account: &AccountKey) -> AppResult<Option<Photo>> {
        let photos = self
            .photos
            .read()
            .map_err(|_| AppError::internal("photo store lock poisoned"))?;
        Ok(photos.get(account).cloned())
    }
}
