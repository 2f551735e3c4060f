//! Repository layer for directory data.

mod account_store;
mod photo_store;

pub use account_store::{AccountStore, MemoryAccountStore};
pub use photo_store::{MemoryPhotoStore, PhotoStore};

#[cfg(any(test, feature = "test-utils"))]
pub use account_store::MockAccountStore;
#[cfg(any(test, feature = "test-utils"))]
pub use photo_store::MockPhotoStore;
