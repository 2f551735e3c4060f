//! Account Service Library
//!
//! This crate owns the account directory: accounts, groups, the
//! bidirectional membership relation between them, and account photos.

pub mod repository;

pub use repository::{AccountStore, MemoryAccountStore, MemoryPhotoStore, PhotoStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repository::{MockAccountStore, MockPhotoStore};
