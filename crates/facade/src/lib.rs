//! Facade Library
//!
//! The single entry point the application layer calls. It resolves the
//! logged account from the session, substitutes the default photo when an
//! account has none, and forwards everything else to the account directory
//! and the notification store.

pub mod config;
pub mod facade;
pub mod photo;
pub mod session;
pub mod telemetry;

pub use config::FacadeConfig;
pub use facade::Facade;
pub use photo::{EmbeddedPhotoProvider, FilePhotoProvider, PhotoProvider};
pub use session::{MemorySession, SessionContext};
pub use telemetry::init_tracing;

#[cfg(any(test, feature = "test-utils"))]
pub use session::MockSessionContext;
