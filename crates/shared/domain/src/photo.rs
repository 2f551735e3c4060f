//! Account photo blob.

use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Binary photo with its file metadata.
///
/// Bytes are shared, so cloning a photo (the default one is handed out on
/// every miss) never copies the blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub name: String,
    pub mime_type: String,
    pub last_modified: DateTime<Utc>,
    data: Arc<[u8]>,
}

impl Photo {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        last_modified: DateTime<Utc>,
        data: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            last_modified,
            data: data.into(),
        }
    }

    /// Raw photo bytes
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
