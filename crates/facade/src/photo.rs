//! Default photo providers.
//!
//! The default photo is loaded once when the facade is built and then
//! served, unchanged, for every account that has no photo of its own.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use common::{AppError, AppResult};
use domain::{Photo, DEFAULT_PHOTO_MIME_TYPE, DEFAULT_PHOTO_NAME};

/// Photo packaged with the crate
const EMBEDDED_PHOTO: &[u8] = include_bytes!("../assets/defaultPhoto.png");

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Source of the process-wide default photo.
pub trait PhotoProvider: Send + Sync {
    fn load_default_photo(&self) -> AppResult<Photo>;
}

/// Serves the packaged `defaultPhoto.png`
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedPhotoProvider;

impl PhotoProvider for EmbeddedPhotoProvider {
    fn load_default_photo(&self) -> AppResult<Photo> {
        if !EMBEDDED_PHOTO.starts_with(PNG_SIGNATURE) {
            return Err(AppError::internal("packaged default photo is not a PNG"));
        }
        Ok(Photo::new(
            DEFAULT_PHOTO_NAME,
            DEFAULT_PHOTO_MIME_TYPE,
            DateTime::<Utc>::default(),
            EMBEDDED_PHOTO,
        ))
    }
}

/// Reads the default photo from a file
#[derive(Debug, Clone)]
pub struct FilePhotoProvider {
    path: PathBuf,
}

impl FilePhotoProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn mime_type_of(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

impl PhotoProvider for FilePhotoProvider {
    fn load_default_photo(&self) -> AppResult<Photo> {
        let load_error =
            |e: std::io::Error| AppError::internal(format!("can't load {}: {}", self.path.display(), e));

        let metadata = fs::metadata(&self.path).map_err(load_error)?;
        let last_modified: DateTime<Utc> = metadata.modified().map_err(load_error)?.into();
        let data = fs::read(&self.path).map_err(load_error)?;

        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_PHOTO_NAME.to_string());
        debug!(path = %self.path.display(), size = data.len(), "Default photo loaded");

        Ok(Photo::new(name, mime_type_of(&self.path), last_modified, data))
    }
}
