//! Domain-level constants.

// =============================================================================
// Notifications
// =============================================================================

/// chrono format of notification creation dates on the wire
/// (`yyyy-MM-dd'T'HH:mm:ss.SSS'Z'`, always UTC)
pub const NOTIFICATION_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

// =============================================================================
// Photos
// =============================================================================

/// File name of the packaged default photo
pub const DEFAULT_PHOTO_NAME: &str = "defaultPhoto.png";

/// Mime type of the packaged default photo
pub const DEFAULT_PHOTO_MIME_TYPE: &str = "image/png";
