//! Project-wide constants.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CHICAGO_BASE_URL: &str = "https://api.artic.edu/api/v1";
pub const DEFAULT_CLEVELAND_BASE_URL: &str = "https://openaccess-api.clevelandart.org/api";
pub const DEFAULT_HARVARD_BASE_URL: &str = "https://api.harvardartmuseums.org";

/// Returned wherever a source has no usable image identifier.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-artwork.svg";

/// Results per page when the caller does not ask for a specific count.
pub const DEFAULT_LIMIT: u32 = 20;

/// Upper bound on a single source call inside an aggregation pass.
pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(15);

// Fallback literals for canonical fields that are never absent.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_DATE: &str = "Unknown Date";
pub const UNKNOWN_MEDIUM: &str = "Unknown Medium";
pub const UNKNOWN_DIMENSIONS: &str = "Unknown Dimensions";

/// Default database path: `~/.curator/curator.db`.
/// Holds both settings and the exhibition.
pub fn default_db_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".curator")
        .join("curator.db")
}
