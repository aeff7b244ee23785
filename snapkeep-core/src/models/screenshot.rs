//! Screenshot and tag wire models.
//!
//! These mirror the backend's camelCase JSON shapes:
//! - [`Screenshot`] - A single stored screenshot
//! - [`ScreenshotPage`] - A page of screenshots from a listing call
//! - [`Tag`] - A user-defined tag

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Screenshot
// ============================================================================

/// A screenshot stored on the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Screenshot {
    /// Server-assigned identifier.
    pub id: i64,
    /// Stored file name (already sanitized server-side).
    pub file_name: String,
    /// Public URL of the stored image.
    pub image_url: String,
    /// When the screenshot was captured on-device.
    pub capture_date: DateTime<Utc>,
    /// Whether the user bookmarked this screenshot.
    pub is_bookmarked: bool,
    /// Names of tags attached to this screenshot.
    #[serde(default)]
    pub tag_names: Vec<String>,
}

// ============================================================================
// Screenshot Page
// ============================================================================

/// One page of a screenshot listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotPage {
    /// Screenshots on this page.
    pub screenshots: Vec<Screenshot>,
    /// Zero-based page index.
    pub page: u32,
    /// Requested page size.
    pub size: u32,
    /// Whether a further page exists.
    pub has_next: bool,
}

impl ScreenshotPage {
    /// Returns true if this page carries no screenshots.
    pub fn is_empty(&self) -> bool {
        self.screenshots.is_empty()
    }
}

// ============================================================================
// Tag
// ============================================================================

/// A user-defined tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Server-assigned identifier.
    pub id: i64,
    /// Tag display name.
    pub name: String,
    /// Number of screenshots carrying this tag.
    #[serde(default)]
    pub screenshot_count: u32,
}
