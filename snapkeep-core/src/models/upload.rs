//! Upload metadata types and file name sanitization.
//!
//! An upload request carries one `uploadItems` JSON part (an array of
//! [`UploadItem`]) and one `files` part per image. The metadata array and
//! the file parts must pair up 1:1 in the same order, and every file name
//! must be sanitized the same way on both sides of the pairing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Upload Item
// ============================================================================

/// Metadata for one uploaded screenshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadItem {
    /// File name, sanitized via [`sanitize_file_name`].
    pub file_name: String,
    /// When the screenshot was captured on-device.
    pub capture_date: DateTime<Utc>,
    /// Whether the screenshot is bookmarked at upload time.
    pub is_bookmarked: bool,
    /// Tag names to attach on upload.
    pub tag_names: Vec<String>,
}

impl UploadItem {
    /// Creates an upload item, sanitizing the file name.
    pub fn new(
        file_name: impl AsRef<str>,
        capture_date: DateTime<Utc>,
        is_bookmarked: bool,
        tag_names: Vec<String>,
    ) -> Self {
        Self {
            file_name: sanitize_file_name(file_name.as_ref()),
            capture_date,
            is_bookmarked,
            tag_names,
        }
    }
}

// ============================================================================
// Upload Receipt
// ============================================================================

/// Backend acknowledgement of an upload call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    /// Server-assigned identifiers of the stored screenshots, in upload order.
    pub screenshot_ids: Vec<i64>,
}

// ============================================================================
// File Name Sanitization
// ============================================================================

/// Sanitizes a file name for upload.
///
/// Spaces and slashes are replaced with underscores and a `.jpg` suffix is
/// enforced; the backend pairs `files` parts with `uploadItems` entries by
/// name, so both sides must apply the identical transformation.
pub fn sanitize_file_name(name: &str) -> String {
    let mut cleaned: String = name
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();

    if !cleaned.to_ascii_lowercase().ends_with(".jpg") {
        cleaned.push_str(".jpg");
    }

    cleaned
}
