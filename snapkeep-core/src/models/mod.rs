//! Domain models for snapkeep.
//!
//! This module contains the data structures exchanged with the snapkeep
//! backend, plus the session credential types.
//!
//! ## Submodules
//!
//! - [`token`] - Session credentials (TokenPair)
//! - [`screenshot`] - Screenshot and tag wire models
//! - [`upload`] - Upload metadata and file name sanitization

mod screenshot;
mod token;
mod upload;

// Re-export everything at the models level
pub use screenshot::{Screenshot, ScreenshotPage, Tag};
pub use token::TokenPair;
pub use upload::{sanitize_file_name, UploadItem, UploadReceipt};
