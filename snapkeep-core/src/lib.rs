// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Snapkeep Core
//!
//! Core types and models for the snapkeep API client.
//!
//! This crate provides the foundational types shared across the snapkeep
//! crates:
//!
//! - Session credentials ([`TokenPair`])
//! - Screenshot and tag wire models ([`Screenshot`], [`Tag`], [`ScreenshotPage`])
//! - Upload metadata ([`UploadItem`]) and file name sanitization
//! - Core error types ([`CoreError`])

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Session credentials
    TokenPair,
    // Screenshot types
    Screenshot,
    ScreenshotPage,
    Tag,
    // Upload types
    UploadItem,
    UploadReceipt,
    sanitize_file_name,
};
