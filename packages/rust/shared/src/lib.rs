//! Shared types, error model, and configuration for inkport.
//!
//! This crate is the foundation depended on by all other inkport crates.
//! It provides:
//! - [`InkportError`], the unified error type
//! - Domain types ([`Document`], [`FaqEntry`], [`RowOutcome`], [`ImportSummary`])
//! - Configuration ([`AppConfig`], [`ImportConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ColumnsConfig, DefaultsConfig, FAQ_SLOTS, ImportConfig, config_dir,
    config_file_path, load_config, load_config_from,
};
pub use error::{InkportError, Result};
pub use types::{Document, FaqEntry, ImportSummary, RowOutcome, SkipReason};
