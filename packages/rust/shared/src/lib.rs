//! Shared types, error model, and configuration for weekmerge.
//!
//! This crate is the foundation depended on by the other weekmerge crates.
//! It provides:
//! - [`WeekMergeError`], the unified error type
//! - Domain types ([`WeekRange`], [`WeekDirectory`], [`AssembleOptions`])
//! - Configuration ([`AppConfig`], [`MergeConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, MergeConfig, MergeOverrides, RendererConfig, config_dir,
    config_file_path, load_config, load_config_from,
};
pub use error::{Result, WeekMergeError};
pub use types::{
    AGGREGATE_FILE_NAME, AssembleOptions, DEFAULT_MARGIN, DEFAULT_OUTPUT_NAME, NOTE_EXTENSION,
    WeekDirectory, WeekRange,
};
