//! Catalog-Harvest: a bulk product-catalog harvester
//!
//! This crate crawls a public catalog site in three stages (provider listing,
//! per-provider product listings, product detail pages) and turns every detail
//! page into a front-matter markdown record plus its product image.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;

use thiserror::Error;

/// Main error type for run-level Catalog-Harvest operations
///
/// Anything surfaced through this type stops the run. Per-record problems are
/// reported through [`RecordError`] instead and never abort the pipeline.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Failed to prepare {path}: {source}")]
    Prepare {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Errors that abort a single product record
///
/// These are caught at the record boundary, written to the failure log and
/// the run moves on to the next record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Could not retrieve {url}: {reason}")]
    Unavailable { url: String, reason: String },

    #[error("Row {row} of tab panel {panel} has no header cell")]
    MissingHeaderCell { panel: usize, row: usize },

    #[error("Row '{label}' has neither a link nor a data cell")]
    MissingValue { label: String },

    #[error("Record has no 'Product Name' field")]
    MissingProductName,

    #[error("Product name '{0}' does not produce a usable slug")]
    EmptySlug(String),

    #[error("Product image has an empty source")]
    EmptyImageSource,

    #[error("Invalid image URL '{url}': {source}")]
    ImageUrl {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Image download failed for {url}: {reason}")]
    ImageDownload { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for run-level operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for per-record operations
pub type RecordResult<T> = std::result::Result<T, RecordError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{harvest, Harvester, WorkerPool};
pub use model::{FailureEntry, ImageRef, ListingEntry, ProductRecord, ProviderUrlMap};
pub use output::RunSummary;
