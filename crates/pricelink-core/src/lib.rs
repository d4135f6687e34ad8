//! Shared data model and configuration for the pricelink workspace.
//!
//! Listing and catalog shapes live here so the linkage engine and the CLI
//! agree on one serialized form.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod listing;
pub mod sources;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{
    code_for_key, is_synthetic_key, synthetic_key, MatchMode, PriceSummary, ProductItem,
    SYNTHETIC_KEY_PREFIX,
};
pub use config::{load_app_config, load_env_flag};
pub use listing::{RawListing, RawPrice};
pub use sources::{load_sources, SourceConfig, SourcesFile};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid match mode: {0} (expected \"code\" or \"name\")")]
    InvalidMatchMode(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),

    #[error("sources validation failed: {0}")]
    Validation(String),
}
