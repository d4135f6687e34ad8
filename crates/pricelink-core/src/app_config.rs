use std::path::PathBuf;

use crate::catalog::MatchMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// YAML roster of marketplace sources, in fold priority order.
    pub sources_path: PathBuf,
    /// Where the aggregated catalog is written as JSON.
    pub output_path: PathBuf,
    pub match_mode: MatchMode,
    /// Minimum name-similarity ratio in `[0.0, 1.0]` for NAME-mode matches.
    pub similarity_threshold: f64,
    /// Checksum-verify 8-digit candidates (zero-padded) during code extraction.
    pub verify_short_codes: bool,
    /// Optional YAML glossary used to translate non-native listing names.
    pub glossary_path: Option<PathBuf>,
}
