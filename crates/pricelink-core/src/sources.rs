use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_enabled() -> bool {
    true
}

/// One marketplace in the source roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Source identifier used as the key in every catalog map, e.g. `"rakuten"`.
    pub name: String,
    /// JSON file holding this source's listing batch.
    pub input: PathBuf,
    /// Whether listing names come in a non-native language and must be
    /// translated before name comparison.
    #[serde(default)]
    pub translate_names: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesFile {
    pub sources: Vec<SourceConfig>,
}

impl SourcesFile {
    /// Enabled sources in roster (priority) order.
    pub fn enabled(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter().filter(|s| s.enabled)
    }
}

/// Load and validate the source roster from a YAML file.
///
/// Relative `input` paths are resolved against the roster file's directory.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sources(path: &Path) -> Result<SourcesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SourcesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut sources_file: SourcesFile = serde_yaml::from_str(&content)?;

    validate_sources(&sources_file)?;

    if let Some(base) = path.parent() {
        for source in &mut sources_file.sources {
            if source.input.is_relative() {
                source.input = base.join(&source.input);
            }
        }
    }

    Ok(sources_file)
}

fn validate_sources(sources_file: &SourcesFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for source in &sources_file.sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "source name must be non-empty".to_string(),
            ));
        }

        if !source
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::Validation(format!(
                "source name '{}' may only contain ASCII letters, digits, '-' or '_'",
                source.name
            )));
        }

        if source.input.as_os_str().is_empty() {
            return Err(ConfigError::Validation(format!(
                "source '{}' has an empty input path",
                source.name
            )));
        }

        if !seen_names.insert(source.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate source name: '{}'",
                source.name
            )));
        }
    }

    if !sources_file.sources.iter().any(|s| s.enabled) {
        return Err(ConfigError::Validation(
            "at least one source must be enabled".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[path = "sources_test.rs"]
mod tests;
