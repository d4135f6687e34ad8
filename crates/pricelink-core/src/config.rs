use std::env::VarError;
use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::catalog::MatchMode;
use crate::ConfigError;

pub const ENV_VAR: &str = "PRICELINK_ENV";
pub const LOG_LEVEL_VAR: &str = "PRICELINK_LOG_LEVEL";
pub const SOURCES_PATH_VAR: &str = "PRICELINK_SOURCES_PATH";
pub const OUTPUT_PATH_VAR: &str = "PRICELINK_OUTPUT_PATH";
pub const MATCH_MODE_VAR: &str = "PRICELINK_MATCH_MODE";
pub const SIMILARITY_THRESHOLD_VAR: &str = "PRICELINK_SIMILARITY_THRESHOLD";
pub const VERIFY_SHORT_CODES_VAR: &str = "PRICELINK_VERIFY_SHORT_CODES";
pub const GLOSSARY_PATH_VAR: &str = "PRICELINK_GLOSSARY_PATH";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
/// `overrides` (variable name, raw value) take precedence over the
/// environment and are validated the same way, so a command-line flag can
/// replace an invalid environment value.
///
/// # Errors
///
/// Returns `ConfigError` if any variable holds an invalid value.
pub fn load_app_config(overrides: &[(&str, String)]) -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_app_config(with_overrides(overrides, |key| std::env::var(key)))
}

/// Read a single boolean variable without loading the rest of the
/// configuration.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if the variable is set to something
/// other than a recognised boolean.
pub fn load_env_flag(var: &str, default: bool) -> Result<bool, ConfigError> {
    dotenvy::dotenv().ok();
    match std::env::var(var) {
        Ok(raw) => parse_bool(var, &raw),
        Err(_) => Ok(default),
    }
}

fn with_overrides<'a, F>(
    overrides: &'a [(&'a str, String)],
    lookup: F,
) -> impl Fn(&str) -> Result<String, VarError> + 'a
where
    F: Fn(&str) -> Result<String, VarError> + 'a,
{
    move |key| {
        overrides
            .iter()
            .find(|(var, _)| *var == key)
            .map_or_else(|| lookup(key), |(_, value)| Ok(value.clone()))
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let env = parse_environment(&or_default(ENV_VAR, "development"))?;
    let log_level = or_default(LOG_LEVEL_VAR, DEFAULT_LOG_LEVEL);
    let sources_path = PathBuf::from(or_default(SOURCES_PATH_VAR, "./config/sources.yaml"));
    let output_path = PathBuf::from(or_default(OUTPUT_PATH_VAR, "./output/output.json"));

    let match_mode = or_default(MATCH_MODE_VAR, "code")
        .parse::<MatchMode>()
        .map_err(|e| invalid(MATCH_MODE_VAR, e.to_string()))?;

    let similarity_threshold = parse_threshold(&or_default(SIMILARITY_THRESHOLD_VAR, "0.45"))
        .map_err(|reason| invalid(SIMILARITY_THRESHOLD_VAR, reason))?;

    let verify_short_codes =
        parse_bool(VERIFY_SHORT_CODES_VAR, &or_default(VERIFY_SHORT_CODES_VAR, "false"))?;

    let glossary_path = lookup(GLOSSARY_PATH_VAR)
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        sources_path,
        output_path,
        match_mode,
        similarity_threshold,
        verify_short_codes,
        glossary_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: ENV_VAR.to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// Parse a similarity threshold, which must be a finite ratio in `[0.0, 1.0]`.
///
/// # Errors
///
/// Returns a human-readable reason when the value is not a number or is
/// out of range.
pub fn parse_threshold(raw: &str) -> Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("\"{raw}\" is not a number: {e}"))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(format!("{value} is outside the range 0.0..=1.0"));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
