use std::collections::HashMap;
use std::env::VarError;
use std::path::Path;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("unknown").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "PRICELINK_ENV"));
}

#[test]
fn build_app_config_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.sources_path, Path::new("./config/sources.yaml"));
    assert_eq!(cfg.output_path, Path::new("./output/output.json"));
    assert_eq!(cfg.match_mode, MatchMode::Code);
    assert!((cfg.similarity_threshold - 0.45).abs() < f64::EPSILON);
    assert!(!cfg.verify_short_codes);
    assert!(cfg.glossary_path.is_none());
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("PRICELINK_ENV", "production");
    map.insert("PRICELINK_LOG_LEVEL", "debug");
    map.insert("PRICELINK_SOURCES_PATH", "/etc/pricelink/sources.yaml");
    map.insert("PRICELINK_OUTPUT_PATH", "/tmp/catalog.json");
    map.insert("PRICELINK_MATCH_MODE", "name");
    map.insert("PRICELINK_SIMILARITY_THRESHOLD", "0.6");
    map.insert("PRICELINK_VERIFY_SHORT_CODES", "true");
    map.insert("PRICELINK_GLOSSARY_PATH", "./config/glossary.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.sources_path, Path::new("/etc/pricelink/sources.yaml"));
    assert_eq!(cfg.output_path, Path::new("/tmp/catalog.json"));
    assert_eq!(cfg.match_mode, MatchMode::Name);
    assert!((cfg.similarity_threshold - 0.6).abs() < f64::EPSILON);
    assert!(cfg.verify_short_codes);
    assert_eq!(
        cfg.glossary_path.as_deref(),
        Some(Path::new("./config/glossary.yaml"))
    );
}

#[test]
fn build_app_config_fails_with_invalid_env() {
    let mut map = HashMap::new();
    map.insert("PRICELINK_ENV", "staging");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICELINK_ENV"),
        "expected InvalidEnvVar(PRICELINK_ENV), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_match_mode() {
    let mut map = HashMap::new();
    map.insert("PRICELINK_MATCH_MODE", "fuzzy");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICELINK_MATCH_MODE"),
        "expected InvalidEnvVar(PRICELINK_MATCH_MODE), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_non_numeric_threshold() {
    let mut map = HashMap::new();
    map.insert("PRICELINK_SIMILARITY_THRESHOLD", "high");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICELINK_SIMILARITY_THRESHOLD"),
        "expected InvalidEnvVar(PRICELINK_SIMILARITY_THRESHOLD), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_out_of_range_threshold() {
    let mut map = HashMap::new();
    map.insert("PRICELINK_SIMILARITY_THRESHOLD", "1.5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, ref reason }) if var == "PRICELINK_SIMILARITY_THRESHOLD" && reason.contains("outside")),
        "expected out-of-range InvalidEnvVar, got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_bool() {
    let mut map = HashMap::new();
    map.insert("PRICELINK_VERIFY_SHORT_CODES", "sometimes");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICELINK_VERIFY_SHORT_CODES"),
        "expected InvalidEnvVar(PRICELINK_VERIFY_SHORT_CODES), got: {result:?}"
    );
}

#[test]
fn build_app_config_ignores_blank_glossary_path() {
    let mut map = HashMap::new();
    map.insert("PRICELINK_GLOSSARY_PATH", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.glossary_path.is_none());
}

#[test]
fn parse_threshold_accepts_bounds() {
    assert_eq!(parse_threshold("0").unwrap(), 0.0);
    assert_eq!(parse_threshold("1.0").unwrap(), 1.0);
}

#[test]
fn parse_threshold_rejects_nan() {
    assert!(parse_threshold("NaN").is_err());
}

#[test]
fn overrides_replace_invalid_environment_values() {
    let mut map = HashMap::new();
    map.insert("PRICELINK_MATCH_MODE", "bogus");
    map.insert("PRICELINK_SIMILARITY_THRESHOLD", "high");
    let overrides = [
        (MATCH_MODE_VAR, "name".to_string()),
        (SIMILARITY_THRESHOLD_VAR, "0.7".to_string()),
    ];
    let cfg = build_app_config(with_overrides(&overrides, lookup_from_map(&map))).unwrap();
    assert_eq!(cfg.match_mode, MatchMode::Name);
    assert!((cfg.similarity_threshold - 0.7).abs() < f64::EPSILON);
}

#[test]
fn overrides_are_validated_like_environment_values() {
    let map: HashMap<&str, &str> = HashMap::new();
    let overrides = [(MATCH_MODE_VAR, "fuzzy".to_string())];
    let result = build_app_config(with_overrides(&overrides, lookup_from_map(&map)));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PRICELINK_MATCH_MODE"),
        "expected InvalidEnvVar(PRICELINK_MATCH_MODE), got: {result:?}"
    );
}

#[test]
fn unrelated_variables_fall_through_overrides() {
    let mut map = HashMap::new();
    map.insert("PRICELINK_LOG_LEVEL", "debug");
    let overrides = [(OUTPUT_PATH_VAR, "/tmp/out.json".to_string())];
    let cfg = build_app_config(with_overrides(&overrides, lookup_from_map(&map))).unwrap();
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.output_path, Path::new("/tmp/out.json"));
}

#[test]
fn parse_bool_accepts_common_spellings() {
    for raw in ["1", "true", "YES", " on "] {
        assert!(parse_bool(VERIFY_SHORT_CODES_VAR, raw).unwrap());
    }
    for raw in ["0", "False", "no", "off"] {
        assert!(!parse_bool(VERIFY_SHORT_CODES_VAR, raw).unwrap());
    }
    assert!(parse_bool(VERIFY_SHORT_CODES_VAR, "maybe").is_err());
}
