use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

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

/// Returns a map with all required env vars populated with valid defaults.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("TRADEFOOD_API_URL", "https://api.tradefood.test/");
    m
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
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "TRADEFOOD_ENV"));
}

#[test]
fn build_app_config_fails_without_api_url() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "TRADEFOOD_API_URL"),
        "expected MissingEnvVar(TRADEFOOD_API_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_treats_blank_api_url_as_missing() {
    let mut map = HashMap::new();
    map.insert("TRADEFOOD_API_URL", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "TRADEFOOD_API_URL"),
        "expected MissingEnvVar(TRADEFOOD_API_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_http_api_url() {
    let mut map = HashMap::new();
    map.insert("TRADEFOOD_API_URL", "ftp://api.tradefood.test");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRADEFOOD_API_URL"),
        "expected InvalidEnvVar(TRADEFOOD_API_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.api_base_url, "https://api.tradefood.test/");
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.data_dir, PathBuf::from("./.tradefood"));
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "tradefood/0.1 (storefront)");
    assert_eq!(cfg.image_placeholder_url, DEFAULT_IMAGE_PLACEHOLDER_URL);
}

#[test]
fn default_log_level_follows_environment() {
    let mut map = full_env();
    map.insert("TRADEFOOD_ENV", "production");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "info");

    map.insert("TRADEFOOD_ENV", "test");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "info");

    map.insert("TRADEFOOD_ENV", "development");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "debug");
}

#[test]
fn cart_and_token_paths_live_under_data_dir() {
    let mut map = full_env();
    map.insert("TRADEFOOD_DATA_DIR", "/var/lib/tradefood");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.cart_path(), PathBuf::from("/var/lib/tradefood/cart.json"));
    assert_eq!(cfg.token_path(), PathBuf::from("/var/lib/tradefood/token"));
}

#[test]
fn request_timeout_secs_override() {
    let mut map = full_env();
    map.insert("TRADEFOOD_REQUEST_TIMEOUT_SECS", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 5);
}

#[test]
fn request_timeout_secs_invalid() {
    let mut map = full_env();
    map.insert("TRADEFOOD_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRADEFOOD_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(TRADEFOOD_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn request_timeout_secs_zero_is_rejected() {
    let mut map = full_env();
    map.insert("TRADEFOOD_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TRADEFOOD_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(TRADEFOOD_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn user_agent_and_placeholder_overrides() {
    let mut map = full_env();
    map.insert("TRADEFOOD_USER_AGENT", "custom-agent/2.0");
    map.insert(
        "TRADEFOOD_IMAGE_PLACEHOLDER_URL",
        "https://cdn.tradefood.test/none.png",
    );
    map.insert("TRADEFOOD_ENV", "production");
    map.insert("TRADEFOOD_LOG_LEVEL", "debug");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
    assert_eq!(
        cfg.image_placeholder_url,
        "https://cdn.tradefood.test/none.png"
    );
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.log_level, "debug");
}
