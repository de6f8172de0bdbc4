use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_IMAGE_PLACEHOLDER_URL: &str = "https://placehold.co/600x400?text=TradeFood";

/// Reads `TRADEFOOD_*` settings, loading a `.env` file first if one exists.
///
/// # Errors
///
/// Returns `ConfigError` when `TRADEFOOD_API_URL` is missing or a value does
/// not parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Reads `TRADEFOOD_*` settings from the process environment only.
///
/// # Errors
///
/// Returns `ConfigError` when `TRADEFOOD_API_URL` is missing or a value does
/// not parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Builds the configuration from `lookup`, so tests can supply a map instead
/// of the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_base_url = require("TRADEFOOD_API_URL")?;
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "TRADEFOOD_API_URL".to_string(),
            reason: format!("expected an http(s) URL, got \"{api_base_url}\""),
        });
    }

    let env = parse_environment(&or_default("TRADEFOOD_ENV", "development"))?;
    let log_level = or_default("TRADEFOOD_LOG_LEVEL", env.default_log_level());
    let data_dir = PathBuf::from(or_default("TRADEFOOD_DATA_DIR", "./.tradefood"));

    let request_timeout_secs = parse_u64("TRADEFOOD_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "TRADEFOOD_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let user_agent = or_default("TRADEFOOD_USER_AGENT", "tradefood/0.1 (storefront)");
    let image_placeholder_url = or_default(
        "TRADEFOOD_IMAGE_PLACEHOLDER_URL",
        DEFAULT_IMAGE_PLACEHOLDER_URL,
    );

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        data_dir,
        request_timeout_secs,
        user_agent,
        image_placeholder_url,
    })
}

/// Maps `TRADEFOOD_ENV` to an [`Environment`].
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
            var: "TRADEFOOD_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
