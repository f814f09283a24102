use chrono::Datelike;

use crate::app_config::AppConfig;
use crate::batch::PROVIDER_MAX_BATCH;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    let current_year = chrono::Local::now().year();
    build_app_config(|key| std::env::var(key), current_year)
}

/// Build application configuration using the provided env-var lookup function.
///
/// `current_year` names the default sheet. Decoupled from the process
/// environment and the clock so it can be tested with a `HashMap` lookup.
fn build_app_config<F>(lookup: F, current_year: i32) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let target_folder_id = require("RANKWATCH_FOLDER_ID")?;
    let sheet_title = or_default("RANKWATCH_SHEET_TITLE", &current_year.to_string());
    if sheet_title.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "RANKWATCH_SHEET_TITLE".to_string(),
            reason: "sheet title must not be empty".to_string(),
        });
    }

    let language_code = or_default("RANKWATCH_LANGUAGE_CODE", "en");
    let location_code = parse_u32("RANKWATCH_LOCATION_CODE", "2840")?;

    let batch_max_size = parse_usize("RANKWATCH_BATCH_MAX_SIZE", "95")?;
    if !(1..=PROVIDER_MAX_BATCH).contains(&batch_max_size) {
        return Err(ConfigError::InvalidEnvVar {
            var: "RANKWATCH_BATCH_MAX_SIZE".to_string(),
            reason: format!("must be between 1 and {PROVIDER_MAX_BATCH}, got {batch_max_size}"),
        });
    }

    let inter_request_delay_ms = parse_u64("RANKWATCH_INTER_REQUEST_DELAY_MS", "20000")?;
    let google_credentials_path = PathBuf::from(or_default(
        "RANKWATCH_GOOGLE_CREDENTIALS",
        "service_account.json",
    ));
    let dataforseo_credentials_path = PathBuf::from(or_default(
        "RANKWATCH_DATAFORSEO_CREDENTIALS",
        "dataforseocreds.json",
    ));
    let dataforseo_base_url = or_default(
        "RANKWATCH_DATAFORSEO_BASE_URL",
        "https://api.dataforseo.com/",
    );
    let request_timeout_secs = parse_u64("RANKWATCH_REQUEST_TIMEOUT_SECS", "60")?;
    let log_level = or_default("RANKWATCH_LOG_LEVEL", "info");

    Ok(AppConfig {
        target_folder_id,
        sheet_title,
        language_code,
        location_code,
        batch_max_size,
        inter_request_delay_ms,
        google_credentials_path,
        dataforseo_credentials_path,
        dataforseo_base_url,
        request_timeout_secs,
        log_level,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
