//! # Settings Loader
//!
//! Centralized settings loading for the finance dashboard tools.
//! Settings come from a JSON file (every field optional, defaults applied),
//! then environment variables override individual values.
//!
//! ## Environment overrides
//!
//! - `FINANCE_API_BASE_URL`          → `api.base_url`
//! - `FINANCE_REQUEST_TIMEOUT_SECS`  → `api.request_timeout_secs`
//! - `FINANCE_CURRENCY_SYMBOL`       → `display.currency_symbol`
//! - `FINANCE_PLACEHOLDERS`          → `dashboard.placeholders` (`true`/`false`/`1`/`0`)
//!
//! A `.env` file in the working directory is loaded first when present.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Load settings from a specific path
//! let settings = settings_loader::load_settings("config/settings.json")?;
//!
//! // File (or defaults) plus environment overrides
//! let path = Some(PathBuf::from("settings.json"));
//! let settings = settings_loader::load_with_env(path.as_ref())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use models::Settings;

pub const ENV_BASE_URL: &str = "FINANCE_API_BASE_URL";
pub const ENV_REQUEST_TIMEOUT: &str = "FINANCE_REQUEST_TIMEOUT_SECS";
pub const ENV_CURRENCY_SYMBOL: &str = "FINANCE_CURRENCY_SYMBOL";
pub const ENV_PLACEHOLDERS: &str = "FINANCE_PLACEHOLDERS";

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded settings file");
    Ok(settings)
}

/// Loads settings from a default location (settings.json in the current directory)
pub fn load_default_settings() -> Result<Settings> {
    load_settings("settings.json")
}

/// Loads settings from an optional path, returning None if no path is provided
pub fn load_optional_settings(path: Option<&PathBuf>) -> Result<Option<Settings>> {
    match path {
        Some(settings_path) => Ok(Some(load_settings(settings_path)?)),
        None => Ok(None),
    }
}

/// Loads the provided path, or the default location when no path is given.
/// An explicit path that cannot be loaded is an error. Returns None only when
/// no path is given and no default settings file exists.
pub fn load_settings_with_fallback(path: Option<&PathBuf>) -> Result<Option<Settings>> {
    if let Some(settings) = load_optional_settings(path)? {
        return Ok(Some(settings));
    }

    if !default_settings_exist() {
        tracing::debug!("no settings file found, using built-in defaults");
        return Ok(None);
    }
    load_default_settings().map(Some)
}

/// Applies overrides from `lookup` (normally the process environment) on top of `settings`.
pub fn apply_overrides<F>(mut settings: Settings, lookup: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BASE_URL) {
        settings.api.base_url = url;
    }
    if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT) {
        let secs = raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{ENV_REQUEST_TIMEOUT} must be a whole number of seconds"))?;
        settings.api.request_timeout_secs = Some(secs);
    }
    if let Some(symbol) = lookup(ENV_CURRENCY_SYMBOL) {
        settings.display.currency_symbol = symbol;
    }
    if let Some(raw) = lookup(ENV_PLACEHOLDERS) {
        settings.dashboard.placeholders = parse_flag(&raw)
            .ok_or_else(|| anyhow!("{ENV_PLACEHOLDERS} must be true/false/1/0, got '{raw}'"))?;
    }
    Ok(settings)
}

/// Settings file (or built-in defaults when none is found) plus environment overrides.
/// A missing or malformed explicit `path` fails instead of falling back.
pub fn load_with_env(path: Option<&PathBuf>) -> Result<Settings> {
    if let Ok(env_file) = dotenvy::dotenv() {
        tracing::debug!(path = %env_file.display(), "loaded .env");
    }
    let settings = load_settings_with_fallback(path)?.unwrap_or_default();
    apply_overrides(settings, |key| std::env::var(key).ok())
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists() && path.as_ref().is_file()
}

/// Checks if the default settings file (settings.json) exists
pub fn default_settings_exist() -> bool {
    settings_file_exists("settings.json")
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
