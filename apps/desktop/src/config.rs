use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use client_core::{DEFAULT_API_BASE_URL, DEFAULT_PAGE_SIZE, DEFAULT_REQUEST_TIMEOUT};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "registry.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub page_size: u32,
    pub request_timeout: Duration,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_BASE_URL.into(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_url: Option<String>,
    page_size: Option<u32>,
    request_timeout_seconds: Option<u64>,
    log_filter: Option<String>,
}

/// Defaults, then the config file, then environment variables.
///
/// A missing default `registry.toml` is fine; an explicitly requested file must exist.
pub fn load_settings(config_path: Option<&Path>) -> Result<Settings> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => Some(raw),
        Err(err) if err.kind() == io::ErrorKind::NotFound && config_path.is_none() => None,
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    };
    resolve_settings(raw.as_deref(), |key| std::env::var(key).ok())
        .with_context(|| format!("invalid settings (config file '{}')", path.display()))
}

pub fn resolve_settings(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    if let Some(raw) = file_contents {
        let file_cfg: FileSettings = toml::from_str(raw).context("malformed config file")?;
        if let Some(v) = file_cfg.api_url {
            settings.api_url = v;
        }
        if let Some(v) = file_cfg.page_size {
            settings.page_size = v;
        }
        if let Some(v) = file_cfg.request_timeout_seconds {
            settings.request_timeout = Duration::from_secs(v);
        }
        if let Some(v) = file_cfg.log_filter {
            settings.log_filter = v;
        }
    }

    if let Some(v) = env("REGISTRY_API_URL") {
        settings.api_url = v;
    }
    if let Some(v) = env("APP__API_URL") {
        settings.api_url = v;
    }

    if let Some(v) = env("APP__PAGE_SIZE") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.page_size = parsed;
        }
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout = Duration::from_secs(parsed);
        }
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    settings.api_url = normalize_api_url(&settings.api_url)?;
    if settings.page_size == 0 {
        return Err(anyhow!("page_size must be at least 1"));
    }

    Ok(settings)
}

fn normalize_api_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Settings::default().api_url);
    }
    let url = Url::parse(trimmed).with_context(|| format!("invalid api_url '{trimmed}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!("api_url must use http or https, got '{}'", url.scheme()));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
