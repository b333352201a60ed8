//! Runtime configuration.
//!
//! Loaded from environment variables, then overridden by CLI flags:
//! - `APS_BASE_URL` - API host (default: `https://developer.api.autodesk.com`)
//! - `APS_ACCESS_TOKEN` - Bearer token for all remote calls
//! - `CAD_DISCOVERY_WORKERS` - worker pool size (default: 8)
//! - `CAD_DISCOVERY_TIMEOUT_SECS` - per-request timeout (default: 30)
//! - `CAD_DISCOVERY_EXTENSIONS` - comma separated CAD extensions
//! - `CAD_DISCOVERY_SEQUENTIAL` - recurse into subfolders inline instead of via the pool

use std::time::Duration;

use thiserror::Error;

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://developer.api.autodesk.com";

/// Default worker pool size.
pub const DEFAULT_WORKERS: usize = 8;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// File extensions treated as CAD files unless overridden.
pub const DEFAULT_CAD_EXTENSIONS: &[&str] =
    &[".rvt", ".dwg", ".ifc", ".step", ".stp", ".iam", ".ipt"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub access_token: Option<String>,
    /// Upper bound on concurrent remote calls during a walk. Always at least 1.
    pub workers: usize,
    pub request_timeout: Duration,
    /// Lowercase, dot-prefixed extensions.
    pub cad_extensions: Vec<String>,
    /// Submit subfolder visits to the pool (`true`) or recurse inline (`false`).
    pub fan_out_subfolders: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            workers: DEFAULT_WORKERS,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cad_extensions: DEFAULT_CAD_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            fan_out_subfolders: true,
        }
    }
}

impl Config {
    /// Load from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(url) = get("APS_BASE_URL") {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }
        config.access_token = get("APS_ACCESS_TOKEN").map(|t| t.trim().to_string());

        if let Some(raw) = get("CAD_DISCOVERY_WORKERS") {
            config.workers = parse_workers("CAD_DISCOVERY_WORKERS", &raw)?;
        }
        if let Some(raw) = get("CAD_DISCOVERY_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    key: "CAD_DISCOVERY_TIMEOUT_SECS",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = get("CAD_DISCOVERY_EXTENSIONS") {
            config.cad_extensions = parse_extensions(&raw);
        }
        if let Some(raw) = get("CAD_DISCOVERY_SEQUENTIAL") {
            config.fan_out_subfolders = !parse_flag("CAD_DISCOVERY_SEQUENTIAL", &raw)?;
        }

        Ok(config)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }
}

fn parse_workers(key: &'static str, raw: &str) -> Result<usize, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        reason,
    };
    let n: usize = raw.trim().parse().map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
    if n == 0 {
        return Err(invalid("must be at least 1".to_string()));
    }
    Ok(n)
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

/// Normalize a comma separated list to lowercase, dot-prefixed extensions.
pub fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_ascii_lowercase())
        .filter(|e| !e.is_empty() && e != ".")
        .map(|e| if e.starts_with('.') { e } else { format!(".{}", e) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.workers, DEFAULT_WORKERS);
        assert!(config.cad_extensions.contains(&".stp".to_string()));
        assert!(config.fan_out_subfolders);
    }

    #[test]
    fn test_reads_all_keys() {
        let config = Config::from_lookup(lookup(&[
            ("APS_BASE_URL", "http://localhost:9000/"),
            ("APS_ACCESS_TOKEN", " abc "),
            ("CAD_DISCOVERY_WORKERS", "3"),
            ("CAD_DISCOVERY_TIMEOUT_SECS", "12"),
            ("CAD_DISCOVERY_EXTENSIONS", "DWG, .sldprt,,"),
            ("CAD_DISCOVERY_SEQUENTIAL", "true"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.access_token.as_deref(), Some("abc"));
        assert_eq!(config.workers, 3);
        assert_eq!(config.request_timeout, Duration::from_secs(12));
        assert_eq!(config.cad_extensions, vec![".dwg", ".sldprt"]);
        assert!(!config.fan_out_subfolders);
    }

    #[test]
    fn test_rejects_zero_workers() {
        let err = Config::from_lookup(lookup(&[("CAD_DISCOVERY_WORKERS", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "CAD_DISCOVERY_WORKERS",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_garbage_flag() {
        assert!(Config::from_lookup(lookup(&[("CAD_DISCOVERY_SEQUENTIAL", "maybe")])).is_err());
    }

    #[test]
    fn test_with_workers_clamps_to_one() {
        assert_eq!(Config::default().with_workers(0).workers, 1);
    }
}
