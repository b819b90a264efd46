//! Runtime settings, read once from the environment.
//!
//! Nothing here is validated at startup: a missing or malformed service URL
//! only shows up as a failed prediction.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SHARE_URL: &str = "http://localhost:8080/";

/// Product name used in file names and report headers.
pub const PRODUCT_NAME: &str = "CardioAI";

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the prediction service (`{api_url}/predict`).
    pub api_url: Option<String>,

    /// Upper bound on a single prediction request.
    pub api_timeout: Duration,

    /// Directory for downloaded reports.
    pub report_dir: PathBuf,

    /// Drop directory acting as the native share target. `None` means the
    /// clipboard fallback is used.
    pub share_dir: Option<PathBuf>,

    /// Link included in shared summaries.
    pub share_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: None,
            api_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            report_dir: PathBuf::from("."),
            share_dir: None,
            share_url: DEFAULT_SHARE_URL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `CARDIOAI_*` variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let api_timeout = non_empty("CARDIOAI_API_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&v| v > 0)
            .map_or(defaults.api_timeout, Duration::from_secs);

        Self {
            api_url: non_empty("CARDIOAI_API_URL").or_else(|| non_empty("VITE_CARDIO_API_URL")),
            api_timeout,
            report_dir: non_empty("CARDIOAI_REPORT_DIR").map_or(defaults.report_dir, PathBuf::from),
            share_dir: non_empty("CARDIOAI_SHARE_DIR").map(PathBuf::from),
            share_url: non_empty("CARDIOAI_SHARE_URL").unwrap_or(defaults.share_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(lookup(&[]));
        assert_eq!(settings, Settings::default());
        assert!(settings.api_url.is_none());
    }

    #[test]
    fn test_reads_all_variables() {
        let settings = Settings::from_lookup(lookup(&[
            ("CARDIOAI_API_URL", "http://127.0.0.1:8000"),
            ("CARDIOAI_API_TIMEOUT_SECS", "5"),
            ("CARDIOAI_REPORT_DIR", "/tmp/reports"),
            ("CARDIOAI_SHARE_DIR", "/tmp/share"),
            ("CARDIOAI_SHARE_URL", "https://cardio.example/"),
        ]));
        assert_eq!(settings.api_url.as_deref(), Some("http://127.0.0.1:8000"));
        assert_eq!(settings.api_timeout, Duration::from_secs(5));
        assert_eq!(settings.report_dir, PathBuf::from("/tmp/reports"));
        assert_eq!(settings.share_dir, Some(PathBuf::from("/tmp/share")));
        assert_eq!(settings.share_url, "https://cardio.example/");
    }

    #[test]
    fn test_vite_alias_and_bad_timeout() {
        let settings = Settings::from_lookup(lookup(&[
            ("VITE_CARDIO_API_URL", "http://localhost:8000"),
            ("CARDIOAI_API_TIMEOUT_SECS", "soon"),
        ]));
        assert_eq!(settings.api_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(settings.api_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_blank_url_is_unset() {
        let settings = Settings::from_lookup(lookup(&[("CARDIOAI_API_URL", "   ")]));
        assert!(settings.api_url.is_none());
    }
}
