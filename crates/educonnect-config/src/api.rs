//! API connection configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::parse_or;

/// How calendar dates are written into session query parameters.
///
/// Request bodies always use ISO dates; only the `from`/`to` query pair has
/// been seen in both encodings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueryDateFormat {
    /// `YYYY-MM-DD`
    #[default]
    Iso,
    /// `MM/DD/YYYY`
    Us,
}

impl FromStr for QueryDateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iso" | "yyyy-mm-dd" => Ok(Self::Iso),
            "us" | "mm/dd/yyyy" => Ok(Self::Us),
            other => Err(format!("unknown query date format `{}`", other)),
        }
    }
}

/// API configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `EDUCONNECT_API_URL`: base URL of the REST API (default: `http://localhost:5000/api`)
/// - `EDUCONNECT_API_TIMEOUT_SECS`: per-request timeout in seconds (default: `30`)
/// - `EDUCONNECT_QUERY_DATE_FORMAT`: `iso` or `us` (default: `iso`)
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,

    /// Encoding of the session query's `from`/`to` parameters.
    pub query_date_format: QueryDateFormat,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let base_url = lookup("EDUCONNECT_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.base_url);

        Self {
            base_url,
            timeout_seconds: parse_or(&lookup, "EDUCONNECT_API_TIMEOUT_SECS", defaults.timeout_seconds),
            query_date_format: parse_or(
                &lookup,
                "EDUCONNECT_QUERY_DATE_FORMAT",
                defaults.query_date_format,
            ),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Join a relative endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".into(),
            timeout_seconds: 30,
            query_date_format: QueryDateFormat::Iso,
        }
    }
}
