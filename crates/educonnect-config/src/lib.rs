//! # EduConnect Config
//!
//! Configuration types for the EduConnect timetable client, loaded from
//! environment variables:
//!
//! - [`api`]: API base URL, request timeout and query date encoding
//! - [`timetable`]: how many weeks the week selector offers
//!
//! # Example
//!
//! ```ignore
//! use educonnect_config::{ApiConfig, TimetableConfig};
//!
//! let api_config = ApiConfig::from_env();
//! let timetable_config = TimetableConfig::from_env();
//! ```

pub mod api;
pub mod timetable;

// Re-export commonly used types at crate root
pub use api::{ApiConfig, QueryDateFormat};
pub use timetable::{MAX_WEEKS_AROUND, TimetableConfig};

/// Read a variable and parse it, keeping `default` when it is unset or malformed.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
