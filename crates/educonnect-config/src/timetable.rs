//! Week selector configuration.

use std::env;

use crate::parse_or;

/// Upper bound for either side of the window. Larger values are clamped.
pub const MAX_WEEKS_AROUND: u32 = 52;

/// How many weeks around the current one the selector offers.
///
/// # Environment Variables
///
/// - `EDUCONNECT_WEEKS_BEFORE`: weeks listed before the current week (default: `4`)
/// - `EDUCONNECT_WEEKS_AFTER`: weeks listed after the current week (default: `3`)
///
/// Both are clamped to [`MAX_WEEKS_AROUND`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimetableConfig {
    pub weeks_before: u32,
    pub weeks_after: u32,
}

impl TimetableConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            weeks_before: parse_or(&lookup, "EDUCONNECT_WEEKS_BEFORE", defaults.weeks_before)
                .min(MAX_WEEKS_AROUND),
            weeks_after: parse_or(&lookup, "EDUCONNECT_WEEKS_AFTER", defaults.weeks_after)
                .min(MAX_WEEKS_AROUND),
        }
    }

    /// Total number of selectable weeks, the current one included.
    pub fn week_count(&self) -> usize {
        self.weeks_before as usize + self.weeks_after as usize + 1
    }
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            weeks_before: 4,
            weeks_after: 3,
        }
    }
}
