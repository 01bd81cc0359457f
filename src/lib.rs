//! # EduConnect Timetable
//!
//! Client-side timetable view-model for the EduConnect school-management API.
//!
//! ## Overview
//!
//! The timetable screen shows one target (a class or a teacher) for one
//! Monday-to-Saturday week as a grid of periods by days. This crate provides:
//!
//! - **Week selection**: a window of weeks around today, with the current one
//!   selected
//! - **Day mapping**: weekday to date within a week and back
//! - **Grid resolution**: sessions grouped by `(weekday, period number)`
//! - **Mutations**: create, update and delete of sessions, with local state
//!   kept consistent with what the API accepted
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── api/              # TimetableApi trait and its reqwest implementation
//! ├── modules/
//! │   └── timetable/   # week, days, grid, coordinator, view
//! ├── notifications.rs  # Notifier and Confirm seams
//! ├── logging.rs        # Console tracing setup
//! └── state.rs          # AppState wiring
//! ```
//!
//! Domain types live in the workspace crates:
//!
//! | Crate | Contents |
//! |-------|----------|
//! | `educonnect-core` | `ClientError`, wire date helpers |
//! | `educonnect-config` | `ApiConfig`, `TimetableConfig` |
//! | `educonnect-auth` | Token claims, `AuthContext`, `Viewer` |
//! | `educonnect-models` | Ids, sessions, lookups, DTOs |
//!
//! ## Roles
//!
//! | Viewer | Sees | May |
//! |--------|------|-----|
//! | Admin | any class or teacher | create, edit, delete |
//! | Teacher | own timetable | edit own sessions |
//!
//! ## Environment Variables
//!
//! ```bash
//! EDUCONNECT_API_URL=http://localhost:5000/api
//! EDUCONNECT_API_TIMEOUT_SECS=30
//! EDUCONNECT_QUERY_DATE_FORMAT=iso   # or "us" for MM/DD/YYYY
//! EDUCONNECT_WEEKS_BEFORE=4
//! EDUCONNECT_WEEKS_AFTER=3
//! ```

pub mod api;
pub mod logging;
pub mod modules;
pub mod notifications;
pub mod state;

// Re-export workspace crates for convenience
pub use educonnect_auth;
pub use educonnect_config;
pub use educonnect_core;
pub use educonnect_models;
