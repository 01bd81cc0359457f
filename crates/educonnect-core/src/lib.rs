//! # EduConnect Core
//!
//! Core types shared by every EduConnect timetable crate.
//!
//! - [`errors`]: the client error taxonomy and per-operation fallback messages
//! - [`serde`]: wire-format helpers for calendar dates and optional strings
//!
//! # Example
//!
//! ```ignore
//! use educonnect_core::errors::{ClientError, Operation};
//!
//! let err = ClientError::remote(Operation::CreateSession, Some(500), None);
//! assert_eq!(err.to_string(), "Failed to create the session");
//! ```

pub mod errors;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::{ClientError, ClientResult, Operation};
