//! # EduConnect Models
//!
//! Domain models and DTOs for the EduConnect timetable client.
//!
//! This crate provides the data structures exchanged with the EduConnect API,
//! including session records, reference lookups, request DTOs and the
//! response envelope.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed entity IDs
//! - [`envelope`]: The `{success, message, data}` response wrapper
//! - [`lookups`]: Periods and class/teacher/subject pick lists
//! - [`sessions`]: Session records, timetable queries, create/update DTOs
//! - [`validation`]: Form validation helpers
//!
//! # Example
//!
//! ```ignore
//! use educonnect_models::{CreateSessionDto, UpdateSessionDto};
//!
//! let dto = CreateSessionDto { lesson_content: "Fractions".into(), ..Default::default() };
//! assert!(dto.prepare().is_err()); // date, period, class, teacher and subject missing
//!
//! let edit = UpdateSessionDto::from(&session);
//! assert!(!edit.differs_from(&session));
//! ```

pub mod envelope;
pub mod ids;
pub mod lookups;
pub mod sessions;
pub mod validation;

// Re-export commonly used types at crate root for convenience
pub use envelope::{ApiResponse, extract_error_message};
pub use ids::{ClassId, PeriodId, SessionId, SubjectId, TeacherId};
pub use lookups::{ClassOption, Lookups, Period, SubjectOption, TeacherOption};
pub use sessions::{
    CreateSessionDto, DaySchedule, Session, SessionQuery, TimetableTarget, UpdateSessionDto,
    flatten_days,
};
