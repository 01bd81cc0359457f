//! Timetable view-model: weeks, day mapping, grid resolution and session
//! mutations.

pub mod coordinator;
pub mod days;
pub mod grid;
pub mod view;
pub mod week;

pub use coordinator::{CreateOutcome, DeleteOutcome, SessionCoordinator, UpdateOutcome};
pub use days::{TEACHING_DAYS, date_for_day, day_label_for_date, day_name, parse_day_label};
pub use grid::{GridRow, WeekGrid, build_grid};
pub use view::{FetchTicket, TimetableView};
pub use week::{Week, WeekSelector, enumerate_weeks};
