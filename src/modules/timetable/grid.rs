//! Resolution of session records into the timetable grid.
//!
//! The grid is a pure function of the session sequence: it is rebuilt from
//! scratch whenever sessions change and never edited in place.

use chrono::Weekday;
use std::collections::HashMap;

use educonnect_models::{Period, Session};

use super::days::{TEACHING_DAYS, day_label_for_date};

/// Grid key: weekday and period number.
pub type SlotKey = (Weekday, u32);

/// Sessions grouped by slot, in input order within each slot.
///
/// A slot can hold several sessions: a teacher's view shows every class they
/// teach, and data errors are displayed rather than hidden.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekGrid {
    slots: HashMap<SlotKey, Vec<Session>>,
}

/// Build the grid in one pass. No sorting, no deduplication, and no
/// filtering: a Sunday session is kept under `Weekday::Sun` and simply has no
/// column to be drawn in.
pub fn build_grid(sessions: &[Session]) -> WeekGrid {
    let mut slots: HashMap<SlotKey, Vec<Session>> = HashMap::new();
    for session in sessions {
        slots
            .entry((day_label_for_date(session.date), session.period_number))
            .or_default()
            .push(session.clone());
    }
    WeekGrid { slots }
}

impl WeekGrid {
    /// Sessions in a slot; empty when nothing is scheduled.
    pub fn get(&self, day: Weekday, period_number: u32) -> &[Session] {
        self.slots
            .get(&(day, period_number))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains_key(&self, day: Weekday, period_number: u32) -> bool {
        self.slots.contains_key(&(day, period_number))
    }

    /// Number of occupied slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of sessions across all slots.
    pub fn session_count(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &[Session])> {
        self.slots.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// One row per period with a cell for each teaching day, ready for a
    /// table renderer. `periods` should already be in period order.
    pub fn rows<'a>(&'a self, periods: &'a [Period]) -> Vec<GridRow<'a>> {
        periods
            .iter()
            .map(|period| GridRow {
                period,
                cells: TEACHING_DAYS.map(|day| self.get(day, period.period_number)),
            })
            .collect()
    }
}

/// A rendered row: one period across Monday..Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRow<'a> {
    pub period: &'a Period,
    pub cells: [&'a [Session]; 6],
}
