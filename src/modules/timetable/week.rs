//! Monday-anchored teaching weeks and the week selector.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::fmt;
use std::str::FromStr;

use educonnect_config::{MAX_WEEKS_AROUND, TimetableConfig};
use educonnect_core::serde::{format_us_date, parse_wire_date};
use educonnect_core::{ClientError, ClientResult};
use educonnect_models::{SessionQuery, TimetableTarget};

use super::days::TEACHING_DAYS;

/// A six-day teaching week, Monday through Saturday.
///
/// Only the Monday is stored, so `end() == start() + 5 days` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Week {
    monday: NaiveDate,
}

impl Week {
    /// The week whose Monday is on or before `date`. A Sunday belongs to the
    /// week that just ended.
    pub fn containing(date: NaiveDate) -> Self {
        let back = i64::from(date.weekday().num_days_from_monday());
        Self {
            monday: date - Duration::days(back),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.monday
    }

    pub fn end(&self) -> NaiveDate {
        self.monday + Duration::days(5)
    }

    /// The week `weeks` whole weeks later (or earlier, when negative).
    pub fn shifted(&self, weeks: i64) -> Self {
        Self {
            monday: self.monday + Duration::weeks(weeks),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start() <= date && date <= self.end()
    }

    /// Stable selection key built from both boundary dates.
    pub fn id(&self) -> String {
        format!("{}_{}", self.start(), self.end())
    }

    /// Display label, `MM/DD/YYYY - MM/DD/YYYY`.
    pub fn label(&self) -> String {
        format!("{} - {}", format_us_date(self.start()), format_us_date(self.end()))
    }

    /// Each teaching day with its date.
    pub fn days(&self) -> impl Iterator<Item = (Weekday, NaiveDate)> + '_ {
        TEACHING_DAYS
            .iter()
            .enumerate()
            .map(|(offset, day)| (*day, self.monday + Duration::days(offset as i64)))
    }

    /// Session query covering this week for `target`.
    pub fn query(&self, target: TimetableTarget) -> SessionQuery {
        SessionQuery {
            target,
            from: self.start(),
            to: self.end(),
        }
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Week {
    type Err = ClientError;

    /// Accepts a week id (`2024-06-03_2024-06-08`) or any single date, which
    /// selects the week containing it.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClientError::validation(format!("`{}` is not a valid week", s.trim()));

        match s.trim().split_once('_') {
            Some((from, to)) => {
                let from = parse_wire_date(from).ok_or_else(invalid)?;
                let to = parse_wire_date(to).ok_or_else(invalid)?;
                let week = Week::containing(from);
                if week.start() != from || week.end() != to {
                    return Err(invalid());
                }
                Ok(week)
            }
            None => parse_wire_date(s).map(Week::containing).ok_or_else(invalid),
        }
    }
}

/// `before + after + 1` consecutive weeks around the one containing
/// `reference`, earliest first.
pub fn enumerate_weeks(reference: NaiveDate, before: u32, after: u32) -> Vec<Week> {
    let current = Week::containing(reference);
    (-i64::from(before)..=i64::from(after))
        .map(|offset| current.shifted(offset))
        .collect()
}

/// The week options offered to the user and the one currently selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSelector {
    weeks: Vec<Week>,
    selected: usize,
}

impl WeekSelector {
    /// Options around `today`, with the current week selected.
    pub fn new(today: NaiveDate, config: &TimetableConfig) -> Self {
        let before = config.weeks_before.min(MAX_WEEKS_AROUND);
        let after = config.weeks_after.min(MAX_WEEKS_AROUND);
        Self {
            weeks: enumerate_weeks(today, before, after),
            selected: before as usize,
        }
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn selected(&self) -> Week {
        self.weeks[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Select a week by its id.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id is not one of the offered weeks; the selection
    /// is left unchanged.
    pub fn select(&mut self, id: &str) -> ClientResult<Week> {
        let index = self
            .weeks
            .iter()
            .position(|w| w.id() == id)
            .ok_or_else(|| ClientError::not_found("Week", id))?;
        self.selected = index;
        Ok(self.weeks[index])
    }
}
