//! Reference data: periods and the class/teacher/subject pick lists.
//!
//! Fetched once per view and never mutated.

use serde::{Deserialize, Serialize};

use crate::ids::{ClassId, PeriodId, SubjectId, TeacherId};

/// A numbered teaching period with its wall-clock bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub period_id: PeriodId,
    /// 1-based position in the school day
    pub period_number: u32,
    /// Wall-clock start, e.g. "07:00"
    #[serde(default)]
    pub start_time: String,
    /// Wall-clock end, e.g. "07:45"
    #[serde(default)]
    pub end_time: String,
}

impl Period {
    /// Row header, e.g. "Period 1 (07:00-07:45)".
    pub fn label(&self) -> String {
        if self.start_time.is_empty() && self.end_time.is_empty() {
            format!("Period {}", self.period_number)
        } else {
            format!(
                "Period {} ({}-{})",
                self.period_number, self.start_time, self.end_time
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassOption {
    pub class_id: ClassId,
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherOption {
    pub teacher_id: TeacherId,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectOption {
    pub subject_id: SubjectId,
    pub subject_name: String,
}

/// Everything the timetable forms pick from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lookups {
    /// Ordered by period number.
    pub periods: Vec<Period>,
    pub classes: Vec<ClassOption>,
    pub teachers: Vec<TeacherOption>,
    pub subjects: Vec<SubjectOption>,
}

impl Lookups {
    pub fn new(
        mut periods: Vec<Period>,
        classes: Vec<ClassOption>,
        teachers: Vec<TeacherOption>,
        subjects: Vec<SubjectOption>,
    ) -> Self {
        periods.sort_by_key(|p| p.period_number);
        Self {
            periods,
            classes,
            teachers,
            subjects,
        }
    }

    pub fn period(&self, id: PeriodId) -> Option<&Period> {
        self.periods.iter().find(|p| p.period_id == id)
    }

    pub fn period_by_number(&self, number: u32) -> Option<&Period> {
        self.periods.iter().find(|p| p.period_number == number)
    }

    pub fn class_name(&self, id: ClassId) -> Option<&str> {
        self.classes
            .iter()
            .find(|c| c.class_id == id)
            .map(|c| c.class_name.as_str())
    }

    pub fn teacher_name(&self, id: TeacherId) -> Option<&str> {
        self.teachers
            .iter()
            .find(|t| t.teacher_id == id)
            .map(|t| t.full_name.as_str())
    }

    pub fn subject_name(&self, id: SubjectId) -> Option<&str> {
        self.subjects
            .iter()
            .find(|s| s.subject_id == id)
            .map(|s| s.subject_name.as_str())
    }
}
