//! Session domain models and DTOs.
//!
//! A session is one scheduled lesson occurrence: a class, a subject and a
//! teacher in a numbered period on a calendar date. Sessions are owned by the
//! API; the client only caches the ones for the selected target and week.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use educonnect_core::ClientError;
use educonnect_core::serde::{deserialize_optional_string, deserialize_wire_date, format_iso_date};

use crate::ids::{ClassId, PeriodId, SessionId, SubjectId, TeacherId};
use crate::lookups::Lookups;
use crate::validation::{validate_dto, validate_not_blank};

/// A scheduled lesson occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique identifier for the session
    pub session_id: SessionId,
    /// Calendar date the lesson takes place on
    #[serde(deserialize_with = "deserialize_wire_date")]
    pub date: NaiveDate,
    /// Period the lesson occupies
    pub period_id: PeriodId,
    /// Position of that period in the school day
    pub period_number: u32,
    pub class_id: ClassId,
    #[serde(default)]
    pub class_name: String,
    pub subject_id: SubjectId,
    #[serde(default)]
    pub subject_name: String,
    pub teacher_id: TeacherId,
    #[serde(default)]
    pub teacher_name: String,
    /// What was taught
    #[serde(default)]
    pub lesson_content: String,
    /// Optional remark about class behaviour
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub behavior_note: Option<String>,
    /// Number of absent students
    #[serde(default)]
    pub absent_count: u32,
}

impl Session {
    /// Apply an accepted update locally, resolving display names through
    /// `lookups`.
    ///
    /// Returns `false` when the new period is not in `lookups`, in which case
    /// the grid position cannot be known and the caller should refetch.
    pub fn apply_update(&mut self, dto: &UpdateSessionDto, lookups: &Lookups) -> bool {
        let period_number = if dto.period_id == self.period_id {
            self.period_number
        } else {
            match lookups.period(dto.period_id) {
                Some(period) => period.period_number,
                None => return false,
            }
        };

        if dto.teacher_id != self.teacher_id {
            self.teacher_name = lookups
                .teacher_name(dto.teacher_id)
                .map(str::to_string)
                .unwrap_or_default();
        }
        if dto.subject_id != self.subject_id {
            self.subject_name = lookups
                .subject_name(dto.subject_id)
                .map(str::to_string)
                .unwrap_or_default();
        }

        self.teacher_id = dto.teacher_id;
        self.subject_id = dto.subject_id;
        self.lesson_content = dto.lesson_content.clone();
        self.behavior_note = dto.behavior_note.clone();
        self.absent_count = dto.absent_count;
        self.date = dto.date;
        self.period_id = dto.period_id;
        self.period_number = period_number;
        true
    }
}

/// One day of a timetable response: `{date, dayOfWeek, periods: [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    #[serde(deserialize_with = "deserialize_wire_date")]
    pub date: NaiveDate,
    /// Server-formatted weekday name. Informational only; grid placement
    /// always derives the weekday from `date`.
    #[serde(default)]
    pub day_of_week: Option<String>,
    /// Raw session records. They may omit `date`, in which case they inherit
    /// the day's.
    #[serde(default)]
    pub periods: Vec<Value>,
}

impl DaySchedule {
    pub fn into_sessions(self) -> Result<Vec<Session>, serde_json::Error> {
        let date = Value::String(format_iso_date(self.date));
        self.periods
            .into_iter()
            .map(|mut entry| {
                if let Value::Object(map) = &mut entry {
                    let missing = map.get("date").is_none_or(|d| d.is_null());
                    if missing {
                        map.insert("date".to_string(), date.clone());
                    }
                }
                serde_json::from_value(entry)
            })
            .collect()
    }
}

/// Flatten a timetable response into sessions, keeping response order.
pub fn flatten_days(days: Vec<DaySchedule>) -> Result<Vec<Session>, serde_json::Error> {
    let mut sessions = Vec::new();
    for day in days {
        sessions.extend(day.into_sessions()?);
    }
    Ok(sessions)
}

/// Whose timetable is being looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimetableTarget {
    Teacher(TeacherId),
    Class(ClassId),
}

impl TimetableTarget {
    /// Value of the `mode` query parameter.
    pub fn mode(&self) -> &'static str {
        match self {
            TimetableTarget::Teacher(_) => "Teacher",
            TimetableTarget::Class(_) => "Class",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            TimetableTarget::Teacher(id) => id.into_inner(),
            TimetableTarget::Class(id) => id.into_inner(),
        }
    }
}

/// Sessions of one target between two dates, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionQuery {
    pub target: TimetableTarget,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// DTO for creating a session.
///
/// Mirrors the create form: every pick list starts empty, so required
/// selections are `Option`s and are reported together when missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionDto {
    #[validate(required(message = "date is required"))]
    pub date: Option<NaiveDate>,
    #[validate(required(message = "period is required"))]
    pub period_id: Option<PeriodId>,
    #[validate(required(message = "class is required"))]
    pub class_id: Option<ClassId>,
    #[validate(required(message = "teacher is required"))]
    pub teacher_id: Option<TeacherId>,
    #[validate(required(message = "subject is required"))]
    pub subject_id: Option<SubjectId>,
    #[validate(custom(function = "validate_not_blank", message = "lesson content is required"))]
    pub lesson_content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior_note: Option<String>,
    pub absent_count: u32,
}

impl CreateSessionDto {
    /// Validate and normalise the form for sending: text is trimmed and a
    /// blank behaviour note is dropped.
    pub fn prepare(mut self) -> Result<Self, ClientError> {
        validate_dto(&self)?;
        self.lesson_content = self.lesson_content.trim().to_string();
        self.behavior_note = normalize_note(self.behavior_note);
        Ok(self)
    }

    /// Build the local record for a created session when the API returned
    /// only the new id.
    pub fn to_session(&self, session_id: SessionId, lookups: &Lookups) -> Option<Session> {
        let period = lookups.period(self.period_id?)?;
        let class_id = self.class_id?;
        let teacher_id = self.teacher_id?;
        let subject_id = self.subject_id?;

        Some(Session {
            session_id,
            date: self.date?,
            period_id: period.period_id,
            period_number: period.period_number,
            class_id,
            class_name: lookups.class_name(class_id).unwrap_or_default().to_string(),
            subject_id,
            subject_name: lookups.subject_name(subject_id).unwrap_or_default().to_string(),
            teacher_id,
            teacher_name: lookups.teacher_name(teacher_id).unwrap_or_default().to_string(),
            lesson_content: self.lesson_content.clone(),
            behavior_note: self.behavior_note.clone(),
            absent_count: self.absent_count,
        })
    }
}

/// DTO for updating a session: the seven editable fields.
///
/// Built from the original record with `From<&Session>`, edited, and compared
/// back against the original to decide whether anything changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionDto {
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
    #[validate(custom(function = "validate_not_blank", message = "lesson content is required"))]
    pub lesson_content: String,
    pub behavior_note: Option<String>,
    pub absent_count: u32,
    pub date: NaiveDate,
    pub period_id: PeriodId,
}

impl From<&Session> for UpdateSessionDto {
    fn from(session: &Session) -> Self {
        Self {
            teacher_id: session.teacher_id,
            subject_id: session.subject_id,
            lesson_content: session.lesson_content.clone(),
            behavior_note: session.behavior_note.clone(),
            absent_count: session.absent_count,
            date: session.date,
            period_id: session.period_id,
        }
    }
}

impl UpdateSessionDto {
    fn normalized(mut self) -> Self {
        self.lesson_content = self.lesson_content.trim().to_string();
        self.behavior_note = normalize_note(self.behavior_note);
        self
    }

    /// Field-by-field comparison against the original record, ignoring
    /// surrounding whitespace.
    pub fn differs_from(&self, original: &Session) -> bool {
        self.clone().normalized() != UpdateSessionDto::from(original).normalized()
    }

    pub fn prepare(self) -> Result<Self, ClientError> {
        validate_dto(&self)?;
        Ok(self.normalized())
    }
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}
