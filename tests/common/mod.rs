#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use educonnect::api::{Created, TimetableApi};
use educonnect::modules::timetable::TimetableView;
use educonnect::notifications::RecordingNotifier;
use educonnect_auth::{AuthContext, Claims};
use educonnect_config::TimetableConfig;
use educonnect_core::{ClientError, ClientResult, Operation};
use educonnect_models::{
    ClassId, ClassOption, CreateSessionDto, DaySchedule, Lookups, Period, PeriodId, Session,
    SessionId, SessionQuery, SubjectId, SubjectOption, TeacherId, TeacherOption, TimetableTarget,
    UpdateSessionDto,
};

pub const CLASS_10A: ClassId = ClassId::from_u128(0x10a);
pub const CLASS_10B: ClassId = ClassId::from_u128(0x10b);
pub const TEACHER_ADA: TeacherId = TeacherId::from_u128(0xada);
pub const TEACHER_ALAN: TeacherId = TeacherId::from_u128(0xa1a);
pub const SUBJECT_MATHS: SubjectId = SubjectId::from_u128(0x3a7);
pub const SUBJECT_PHYSICS: SubjectId = SubjectId::from_u128(0x9f5);

/// Dates in June 2024. The 3rd is a Monday.
pub fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

pub fn period_id(number: u32) -> PeriodId {
    PeriodId::from_u128(0x9000 + number as u128)
}

pub fn periods() -> Vec<Period> {
    (1..=6)
        .map(|n| Period {
            period_id: period_id(n),
            period_number: n,
            start_time: format!("{:02}:00", 6 + n),
            end_time: format!("{:02}:45", 6 + n),
        })
        .collect()
}

pub fn lookups() -> Lookups {
    Lookups::new(
        periods(),
        vec![
            ClassOption {
                class_id: CLASS_10A,
                class_name: "10A".into(),
            },
            ClassOption {
                class_id: CLASS_10B,
                class_name: "10B".into(),
            },
        ],
        vec![
            TeacherOption {
                teacher_id: TEACHER_ADA,
                full_name: "Ada Lovelace".into(),
            },
            TeacherOption {
                teacher_id: TEACHER_ALAN,
                full_name: "Alan Turing".into(),
            },
        ],
        vec![
            SubjectOption {
                subject_id: SUBJECT_MATHS,
                subject_name: "Mathematics".into(),
            },
            SubjectOption {
                subject_id: SUBJECT_PHYSICS,
                subject_name: "Physics".into(),
            },
        ],
    )
}

/// A Mathematics session taught by Ada.
pub fn session(id: u128, date: NaiveDate, period_number: u32, class_id: ClassId) -> Session {
    let class_name = if class_id == CLASS_10A { "10A" } else { "10B" };
    Session {
        session_id: SessionId::from_u128(id),
        date,
        period_id: period_id(period_number),
        period_number,
        class_id,
        class_name: class_name.into(),
        subject_id: SUBJECT_MATHS,
        subject_name: "Mathematics".into(),
        teacher_id: TEACHER_ADA,
        teacher_name: "Ada Lovelace".into(),
        lesson_content: "Fractions".into(),
        behavior_note: None,
        absent_count: 0,
    }
}

/// Group sessions into the per-day response shape, omitting each nested
/// session's date the way the API does.
pub fn day_schedules(sessions: &[Session]) -> Vec<DaySchedule> {
    let mut days: BTreeMap<NaiveDate, Vec<serde_json::Value>> = BTreeMap::new();
    for session in sessions {
        let mut value = serde_json::to_value(session).unwrap();
        value.as_object_mut().unwrap().remove("date");
        days.entry(session.date).or_default().push(value);
    }
    days.into_iter()
        .map(|(date, periods)| DaySchedule {
            date,
            day_of_week: Some(date.format("%A").to_string()),
            periods,
        })
        .collect()
}

pub fn token(role: &str, teacher_id: Option<TeacherId>) -> String {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: Uuid::new_v4().to_string(),
        email: Some("user@school.test".into()),
        role: role.into(),
        teacher_id: teacher_id.map(TeacherId::into_inner),
        exp: now + 3600,
        iat: now,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"test")).unwrap()
}

pub fn admin_auth() -> AuthContext {
    let auth = AuthContext::new();
    auth.sign_in(&token("Admin", None)).unwrap();
    auth
}

pub fn teacher_auth(teacher_id: TeacherId) -> AuthContext {
    let auth = AuthContext::new();
    auth.sign_in(&token("Teacher", Some(teacher_id))).unwrap();
    auth
}

pub fn remote(operation: Operation, status: u16) -> ClientError {
    ClientError::remote(operation, Some(status), None)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchSessions(SessionQuery),
    FetchPeriods,
    FetchClasses,
    FetchTeachers,
    FetchSubjects,
    Create(CreateSessionDto),
    Update(SessionId, UpdateSessionDto),
    Delete(SessionId),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Call::Create(_) | Call::Update(..) | Call::Delete(_))
    }
}

/// In-memory API that records every call and answers with canned results.
pub struct MockApi {
    calls: Mutex<Vec<Call>>,
    sessions: Mutex<ClientResult<Vec<DaySchedule>>>,
    lookups: Lookups,
    create_response: Mutex<ClientResult<Created>>,
    update_response: Mutex<ClientResult<Option<Session>>>,
    delete_response: Mutex<ClientResult<()>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            sessions: Mutex::new(Ok(Vec::new())),
            lookups: lookups(),
            create_response: Mutex::new(Ok(Created::Acknowledged)),
            update_response: Mutex::new(Ok(None)),
            delete_response: Mutex::new(Ok(())),
        }
    }

    pub fn with_sessions(sessions: &[Session]) -> Self {
        let api = Self::new();
        api.set_sessions(sessions);
        api
    }

    pub fn set_sessions(&self, sessions: &[Session]) {
        *self.sessions.lock().unwrap() = Ok(day_schedules(sessions));
    }

    pub fn fail_fetch(&self, err: ClientError) {
        *self.sessions.lock().unwrap() = Err(err);
    }

    pub fn respond_to_create(&self, response: ClientResult<Created>) {
        *self.create_response.lock().unwrap() = response;
    }

    pub fn respond_to_update(&self, response: ClientResult<Option<Session>>) {
        *self.update_response.lock().unwrap() = response;
    }

    pub fn respond_to_delete(&self, response: ClientResult<()>) {
        *self.delete_response.lock().unwrap() = response;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    pub fn fetch_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::FetchSessions(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TimetableApi for MockApi {
    async fn fetch_sessions(&self, query: &SessionQuery) -> ClientResult<Vec<DaySchedule>> {
        self.record(Call::FetchSessions(*query));
        let days = self.sessions.lock().unwrap().clone()?;
        Ok(days
            .into_iter()
            .filter(|d| query.from <= d.date && d.date <= query.to)
            .collect())
    }

    async fn fetch_periods(&self) -> ClientResult<Vec<Period>> {
        self.record(Call::FetchPeriods);
        Ok(self.lookups.periods.clone())
    }

    async fn fetch_classes(&self) -> ClientResult<Vec<ClassOption>> {
        self.record(Call::FetchClasses);
        Ok(self.lookups.classes.clone())
    }

    async fn fetch_teachers(&self) -> ClientResult<Vec<TeacherOption>> {
        self.record(Call::FetchTeachers);
        Ok(self.lookups.teachers.clone())
    }

    async fn fetch_subjects(&self) -> ClientResult<Vec<SubjectOption>> {
        self.record(Call::FetchSubjects);
        Ok(self.lookups.subjects.clone())
    }

    async fn create_session(&self, dto: &CreateSessionDto) -> ClientResult<Created> {
        self.record(Call::Create(dto.clone()));
        self.create_response.lock().unwrap().clone()
    }

    async fn update_session(
        &self,
        id: SessionId,
        dto: &UpdateSessionDto,
    ) -> ClientResult<Option<Session>> {
        self.record(Call::Update(id, dto.clone()));
        self.update_response.lock().unwrap().clone()
    }

    async fn delete_session(&self, id: SessionId) -> ClientResult<()> {
        self.record(Call::Delete(id));
        self.delete_response.lock().unwrap().clone()
    }
}

/// A view on the week of 2024-06-03 with lookups loaded and the first fetch
/// applied.
pub async fn open_view(
    api: Arc<MockApi>,
    auth: AuthContext,
    target: Option<TimetableTarget>,
) -> (TimetableView, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let mut view = TimetableView::open(
        api,
        auth,
        notifier.clone(),
        &TimetableConfig::default(),
        june(5),
        target,
    )
    .unwrap();
    assert!(view.load_lookups().await);
    view.refresh().await;
    (view, notifier)
}
