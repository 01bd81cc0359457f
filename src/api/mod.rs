//! Seam between the timetable view-model and the EduConnect REST API.
//!
//! [`TimetableApi`] is what views and the coordinator talk to. The production
//! implementation is [`HttpTimetableApi`]; tests substitute an in-memory one.

pub mod http;

use async_trait::async_trait;

use educonnect_core::{ClientError, ClientResult, Operation};
use educonnect_models::{
    ClassOption, CreateSessionDto, DaySchedule, Lookups, Period, Session, SessionId, SessionQuery,
    SubjectOption, TeacherOption, UpdateSessionDto, flatten_days,
};

pub use http::HttpTimetableApi;

/// Outcome of a create call.
///
/// Some API versions answer with the full record, others with only the new
/// id, others with nothing but `success: true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Created {
    Session(Session),
    Id(SessionId),
    Acknowledged,
}

/// Endpoints consumed by the timetable screens.
#[async_trait]
pub trait TimetableApi: Send + Sync {
    /// `GET sessions?target&mode&from&to`
    async fn fetch_sessions(&self, query: &SessionQuery) -> ClientResult<Vec<DaySchedule>>;

    /// `GET periods/lookup`
    async fn fetch_periods(&self) -> ClientResult<Vec<Period>>;

    /// `GET classes/lookup`
    async fn fetch_classes(&self) -> ClientResult<Vec<ClassOption>>;

    /// `GET teachers/lookup`
    async fn fetch_teachers(&self) -> ClientResult<Vec<TeacherOption>>;

    /// `GET subjects/lookup`
    async fn fetch_subjects(&self) -> ClientResult<Vec<SubjectOption>>;

    /// `POST session`
    async fn create_session(&self, dto: &CreateSessionDto) -> ClientResult<Created>;

    /// `PUT session/{id}`. `None` when the API acknowledged without a record.
    async fn update_session(
        &self,
        id: SessionId,
        dto: &UpdateSessionDto,
    ) -> ClientResult<Option<Session>>;

    /// `DELETE session/{id}`
    async fn delete_session(&self, id: SessionId) -> ClientResult<()>;
}

/// Fetch all four pick lists concurrently.
pub async fn load_lookups<A>(api: &A) -> ClientResult<Lookups>
where
    A: TimetableApi + ?Sized,
{
    let (periods, classes, teachers, subjects) = tokio::try_join!(
        api.fetch_periods(),
        api.fetch_classes(),
        api.fetch_teachers(),
        api.fetch_subjects(),
    )?;

    tracing::debug!(
        periods = periods.len(),
        classes = classes.len(),
        teachers = teachers.len(),
        subjects = subjects.len(),
        "lookups loaded"
    );

    Ok(Lookups::new(periods, classes, teachers, subjects))
}

/// Fetch and flatten the sessions of one query.
///
/// A 404 or 400 means "nothing scheduled" and yields an empty list.
pub async fn load_sessions<A>(api: &A, query: &SessionQuery) -> ClientResult<Vec<Session>>
where
    A: TimetableApi + ?Sized,
{
    match api.fetch_sessions(query).await {
        Ok(days) => flatten_days(days).map_err(|e| {
            tracing::error!(error = %e, "malformed session record");
            ClientError::remote(Operation::FetchSessions, None, None)
        }),
        Err(e) if e.is_empty_result() => {
            tracing::debug!(status = ?e.status(), "no sessions for query");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}
