//! The timetable screen's view-model.
//!
//! A [`TimetableView`] ties the week selector, the session cache and the
//! mutation coordinator together and is the boundary where errors become
//! notifications. Fetches are ticketed so that a slow response for a week the
//! user already left never overwrites the newer one.

use std::sync::Arc;

use chrono::{NaiveDate, Weekday};
use tracing::{debug, instrument, warn};

use educonnect_auth::{AuthContext, Viewer};
use educonnect_config::TimetableConfig;
use educonnect_core::{ClientError, ClientResult};
use educonnect_models::{
    CreateSessionDto, Lookups, Session, SessionId, SessionQuery, TeacherId,
    TimetableTarget, UpdateSessionDto,
};

use crate::api::{TimetableApi, load_lookups, load_sessions};
use crate::notifications::{Confirm, Notification, Notifier};

use super::coordinator::{CreateOutcome, DeleteOutcome, SessionCoordinator, UpdateOutcome};
use super::days::date_for_day;
use super::grid::WeekGrid;
use super::week::{Week, WeekSelector};

/// Proof that a fetch was started, and for which query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    query: SessionQuery,
}

impl FetchTicket {
    pub fn query(&self) -> &SessionQuery {
        &self.query
    }
}

/// Monotonic counter; only the latest issued ticket may be applied.
#[derive(Debug, Default)]
struct RequestSequence {
    latest: u64,
}

impl RequestSequence {
    fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }
}

pub struct TimetableView {
    api: Arc<dyn TimetableApi>,
    auth: AuthContext,
    notifier: Arc<dyn Notifier>,
    target: TimetableTarget,
    weeks: WeekSelector,
    coordinator: SessionCoordinator,
    sequence: RequestSequence,
}

impl TimetableView {
    /// Open the view for the signed-in user.
    ///
    /// Teachers default to their own timetable and may not open anyone
    /// else's. Admins must name a target.
    ///
    /// # Errors
    ///
    /// `AuthExpired` when nobody is signed in, `Forbidden` for roles without
    /// timetable access, `Validation` when an admin gives no target.
    pub fn open(
        api: Arc<dyn TimetableApi>,
        auth: AuthContext,
        notifier: Arc<dyn Notifier>,
        config: &TimetableConfig,
        today: NaiveDate,
        target: Option<TimetableTarget>,
    ) -> ClientResult<Self> {
        let viewer = auth.viewer()?;
        let target = resolve_target(viewer, target)?;

        Ok(Self {
            coordinator: SessionCoordinator::new(api.clone(), viewer),
            api,
            auth,
            notifier,
            target,
            weeks: WeekSelector::new(today, config),
            sequence: RequestSequence::default(),
        })
    }

    pub fn viewer(&self) -> Viewer {
        self.coordinator.viewer()
    }

    pub fn target(&self) -> TimetableTarget {
        self.target
    }

    pub fn weeks(&self) -> &WeekSelector {
        &self.weeks
    }

    pub fn selected_week(&self) -> Week {
        self.weeks.selected()
    }

    pub fn sessions(&self) -> &[Session] {
        self.coordinator.sessions()
    }

    pub fn lookups(&self) -> &Lookups {
        self.coordinator.lookups()
    }

    pub fn grid(&self) -> WeekGrid {
        self.coordinator.grid()
    }

    pub fn api(&self) -> &Arc<dyn TimetableApi> {
        &self.api
    }

    /// Query for the current target and week.
    pub fn current_query(&self) -> SessionQuery {
        self.selected_week().query(self.target)
    }

    /// Start a fetch for the current query. Any ticket issued earlier
    /// becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        FetchTicket {
            seq: self.sequence.issue(),
            query: self.current_query(),
        }
    }

    /// Apply a fetch result. Returns `false` when the ticket is stale and the
    /// result was dropped.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, result: ClientResult<Vec<Session>>) -> bool {
        if !self.sequence.is_current(ticket.seq) {
            debug!(seq = ticket.seq, latest = self.sequence.latest, "stale fetch dropped");
            return false;
        }

        match result {
            Ok(sessions) => self.coordinator.replace_all(ticket.query, sessions),
            Err(e) if e.is_empty_result() => self.coordinator.clear(ticket.query),
            Err(e) => {
                self.coordinator.clear(ticket.query);
                self.report(&e);
            }
        }
        true
    }

    /// Fetch the current query and apply it.
    #[instrument(skip(self), fields(week = %self.selected_week()))]
    pub async fn refresh(&mut self) -> bool {
        let ticket = self.begin_fetch();
        let result = load_sessions(self.api.as_ref(), ticket.query()).await;
        self.apply_fetch(ticket, result)
    }

    /// Fetch the pick lists. Failures are reported and leave the previous
    /// lookups in place.
    pub async fn load_lookups(&mut self) -> bool {
        match load_lookups(self.api.as_ref()).await {
            Ok(lookups) => {
                self.coordinator.set_lookups(lookups);
                true
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Switch week by id and reload.
    ///
    /// # Errors
    ///
    /// `NotFound` for an id that is not offered. Nothing is fetched.
    pub async fn select_week(&mut self, id: &str) -> ClientResult<()> {
        self.weeks.select(id)?;
        self.refresh().await;
        Ok(())
    }

    /// Switch target and reload.
    ///
    /// # Errors
    ///
    /// `Forbidden` when a teacher asks for someone else's timetable.
    pub async fn select_target(&mut self, target: TimetableTarget) -> ClientResult<()> {
        self.target = resolve_target(self.viewer(), Some(target))?;
        self.refresh().await;
        Ok(())
    }

    /// Pre-filled create form for a clicked cell.
    ///
    /// The date comes from the selected week; the period, class and teacher
    /// are filled in when they are known.
    ///
    /// # Errors
    ///
    /// `InvalidDayLabel` for Sunday.
    pub fn draft_for(&self, day: Weekday, period_number: u32) -> ClientResult<CreateSessionDto> {
        let date = date_for_day(&self.selected_week(), day)?;
        let (class_id, teacher_id) = match self.target {
            TimetableTarget::Class(id) => (Some(id), None),
            TimetableTarget::Teacher(id) => (None, Some(id)),
        };

        Ok(CreateSessionDto {
            date: Some(date),
            period_id: self
                .lookups()
                .period_by_number(period_number)
                .map(|p| p.period_id),
            class_id,
            teacher_id,
            ..CreateSessionDto::default()
        })
    }

    pub async fn create(&mut self, input: CreateSessionDto) -> Option<CreateOutcome> {
        match self.coordinator.create(input).await {
            Ok(outcome) => {
                self.notifier.notify(Notification::success("Session created"));
                match &outcome {
                    CreateOutcome::Added(_) => {}
                    CreateOutcome::Refetched => self.invalidate_fetches(),
                    CreateOutcome::RefetchFailed(e) => {
                        self.invalidate_fetches();
                        self.report(e);
                    }
                }
                Some(outcome)
            }
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    pub async fn update(&mut self, id: SessionId, patch: UpdateSessionDto) -> Option<UpdateOutcome> {
        match self.coordinator.update(id, patch).await {
            Ok(UpdateOutcome::Unchanged) => Some(UpdateOutcome::Unchanged),
            Ok(outcome) => {
                self.notifier.notify(Notification::success("Session updated"));
                match &outcome {
                    UpdateOutcome::Refetched => self.invalidate_fetches(),
                    UpdateOutcome::RefetchFailed(e) => {
                        self.invalidate_fetches();
                        self.report(e);
                    }
                    UpdateOutcome::Unchanged | UpdateOutcome::Updated(_) => {}
                }
                Some(outcome)
            }
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    pub async fn delete(&mut self, id: SessionId, confirm: &dyn Confirm) -> Option<DeleteOutcome> {
        match self.coordinator.delete(id, confirm).await {
            Ok(DeleteOutcome::Cancelled) => Some(DeleteOutcome::Cancelled),
            Ok(outcome) => {
                self.notifier.notify(Notification::success("Session deleted"));
                Some(outcome)
            }
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    /// The coordinator reloaded the query itself; fetches started before
    /// that must not overwrite it.
    fn invalidate_fetches(&mut self) {
        self.sequence.issue();
    }

    /// Turn an error into exactly one notification.
    fn report(&self, err: &ClientError) {
        if err.is_auth_expired() {
            self.auth.sign_out();
        }
        warn!(error = %err, "timetable operation failed");
        self.notifier.notify(Notification::from(err));
    }
}

fn resolve_target(viewer: Viewer, requested: Option<TimetableTarget>) -> ClientResult<TimetableTarget> {
    match (viewer, requested) {
        (Viewer::Admin, Some(target)) => Ok(target),
        (Viewer::Admin, None) => Err(ClientError::validation("Select a class or teacher")),
        (Viewer::Teacher(own), None) => Ok(TimetableTarget::Teacher(TeacherId::from_uuid(own))),
        (Viewer::Teacher(own), Some(TimetableTarget::Teacher(id))) if id.into_inner() == own => {
            Ok(TimetableTarget::Teacher(id))
        }
        (Viewer::Teacher(_), Some(_)) => Err(ClientError::forbidden(
            "Teachers can only view their own timetable",
        )),
    }
}
