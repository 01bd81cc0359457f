//! Create, update and delete of sessions against the API, keeping the local
//! session list consistent with what the server accepted.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use educonnect_auth::Viewer;
use educonnect_core::{ClientError, ClientResult};
use educonnect_models::{
    CreateSessionDto, Lookups, Session, SessionId, SessionQuery, UpdateSessionDto,
};

use crate::api::{Created, TimetableApi, load_sessions};
use crate::notifications::Confirm;

use super::grid::{WeekGrid, build_grid};
use super::week::Week;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The new record. It is appended locally only when its date falls
    /// inside the current query.
    Added(Session),
    /// The API gave nothing to build a record from; the query was reloaded.
    Refetched,
    /// The session was created but reloading the query failed. The local
    /// list is left as it was.
    RefetchFailed(ClientError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Nothing differed from the stored record. No request was sent.
    Unchanged,
    Updated(Session),
    /// Accepted, but the new slot could not be resolved locally; the query
    /// was reloaded.
    Refetched,
    /// Accepted, but reloading the query failed.
    RefetchFailed(ClientError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined. No request was sent.
    Cancelled,
    Deleted(Session),
}

/// Owns the session list of the current query.
pub struct SessionCoordinator {
    api: Arc<dyn TimetableApi>,
    viewer: Viewer,
    query: Option<SessionQuery>,
    sessions: Vec<Session>,
    lookups: Lookups,
}

impl SessionCoordinator {
    pub fn new(api: Arc<dyn TimetableApi>, viewer: Viewer) -> Self {
        Self {
            api,
            viewer,
            query: None,
            sessions: Vec::new(),
            lookups: Lookups::default(),
        }
    }

    pub fn viewer(&self) -> Viewer {
        self.viewer
    }

    pub fn query(&self) -> Option<&SessionQuery> {
        self.query.as_ref()
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.session_id == id)
    }

    pub fn lookups(&self) -> &Lookups {
        &self.lookups
    }

    pub fn set_lookups(&mut self, lookups: Lookups) {
        self.lookups = lookups;
    }

    /// The grid for the current sessions, rebuilt on every call.
    pub fn grid(&self) -> WeekGrid {
        build_grid(&self.sessions)
    }

    /// Replace the whole cache with a fresh fetch result.
    pub fn replace_all(&mut self, query: SessionQuery, sessions: Vec<Session>) {
        debug!(count = sessions.len(), "session cache replaced");
        self.query = Some(query);
        self.sessions = sessions;
    }

    pub fn clear(&mut self, query: SessionQuery) {
        self.replace_all(query, Vec::new());
    }

    /// Reload the current query. Does nothing before the first fetch.
    pub async fn refetch(&mut self) -> ClientResult<()> {
        let Some(query) = self.query else {
            return Ok(());
        };
        let sessions = load_sessions(self.api.as_ref(), &query).await?;
        self.replace_all(query, sessions);
        Ok(())
    }

    /// Create a session and append it locally.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admins and `Validation` for incomplete input, both
    /// before any request is sent. Remote failures leave the list untouched.
    #[instrument(skip(self, input), fields(date = ?input.date, period = ?input.period_id))]
    pub async fn create(&mut self, input: CreateSessionDto) -> ClientResult<CreateOutcome> {
        if !self.viewer.can_manage_sessions() {
            return Err(ClientError::forbidden(
                "Only administrators can create sessions",
            ));
        }
        let dto = input.prepare()?;

        let created = self.api.create_session(&dto).await?;
        let session = match created {
            Created::Session(session) => Some(session),
            Created::Id(id) => dto.to_session(id, &self.lookups),
            Created::Acknowledged => None,
        };

        match session {
            Some(session) => {
                info!(session.id = %session.session_id, "session created");
                if self.in_query(&session) {
                    self.sessions.push(session.clone());
                }
                Ok(CreateOutcome::Added(session))
            }
            None => {
                info!("session created without a record, reloading");
                Ok(match self.refetch().await {
                    Ok(()) => CreateOutcome::Refetched,
                    Err(e) => {
                        warn!(error = %e, "reload after create failed");
                        CreateOutcome::RefetchFailed(e)
                    }
                })
            }
        }
    }

    /// Update a session in place. A session moved out of the current
    /// query's dates is dropped from the local list.
    ///
    /// # Errors
    ///
    /// `NotFound` when `id` is not in the local list, `Forbidden` when the
    /// viewer may not edit it, `Validation` for a blank lesson.
    #[instrument(skip(self, patch), fields(session.id = %id))]
    pub async fn update(
        &mut self,
        id: SessionId,
        patch: UpdateSessionDto,
    ) -> ClientResult<UpdateOutcome> {
        let index = self.position(id)?;
        let original = &self.sessions[index];

        if !self.viewer.can_edit_session(original.teacher_id.into_inner())
            || !self.viewer.can_edit_session(patch.teacher_id.into_inner())
        {
            return Err(ClientError::forbidden(
                "You can only edit sessions you teach",
            ));
        }

        if !patch.differs_from(original) {
            debug!("no changes, skipping update");
            return Ok(UpdateOutcome::Unchanged);
        }
        let dto = patch.prepare()?;

        let returned = self.api.update_session(id, &dto).await?;

        match returned {
            Some(session) => {
                self.store_updated(index, session.clone());
                Ok(UpdateOutcome::Updated(session))
            }
            None => {
                let mut patched = self.sessions[index].clone();
                if patched.apply_update(&dto, &self.lookups) {
                    self.store_updated(index, patched.clone());
                    Ok(UpdateOutcome::Updated(patched))
                } else {
                    warn!(period = %dto.period_id, "unknown period after update, reloading");
                    Ok(match self.refetch().await {
                        Ok(()) => UpdateOutcome::Refetched,
                        Err(e) => {
                            warn!(error = %e, "reload after update failed");
                            UpdateOutcome::RefetchFailed(e)
                        }
                    })
                }
            }
        }
    }

    /// Delete a session after the user confirms.
    ///
    /// # Errors
    ///
    /// `NotFound` when `id` is not in the local list, `Forbidden` for
    /// non-admins. Both are raised before asking.
    #[instrument(skip(self, confirm), fields(session.id = %id))]
    pub async fn delete(&mut self, id: SessionId, confirm: &dyn Confirm) -> ClientResult<DeleteOutcome> {
        let index = self.position(id)?;
        if !self.viewer.can_manage_sessions() {
            return Err(ClientError::forbidden(
                "Only administrators can delete sessions",
            ));
        }

        if !confirm.confirm(&delete_prompt(&self.sessions[index])) {
            debug!("delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        self.api.delete_session(id).await?;

        let removed = self.sessions.remove(index);
        info!("session deleted");
        Ok(DeleteOutcome::Deleted(removed))
    }

    /// Whether `session` falls in the week being shown. A Sunday counts
    /// toward the week that just ended.
    fn in_query(&self, session: &Session) -> bool {
        self.query
            .is_none_or(|q| Week::containing(session.date).start() == q.from)
    }

    fn store_updated(&mut self, index: usize, session: Session) {
        info!("session updated");
        if self.in_query(&session) {
            self.sessions[index] = session;
        } else {
            debug!(date = %session.date, "session moved out of the current week");
            self.sessions.remove(index);
        }
    }

    fn position(&self, id: SessionId) -> ClientResult<usize> {
        self.sessions
            .iter()
            .position(|s| s.session_id == id)
            .ok_or_else(|| ClientError::not_found("Session", id))
    }
}

fn delete_prompt(session: &Session) -> String {
    let subject = if session.subject_name.is_empty() {
        "this session"
    } else {
        session.subject_name.as_str()
    };
    let class = if session.class_name.is_empty() {
        String::new()
    } else {
        format!(" for {}", session.class_name)
    };
    format!(
        "Delete {}{} on {} (period {})?",
        subject, class, session.date, session.period_number
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use educonnect_models::{ClassId, PeriodId, SubjectId, TeacherId};

    fn session() -> Session {
        Session {
            session_id: SessionId::from_u128(1),
            date: NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(),
            period_id: PeriodId::from_u128(1),
            period_number: 2,
            class_id: ClassId::from_u128(10),
            class_name: "10A".into(),
            subject_id: SubjectId::from_u128(20),
            subject_name: "Mathematics".into(),
            teacher_id: TeacherId::from_u128(30),
            teacher_name: "Ada Lovelace".into(),
            lesson_content: String::new(),
            behavior_note: None,
            absent_count: 0,
        }
    }

    #[test]
    fn test_delete_prompt_names_the_session() {
        assert_eq!(
            delete_prompt(&session()),
            "Delete Mathematics for 10A on 2024-06-04 (period 2)?"
        );
    }

    #[test]
    fn test_delete_prompt_without_names() {
        let bare = Session {
            subject_name: String::new(),
            class_name: String::new(),
            ..session()
        };
        assert_eq!(
            delete_prompt(&bare),
            "Delete this session on 2024-06-04 (period 2)?"
        );
    }
}
