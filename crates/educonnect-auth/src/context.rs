//! Process-wide authenticated session.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use educonnect_core::ClientError;

use crate::claims::{Claims, UserRole, decode_claims};

/// Who is looking at a timetable, resolved once when a view is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// Manages every class timetable.
    Admin,
    /// Sees their own schedule and may edit their own sessions.
    Teacher(Uuid),
}

impl Viewer {
    /// Resolve the viewer from token claims. Roles without timetable
    /// access are rejected.
    pub fn from_claims(claims: &Claims) -> Result<Self, ClientError> {
        match claims.user_role()? {
            UserRole::Admin => Ok(Viewer::Admin),
            UserRole::Teacher => claims
                .teacher_uuid()
                .map(Viewer::Teacher)
                .ok_or_else(|| ClientError::forbidden("Teacher account is not linked to a teacher")),
            role => Err(ClientError::forbidden(format!(
                "{} accounts cannot manage timetables",
                role
            ))),
        }
    }

    /// Create and delete are admin-only.
    pub fn can_manage_sessions(&self) -> bool {
        matches!(self, Viewer::Admin)
    }

    /// Admins edit anything; teachers only sessions they teach.
    pub fn can_edit_session(&self, teacher_id: Uuid) -> bool {
        match self {
            Viewer::Admin => true,
            Viewer::Teacher(own) => *own == teacher_id,
        }
    }

    pub fn teacher_id(&self) -> Option<Uuid> {
        match self {
            Viewer::Admin => None,
            Viewer::Teacher(id) => Some(*id),
        }
    }
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub claims: Claims,
}

impl AuthSession {
    pub fn viewer(&self) -> Result<Viewer, ClientError> {
        Viewer::from_claims(&self.claims)
    }
}

/// Shared handle to the current authenticated session.
///
/// Cloning is cheap; every clone sees the same session. `sign_in` and
/// `sign_out` are the only writers.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    inner: Arc<RwLock<Option<AuthSession>>>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `token` and make it the current session, replacing any other.
    pub fn sign_in(&self, token: &str) -> Result<AuthSession, ClientError> {
        let token = token.trim();
        let claims = decode_claims(token)?;
        let session = AuthSession {
            token: token.to_string(),
            claims,
        };

        tracing::info!(user = %session.claims.sub, role = %session.claims.role, "signed in");
        *self.write() = Some(session.clone());
        Ok(session)
    }

    /// Drop the current session. Safe to call when nobody is signed in.
    pub fn sign_out(&self) {
        if self.write().take().is_some() {
            tracing::info!("signed out");
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.read().is_some()
    }

    pub fn session(&self) -> Option<AuthSession> {
        self.read().clone()
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    /// The signed-in viewer, or `AuthExpired` when nobody is signed in.
    pub fn viewer(&self) -> Result<Viewer, ClientError> {
        self.read()
            .as_ref()
            .ok_or(ClientError::AuthExpired)?
            .viewer()
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<AuthSession>> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<AuthSession>> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
