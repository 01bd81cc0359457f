//! Error taxonomy for timetable operations.
//!
//! Every failure a view can observe is one of these variants. Validation
//! problems are raised before any request is made; everything that came back
//! from the API is a [`ClientError::Remote`], except 401 and 403 which have
//! their own variants.

use std::fmt;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// The user-initiated operation a remote failure belongs to.
///
/// Used to pick a readable fallback message when the API body carries none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchSessions,
    FetchLookups,
    CreateSession,
    UpdateSession,
    DeleteSession,
}

impl Operation {
    /// Message shown to the user when the API gave no explanation.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::FetchSessions => "Failed to load the timetable",
            Operation::FetchLookups => "Failed to load classes, teachers, subjects or periods",
            Operation::CreateSession => "Failed to create the session",
            Operation::UpdateSession => "Failed to update the session",
            Operation::DeleteSession => "Failed to delete the session",
        }
    }

    /// Stable name used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::FetchSessions => "fetch_sessions",
            Operation::FetchLookups => "fetch_lookups",
            Operation::CreateSession => "create_session",
            Operation::UpdateSession => "update_session",
            Operation::DeleteSession => "delete_session",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for timetable client operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// A required field is missing or invalid. Never reaches the network.
    #[error("{0}")]
    Validation(String),

    /// The referenced entity is not in local state.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The API rejected the request or could not be reached.
    ///
    /// `status` is `None` for transport failures.
    #[error("{message}")]
    Remote {
        operation: Operation,
        status: Option<u16>,
        message: String,
    },

    /// The API answered 401.
    #[error("Your session has expired, please sign in again")]
    AuthExpired,

    /// The API answered 403 or the viewer lacks the capability.
    #[error("{0}")]
    Forbidden(String),

    /// A day label outside Monday..Saturday reached the day mapping.
    #[error("Invalid teaching day: {0}")]
    InvalidDayLabel(String),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    /// Build a remote error, falling back to the operation's generic message
    /// when the API body had none (or an empty one).
    pub fn remote(operation: Operation, status: Option<u16>, message: Option<String>) -> Self {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| operation.fallback_message().to_string());

        Self::Remote {
            operation,
            status,
            message,
        }
    }

    /// HTTP status of a remote failure, if there was a response at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Remote { status, .. } => *status,
            ClientError::AuthExpired => Some(401),
            _ => None,
        }
    }

    /// A 404 or 400 on a session fetch means "nothing scheduled this week".
    pub fn is_empty_result(&self) -> bool {
        matches!(
            self,
            ClientError::Remote {
                operation: Operation::FetchSessions,
                status: Some(400 | 404),
                ..
            }
        )
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ClientError::AuthExpired)
    }
}
