//! Access-token claims.
//!
//! Tokens are signed by the API. The client only reads them to learn who is
//! signed in and in which role; every request is still authorized server-side,
//! so the signature is not checked here.

use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use educonnect_core::ClientError;

/// Role names issued by the EduConnect API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRole {
    Admin,
    Teacher,
    Parent,
    Student,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Teacher => "Teacher",
            UserRole::Parent => "Parent",
            UserRole::Student => "Student",
        }
    }
}

impl FromStr for UserRole {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrator" => Ok(UserRole::Admin),
            "teacher" => Ok(UserRole::Teacher),
            "parent" => Ok(UserRole::Parent),
            "student" => Ok(UserRole::Student),
            other => Err(ClientError::forbidden(format!("Unknown role `{}`", other))),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims carried by an EduConnect access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// User's email address
    #[serde(default)]
    pub email: Option<String>,
    /// Role name, e.g. "Admin" or "Teacher"
    pub role: String,
    /// Teacher record linked to the account, for teacher users
    #[serde(default)]
    pub teacher_id: Option<Uuid>,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    #[serde(default)]
    pub iat: usize,
}

impl Claims {
    pub fn user_role(&self) -> Result<UserRole, ClientError> {
        self.role.parse()
    }

    /// Teacher identity: the explicit claim, else a UUID subject.
    pub fn teacher_uuid(&self) -> Option<Uuid> {
        self.teacher_id.or_else(|| Uuid::parse_str(&self.sub).ok())
    }
}

/// Read the claims of an access token, rejecting expired ones.
///
/// Any token that cannot be used any more is reported as
/// [`ClientError::AuthExpired`] so the user is sent back to sign in.
pub fn decode_claims(token: &str) -> Result<Claims, ClientError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => tracing::info!("access token expired"),
                _ => tracing::warn!(error = %e, "unreadable access token"),
            }
            ClientError::AuthExpired
        })
}
