//! # EduConnect Auth
//!
//! The authenticated-session context shared by every timetable view.
//!
//! This crate does not log anyone in. It receives an access token issued by
//! the EduConnect API and provides:
//!
//! - [`claims`]: the token's claim structure and the [`UserRole`] it names
//! - [`context`]: [`AuthContext`], the process-wide signed-in session with
//!   explicit `sign_in`/`sign_out`, and the [`Viewer`] capability variant
//!
//! # Example
//!
//! ```ignore
//! use educonnect_auth::AuthContext;
//!
//! let auth = AuthContext::new();
//! auth.sign_in(&token)?;
//! let viewer = auth.viewer()?;
//! if viewer.can_manage_sessions() {
//!     // show the add/delete controls
//! }
//! auth.sign_out();
//! ```

pub mod claims;
pub mod context;

// Re-export commonly used types at crate root
pub use claims::{Claims, UserRole, decode_claims};
pub use context::{AuthContext, AuthSession, Viewer};
