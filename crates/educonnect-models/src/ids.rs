//! Strongly-typed ID newtypes for timetable entities.
//!
//! Each entity gets its own wrapper around `Uuid`, so a `ClassId` can never be
//! passed where a `TeacherId` is expected.
//!
//! # Example
//!
//! ```ignore
//! use educonnect_models::ids::{ClassId, TeacherId};
//!
//! fn class_timetable(id: ClassId) { /* ... */ }
//!
//! let class_id = ClassId::new();
//! class_timetable(class_id);        // OK
//! // class_timetable(TeacherId::new()); // Compile error! Type mismatch.
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Macro to define a strongly-typed ID newtype.
///
/// Serializes transparently as the UUID string the API uses.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random ID.
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an ID from an existing UUID.
            #[inline]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Create an ID from a u128 value (useful for fixtures).
            #[inline]
            pub const fn from_u128(v: u128) -> Self {
                Self(Uuid::from_u128(v))
            }

            /// Get the inner UUID value.
            #[inline]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            #[inline]
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            #[inline]
            fn from(id: $name) -> Uuid {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }
    };
}

define_id!(
    /// Strongly-typed ID for a scheduled lesson occurrence.
    SessionId
);

define_id!(
    /// Strongly-typed ID for a teaching period (time slot).
    PeriodId
);

define_id!(
    /// Strongly-typed ID for a class (homeroom group).
    ClassId
);

define_id!(
    /// Strongly-typed ID for a subject.
    SubjectId
);

define_id!(
    /// Strongly-typed ID for a teacher.
    TeacherId
);
