//! Typed identifiers for accounts and the resources they own.
//!
//! Each id wraps a ULID and renders as `<prefix>_<ulid>`, so an app id can
//! never be handed to something expecting a user id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

/// Returned when a string is not a valid identifier of the requested kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// Name of the id type being parsed.
    pub id_type: &'static str,
    /// Why parsing failed.
    pub reason: String,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {}: {}", self.id_type, self.reason)
    }
}

impl std::error::Error for ParseIdError {}

/// Behavior shared by the ULID-backed id newtypes.
///
/// The text form is `<PREFIX>_<ulid>`.
pub trait TypedId: Copy + From<Ulid> + Into<Ulid> {
    /// Rendered before the underscore, e.g. `usr`.
    const PREFIX: &'static str;
    /// Type name reported in [`ParseIdError`].
    const NAME: &'static str;
}

fn format_id<T: TypedId>(id: T, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}_{}", T::PREFIX, Into::<Ulid>::into(id))
}

/// Accepts `<PREFIX>_<ulid>` or a bare ULID. A prefix belonging to another
/// id type is an error rather than a ULID decode failure.
fn parse_id<T: TypedId>(s: &str) -> Result<T, ParseIdError> {
    let invalid = |reason: String| ParseIdError {
        id_type: T::NAME,
        reason,
    };

    // Crockford base32 has no '_', so the first one ends the prefix.
    let raw = match s.split_once('_') {
        Some((prefix, rest)) if prefix == T::PREFIX => rest,
        Some((prefix, _)) => {
            return Err(invalid(format!(
                "expected prefix '{}', found '{prefix}'",
                T::PREFIX
            )));
        }
        None => s,
    };

    Ulid::from_str(raw)
        .map(T::from)
        .map_err(|e| invalid(e.to_string()))
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident => $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Ulid);

        impl TypedId for $name {
            const PREFIX: &'static str = $prefix;
            const NAME: &'static str = stringify!($name);
        }

        impl $name {
            /// Generates a fresh id.
            #[must_use]
            pub fn new() -> Self {
                Self(Ulid::new())
            }

            /// Wraps an existing ULID, e.g. one loaded from storage.
            #[must_use]
            pub const fn from_ulid(ulid: Ulid) -> Self {
                Self(ulid)
            }

            #[must_use]
            pub const fn as_ulid(&self) -> Ulid {
                self.0
            }
        }

        impl From<Ulid> for $name {
            fn from(ulid: Ulid) -> Self {
                Self(ulid)
            }
        }

        impl From<$name> for Ulid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                format_id(*self, f)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_id(s)
            }
        }
    };
}

define_id!(
    /// Identifies a user account; also the identity of an authenticated actor.
    UserId => "usr"
);

define_id!(
    /// Identifies an app.
    AppId => "app"
);

define_id!(
    /// Identifies a team.
    TeamId => "team"
);
