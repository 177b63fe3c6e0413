//! Shared building blocks for the amber-lantern crates.
//!
//! Holds the strongly typed identifiers for users, apps and teams, and the
//! rootcause-backed `Result` alias the other crates return at their public
//! boundaries.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{AppId, ParseIdError, TeamId, TypedId, UserId};
