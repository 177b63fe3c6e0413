//! The identity a decision is made for.

use amber_lantern_core::UserId;
use serde::{Deserialize, Serialize};

/// Who is performing an action.
///
/// Built once per inbound call by the identity layer and passed by reference
/// into every policy operation. An unauthenticated call is still an actor,
/// just [`Actor::Anonymous`]. An anonymous actor has no id and can never be
/// an administrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Actor {
    /// No authenticated identity is attached to the call.
    #[default]
    Anonymous,
    /// A signed-in user.
    Authenticated {
        /// The user's account id.
        id: UserId,
        /// Whether the user holds the platform administrator flag.
        admin: bool,
    },
}

impl Actor {
    /// An actor with no authenticated identity.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self::Anonymous
    }

    /// A signed-in user without administrator rights.
    #[must_use]
    pub const fn user(id: UserId) -> Self {
        Self::Authenticated { id, admin: false }
    }

    /// A signed-in administrator.
    #[must_use]
    pub const fn admin(id: UserId) -> Self {
        Self::Authenticated { id, admin: true }
    }

    /// Returns true if no identity is attached to the call.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// The account id, or `None` for an anonymous actor.
    #[must_use]
    pub const fn id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { id, .. } => Some(*id),
        }
    }

    /// Returns true for a signed-in administrator; never for an anonymous
    /// actor.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Authenticated { admin: true, .. })
    }
}
