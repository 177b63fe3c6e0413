//! Policy engine error types.
//!
//! Errors are designed for layered context using rootcause:
//! - `PolicyError`: a decision could not be evaluated (malformed call)
//! - `ConfigurationError`: the registry could not be assembled at startup
//! - `AuthorizationError`: the outcome of an enforced check

use crate::action::Action;
use crate::entity::EntityType;
use amber_lantern_core::UserId;
use std::fmt;

/// Errors raised while evaluating a policy decision.
///
/// None of these are denials. A denial is `Ok(false)`; these mean the caller
/// asked a question the engine cannot answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// No policy is registered for the entity type.
    NotRegistered {
        /// The entity type that was looked up.
        entity_type: EntityType,
    },
    /// The call was malformed, e.g. an update without an instance.
    InvalidArgument {
        /// The entity type whose policy was asked.
        entity_type: EntityType,
        /// The action that was attempted.
        action: Action,
        /// What was wrong with the call.
        reason: String,
    },
    /// The action name is not one of create/read/update/delete.
    UnknownAction {
        /// The name that failed to parse.
        name: String,
    },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRegistered { entity_type } => {
                write!(f, "no policy registered for entity type '{entity_type}'")
            }
            Self::InvalidArgument {
                entity_type,
                action,
                reason,
            } => {
                write!(f, "invalid argument to {entity_type}.{action}: {reason}")
            }
            Self::UnknownAction { name } => write!(f, "unknown action '{name}'"),
        }
    }
}

impl std::error::Error for PolicyError {}

/// Errors from assembling the policy registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A configured entity type name matches no known entity type.
    UnknownEntityType {
        /// The configured name.
        name: String,
    },
    /// Two policies were registered for the same entity type.
    DuplicatePolicy {
        /// The entity type registered twice.
        entity_type: EntityType,
    },
    /// Configuration could not be loaded or deserialized.
    LoadFailed {
        /// Error details.
        details: String,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEntityType { name } => write!(f, "unknown entity type '{name}'"),
            Self::DuplicatePolicy { entity_type } => {
                write!(f, "a policy for '{entity_type}' is already registered")
            }
            Self::LoadFailed { details } => {
                write!(f, "failed to load authorization config: {details}")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Outcome of an enforced authorization check that did not allow the action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// Denied, and the caller has no authenticated identity.
    NotAuthenticated,
    /// Denied for an authenticated user.
    PermissionDenied {
        /// The denied user.
        user_id: UserId,
        /// The action that was refused.
        action: Action,
        /// The resource, as `type:id`, or the bare type without an instance.
        resource: String,
    },
    /// The check itself could not be evaluated.
    CheckFailed {
        /// Why the check failed.
        reason: String,
    },
}

impl AuthorizationError {
    /// HTTP status the request layer should answer with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotAuthenticated => 401,
            Self::PermissionDenied { .. } => 403,
            Self::CheckFailed { .. } => 500,
        }
    }
}

impl fmt::Display for AuthorizationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "user is not authenticated"),
            Self::PermissionDenied {
                user_id,
                action,
                resource,
            } => {
                write!(f, "user {user_id} lacks permission to {action} {resource}")
            }
            Self::CheckFailed { reason } => {
                write!(f, "authorization check failed: {reason}")
            }
        }
    }
}

impl std::error::Error for AuthorizationError {}
