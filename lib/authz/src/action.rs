//! What is being attempted, and on which instance.

use crate::entity::Resource;
use crate::error::PolicyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A CRUD operation an actor attempts on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Create a new instance.
    Create,
    /// View an instance, or list instances.
    Read,
    /// Modify an existing instance.
    Update,
    /// Remove an existing instance.
    Delete,
}

impl Action {
    /// Every action, in CRUD order.
    pub const ALL: [Self; 4] = [Self::Create, Self::Read, Self::Update, Self::Delete];

    /// Returns the lowercase action name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Returns true for every action except `Read`.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::Read)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| PolicyError::UnknownAction {
                name: s.to_string(),
            })
    }
}

/// The instance an operation applies to.
///
/// `NoInstance` asks about the type as a whole ("may this actor create any
/// app?"); `Instance` asks about one loaded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target<'a> {
    /// The operation is about the type, not a particular record.
    #[default]
    NoInstance,
    /// The operation is about this loaded record.
    Instance(&'a Resource),
}

impl<'a> Target<'a> {
    /// Returns the record, if the target has one.
    #[must_use]
    pub fn instance(&self) -> Option<&'a Resource> {
        match *self {
            Self::NoInstance => None,
            Self::Instance(resource) => Some(resource),
        }
    }
}

impl<'a> From<&'a Resource> for Target<'a> {
    fn from(resource: &'a Resource) -> Self {
        Self::Instance(resource)
    }
}

impl<'a> From<Option<&'a Resource>> for Target<'a> {
    fn from(resource: Option<&'a Resource>) -> Self {
        resource.map_or(Self::NoInstance, Self::Instance)
    }
}

impl fmt::Display for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoInstance => f.write_str("<no instance>"),
            Self::Instance(resource) => write!(f, "{resource}"),
        }
    }
}
