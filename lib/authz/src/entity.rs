//! Entity descriptors the policies reason about.
//!
//! Only the attributes authorization looks at live here: who owns a
//! resource, and which account holds the administrator flag. Everything
//! else belongs to the persistence layer that loads these records.

use crate::error::ConfigurationError;
use amber_lantern_core::{AppId, TeamId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of resource a policy can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    /// Apps, owned by their creator.
    App,
    /// Teams, owned by their creator.
    Team,
    /// User account records.
    User,
}

impl EntityType {
    /// Every entity type, in registry order.
    pub const ALL: [Self; 3] = [Self::App, Self::Team, Self::User];

    /// The name used in configuration and log fields.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Team => "team",
            Self::User => "user",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ConfigurationError::UnknownEntityType {
                name: name.to_string(),
            })
    }
}

/// A resource with exactly one owning user.
pub trait Owned {
    /// The user who owns the resource. Fixed at creation.
    fn owner_id(&self) -> UserId;
}

/// An app, owned by the user who created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    id: AppId,
    owner_id: UserId,
    name: String,
}

impl App {
    /// Creates a new app owned by `owner_id`.
    #[must_use]
    pub fn new(owner_id: UserId, name: impl Into<String>) -> Self {
        Self::with_all_fields(AppId::new(), owner_id, name)
    }

    /// Rebuilds an app loaded from storage.
    #[must_use]
    pub fn with_all_fields(id: AppId, owner_id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            owner_id,
            name: name.into(),
        }
    }

    /// Returns the app's id.
    #[must_use]
    pub fn id(&self) -> AppId {
        self.id
    }

    /// Returns the app's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Owned for App {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// A team, owned by the user who created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    owner_id: UserId,
    name: String,
}

impl Team {
    /// Creates a new team owned by `owner_id`.
    #[must_use]
    pub fn new(owner_id: UserId, name: impl Into<String>) -> Self {
        Self::with_all_fields(TeamId::new(), owner_id, name)
    }

    /// Rebuilds a team loaded from storage.
    #[must_use]
    pub fn with_all_fields(id: TeamId, owner_id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            owner_id,
            name: name.into(),
        }
    }

    /// Returns the team's id.
    #[must_use]
    pub fn id(&self) -> TeamId {
        self.id
    }

    /// Returns the team's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Owned for Team {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}

/// A user account record.
///
/// Accounts are not [`Owned`]: not even the account holder owns the record
/// in the policy sense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    admin: bool,
}

impl User {
    /// Creates an account record for the user `id`.
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, admin: bool) -> Self {
        Self {
            id,
            name: name.into(),
            admin,
        }
    }

    /// Returns the account's user id.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Returns the account's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the account holds the administrator flag.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.admin
    }
}

/// A loaded resource instance of any registered entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Resource {
    /// An app record.
    App(App),
    /// A team record.
    Team(Team),
    /// A user account record.
    User(User),
}

impl Resource {
    /// The entity type of the wrapped record.
    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::App(_) => EntityType::App,
            Self::Team(_) => EntityType::Team,
            Self::User(_) => EntityType::User,
        }
    }

    /// Owner of the resource; `None` for user accounts.
    #[must_use]
    pub fn owner_id(&self) -> Option<UserId> {
        match self {
            Self::App(app) => Some(app.owner_id()),
            Self::Team(team) => Some(team.owner_id()),
            Self::User(_) => None,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::App(app) => write!(f, "app:{}", app.id()),
            Self::Team(team) => write!(f, "team:{}", team.id()),
            Self::User(user) => write!(f, "user:{}", user.id()),
        }
    }
}

impl From<App> for Resource {
    fn from(app: App) -> Self {
        Self::App(app)
    }
}

impl From<Team> for Resource {
    fn from(team: Team) -> Self {
        Self::Team(team)
    }
}

impl From<User> for Resource {
    fn from(user: User) -> Self {
        Self::User(user)
    }
}
