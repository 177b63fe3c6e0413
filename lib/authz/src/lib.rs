//! CRUD authorization for amber-lantern.
//!
//! Every read or mutation of an app, team or user account is checked here
//! first. The request layer resolves the actor and loads the resource, then
//! asks the [`PolicyRegistry`] whether the action is allowed. Decisions are
//! pure functions of `(actor, action, target)`.
//!
//! # Rules
//!
//! | entity | create | read | update / delete |
//! |--------|--------|------|-----------------|
//! | app, team | any signed-in user | everyone | owner or admin |
//! | user | admin | everyone | admin |
//!
//! # Example
//!
//! ```
//! use amber_lantern_authz::{Action, Actor, App, EntityType, PolicyRegistry, Resource, Target};
//! use amber_lantern_core::UserId;
//!
//! let registry = PolicyRegistry::with_defaults();
//! let owner = UserId::new();
//! let app = Resource::from(App::new(owner, "survey"));
//!
//! let allowed = registry
//!     .is_authorized(&Actor::user(owner), Action::Update, EntityType::App, (&app).into())
//!     .expect("well-formed check");
//! assert!(allowed);
//!
//! let allowed = registry
//!     .is_authorized(&Actor::anonymous(), Action::Create, EntityType::App, Target::NoInstance)
//!     .expect("well-formed check");
//! assert!(!allowed);
//! ```

pub mod action;
pub mod actor;
pub mod config;
pub mod entity;
pub mod error;
pub mod policy;
pub mod registry;

pub use action::{Action, Target};
pub use actor::Actor;
pub use config::AuthzConfig;
pub use entity::{App, EntityType, Owned, Resource, Team, User};
pub use error::{AuthorizationError, ConfigurationError, PolicyError};
pub use policy::{
    AppPolicy, Policy, PolicyExt, TeamPolicy, UserPolicy, can_modify, owner_or_admin,
};
pub use registry::{PolicyRegistry, default_policy};
