//! Per-entity CRUD policies.
//!
//! Each entity type gets one [`Policy`]. A policy is a set of pure functions
//! of `(actor, target)`: no I/O, no shared state, no side effects. Apps and
//! teams follow the ownership rule (owner or administrator may modify); user
//! accounts can only be modified by administrators. Reads are public for
//! every type.
//!
//! `delete` is not part of [`Policy`]. It comes from the blanket
//! [`PolicyExt`] impl and always forwards to `update`, so the two rules
//! cannot drift apart.

use crate::action::{Action, Target};
use crate::actor::Actor;
use crate::entity::{EntityType, Owned, Resource};
use crate::error::PolicyError;
use amber_lantern_core::UserId;
use std::fmt;

/// The authorization rules for one entity type.
pub trait Policy: fmt::Debug + Send + Sync {
    /// The entity type this policy governs.
    fn entity_type(&self) -> EntityType;

    /// May `actor` create an instance of this type?
    fn create(&self, actor: &Actor, target: Target<'_>) -> bool;

    /// May `actor` read `target`?
    fn read(&self, actor: &Actor, target: Target<'_>) -> bool;

    /// May `actor` modify `target`?
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidArgument`] when `target` is an instance
    /// of another entity type, or when the rule needs an instance and
    /// `target` is [`Target::NoInstance`].
    fn update(&self, actor: &Actor, target: Target<'_>) -> Result<bool, PolicyError>;
}

/// Operations derived from [`Policy`] for every implementation.
pub trait PolicyExt: Policy {
    /// May `actor` delete `target`? Always the same answer as `update`.
    ///
    /// # Errors
    ///
    /// Same as [`Policy::update`].
    fn delete(&self, actor: &Actor, target: Target<'_>) -> Result<bool, PolicyError> {
        self.update(actor, target)
            .map_err(|e| e.with_action(Action::Delete))
    }

    /// Evaluates `action` against `target`.
    ///
    /// # Errors
    ///
    /// Propagates errors from `update`/`delete`.
    fn decide(
        &self,
        actor: &Actor,
        action: Action,
        target: Target<'_>,
    ) -> Result<bool, PolicyError> {
        match action {
            Action::Create => Ok(self.create(actor, target)),
            Action::Read => Ok(self.read(actor, target)),
            Action::Update => self.update(actor, target),
            Action::Delete => self.delete(actor, target),
        }
    }
}

impl<P: Policy + ?Sized> PolicyExt for P {}

impl PolicyError {
    fn with_action(self, action: Action) -> Self {
        match self {
            Self::InvalidArgument {
                entity_type,
                reason,
                ..
            } => Self::InvalidArgument {
                entity_type,
                action,
                reason,
            },
            other => other,
        }
    }
}

/// Owner-or-administrator check.
///
/// Anonymous actors are refused before the owner is compared, so an absent
/// identity never matches anything.
#[must_use]
pub fn owner_or_admin(actor: &Actor, owner_id: Option<UserId>) -> bool {
    match *actor {
        Actor::Anonymous => false,
        Actor::Authenticated { id, admin } => admin || owner_id == Some(id),
    }
}

/// Typed form of the ownership rule for callers already holding an
/// [`Owned`] record.
#[must_use]
pub fn can_modify<R: Owned + ?Sized>(actor: &Actor, resource: &R) -> bool {
    owner_or_admin(actor, Some(resource.owner_id()))
}

/// The instance in `target`, if any, provided it is of `entity_type`.
pub(crate) fn instance_of<'a>(
    entity_type: EntityType,
    action: Action,
    target: Target<'a>,
) -> Result<Option<&'a Resource>, PolicyError> {
    match target.instance() {
        Some(resource) if resource.entity_type() != entity_type => {
            Err(PolicyError::InvalidArgument {
                entity_type,
                action,
                reason: format!("instance {resource} is not of type {entity_type}"),
            })
        }
        instance => Ok(instance),
    }
}

fn update_owned(
    entity_type: EntityType,
    actor: &Actor,
    target: Target<'_>,
) -> Result<bool, PolicyError> {
    let resource = instance_of(entity_type, Action::Update, target)?.ok_or_else(|| {
        PolicyError::InvalidArgument {
            entity_type,
            action: Action::Update,
            reason: "an instance is required".to_string(),
        }
    })?;
    Ok(owner_or_admin(actor, resource.owner_id()))
}

/// Apps: any signed-in user may create one; owner or admin may modify.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppPolicy;

impl Policy for AppPolicy {
    fn entity_type(&self) -> EntityType {
        EntityType::App
    }

    fn create(&self, actor: &Actor, _target: Target<'_>) -> bool {
        !actor.is_anonymous()
    }

    fn read(&self, _actor: &Actor, _target: Target<'_>) -> bool {
        true
    }

    fn update(&self, actor: &Actor, target: Target<'_>) -> Result<bool, PolicyError> {
        update_owned(EntityType::App, actor, target)
    }
}

/// Teams: same ownership rule as apps.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamPolicy;

impl Policy for TeamPolicy {
    fn entity_type(&self) -> EntityType {
        EntityType::Team
    }

    fn create(&self, actor: &Actor, _target: Target<'_>) -> bool {
        !actor.is_anonymous()
    }

    fn read(&self, _actor: &Actor, _target: Target<'_>) -> bool {
        true
    }

    fn update(&self, actor: &Actor, target: Target<'_>) -> Result<bool, PolicyError> {
        update_owned(EntityType::Team, actor, target)
    }
}

/// User accounts: only administrators may create or modify them.
///
/// There is no self-service path; the account holder gets no rights over
/// their own record through this policy. Which account is targeted does not
/// matter, but the target must be an account if one is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserPolicy;

impl Policy for UserPolicy {
    fn entity_type(&self) -> EntityType {
        EntityType::User
    }

    fn create(&self, actor: &Actor, _target: Target<'_>) -> bool {
        // anonymous actors are never admins
        actor.is_admin()
    }

    fn read(&self, _actor: &Actor, _target: Target<'_>) -> bool {
        true
    }

    fn update(&self, actor: &Actor, target: Target<'_>) -> Result<bool, PolicyError> {
        instance_of(EntityType::User, Action::Update, target)?;
        Ok(self.create(actor, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{App, Resource, Team, User};

    fn app_owned_by(owner: UserId) -> Resource {
        App::new(owner, "survey").into()
    }

    #[test]
    fn anonymous_cannot_create_or_modify_apps() {
        let actor = Actor::anonymous();
        let app = app_owned_by(UserId::new());
        assert!(!AppPolicy.create(&actor, Target::NoInstance));
        assert_eq!(AppPolicy.update(&actor, (&app).into()), Ok(false));
        assert_eq!(AppPolicy.delete(&actor, (&app).into()), Ok(false));
    }

    #[test]
    fn signed_in_user_can_create_apps_and_teams() {
        let actor = Actor::user(UserId::new());
        assert!(AppPolicy.create(&actor, Target::NoInstance));
        assert!(TeamPolicy.create(&actor, Target::NoInstance));
    }

    #[test]
    fn owner_can_modify_own_team() {
        let owner = UserId::new();
        let team: Resource = Team::new(owner, "curators").into();
        let actor = Actor::user(owner);
        assert_eq!(TeamPolicy.update(&actor, (&team).into()), Ok(true));
        assert_eq!(TeamPolicy.delete(&actor, (&team).into()), Ok(true));
    }

    #[test]
    fn stranger_cannot_modify_team() {
        let team: Resource = Team::new(UserId::new(), "curators").into();
        let actor = Actor::user(UserId::new());
        assert_eq!(TeamPolicy.update(&actor, (&team).into()), Ok(false));
        assert_eq!(TeamPolicy.delete(&actor, (&team).into()), Ok(false));
    }

    #[test]
    fn admin_overrides_ownership() {
        let app = app_owned_by(UserId::new());
        let actor = Actor::admin(UserId::new());
        assert_eq!(AppPolicy.update(&actor, (&app).into()), Ok(true));
        assert_eq!(AppPolicy.delete(&actor, (&app).into()), Ok(true));
    }

    #[test]
    fn ownership_update_without_instance_is_invalid() {
        let actor = Actor::admin(UserId::new());
        let err = AppPolicy.update(&actor, Target::NoInstance).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::InvalidArgument {
                entity_type: EntityType::App,
                action: Action::Update,
                ..
            }
        ));
    }

    #[test]
    fn delete_without_instance_reports_delete() {
        let actor = Actor::user(UserId::new());
        let err = TeamPolicy.delete(&actor, Target::NoInstance).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::InvalidArgument {
                entity_type: EntityType::Team,
                action: Action::Delete,
                ..
            }
        ));
    }

    #[test]
    fn owned_policies_reject_instances_of_other_types() {
        let owner = UserId::new();
        let team: Resource = Team::new(owner, "curators").into();
        let account: Resource = User::new(owner, "ada", false).into();

        for (actor, resource) in [(Actor::user(owner), &team), (Actor::admin(owner), &account)] {
            let update = AppPolicy.update(&actor, resource.into()).unwrap_err();
            assert!(matches!(
                update,
                PolicyError::InvalidArgument {
                    entity_type: EntityType::App,
                    action: Action::Update,
                    ..
                }
            ));
            let delete = AppPolicy.delete(&actor, resource.into()).unwrap_err();
            assert!(matches!(
                delete,
                PolicyError::InvalidArgument {
                    entity_type: EntityType::App,
                    action: Action::Delete,
                    ..
                }
            ));
        }

        let app = app_owned_by(owner);
        assert!(TeamPolicy.update(&Actor::user(owner), (&app).into()).is_err());
    }

    #[test]
    fn mismatch_message_names_the_expected_type() {
        let team: Resource = Team::new(UserId::new(), "curators").into();
        let err = AppPolicy
            .update(&Actor::admin(UserId::new()), (&team).into())
            .unwrap_err();
        assert!(err.to_string().ends_with("is not of type app"));
    }

    #[test]
    fn user_policy_rejects_non_account_instances() {
        let app = app_owned_by(UserId::new());
        let admin = Actor::admin(UserId::new());
        assert!(UserPolicy.update(&admin, (&app).into()).is_err());
        assert!(UserPolicy.delete(&admin, (&app).into()).is_err());
    }

    #[test]
    fn user_accounts_are_admin_only() {
        let id = UserId::new();
        let account: Resource = User::new(id, "ada", false).into();
        let admin = Actor::admin(UserId::new());
        let holder = Actor::user(id);

        assert!(UserPolicy.create(&admin, Target::NoInstance));
        assert_eq!(UserPolicy.update(&admin, (&account).into()), Ok(true));
        assert_eq!(UserPolicy.delete(&admin, Target::NoInstance), Ok(true));

        // not even the account holder
        assert!(!UserPolicy.create(&holder, Target::NoInstance));
        assert_eq!(UserPolicy.update(&holder, (&account).into()), Ok(false));
        assert_eq!(UserPolicy.delete(&holder, (&account).into()), Ok(false));

        assert!(!UserPolicy.create(&Actor::anonymous(), Target::NoInstance));
    }

    #[test]
    fn reads_are_public() {
        let anonymous = Actor::anonymous();
        let app = app_owned_by(UserId::new());
        assert!(AppPolicy.read(&anonymous, Target::NoInstance));
        assert!(AppPolicy.read(&anonymous, (&app).into()));
        assert!(TeamPolicy.read(&anonymous, Target::NoInstance));
        assert!(UserPolicy.read(&anonymous, Target::NoInstance));
    }

    #[test]
    fn decide_dispatches_every_action() {
        let owner = UserId::new();
        let app = app_owned_by(owner);
        let policy: &dyn Policy = &AppPolicy;
        let stranger = Actor::user(UserId::new());

        assert_eq!(policy.decide(&stranger, Action::Create, Target::NoInstance), Ok(true));
        assert_eq!(policy.decide(&stranger, Action::Read, (&app).into()), Ok(true));
        assert_eq!(policy.decide(&stranger, Action::Update, (&app).into()), Ok(false));
        assert_eq!(policy.decide(&stranger, Action::Delete, (&app).into()), Ok(false));
        assert_eq!(
            policy.decide(&Actor::user(owner), Action::Delete, (&app).into()),
            Ok(true)
        );
    }

    #[test]
    fn can_modify_checks_typed_records() {
        let owner = UserId::new();
        let app = App::new(owner, "survey");
        assert!(can_modify(&Actor::user(owner), &app));
        assert!(!can_modify(&Actor::user(UserId::new()), &app));
        assert!(!can_modify(&Actor::anonymous(), &app));
    }

    #[test]
    fn policies_report_their_entity_type() {
        assert_eq!(AppPolicy.entity_type(), EntityType::App);
        assert_eq!(TeamPolicy.entity_type(), EntityType::Team);
        assert_eq!(UserPolicy.entity_type(), EntityType::User);
    }
}
