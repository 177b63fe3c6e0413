//! Entity type to policy dispatch.
//!
//! The registry is assembled once at startup and is read-only afterwards,
//! so it can be shared between request handlers behind an `Arc` without
//! any locking.

use crate::action::{Action, Target};
use crate::actor::Actor;
use crate::config::AuthzConfig;
use crate::entity::EntityType;
use crate::error::{AuthorizationError, ConfigurationError, PolicyError};
use crate::policy::{AppPolicy, Policy, PolicyExt, TeamPolicy, UserPolicy, instance_of};
use rootcause::Report;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Maps each entity type to the policy that governs it.
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    policies: HashMap<EntityType, Arc<dyn Policy>>,
}

/// The built-in policy for an entity type.
#[must_use]
pub fn default_policy(entity_type: EntityType) -> Arc<dyn Policy> {
    match entity_type {
        EntityType::App => Arc::new(AppPolicy),
        EntityType::Team => Arc::new(TeamPolicy),
        EntityType::User => Arc::new(UserPolicy),
    }
}

impl PolicyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in policy for every entity type.
    #[must_use]
    pub fn with_defaults() -> Self {
        let policies = EntityType::ALL
            .into_iter()
            .map(|t| (t, default_policy(t)))
            .collect();
        Self { policies }
    }

    /// Builds a registry for the entity types named in `config`.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown or repeated entity type name, so a bad
    /// configuration stops the application at startup instead of surfacing
    /// per request.
    pub fn from_config(config: &AuthzConfig) -> Result<Self, Report<ConfigurationError>> {
        let mut registry = Self::new();
        for name in &config.entity_types {
            let entity_type: EntityType = name.parse()?;
            registry.register_shared(default_policy(entity_type))?;
        }

        info!(
            entity_types = ?registry.registered(),
            "policy registry built"
        );
        Ok(registry)
    }

    /// Registers `policy` under its own entity type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicatePolicy`] if the entity type
    /// already has a policy.
    pub fn register<P: Policy + 'static>(
        &mut self,
        policy: P,
    ) -> Result<(), Report<ConfigurationError>> {
        self.register_shared(Arc::new(policy))
    }

    /// Registers an already shared policy under its own entity type.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::DuplicatePolicy`] if the entity type
    /// already has a policy.
    pub fn register_shared(
        &mut self,
        policy: Arc<dyn Policy>,
    ) -> Result<(), Report<ConfigurationError>> {
        let entity_type = policy.entity_type();
        match self.policies.entry(entity_type) {
            Entry::Occupied(_) => Err(ConfigurationError::DuplicatePolicy { entity_type }.into()),
            Entry::Vacant(slot) => {
                debug!(%entity_type, ?policy, "policy registered");
                slot.insert(policy);
                Ok(())
            }
        }
    }

    /// Returns the policy for `entity_type`.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::NotRegistered`] if nothing governs the type.
    pub fn policy_for(&self, entity_type: EntityType) -> Result<&dyn Policy, Report<PolicyError>> {
        Ok(self.lookup(entity_type)?)
    }

    /// Entity types with a registered policy, in a stable order.
    #[must_use]
    pub fn registered(&self) -> Vec<EntityType> {
        let mut types: Vec<_> = self.policies.keys().copied().collect();
        types.sort();
        types
    }

    /// Returns true if a policy governs `entity_type`.
    #[must_use]
    pub fn is_registered(&self, entity_type: EntityType) -> bool {
        self.policies.contains_key(&entity_type)
    }

    /// Decides whether `actor` may perform `action` on `target`.
    ///
    /// `Ok(false)` is a denial. Errors mean the question was malformed: no
    /// policy for the type, an instance of a different type than
    /// `entity_type`, or an update/delete on an owned type without an
    /// instance.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] for the malformed calls listed above.
    #[instrument(
        skip_all,
        fields(
            entity_type = %entity_type,
            action = %action,
            anonymous = actor.is_anonymous(),
            target = %target,
        )
    )]
    pub fn is_authorized(
        &self,
        actor: &Actor,
        action: Action,
        entity_type: EntityType,
        target: Target<'_>,
    ) -> Result<bool, Report<PolicyError>> {
        match self.evaluate(actor, action, entity_type, target) {
            Ok(allowed) => {
                debug!(allowed, "policy decision");
                Ok(allowed)
            }
            Err(e) => {
                warn!(error = %e, "policy check rejected");
                Err(e.into())
            }
        }
    }

    /// Like [`is_authorized`](Self::is_authorized), but turns a denial into
    /// an error the request layer can answer with.
    ///
    /// # Errors
    ///
    /// - [`AuthorizationError::NotAuthenticated`] when an anonymous actor is
    ///   denied
    /// - [`AuthorizationError::PermissionDenied`] when a signed-in actor is
    ///   denied
    /// - [`AuthorizationError::CheckFailed`] when the check is malformed
    pub fn ensure_authorized(
        &self,
        actor: &Actor,
        action: Action,
        entity_type: EntityType,
        target: Target<'_>,
    ) -> Result<(), Report<AuthorizationError>> {
        let allowed = self
            .is_authorized(actor, action, entity_type, target)
            .map_err(|e| AuthorizationError::CheckFailed {
                reason: e.to_string(),
            })?;
        if allowed {
            return Ok(());
        }

        let err = match actor.id() {
            None => AuthorizationError::NotAuthenticated,
            Some(user_id) => AuthorizationError::PermissionDenied {
                user_id,
                action,
                resource: target
                    .instance()
                    .map_or_else(|| entity_type.to_string(), ToString::to_string),
            },
        };
        Err(err.into())
    }

    fn lookup(&self, entity_type: EntityType) -> Result<&dyn Policy, PolicyError> {
        self.policies
            .get(&entity_type)
            .map(Arc::as_ref)
            .ok_or(PolicyError::NotRegistered { entity_type })
    }

    fn evaluate(
        &self,
        actor: &Actor,
        action: Action,
        entity_type: EntityType,
        target: Target<'_>,
    ) -> Result<bool, PolicyError> {
        let policy = self.lookup(entity_type)?;

        instance_of(entity_type, action, target)?;
        policy.decide(actor, action, target)
    }
}
