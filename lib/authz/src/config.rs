//! Policy engine configuration.
//!
//! Loaded via the `config` crate from environment variables. The host
//! application lists the entity types it serves; the registry refuses to
//! start if any name is unknown.
//!
//! ```text
//! AUTHZ__ENTITY_TYPES=app,team,user
//! ```

use crate::error::ConfigurationError;
use rootcause::Report;
use serde::Deserialize;

const ENV_PREFIX: &str = "AUTHZ";
const ENTITY_TYPES_KEY: &str = "entity_types";

/// Which entity types get a policy at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthzConfig {
    /// Entity type names, e.g. `["app", "team", "user"]`.
    #[serde(default = "default_entity_types")]
    pub entity_types: Vec<String>,
}

fn default_entity_types() -> Vec<String> {
    vec!["app".to_string(), "team".to_string(), "user".to_string()]
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            entity_types: default_entity_types(),
        }
    }
}

impl AuthzConfig {
    /// Loads configuration from `AUTHZ__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::LoadFailed`] if a variable is present
    /// but cannot be deserialized.
    pub fn from_env() -> Result<Self, Report<ConfigurationError>> {
        Self::from_environment(Self::environment())
    }

    /// Loads configuration from an explicit environment source.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::LoadFailed`] if the source cannot be
    /// deserialized.
    pub fn from_environment(
        environment: config::Environment,
    ) -> Result<Self, Report<ConfigurationError>> {
        let loaded: Self = config::Config::builder()
            .set_default(ENTITY_TYPES_KEY, default_entity_types())
            .and_then(|builder| builder.add_source(environment).build())
            .and_then(config::Config::try_deserialize)
            .map_err(|e| ConfigurationError::LoadFailed {
                details: e.to_string(),
            })?;
        Ok(loaded)
    }

    /// The `AUTHZ__` environment source with list parsing for entity types.
    #[must_use]
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key(ENTITY_TYPES_KEY)
            .try_parsing(true)
    }
}
