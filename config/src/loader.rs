//! # Environment Variable Loader
//!
//! Loads configuration from environment variables following 12-factor app
//! principles. All variables use the `CM_` prefix.

use crate::config::{Config, FederationConfig, ResolverConfig, RoleMappingConfig};
use std::collections::BTreeMap;
use std::env;

/// Environment variable loading error.
#[derive(Debug, thiserror::Error)]
pub enum EnvConfigError {
    #[error("Malformed role mapping entry in {key}: {entry}")]
    MalformedRoleMapping { key: String, entry: String },
}

/// Load configuration from environment variables.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Environment variables override the defaults and the configuration file
/// but can be overridden by explicit values (see [`crate::merge_configs`]).
/// Unset variables leave the default in place.
///
/// ## Environment Variables
/// - `CM_FEDERATION_SOURCES`: comma separated source names, in precedence
///   order (default: "local")
/// - `CM_RESOLVER_CHAIN`: comma separated strategy names
///   (default: "section,ancestor")
/// - `CM_DEFAULT_ROLE`: external fallback role (default: "access")
/// - `CM_ENROLLMENT_ROLE`: reserved internal enrollment role
///   (default: "Student")
/// - `CM_OFFICIAL_INSTRUCTOR_ROLE`: reserved internal official grader role
///   (default: "I")
/// - `CM_ROLE_PREFERENCES`: comma separated external roles, most preferred
///   first (default: none)
/// - `CM_ROLE_MAP`: `internal=external` pairs separated by commas; replaces
///   the default mapping table when set
pub fn load_from_env() -> Result<Config, EnvConfigError> {
    let defaults = RoleMappingConfig::default();

    let mapping = match env::var("CM_ROLE_MAP") {
        Ok(raw) => parse_role_map("CM_ROLE_MAP", &raw)?,
        Err(_) => defaults.mapping,
    };

    Ok(Config {
        federation: FederationConfig {
            sources: list_env("CM_FEDERATION_SOURCES")
                .unwrap_or_else(|| FederationConfig::default().sources),
        },
        resolvers: ResolverConfig {
            chain: list_env("CM_RESOLVER_CHAIN")
                .unwrap_or_else(|| ResolverConfig::default().chain),
        },
        roles: RoleMappingConfig {
            mapping,
            default_role: env::var("CM_DEFAULT_ROLE").unwrap_or(defaults.default_role),
            enrollment_role: env::var("CM_ENROLLMENT_ROLE").unwrap_or(defaults.enrollment_role),
            official_instructor_role: env::var("CM_OFFICIAL_INSTRUCTOR_ROLE")
                .unwrap_or(defaults.official_instructor_role),
            preferences: list_env("CM_ROLE_PREFERENCES").unwrap_or_default(),
        },
    })
}

fn list_env(key: &str) -> Option<Vec<String>> {
    env::var(key).ok().map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
}

fn parse_role_map(key: &str, raw: &str) -> Result<BTreeMap<String, String>, EnvConfigError> {
    let mut mapping = BTreeMap::new();
    for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (internal, external) = entry
            .split_once('=')
            .filter(|(i, e)| !i.trim().is_empty() && !e.trim().is_empty())
            .ok_or_else(|| EnvConfigError::MalformedRoleMapping {
                key: key.to_string(),
                entry: entry.to_string(),
            })?;
        mapping.insert(internal.trim().to_string(), external.trim().to_string());
    }
    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "CM_FEDERATION_SOURCES",
        "CM_RESOLVER_CHAIN",
        "CM_DEFAULT_ROLE",
        "CM_ENROLLMENT_ROLE",
        "CM_OFFICIAL_INSTRUCTOR_ROLE",
        "CM_ROLE_PREFERENCES",
        "CM_ROLE_MAP",
    ];

    fn clear_env() {
        for key in KEYS {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_load_from_env_defaults() {
        clear_env();
        let config = load_from_env().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_load_from_env_overrides() {
        clear_env();
        unsafe {
            env::set_var("CM_FEDERATION_SOURCES", "registrar, local");
            env::set_var("CM_RESOLVER_CHAIN", "section");
            env::set_var("CM_DEFAULT_ROLE", "guest");
            env::set_var("CM_ROLE_MAP", "Student=access,TA=maintain");
        }

        let config = load_from_env().unwrap();
        assert_eq!(config.federation.sources, vec!["registrar", "local"]);
        assert_eq!(config.resolvers.chain, vec!["section"]);
        assert_eq!(config.roles.default_role, "guest");
        assert_eq!(config.roles.mapping.len(), 2);
        assert_eq!(config.roles.mapping.get("TA").unwrap(), "maintain");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_malformed_role_map_is_rejected() {
        clear_env();
        unsafe {
            env::set_var("CM_ROLE_MAP", "Student=access,TA");
        }

        let err = load_from_env().unwrap_err();
        assert!(err.to_string().contains("TA"));

        clear_env();
    }
}
