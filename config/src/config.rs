//! # Configuration Structures
//!
//! This module defines the configuration structures for the course
//! management role bridge.
//!
//! All configuration structures:
//! - Use `serde` for serialization/deserialization
//! - Use `validator` for input validation
//! - Are immutable once built; nothing mutates them at runtime

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use validator::Validate;

/// Main configuration structure.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Aggregates the three configuration concerns of the bridge: which data
/// sources are federated, which role resolution strategies run, and how
/// internal roles map onto the external authorization vocabulary.
///
/// ## Usage
/// ```rust,no_run
/// use config::Config;
///
/// let config = Config::default();
/// println!("Sources: {:?}", config.federation.sources);
/// ```
///
/// ## Fields
/// - `federation`: ordered list of query sources
/// - `resolvers`: ordered list of role resolution strategies
/// - `roles`: role mapping table, default role and reserved tokens
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default, PartialEq)]
pub struct Config {
    /// Federated query sources, in precedence order
    #[serde(default)]
    #[validate(nested)]
    pub federation: FederationConfig,

    /// Role resolver chain, in precedence order
    #[serde(default)]
    #[validate(nested)]
    pub resolvers: ResolverConfig,

    /// Internal to external role mapping
    #[serde(default)]
    #[validate(nested)]
    pub roles: RoleMappingConfig
}

/// Federation configuration.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Names the course management sources consulted by the federated query
/// service. Earlier sources take precedence over later ones.
///
/// ## Fields
/// - `sources`: source names, resolved against a registry at startup
///   (default: `["local"]`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct FederationConfig {
    #[serde(default = "default_sources")]
    #[validate(length(min = 1), custom(function = "validate_unique_names"))]
    pub sources: Vec<String>
}

fn default_sources() -> Vec<String> {
    vec!["local".to_string()]
}

impl Default for FederationConfig {
    fn default() -> Self {
        Self {
            sources: default_sources()
        }
    }
}

/// Known role resolution strategies.
pub const RESOLVER_SECTION: &str = "section";
pub const RESOLVER_ANCESTOR: &str = "ancestor";

/// Role resolver chain configuration.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Orders the role resolution strategies. When two strategies report a
/// role for the same user, the earlier one wins.
///
/// ## Fields
/// - `chain`: strategy names from `section` and `ancestor`
///   (default: `["section", "ancestor"]`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ResolverConfig {
    #[serde(default = "default_chain")]
    #[validate(length(min = 1), custom(function = "validate_resolver_chain"))]
    pub chain: Vec<String>
}

fn default_chain() -> Vec<String> {
    vec![RESOLVER_SECTION.to_string(), RESOLVER_ANCESTOR.to_string()]
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            chain: default_chain()
        }
    }
}

/// Role mapping configuration.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Converts internal course management roles into the roles understood by
/// the external authorization system.
///
/// ## Fields
/// - `mapping`: internal role -> external role
/// - `default_role`: external role for internal roles missing from
///   `mapping` (default: "access")
/// - `enrollment_role`: reserved internal role of enrolled students
///   (default: "Student")
/// - `official_instructor_role`: reserved internal role of official graders
///   (default: "I")
/// - `preferences`: external roles, most preferred first; used when a user
///   holds different roles in the sections of one group (default: empty,
///   first section wins)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct RoleMappingConfig {
    #[serde(default = "default_mapping")]
    pub mapping: BTreeMap<String, String>,

    #[serde(default = "default_role")]
    #[validate(length(min = 1, max = 255))]
    pub default_role: String,

    #[serde(default = "default_enrollment_role")]
    #[validate(length(min = 1, max = 255))]
    pub enrollment_role: String,

    #[serde(default = "default_official_instructor_role")]
    #[validate(length(min = 1, max = 255))]
    pub official_instructor_role: String,

    #[serde(default)]
    #[validate(custom(function = "validate_unique_names"))]
    pub preferences: Vec<String>
}

fn default_mapping() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Student".to_string(), "access".to_string()),
        ("I".to_string(), "maintain".to_string()),
        ("Instructor".to_string(), "maintain".to_string()),
        ("GSI".to_string(), "maintain".to_string())
    ])
}

fn default_role() -> String {
    "access".to_string()
}

fn default_enrollment_role() -> String {
    "Student".to_string()
}

fn default_official_instructor_role() -> String {
    "I".to_string()
}

impl Default for RoleMappingConfig {
    fn default() -> Self {
        Self {
            mapping: default_mapping(),
            default_role: default_role(),
            enrollment_role: default_enrollment_role(),
            official_instructor_role: default_official_instructor_role(),
            preferences: Vec::new()
        }
    }
}

fn validate_unique_names(names: &Vec<String>) -> Result<(), validator::ValidationError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.is_empty() {
            return Err(validator::ValidationError::new("Empty name"));
        }
        if !seen.insert(name) {
            return Err(validator::ValidationError::new("Duplicate name"));
        }
    }
    Ok(())
}

fn validate_resolver_chain(names: &Vec<String>) -> Result<(), validator::ValidationError> {
    validate_unique_names(names)?;
    for name in names {
        match name.as_str() {
            RESOLVER_SECTION | RESOLVER_ANCESTOR => {}
            _ => return Err(validator::ValidationError::new("Unknown role resolver"))
        }
    }
    Ok(())
}
