//! # Configuration Precedence
//!
//! Merges configuration from multiple sources with precedence rules.
//!
//! # Precedence Order
//! 1. Explicit overrides (highest priority)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values (lowest priority)

use crate::config::{Config, FederationConfig, ResolverConfig, RoleMappingConfig};

/// Merge multiple configuration sources with precedence.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Merges configuration following explicit > environment > file > defaults.
/// A layer only overrides a field when its value differs from the built-in
/// default, so a layer that leaves a field untouched never masks a lower
/// layer.
///
/// ## Usage
/// ```rust,no_run
/// use config::{Config, merge_configs, load_from_file, load_from_env};
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let defaults = Config::default();
///     let from_file = load_from_file(Path::new("cm-bridge.toml"))?;
///     let from_env = load_from_env()?;
///
///     let _config = merge_configs(defaults, from_file, "file", from_env, "env", None, "explicit");
///     Ok(())
/// }
/// ```
///
/// ## Lists and Maps
/// Source lists, resolver chains, preferences and the role mapping table are
/// replaced wholesale, never concatenated: their order carries meaning.
pub fn merge_configs(
    defaults: Config,
    file_config: Config,
    file_source_name: &str,
    env_config: Config,
    env_source_name: &str,
    explicit_config: Option<Config>,
    explicit_source_name: &str,
) -> Config {
    let mut config = defaults;

    config = merge_with_logging(config, file_config, file_source_name);
    config = merge_with_logging(config, env_config, env_source_name);

    if let Some(explicit) = explicit_config {
        config = merge_with_logging(config, explicit, explicit_source_name);
    }

    config
}

fn merge_with_logging(mut base: Config, override_config: Config, source_name: &str) -> Config {
    let mut changes = Vec::new();

    merge_federation(&mut base.federation, &override_config.federation, &mut changes);
    merge_resolvers(&mut base.resolvers, &override_config.resolvers, &mut changes);
    merge_roles(&mut base.roles, &override_config.roles, &mut changes);

    if !changes.is_empty() {
        tracing::info!("Configuration from {}: {:?}", source_name, changes);
    }

    base
}

fn merge_federation(
    base: &mut FederationConfig,
    override_config: &FederationConfig,
    changes: &mut Vec<String>,
) {
    if override_config.sources != FederationConfig::default().sources
        && override_config.sources != base.sources
    {
        changes.push(format!("federation.sources = {:?}", override_config.sources));
        base.sources.clone_from(&override_config.sources);
    }
}

fn merge_resolvers(
    base: &mut ResolverConfig,
    override_config: &ResolverConfig,
    changes: &mut Vec<String>,
) {
    if override_config.chain != ResolverConfig::default().chain
        && override_config.chain != base.chain
    {
        changes.push(format!("resolvers.chain = {:?}", override_config.chain));
        base.chain.clone_from(&override_config.chain);
    }
}

fn merge_roles(
    base: &mut RoleMappingConfig,
    override_config: &RoleMappingConfig,
    changes: &mut Vec<String>,
) {
    let defaults = RoleMappingConfig::default();

    if override_config.mapping != defaults.mapping && override_config.mapping != base.mapping {
        changes.push(format!(
            "roles.mapping = {} entries",
            override_config.mapping.len()
        ));
        base.mapping.clone_from(&override_config.mapping);
    }
    if override_config.default_role != defaults.default_role
        && override_config.default_role != base.default_role
    {
        changes.push(format!("roles.default_role = {}", override_config.default_role));
        base.default_role.clone_from(&override_config.default_role);
    }
    if override_config.enrollment_role != defaults.enrollment_role
        && override_config.enrollment_role != base.enrollment_role
    {
        changes.push(format!(
            "roles.enrollment_role = {}",
            override_config.enrollment_role
        ));
        base.enrollment_role
            .clone_from(&override_config.enrollment_role);
    }
    if override_config.official_instructor_role != defaults.official_instructor_role
        && override_config.official_instructor_role != base.official_instructor_role
    {
        changes.push(format!(
            "roles.official_instructor_role = {}",
            override_config.official_instructor_role
        ));
        base.official_instructor_role
            .clone_from(&override_config.official_instructor_role);
    }
    if !override_config.preferences.is_empty() && override_config.preferences != base.preferences {
        changes.push(format!("roles.preferences = {:?}", override_config.preferences));
        base.preferences.clone_from(&override_config.preferences);
    }
}
