//! # Configuration Validation
//!
//! Validates configuration structures using the `validator` crate.

use crate::config::Config;
use validator::Validate;

/// Validate configuration structure.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Runs every validation rule of the configuration tree. Call it once after
/// merging all layers, before wiring the federation and the group provider.
///
/// ## Validation Rules
/// ### Federation
/// - `sources`: at least one, no empty or duplicate names
///
/// ### Resolvers
/// - `chain`: at least one; each `section` or `ancestor`; no duplicates
///
/// ### Roles
/// - `default_role`, `enrollment_role`, `official_instructor_role`:
///   1-255 characters
/// - `preferences`: no empty or duplicate names
pub fn validate(config: &Config) -> Result<(), validator::ValidationErrors> {
    config.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_duplicate_resolver() {
        let mut config = Config::default();
        config.resolvers.chain = vec!["section".to_string(), "section".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_empty_resolver_chain() {
        let mut config = Config::default();
        config.resolvers.chain.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_duplicate_preferences() {
        let mut config = Config::default();
        config.roles.preferences = vec!["maintain".to_string(), "maintain".to_string()];
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_empty_enrollment_role() {
        let mut config = Config::default();
        config.roles.enrollment_role = String::new();
        assert!(validate(&config).is_err());
    }
}
