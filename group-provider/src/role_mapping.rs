use crate::telemetry::ProviderTelemetry;
use config::RoleMappingConfig;
use std::collections::BTreeMap;
use tracing::warn;

/// Converts internal course management roles into external roles.
///
/// Built once from configuration and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleMapping {
    mapping: BTreeMap<String, String>,
    default_role: String,
    preferences: Vec<String>
}

impl RoleMapping {
    pub fn new(
        mapping: BTreeMap<String, String>,
        default_role: impl Into<String>,
        preferences: Vec<String>
    ) -> Self {
        Self {
            mapping,
            default_role: default_role.into(),
            preferences
        }
    }

    pub fn from_config(config: &RoleMappingConfig) -> Self {
        Self::new(
            config.mapping.clone(),
            config.default_role.clone(),
            config.preferences.clone()
        )
    }

    pub fn default_role(&self) -> &str {
        &self.default_role
    }

    /// Maps an internal role. Unmapped roles get the default role; that is
    /// logged and counted but never an error.
    pub fn to_external(&self, internal_role: &str) -> String {
        match self.mapping.get(internal_role) {
            Some(external) => external.clone(),
            None => {
                warn!(
                    internal_role,
                    default_role = %self.default_role,
                    "No external role mapped, using default"
                );
                ProviderTelemetry::record_mapping_fallback(internal_role);
                self.default_role.clone()
            }
        }
    }

    /// Picks the more preferred of two external roles.
    ///
    /// Roles earlier in the preference list win. Unlisted roles rank below
    /// listed ones, and ties keep `current`.
    pub fn preferred_role<'a>(&self, current: &'a str, candidate: &'a str) -> &'a str {
        if self.rank(candidate) < self.rank(current) {
            candidate
        } else {
            current
        }
    }

    fn rank(&self, role: &str) -> usize {
        self.preferences
            .iter()
            .position(|preferred| preferred == role)
            .unwrap_or(self.preferences.len())
    }
}
