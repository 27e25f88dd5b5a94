use crate::error::{FederationError, FederationResult};
use cm_core::CourseManagementQuery;
use std::collections::HashMap;
use std::sync::Arc;

/// Named course management sources available for federation.
///
/// Sources register under their own [`CourseManagementQuery::source_name`];
/// the federation configuration then picks and orders them by name.
#[derive(Default, Clone)]
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn CourseManagementQuery>>
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source: Arc<dyn CourseManagementQuery>) -> FederationResult<()> {
        let name = source.source_name().to_string();
        if self.sources.contains_key(&name) {
            return Err(FederationError::DuplicateSource { name });
        }
        tracing::debug!(source = %name, "Registered course management source");
        self.sources.insert(name, source);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CourseManagementQuery>> {
        self.sources.get(name).cloned()
    }

    /// Returns the named sources in the given order.
    pub fn resolve(&self, names: &[String]) -> FederationResult<Vec<Arc<dyn CourseManagementQuery>>> {
        names
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| FederationError::UnknownSource { name: name.clone() })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Named(&'static str);

    #[async_trait]
    impl CourseManagementQuery for Named {
        fn source_name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_resolve_keeps_configured_order() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(Named("local"))).unwrap();
        registry.register(Arc::new(Named("sis"))).unwrap();

        let names = vec!["sis".to_string(), "local".to_string()];
        let sources = registry.resolve(&names).unwrap();
        let resolved: Vec<_> = sources.iter().map(|s| s.source_name()).collect();
        assert_eq!(resolved, vec!["sis", "local"]);
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        let registry = SourceRegistry::new();
        let err = registry.resolve(&["ldap".to_string()]).err().unwrap();
        assert!(matches!(err, FederationError::UnknownSource { name } if name == "ldap"));
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(Named("local"))).unwrap();
        assert!(registry.register(Arc::new(Named("local"))).is_err());
        assert_eq!(registry.len(), 1);
    }
}
