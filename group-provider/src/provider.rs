use crate::error::{GroupProviderError, GroupProviderResult};
use crate::group_id;
use crate::resolver::{ResolverKind, RoleResolver, or_default};
use crate::role_mapping::RoleMapping;
use crate::telemetry::ProviderTelemetry;
use async_trait::async_trait;
use cm_core::{CmResult, CourseManagementQuery, Section};
use config::{Config, RoleMappingConfig, Validate};
use federation::{FederatedCourseManagement, SourceRegistry};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// Group membership and roles as seen by the host platform.
///
/// A group is one or more sections, named by a composite provider id.
/// Roles are external roles.
#[async_trait]
pub trait GroupProvider: Send + Sync {
    async fn get_role(&self, group_id: &str, user_id: &str) -> GroupProviderResult<Option<String>>;

    async fn get_user_roles_for_group(
        &self,
        group_id: &str
    ) -> GroupProviderResult<HashMap<String, String>>;

    async fn get_group_roles_for_user(
        &self,
        user_id: &str
    ) -> GroupProviderResult<HashMap<String, String>>;

    fn pack_id(&self, eids: &[String]) -> String {
        group_id::pack_id(eids)
    }

    fn unpack_id(&self, id: &str) -> Vec<String> {
        group_id::unpack_id(id)
    }

    fn preferred_role<'a>(&self, current: &'a str, candidate: &'a str) -> &'a str;
}

/// Group provider backed by a course management query facade.
pub struct CourseManagementGroupProvider {
    cm: Arc<dyn CourseManagementQuery>,
    resolvers: Vec<Arc<dyn RoleResolver>>,
    mapping: RoleMapping,
    reserved_roles: [String; 2]
}

impl CourseManagementGroupProvider {
    /// Mapping and reserved role tokens both come from `roles`, the same
    /// settings the resolver chain is built from.
    pub fn new(
        cm: Arc<dyn CourseManagementQuery>,
        resolvers: Vec<Arc<dyn RoleResolver>>,
        roles: &RoleMappingConfig
    ) -> Self {
        Self {
            cm,
            resolvers,
            mapping: RoleMapping::from_config(roles),
            reserved_roles: [
                roles.enrollment_role.clone(),
                roles.official_instructor_role.clone()
            ]
        }
    }

    /// Wires a provider from validated configuration: the configured
    /// sources are federated in order and the resolver chain is built from
    /// its names.
    pub fn from_config(config: &Config, registry: &SourceRegistry) -> GroupProviderResult<Self> {
        config.validate()?;

        let federated = FederatedCourseManagement::from_config(&config.federation, registry)?;
        let resolvers = config
            .resolvers
            .chain
            .iter()
            .map(|name| {
                ResolverKind::from_str(name)
                    .map(|kind| kind.build(&config.roles))
                    .map_err(|_| GroupProviderError::UnknownResolver { name: name.clone() })
            })
            .collect::<GroupProviderResult<Vec<_>>>()?;

        info!(
            sources = ?config.federation.sources,
            resolvers = ?config.resolvers.chain,
            "Course management group provider ready"
        );

        Ok(Self::new(Arc::new(federated), resolvers, &config.roles))
    }

    pub fn mapping(&self) -> &RoleMapping {
        &self.mapping
    }

    /// Sections named by a provider id, skipping eids no source knows.
    async fn sections(&self, provider_id: &str) -> CmResult<Vec<Section>> {
        let mut sections = Vec::new();
        for eid in group_id::unpack_id(provider_id) {
            match or_default(self.cm.get_section(&eid).await.map(Some))? {
                Some(section) => sections.push(section),
                None => debug!(section_eid = %eid, "Skipping unknown section")
            }
        }
        Ok(sections)
    }

    /// A direct section membership overrides a role that only comes from
    /// enrollment or official grading.
    async fn reconcile(&self, section: &Section, user_id: &str, role: String) -> CmResult<String> {
        if !self.reserved_roles.contains(&role) {
            return Ok(role);
        }
        let membership = or_default(self.cm.get_section_role(&section.eid, user_id).await)?;
        Ok(membership.unwrap_or(role))
    }
}

#[async_trait]
impl GroupProvider for CourseManagementGroupProvider {
    async fn get_role(&self, group_id: &str, user_id: &str) -> GroupProviderResult<Option<String>> {
        ProviderTelemetry::record_request("get_role");
        let cm = self.cm.as_ref();

        for section in self.sections(group_id).await? {
            for resolver in &self.resolvers {
                if let Some(role) = resolver.resolve_role(cm, user_id, &section).await? {
                    let role = self.reconcile(&section, user_id, role).await?;
                    debug!(
                        user_id,
                        section_eid = %section.eid,
                        resolver = %resolver.kind(),
                        role = %role,
                        "Resolved role"
                    );
                    return Ok(Some(self.mapping.to_external(&role)));
                }
            }
        }

        debug!(group_id, user_id, "User has no role in group");
        Ok(None)
    }

    async fn get_user_roles_for_group(
        &self,
        group_id: &str
    ) -> GroupProviderResult<HashMap<String, String>> {
        ProviderTelemetry::record_request("get_user_roles_for_group");
        let cm = self.cm.as_ref();
        let mut users: HashMap<String, String> = HashMap::new();

        for section in self.sections(group_id).await? {
            let mut section_roles = HashMap::new();
            for resolver in &self.resolvers {
                for (user_id, role) in resolver.resolve_section_roles(cm, &section).await? {
                    section_roles.entry(user_id).or_insert(role);
                }
            }

            for (user_id, internal) in section_roles {
                let external = self.mapping.to_external(&internal);
                match users.entry(user_id) {
                    Entry::Vacant(entry) => {
                        entry.insert(external);
                    }
                    Entry::Occupied(mut entry) => {
                        if self.mapping.preferred_role(entry.get(), &external) != entry.get() {
                            entry.insert(external);
                        }
                    }
                }
            }
        }

        debug!(group_id, users = users.len(), "Resolved group members");
        Ok(users)
    }

    async fn get_group_roles_for_user(
        &self,
        user_id: &str
    ) -> GroupProviderResult<HashMap<String, String>> {
        ProviderTelemetry::record_request("get_group_roles_for_user");
        let cm = self.cm.as_ref();
        let mut sections: HashMap<String, String> = HashMap::new();

        for resolver in &self.resolvers {
            for (eid, role) in resolver.resolve_group_roles(cm, user_id).await? {
                sections.entry(eid).or_insert(role);
            }
        }

        Ok(sections
            .into_iter()
            .map(|(eid, role)| {
                (
                    group_id::pack_id(&[eid]),
                    self.mapping.to_external(&role)
                )
            })
            .collect())
    }

    fn preferred_role<'a>(&self, current: &'a str, candidate: &'a str) -> &'a str {
        self.mapping.preferred_role(current, candidate)
    }
}
