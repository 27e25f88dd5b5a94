//! Role resolution strategies.
//!
//! A resolver reports what it knows about a user's internal role in a
//! section. The provider runs resolvers in configured order and the first
//! one to report a role wins.

use async_trait::async_trait;
use cm_core::{CmResult, CourseManagementQuery, Section};
use config::RoleMappingConfig;
use std::collections::HashMap;
use std::sync::Arc;
use strum::{Display, EnumString};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ResolverKind {
    Section,
    Ancestor
}

impl ResolverKind {
    pub fn build(self, roles: &RoleMappingConfig) -> Arc<dyn RoleResolver> {
        match self {
            Self::Section => Arc::new(SectionRoleResolver::new(
                roles.enrollment_role.clone(),
                roles.official_instructor_role.clone()
            )),
            Self::Ancestor => Arc::new(AncestorRoleResolver)
        }
    }
}

#[async_trait]
pub trait RoleResolver: Send + Sync {
    fn kind(&self) -> ResolverKind;

    /// The user's internal role in one section, if this resolver knows it.
    async fn resolve_role(
        &self,
        cm: &dyn CourseManagementQuery,
        user_id: &str,
        section: &Section
    ) -> CmResult<Option<String>>;

    /// Section eid to internal role, for every section the user belongs to.
    async fn resolve_group_roles(
        &self,
        cm: &dyn CourseManagementQuery,
        user_id: &str
    ) -> CmResult<HashMap<String, String>>;

    /// User id to internal role, for everyone in the section.
    async fn resolve_section_roles(
        &self,
        cm: &dyn CourseManagementQuery,
        section: &Section
    ) -> CmResult<HashMap<String, String>>;
}

/// Treats NotFound and Unsupported as nothing known.
pub(crate) fn or_default<T: Default>(result: CmResult<T>) -> CmResult<T> {
    match result {
        Err(e) if e.is_benign() => {
            trace!(error = %e, "Source has nothing to contribute");
            Ok(T::default())
        }
        other => other
    }
}

/// Roles from section enrollments, official graders and direct section
/// memberships.
pub struct SectionRoleResolver {
    enrollment_role: String,
    official_instructor_role: String
}

impl SectionRoleResolver {
    pub fn new(enrollment_role: impl Into<String>, official_instructor_role: impl Into<String>) -> Self {
        Self {
            enrollment_role: enrollment_role.into(),
            official_instructor_role: official_instructor_role.into()
        }
    }
}

impl Default for SectionRoleResolver {
    fn default() -> Self {
        Self::new(cm_core::ENROLLMENT_ROLE, cm_core::OFFICIAL_INSTRUCTOR_ROLE)
    }
}

#[async_trait]
impl RoleResolver for SectionRoleResolver {
    fn kind(&self) -> ResolverKind {
        ResolverKind::Section
    }

    async fn resolve_role(
        &self,
        cm: &dyn CourseManagementQuery,
        user_id: &str,
        section: &Section
    ) -> CmResult<Option<String>> {
        if let Some(set_eid) = &section.enrollment_set_eid {
            if or_default(cm.is_enrolled(user_id, set_eid).await)? {
                return Ok(Some(self.enrollment_role.clone()));
            }
            let graders = or_default(cm.get_instructors_of_record_ids(set_eid).await)?;
            if graders.iter().any(|id| id == user_id) {
                return Ok(Some(self.official_instructor_role.clone()));
            }
        }
        or_default(cm.get_section_role(&section.eid, user_id).await)
    }

    async fn resolve_group_roles(
        &self,
        cm: &dyn CourseManagementQuery,
        user_id: &str
    ) -> CmResult<HashMap<String, String>> {
        let mut roles = HashMap::new();

        for section in or_default(cm.find_enrolled_sections(user_id).await)? {
            roles.insert(section.eid, self.enrollment_role.clone());
        }
        for section in or_default(cm.find_instructing_sections(user_id).await)? {
            roles.insert(section.eid, self.official_instructor_role.clone());
        }
        // memberships win over enrollments in any session, not only the current one
        for (eid, role) in &mut roles {
            if let Some(membership) = or_default(cm.get_section_role(eid, user_id).await)? {
                *role = membership;
            }
        }
        for section in or_default(cm.find_current_sections_with_member(user_id).await)? {
            if let Some(role) = or_default(cm.get_section_role(&section.eid, user_id).await)? {
                roles.insert(section.eid, role);
            }
        }

        debug!(user_id, sections = roles.len(), "Resolved section roles for user");
        Ok(roles)
    }

    async fn resolve_section_roles(
        &self,
        cm: &dyn CourseManagementQuery,
        section: &Section
    ) -> CmResult<HashMap<String, String>> {
        let mut roles = HashMap::new();

        if let Some(set_eid) = &section.enrollment_set_eid {
            for enrollment in or_default(cm.get_enrollments(set_eid).await)? {
                if !enrollment.dropped {
                    roles.insert(enrollment.user_id, self.enrollment_role.clone());
                }
            }
            for grader in or_default(cm.get_instructors_of_record_ids(set_eid).await)? {
                roles.insert(grader, self.official_instructor_role.clone());
            }
        }
        // memberships win over enrollments
        for membership in or_default(cm.get_section_memberships(&section.eid).await)? {
            roles.insert(membership.user_id, membership.role);
        }

        debug!(section_eid = %section.eid, users = roles.len(), "Resolved users for section");
        Ok(roles)
    }
}

/// Roles inherited from the offering or course set above a section.
///
/// Not resolved yet: this strategy never reports a role.
// TODO: resolve through find_course_offering_roles / find_course_set_roles
// once the inheritance rules between containers are settled.
pub struct AncestorRoleResolver;

#[async_trait]
impl RoleResolver for AncestorRoleResolver {
    fn kind(&self) -> ResolverKind {
        ResolverKind::Ancestor
    }

    async fn resolve_role(
        &self,
        _cm: &dyn CourseManagementQuery,
        _user_id: &str,
        _section: &Section
    ) -> CmResult<Option<String>> {
        Ok(None)
    }

    async fn resolve_group_roles(
        &self,
        _cm: &dyn CourseManagementQuery,
        _user_id: &str
    ) -> CmResult<HashMap<String, String>> {
        Ok(HashMap::new())
    }

    async fn resolve_section_roles(
        &self,
        _cm: &dyn CourseManagementQuery,
        _section: &Section
    ) -> CmResult<HashMap<String, String>> {
        Ok(HashMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_resolver_kind_from_config_name() {
        assert_eq!(ResolverKind::from_str("section").unwrap(), ResolverKind::Section);
        assert_eq!(ResolverKind::from_str("ancestor").unwrap(), ResolverKind::Ancestor);
        assert!(ResolverKind::from_str("course_set").is_err());
        assert_eq!(ResolverKind::Ancestor.to_string(), "ancestor");
    }

    #[test]
    fn test_build_uses_configured_tokens() {
        let resolver = ResolverKind::Section.build(&RoleMappingConfig::default());
        assert_eq!(resolver.kind(), ResolverKind::Section);
    }

    #[test]
    fn test_or_default_absorbs_benign_errors() {
        let missing: CmResult<Vec<String>> =
            Err(cm_core::CmError::not_found(cm_core::EntityKind::Section, "x"));
        assert!(or_default(missing).unwrap().is_empty());

        let failed: CmResult<Vec<String>> = Err(cm_core::CmError::fault("sis", "down"));
        assert!(or_default(failed).is_err());
    }
}
