use async_trait::async_trait;
use cm_core::{CmResult, ContainerRef, CourseManagementQuery, Section};
use config::{Config, RoleMappingConfig};
use federation::SourceRegistry;
use group_provider::{
    CourseManagementGroupProvider, GroupProvider, GroupProviderError, ResolverKind, RoleResolver,
    SectionRoleResolver
};
use std::collections::HashMap;
use std::sync::Arc;
use storage::InMemoryCourseManagement;
use testing::{
    CHEMISTRY, DROPPED_STUDENT, FaultySource, INSTRUCTOR, LAB, LECTURE, PAST_SESSION, STUDENT,
    SilentSource, TEACHING_ASSISTANT, course_offering, enrollment, enrollment_set, membership,
    sample_catalog, section
};

fn provider(cm: InMemoryCourseManagement, config: &Config) -> CourseManagementGroupProvider {
    let mut registry = SourceRegistry::new();
    registry.register(Arc::new(cm)).unwrap();
    CourseManagementGroupProvider::from_config(config, &registry).unwrap()
}

fn default_provider(cm: InMemoryCourseManagement) -> CourseManagementGroupProvider {
    provider(cm, &Config::default())
}

fn both_sections() -> String {
    group_provider::pack_id(&[LECTURE, LAB])
}

/// Reports one fixed role for one user in one section.
struct FixedRoleResolver {
    user_id: &'static str,
    section_eid: &'static str,
    role: &'static str
}

#[async_trait]
impl RoleResolver for FixedRoleResolver {
    fn kind(&self) -> ResolverKind {
        ResolverKind::Ancestor
    }

    async fn resolve_role(
        &self,
        _cm: &dyn CourseManagementQuery,
        user_id: &str,
        section: &Section
    ) -> CmResult<Option<String>> {
        Ok((user_id == self.user_id && section.eid == self.section_eid)
            .then(|| self.role.to_string()))
    }

    async fn resolve_group_roles(
        &self,
        _cm: &dyn CourseManagementQuery,
        user_id: &str
    ) -> CmResult<HashMap<String, String>> {
        let mut roles = HashMap::new();
        if user_id == self.user_id {
            roles.insert(self.section_eid.to_string(), self.role.to_string());
        }
        Ok(roles)
    }

    async fn resolve_section_roles(
        &self,
        _cm: &dyn CourseManagementQuery,
        section: &Section
    ) -> CmResult<HashMap<String, String>> {
        let mut roles = HashMap::new();
        if section.eid == self.section_eid {
            roles.insert(self.user_id.to_string(), self.role.to_string());
        }
        Ok(roles)
    }
}

fn chained(resolvers: Vec<Arc<dyn RoleResolver>>) -> CourseManagementGroupProvider {
    CourseManagementGroupProvider::new(
        Arc::new(sample_catalog("local")),
        resolvers,
        &RoleMappingConfig::default()
    )
}

#[tokio::test]
async fn test_enrolled_student_gets_enrollment_role() {
    let provider = default_provider(sample_catalog("local"));

    assert_eq!(
        provider.get_role(LECTURE, STUDENT).await.unwrap(),
        Some("access".to_string())
    );
    let users = provider.get_user_roles_for_group(LECTURE).await.unwrap();
    assert_eq!(users.get(STUDENT).map(String::as_str), Some("access"));
}

#[tokio::test]
async fn test_membership_overrides_enrollment() {
    let cm = sample_catalog("local");
    cm.add_or_update_membership(membership(STUDENT, "Instructor", ContainerRef::section(LECTURE)))
        .unwrap();
    let provider = default_provider(cm);

    let users = provider.get_user_roles_for_group(LECTURE).await.unwrap();
    assert_eq!(users[STUDENT], "maintain");
    assert_eq!(
        provider.get_role(LECTURE, STUDENT).await.unwrap(),
        Some("maintain".to_string())
    );
}

#[tokio::test]
async fn test_membership_overrides_enrollment_in_past_session() {
    let cm = sample_catalog("local");
    cm.upsert_course_offering(course_offering("CHEM101-SP10", CHEMISTRY, PAST_SESSION))
        .unwrap();
    cm.upsert_enrollment_set(enrollment_set("CHEM101-SP10-ES", "CHEM101-SP10", &[]))
        .unwrap();
    cm.upsert_section(section("CHEM101-SP10-LEC", "CHEM101-SP10", Some("CHEM101-SP10-ES")))
        .unwrap();
    cm.add_or_update_enrollment(enrollment(STUDENT, "CHEM101-SP10-ES"))
        .unwrap();
    cm.add_or_update_membership(membership(
        STUDENT,
        "Instructor",
        ContainerRef::section("CHEM101-SP10-LEC")
    ))
    .unwrap();
    let provider = default_provider(cm);

    let groups = provider.get_group_roles_for_user(STUDENT).await.unwrap();
    assert_eq!(groups["CHEM101-SP10-LEC"], "maintain");
    assert_eq!(groups[LECTURE], "access");
    assert_eq!(
        provider.get_role("CHEM101-SP10-LEC", STUDENT).await.unwrap(),
        Some("maintain".to_string())
    );
    let users = provider
        .get_user_roles_for_group("CHEM101-SP10-LEC")
        .await
        .unwrap();
    assert_eq!(users[STUDENT], "maintain");
}

#[tokio::test]
async fn test_membership_overrides_official_grader() {
    let cm = sample_catalog("local");
    cm.add_or_update_membership(membership(INSTRUCTOR, "Observer", ContainerRef::section(LECTURE)))
        .unwrap();
    let mut config = Config::default();
    config
        .roles
        .mapping
        .insert("Observer".to_string(), "observe".to_string());
    let provider = provider(cm, &config);

    assert_eq!(
        provider.get_role(LECTURE, INSTRUCTOR).await.unwrap(),
        Some("observe".to_string())
    );
    let users = provider.get_user_roles_for_group(LECTURE).await.unwrap();
    assert_eq!(users[INSTRUCTOR], "observe");
    let groups = provider.get_group_roles_for_user(INSTRUCTOR).await.unwrap();
    assert_eq!(groups[LECTURE], "observe");
}

#[tokio::test]
async fn test_first_resolver_in_chain_wins() {
    let fixed = || -> Arc<dyn RoleResolver> {
        Arc::new(FixedRoleResolver {
            user_id: STUDENT,
            section_eid: LECTURE,
            role: "Instructor"
        })
    };
    let by_section = || -> Arc<dyn RoleResolver> { Arc::new(SectionRoleResolver::default()) };

    let provider = chained(vec![fixed(), by_section()]);
    assert_eq!(
        provider.get_role(LECTURE, STUDENT).await.unwrap(),
        Some("maintain".to_string())
    );
    assert_eq!(provider.get_user_roles_for_group(LECTURE).await.unwrap()[STUDENT], "maintain");
    let groups = provider.get_group_roles_for_user(STUDENT).await.unwrap();
    assert_eq!(groups[LECTURE], "maintain");
    assert_eq!(groups[LAB], "access");

    let provider = chained(vec![by_section(), fixed()]);
    assert_eq!(
        provider.get_role(LECTURE, STUDENT).await.unwrap(),
        Some("access".to_string())
    );
    assert_eq!(provider.get_user_roles_for_group(LECTURE).await.unwrap()[STUDENT], "access");
    let groups = provider.get_group_roles_for_user(STUDENT).await.unwrap();
    assert_eq!(groups[LECTURE], "access");
}

#[tokio::test]
async fn test_role_in_one_section_of_composite_group() {
    let provider = default_provider(sample_catalog("local"));

    assert_eq!(
        provider
            .get_role(&both_sections(), TEACHING_ASSISTANT)
            .await
            .unwrap(),
        Some("maintain".to_string())
    );
}

#[tokio::test]
async fn test_official_grader_role() {
    let provider = default_provider(sample_catalog("local"));

    assert_eq!(
        provider.get_role(LECTURE, INSTRUCTOR).await.unwrap(),
        Some("maintain".to_string())
    );
    let users = provider.get_user_roles_for_group(LECTURE).await.unwrap();
    assert_eq!(users[INSTRUCTOR], "maintain");
}

#[tokio::test]
async fn test_dropped_enrollment_has_no_role() {
    let provider = default_provider(sample_catalog("local"));

    assert_eq!(provider.get_role(LECTURE, DROPPED_STUDENT).await.unwrap(), None);
    let users = provider.get_user_roles_for_group(LECTURE).await.unwrap();
    assert!(!users.contains_key(DROPPED_STUDENT));
}

#[tokio::test]
async fn test_unknown_sections_are_skipped() {
    let provider = default_provider(sample_catalog("local"));

    let group = format!("ghost+{LECTURE}");
    assert_eq!(
        provider.get_role(&group, STUDENT).await.unwrap(),
        Some("access".to_string())
    );
    assert_eq!(provider.get_role("ghost", STUDENT).await.unwrap(), None);
}

#[tokio::test]
async fn test_empty_group_has_no_members() {
    let provider = default_provider(sample_catalog("local"));

    assert_eq!(provider.get_role("", STUDENT).await.unwrap(), None);
    assert!(provider.get_user_roles_for_group("").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_group_roles_for_user() {
    let provider = default_provider(sample_catalog("local"));

    let student = provider.get_group_roles_for_user(STUDENT).await.unwrap();
    assert_eq!(student.len(), 2);
    assert_eq!(student[LECTURE], "access");
    assert_eq!(student[LAB], "access");

    let assistant = provider
        .get_group_roles_for_user(TEACHING_ASSISTANT)
        .await
        .unwrap();
    assert_eq!(assistant.len(), 1);
    assert_eq!(assistant[LAB], "maintain");

    let instructor = provider.get_group_roles_for_user(INSTRUCTOR).await.unwrap();
    assert_eq!(instructor[LECTURE], "maintain");
}

#[tokio::test]
async fn test_first_section_wins_without_preferences() {
    let cm = sample_catalog("local");
    cm.add_or_update_membership(membership(STUDENT, "GSI", ContainerRef::section(LAB)))
        .unwrap();
    let provider = default_provider(cm);

    let users = provider
        .get_user_roles_for_group(&both_sections())
        .await
        .unwrap();
    assert_eq!(users[STUDENT], "access");
}

#[tokio::test]
async fn test_preferred_role_wins_across_sections() {
    let cm = sample_catalog("local");
    cm.add_or_update_membership(membership(STUDENT, "GSI", ContainerRef::section(LAB)))
        .unwrap();
    let mut config = Config::default();
    config.roles.preferences = vec!["maintain".to_string(), "access".to_string()];
    let provider = provider(cm, &config);

    let users = provider
        .get_user_roles_for_group(&both_sections())
        .await
        .unwrap();
    assert_eq!(users[STUDENT], "maintain");
    assert_eq!(provider.preferred_role("access", "maintain"), "maintain");
}

#[tokio::test]
async fn test_unmapped_role_uses_default() {
    let cm = sample_catalog("local");
    cm.add_or_update_membership(membership("observer", "Auditor", ContainerRef::section(LAB)))
        .unwrap();
    let mut config = Config::default();
    config.roles.default_role = "guest".to_string();
    let provider = provider(cm, &config);

    assert_eq!(
        provider.get_role(LAB, "observer").await.unwrap(),
        Some("guest".to_string())
    );
}

#[tokio::test]
async fn test_ancestor_only_chain_resolves_nothing() {
    let mut config = Config::default();
    config.resolvers.chain = vec!["ancestor".to_string()];
    let provider = provider(sample_catalog("local"), &config);

    assert_eq!(provider.get_role(LECTURE, STUDENT).await.unwrap(), None);
    assert!(provider.get_user_roles_for_group(LECTURE).await.unwrap().is_empty());
    assert!(provider.get_group_roles_for_user(STUDENT).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_source_faults_surface() {
    let cm: Arc<dyn CourseManagementQuery> = Arc::new(FaultySource::new("sis", "timeout"));
    let provider = CourseManagementGroupProvider::new(
        cm,
        vec![Arc::new(SectionRoleResolver::default())],
        &RoleMappingConfig::default()
    );

    let err = provider.get_role(LECTURE, STUDENT).await.unwrap_err();
    assert!(matches!(err, GroupProviderError::Source(_)));
    assert!(!err.is_configuration());
    assert!(provider.get_user_roles_for_group(LECTURE).await.is_err());
    assert!(provider.get_group_roles_for_user(STUDENT).await.is_err());
}

#[tokio::test]
async fn test_unsupported_source_is_silent() {
    let cm: Arc<dyn CourseManagementQuery> = Arc::new(SilentSource::new("legacy"));
    let provider = CourseManagementGroupProvider::new(
        cm,
        vec![Arc::new(SectionRoleResolver::default())],
        &RoleMappingConfig::default()
    );

    assert_eq!(provider.get_role(LECTURE, STUDENT).await.unwrap(), None);
    assert!(provider.get_group_roles_for_user(STUDENT).await.unwrap().is_empty());
}

#[test]
fn test_from_config_rejects_bad_wiring() {
    let mut registry = SourceRegistry::new();
    registry.register(Arc::new(sample_catalog("local"))).unwrap();

    let mut config = Config::default();
    config.resolvers.chain = vec!["course_set".to_string()];
    let err = CourseManagementGroupProvider::from_config(&config, &registry)
        .err()
        .unwrap();
    assert!(err.is_configuration());

    let mut config = Config::default();
    config.federation.sources = vec!["ldap".to_string()];
    let err = CourseManagementGroupProvider::from_config(&config, &registry)
        .err()
        .unwrap();
    assert!(matches!(err, GroupProviderError::Federation(_)));
}

#[test]
fn test_pack_and_unpack_through_provider() {
    let provider = default_provider(sample_catalog("local"));
    let packed = provider.pack_id(&[LECTURE.to_string(), LAB.to_string()]);
    assert_eq!(provider.unpack_id(&packed), vec![LECTURE, LAB]);
}
