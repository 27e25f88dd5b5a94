use crate::error::FederationResult;
use crate::registry::SourceRegistry;
use async_trait::async_trait;
use cm_core::{
    AcademicSession, CanonicalCourse, CmResult, CourseManagementQuery, CourseOffering, CourseSet,
    EntityKind, Enrollment, EnrollmentSet, Membership, Section
};
use config::FederationConfig;
use std::collections::HashMap;
use std::sync::Arc;

/// Query facade over an ordered list of sources.
///
/// Earlier sources take precedence. Each operation merges the per-source
/// answers by the rule that fits its result shape (see the `merge` module).
pub struct FederatedCourseManagement {
    pub(crate) sources: Vec<Arc<dyn CourseManagementQuery>>
}

impl FederatedCourseManagement {
    pub fn new(sources: Vec<Arc<dyn CourseManagementQuery>>) -> Self {
        Self { sources }
    }

    /// Picks the configured sources out of the registry, in configured order.
    pub fn from_config(
        config: &FederationConfig,
        registry: &SourceRegistry
    ) -> FederationResult<Self> {
        let sources = registry.resolve(&config.sources)?;
        tracing::info!(sources = ?config.sources, "Federating course management sources");
        Ok(Self::new(sources))
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.source_name()).collect()
    }
}

#[async_trait]
impl CourseManagementQuery for FederatedCourseManagement {
    fn source_name(&self) -> &str {
        "federated"
    }

    async fn get_course_sets(&self) -> CmResult<Vec<CourseSet>> {
        self.union_all("get_course_sets", |s| s.get_course_sets())
            .await
    }

    async fn get_course_set(&self, eid: &str) -> CmResult<CourseSet> {
        self.first_found("get_course_set", EntityKind::CourseSet, eid, |s| {
            s.get_course_set(eid)
        })
        .await
    }

    async fn get_child_course_sets(&self, parent_eid: &str) -> CmResult<Vec<CourseSet>> {
        self.union_keyed(
            "get_child_course_sets",
            EntityKind::CourseSet,
            parent_eid,
            |s| s.get_child_course_sets(parent_eid)
        )
        .await
    }

    async fn get_course_set_memberships(&self, course_set_eid: &str) -> CmResult<Vec<Membership>> {
        self.union_keyed(
            "get_course_set_memberships",
            EntityKind::CourseSet,
            course_set_eid,
            |s| s.get_course_set_memberships(course_set_eid)
        )
        .await
    }

    async fn is_empty(&self, course_set_eid: &str) -> CmResult<bool> {
        self.any_answers("is_empty", false, |s| s.is_empty(course_set_eid))
            .await
    }

    async fn find_course_sets(&self, category: &str) -> CmResult<Vec<CourseSet>> {
        let mut found = self
            .union_all("find_course_sets", |s| s.find_course_sets(category))
            .await?;
        found.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(found)
    }

    async fn is_course_set_defined(&self, eid: &str) -> CmResult<bool> {
        self.any_answers("is_course_set_defined", true, |s| {
            s.is_course_set_defined(eid)
        })
        .await
    }

    async fn get_canonical_course(&self, eid: &str) -> CmResult<CanonicalCourse> {
        self.first_found(
            "get_canonical_course",
            EntityKind::CanonicalCourse,
            eid,
            |s| s.get_canonical_course(eid)
        )
        .await
    }

    async fn get_equivalent_canonical_courses(
        &self,
        canonical_course_eid: &str
    ) -> CmResult<Vec<CanonicalCourse>> {
        self.union_keyed(
            "get_equivalent_canonical_courses",
            EntityKind::CanonicalCourse,
            canonical_course_eid,
            |s| s.get_equivalent_canonical_courses(canonical_course_eid)
        )
        .await
    }

    async fn get_canonical_courses(&self, course_set_eid: &str) -> CmResult<Vec<CanonicalCourse>> {
        self.union_keyed(
            "get_canonical_courses",
            EntityKind::CourseSet,
            course_set_eid,
            |s| s.get_canonical_courses(course_set_eid)
        )
        .await
    }

    async fn is_canonical_course_defined(&self, eid: &str) -> CmResult<bool> {
        self.any_answers("is_canonical_course_defined", true, |s| {
            s.is_canonical_course_defined(eid)
        })
        .await
    }

    async fn get_academic_sessions(&self) -> CmResult<Vec<AcademicSession>> {
        let sessions = self
            .union_all("get_academic_sessions", |s| s.get_academic_sessions())
            .await?;
        Ok(by_start_date(sessions))
    }

    async fn get_current_academic_sessions(&self) -> CmResult<Vec<AcademicSession>> {
        let sessions = self
            .union_all("get_current_academic_sessions", |s| {
                s.get_current_academic_sessions()
            })
            .await?;
        Ok(by_start_date(sessions))
    }

    async fn get_academic_session(&self, eid: &str) -> CmResult<AcademicSession> {
        self.first_found(
            "get_academic_session",
            EntityKind::AcademicSession,
            eid,
            |s| s.get_academic_session(eid)
        )
        .await
    }

    async fn is_academic_session_defined(&self, eid: &str) -> CmResult<bool> {
        self.any_answers("is_academic_session_defined", true, |s| {
            s.is_academic_session_defined(eid)
        })
        .await
    }

    async fn get_course_offering(&self, eid: &str) -> CmResult<CourseOffering> {
        self.first_found(
            "get_course_offering",
            EntityKind::CourseOffering,
            eid,
            |s| s.get_course_offering(eid)
        )
        .await
    }

    async fn get_equivalent_course_offerings(
        &self,
        course_offering_eid: &str
    ) -> CmResult<Vec<CourseOffering>> {
        self.union_keyed(
            "get_equivalent_course_offerings",
            EntityKind::CourseOffering,
            course_offering_eid,
            |s| s.get_equivalent_course_offerings(course_offering_eid)
        )
        .await
    }

    async fn get_course_offering_memberships(
        &self,
        course_offering_eid: &str
    ) -> CmResult<Vec<Membership>> {
        self.union_keyed(
            "get_course_offering_memberships",
            EntityKind::CourseOffering,
            course_offering_eid,
            |s| s.get_course_offering_memberships(course_offering_eid)
        )
        .await
    }

    async fn get_course_offerings_in_course_set(
        &self,
        course_set_eid: &str
    ) -> CmResult<Vec<CourseOffering>> {
        self.union_keyed(
            "get_course_offerings_in_course_set",
            EntityKind::CourseSet,
            course_set_eid,
            |s| s.get_course_offerings_in_course_set(course_set_eid)
        )
        .await
    }

    async fn find_course_offerings(
        &self,
        course_set_eid: &str,
        academic_session_eid: &str
    ) -> CmResult<Vec<CourseOffering>> {
        self.union_keyed(
            "find_course_offerings",
            EntityKind::CourseSet,
            course_set_eid,
            |s| s.find_course_offerings(course_set_eid, academic_session_eid)
        )
        .await
    }

    async fn find_active_course_offerings_in_canonical_course(
        &self,
        canonical_course_eid: &str
    ) -> CmResult<Vec<CourseOffering>> {
        self.union_keyed(
            "find_active_course_offerings_in_canonical_course",
            EntityKind::CanonicalCourse,
            canonical_course_eid,
            |s| s.find_active_course_offerings_in_canonical_course(canonical_course_eid)
        )
        .await
    }

    async fn is_course_offering_defined(&self, eid: &str) -> CmResult<bool> {
        self.any_answers("is_course_offering_defined", true, |s| {
            s.is_course_offering_defined(eid)
        })
        .await
    }

    async fn get_section(&self, eid: &str) -> CmResult<Section> {
        self.first_found("get_section", EntityKind::Section, eid, |s| {
            s.get_section(eid)
        })
        .await
    }

    async fn get_sections(&self, course_offering_eid: &str) -> CmResult<Vec<Section>> {
        self.union_keyed(
            "get_sections",
            EntityKind::CourseOffering,
            course_offering_eid,
            |s| s.get_sections(course_offering_eid)
        )
        .await
    }

    async fn get_child_sections(&self, parent_section_eid: &str) -> CmResult<Vec<Section>> {
        self.union_keyed(
            "get_child_sections",
            EntityKind::Section,
            parent_section_eid,
            |s| s.get_child_sections(parent_section_eid)
        )
        .await
    }

    async fn get_section_memberships(&self, section_eid: &str) -> CmResult<Vec<Membership>> {
        self.union_keyed(
            "get_section_memberships",
            EntityKind::Section,
            section_eid,
            |s| s.get_section_memberships(section_eid)
        )
        .await
    }

    async fn get_section_role(&self, section_eid: &str, user_id: &str) -> CmResult<Option<String>> {
        self.first_some("get_section_role", |s| {
            s.get_section_role(section_eid, user_id)
        })
        .await
    }

    async fn get_section_categories(&self) -> CmResult<Vec<String>> {
        self.union_all("get_section_categories", |s| s.get_section_categories())
            .await
    }

    async fn get_section_category_description(&self, code: &str) -> CmResult<Option<String>> {
        self.first_some("get_section_category_description", |s| {
            s.get_section_category_description(code)
        })
        .await
    }

    async fn find_enrolled_sections(&self, user_id: &str) -> CmResult<Vec<Section>> {
        self.union_all("find_enrolled_sections", |s| {
            s.find_enrolled_sections(user_id)
        })
        .await
    }

    async fn find_current_sections_with_member(&self, user_id: &str) -> CmResult<Vec<Section>> {
        self.union_all("find_current_sections_with_member", |s| {
            s.find_current_sections_with_member(user_id)
        })
        .await
    }

    async fn find_instructing_sections(&self, user_id: &str) -> CmResult<Vec<Section>> {
        self.union_all("find_instructing_sections", |s| {
            s.find_instructing_sections(user_id)
        })
        .await
    }

    async fn find_instructing_sections_in_session(
        &self,
        user_id: &str,
        academic_session_eid: &str
    ) -> CmResult<Vec<Section>> {
        self.union_all("find_instructing_sections_in_session", |s| {
            s.find_instructing_sections_in_session(user_id, academic_session_eid)
        })
        .await
    }

    async fn is_section_defined(&self, eid: &str) -> CmResult<bool> {
        self.any_answers("is_section_defined", true, |s| s.is_section_defined(eid))
            .await
    }

    async fn get_enrollment_set(&self, eid: &str) -> CmResult<EnrollmentSet> {
        self.first_found(
            "get_enrollment_set",
            EntityKind::EnrollmentSet,
            eid,
            |s| s.get_enrollment_set(eid)
        )
        .await
    }

    async fn get_enrollment_sets(&self, course_offering_eid: &str) -> CmResult<Vec<EnrollmentSet>> {
        self.union_keyed(
            "get_enrollment_sets",
            EntityKind::CourseOffering,
            course_offering_eid,
            |s| s.get_enrollment_sets(course_offering_eid)
        )
        .await
    }

    async fn get_enrollments(&self, enrollment_set_eid: &str) -> CmResult<Vec<Enrollment>> {
        self.union_keyed(
            "get_enrollments",
            EntityKind::EnrollmentSet,
            enrollment_set_eid,
            |s| s.get_enrollments(enrollment_set_eid)
        )
        .await
    }

    async fn find_enrollment(
        &self,
        user_id: &str,
        enrollment_set_eid: &str
    ) -> CmResult<Option<Enrollment>> {
        self.first_some("find_enrollment", |s| {
            s.find_enrollment(user_id, enrollment_set_eid)
        })
        .await
    }

    async fn get_instructors_of_record_ids(
        &self,
        enrollment_set_eid: &str
    ) -> CmResult<Vec<String>> {
        self.union_keyed(
            "get_instructors_of_record_ids",
            EntityKind::EnrollmentSet,
            enrollment_set_eid,
            |s| s.get_instructors_of_record_ids(enrollment_set_eid)
        )
        .await
    }

    async fn is_enrolled(&self, user_id: &str, enrollment_set_eid: &str) -> CmResult<bool> {
        self.any_answers("is_enrolled", true, |s| {
            s.is_enrolled(user_id, enrollment_set_eid)
        })
        .await
    }

    async fn is_enrolled_in_any(
        &self,
        user_id: &str,
        enrollment_set_eids: &[String]
    ) -> CmResult<bool> {
        self.any_answers("is_enrolled_in_any", true, |s| {
            s.is_enrolled_in_any(user_id, enrollment_set_eids)
        })
        .await
    }

    async fn find_currently_enrolled_enrollment_sets(
        &self,
        user_id: &str
    ) -> CmResult<Vec<EnrollmentSet>> {
        self.union_all("find_currently_enrolled_enrollment_sets", |s| {
            s.find_currently_enrolled_enrollment_sets(user_id)
        })
        .await
    }

    async fn is_enrollment_set_defined(&self, eid: &str) -> CmResult<bool> {
        self.any_answers("is_enrollment_set_defined", true, |s| {
            s.is_enrollment_set_defined(eid)
        })
        .await
    }

    async fn find_course_set_roles(&self, user_id: &str) -> CmResult<HashMap<String, String>> {
        self.merge_roles("find_course_set_roles", |s| {
            s.find_course_set_roles(user_id)
        })
        .await
    }

    async fn find_course_offering_roles(&self, user_id: &str) -> CmResult<HashMap<String, String>> {
        self.merge_roles("find_course_offering_roles", |s| {
            s.find_course_offering_roles(user_id)
        })
        .await
    }

    async fn find_section_roles(&self, user_id: &str) -> CmResult<HashMap<String, String>> {
        self.merge_roles("find_section_roles", |s| s.find_section_roles(user_id))
            .await
    }
}

/// Stable sort; sessions without a start date come first.
fn by_start_date(mut sessions: Vec<AcademicSession>) -> Vec<AcademicSession> {
    sessions.sort_by_key(|s| s.start_date);
    sessions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn session(eid: &str, start: Option<(i32, u32, u32)>) -> AcademicSession {
        AcademicSession {
            eid: eid.to_string(),
            title: eid.to_string(),
            description: String::new(),
            start_date: start.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            end_date: None,
            current: false
        }
    }

    #[test]
    fn test_sessions_sort_with_missing_dates_first() {
        let sorted = by_start_date(vec![
            session("a", None),
            session("b", Some((2020, 1, 1))),
            session("c", None),
            session("d", Some((2010, 1, 1)))
        ]);
        let order: Vec<_> = sorted.iter().map(|s| s.eid.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "d", "b"]);
    }

    #[tokio::test]
    async fn test_no_sources_means_nothing_is_found() {
        let federated = FederatedCourseManagement::new(Vec::new());
        assert!(federated.get_section("x").await.unwrap_err().is_not_found());
        assert!(federated.get_course_sets().await.unwrap().is_empty());
        assert!(federated.is_empty("x").await.unwrap());
        assert!(!federated.is_section_defined("x").await.unwrap());
    }
}
