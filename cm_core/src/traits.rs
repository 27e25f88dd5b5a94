//! Query facade over course management data.

use async_trait::async_trait;
use errors::{CmError, CmResult};
use std::collections::HashMap;

use crate::types::{
    AcademicSession, CanonicalCourse, CourseOffering, CourseSet, Enrollment, EnrollmentSet,
    Membership, Section
};

/// Read-only queries over course management data, keyed by eid.
///
/// Unknown ids are reported as [`CmError::NotFound`]. A source that has no
/// opinion on a query answers [`CmError::Unsupported`]; that is what every
/// method does unless the implementation overrides it, so partial sources
/// only implement what they hold. Collections have set semantics: no two
/// elements share an [`Identified::identity`](crate::Identified).
///
/// Role maps map a container eid to the user's role in that container.
#[async_trait]
pub trait CourseManagementQuery: Send + Sync {
    /// Name used in logs, metrics and fault reports.
    fn source_name(&self) -> &str;

    // Course sets

    async fn get_course_sets(&self) -> CmResult<Vec<CourseSet>> {
        Err(CmError::unsupported("get_course_sets"))
    }

    async fn get_course_set(&self, eid: &str) -> CmResult<CourseSet> {
        let _ = eid;
        Err(CmError::unsupported("get_course_set"))
    }

    async fn get_child_course_sets(&self, parent_eid: &str) -> CmResult<Vec<CourseSet>> {
        let _ = parent_eid;
        Err(CmError::unsupported("get_child_course_sets"))
    }

    async fn get_course_set_memberships(&self, course_set_eid: &str) -> CmResult<Vec<Membership>> {
        let _ = course_set_eid;
        Err(CmError::unsupported("get_course_set_memberships"))
    }

    /// True when the course set has no canonical courses, offerings or
    /// child course sets. Unknown course sets are empty.
    async fn is_empty(&self, course_set_eid: &str) -> CmResult<bool> {
        let _ = course_set_eid;
        Err(CmError::unsupported("is_empty"))
    }

    /// Course sets in a category, sorted by title.
    async fn find_course_sets(&self, category: &str) -> CmResult<Vec<CourseSet>> {
        let _ = category;
        Err(CmError::unsupported("find_course_sets"))
    }

    async fn is_course_set_defined(&self, eid: &str) -> CmResult<bool> {
        defined(self.get_course_set(eid).await)
    }

    // Canonical courses

    async fn get_canonical_course(&self, eid: &str) -> CmResult<CanonicalCourse> {
        let _ = eid;
        Err(CmError::unsupported("get_canonical_course"))
    }

    /// Cross-listed canonical courses, excluding the one asked about.
    async fn get_equivalent_canonical_courses(
        &self,
        canonical_course_eid: &str
    ) -> CmResult<Vec<CanonicalCourse>> {
        let _ = canonical_course_eid;
        Err(CmError::unsupported("get_equivalent_canonical_courses"))
    }

    async fn get_canonical_courses(&self, course_set_eid: &str) -> CmResult<Vec<CanonicalCourse>> {
        let _ = course_set_eid;
        Err(CmError::unsupported("get_canonical_courses"))
    }

    async fn is_canonical_course_defined(&self, eid: &str) -> CmResult<bool> {
        defined(self.get_canonical_course(eid).await)
    }

    // Academic sessions

    /// All academic sessions, sorted by start date (absent dates first).
    async fn get_academic_sessions(&self) -> CmResult<Vec<AcademicSession>> {
        Err(CmError::unsupported("get_academic_sessions"))
    }

    /// Sessions flagged current, sorted like [`Self::get_academic_sessions`].
    async fn get_current_academic_sessions(&self) -> CmResult<Vec<AcademicSession>> {
        Err(CmError::unsupported("get_current_academic_sessions"))
    }

    async fn get_academic_session(&self, eid: &str) -> CmResult<AcademicSession> {
        let _ = eid;
        Err(CmError::unsupported("get_academic_session"))
    }

    async fn is_academic_session_defined(&self, eid: &str) -> CmResult<bool> {
        defined(self.get_academic_session(eid).await)
    }

    // Course offerings

    async fn get_course_offering(&self, eid: &str) -> CmResult<CourseOffering> {
        let _ = eid;
        Err(CmError::unsupported("get_course_offering"))
    }

    async fn get_equivalent_course_offerings(
        &self,
        course_offering_eid: &str
    ) -> CmResult<Vec<CourseOffering>> {
        let _ = course_offering_eid;
        Err(CmError::unsupported("get_equivalent_course_offerings"))
    }

    async fn get_course_offering_memberships(
        &self,
        course_offering_eid: &str
    ) -> CmResult<Vec<Membership>> {
        let _ = course_offering_eid;
        Err(CmError::unsupported("get_course_offering_memberships"))
    }

    async fn get_course_offerings_in_course_set(
        &self,
        course_set_eid: &str
    ) -> CmResult<Vec<CourseOffering>> {
        let _ = course_set_eid;
        Err(CmError::unsupported("get_course_offerings_in_course_set"))
    }

    /// Offerings of a course set taught in one academic session. NotFound
    /// refers to the course set.
    async fn find_course_offerings(
        &self,
        course_set_eid: &str,
        academic_session_eid: &str
    ) -> CmResult<Vec<CourseOffering>> {
        let _ = (course_set_eid, academic_session_eid);
        Err(CmError::unsupported("find_course_offerings"))
    }

    /// Offerings of a canonical course whose session is current.
    async fn find_active_course_offerings_in_canonical_course(
        &self,
        canonical_course_eid: &str
    ) -> CmResult<Vec<CourseOffering>> {
        let _ = canonical_course_eid;
        Err(CmError::unsupported(
            "find_active_course_offerings_in_canonical_course"
        ))
    }

    async fn is_course_offering_defined(&self, eid: &str) -> CmResult<bool> {
        defined(self.get_course_offering(eid).await)
    }

    // Sections

    async fn get_section(&self, eid: &str) -> CmResult<Section> {
        let _ = eid;
        Err(CmError::unsupported("get_section"))
    }

    async fn get_sections(&self, course_offering_eid: &str) -> CmResult<Vec<Section>> {
        let _ = course_offering_eid;
        Err(CmError::unsupported("get_sections"))
    }

    async fn get_child_sections(&self, parent_section_eid: &str) -> CmResult<Vec<Section>> {
        let _ = parent_section_eid;
        Err(CmError::unsupported("get_child_sections"))
    }

    async fn get_section_memberships(&self, section_eid: &str) -> CmResult<Vec<Membership>> {
        let _ = section_eid;
        Err(CmError::unsupported("get_section_memberships"))
    }

    /// The user's direct membership role in a section, if any.
    async fn get_section_role(&self, section_eid: &str, user_id: &str) -> CmResult<Option<String>> {
        let _ = (section_eid, user_id);
        Err(CmError::unsupported("get_section_role"))
    }

    async fn get_section_categories(&self) -> CmResult<Vec<String>> {
        Err(CmError::unsupported("get_section_categories"))
    }

    async fn get_section_category_description(&self, code: &str) -> CmResult<Option<String>> {
        let _ = code;
        Err(CmError::unsupported("get_section_category_description"))
    }

    /// Sections whose enrollment set holds a current (non-dropped) enrollment
    /// for the user.
    async fn find_enrolled_sections(&self, user_id: &str) -> CmResult<Vec<Section>> {
        let _ = user_id;
        Err(CmError::unsupported("find_enrolled_sections"))
    }

    /// Sections in current academic sessions where the user has a membership.
    async fn find_current_sections_with_member(&self, user_id: &str) -> CmResult<Vec<Section>> {
        let _ = user_id;
        Err(CmError::unsupported("find_current_sections_with_member"))
    }

    /// Sections whose enrollment set lists the user as an official grader.
    async fn find_instructing_sections(&self, user_id: &str) -> CmResult<Vec<Section>> {
        let _ = user_id;
        Err(CmError::unsupported("find_instructing_sections"))
    }

    async fn find_instructing_sections_in_session(
        &self,
        user_id: &str,
        academic_session_eid: &str
    ) -> CmResult<Vec<Section>> {
        let _ = (user_id, academic_session_eid);
        Err(CmError::unsupported("find_instructing_sections_in_session"))
    }

    async fn is_section_defined(&self, eid: &str) -> CmResult<bool> {
        defined(self.get_section(eid).await)
    }

    // Enrollment sets and enrollments

    async fn get_enrollment_set(&self, eid: &str) -> CmResult<EnrollmentSet> {
        let _ = eid;
        Err(CmError::unsupported("get_enrollment_set"))
    }

    async fn get_enrollment_sets(&self, course_offering_eid: &str) -> CmResult<Vec<EnrollmentSet>> {
        let _ = course_offering_eid;
        Err(CmError::unsupported("get_enrollment_sets"))
    }

    async fn get_enrollments(&self, enrollment_set_eid: &str) -> CmResult<Vec<Enrollment>> {
        let _ = enrollment_set_eid;
        Err(CmError::unsupported("get_enrollments"))
    }

    async fn find_enrollment(
        &self,
        user_id: &str,
        enrollment_set_eid: &str
    ) -> CmResult<Option<Enrollment>> {
        let _ = (user_id, enrollment_set_eid);
        Err(CmError::unsupported("find_enrollment"))
    }

    async fn get_instructors_of_record_ids(
        &self,
        enrollment_set_eid: &str
    ) -> CmResult<Vec<String>> {
        let _ = enrollment_set_eid;
        Err(CmError::unsupported("get_instructors_of_record_ids"))
    }

    /// True when the user has a non-dropped enrollment in the set.
    async fn is_enrolled(&self, user_id: &str, enrollment_set_eid: &str) -> CmResult<bool> {
        let _ = (user_id, enrollment_set_eid);
        Err(CmError::unsupported("is_enrolled"))
    }

    async fn is_enrolled_in_any(
        &self,
        user_id: &str,
        enrollment_set_eids: &[String]
    ) -> CmResult<bool> {
        let _ = (user_id, enrollment_set_eids);
        Err(CmError::unsupported("is_enrolled_in_any"))
    }

    async fn find_currently_enrolled_enrollment_sets(
        &self,
        user_id: &str
    ) -> CmResult<Vec<EnrollmentSet>> {
        let _ = user_id;
        Err(CmError::unsupported("find_currently_enrolled_enrollment_sets"))
    }

    async fn is_enrollment_set_defined(&self, eid: &str) -> CmResult<bool> {
        defined(self.get_enrollment_set(eid).await)
    }

    // Role maps

    async fn find_course_set_roles(&self, user_id: &str) -> CmResult<HashMap<String, String>> {
        let _ = user_id;
        Err(CmError::unsupported("find_course_set_roles"))
    }

    async fn find_course_offering_roles(&self, user_id: &str) -> CmResult<HashMap<String, String>> {
        let _ = user_id;
        Err(CmError::unsupported("find_course_offering_roles"))
    }

    async fn find_section_roles(&self, user_id: &str) -> CmResult<HashMap<String, String>> {
        let _ = user_id;
        Err(CmError::unsupported("find_section_roles"))
    }
}

/// Maps a point lookup onto an existence check. NotFound means "not
/// defined"; other signals pass through.
fn defined<T>(lookup: CmResult<T>) -> CmResult<bool> {
    match lookup {
        Ok(_) => Ok(true),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errors::EntityKind;

    struct Empty;

    #[async_trait]
    impl CourseManagementQuery for Empty {
        fn source_name(&self) -> &str {
            "empty"
        }

        async fn get_section(&self, eid: &str) -> CmResult<Section> {
            Err(CmError::not_found(EntityKind::Section, eid))
        }
    }

    #[tokio::test]
    async fn test_unimplemented_queries_are_unsupported() {
        let err = Empty.get_course_sets().await.unwrap_err();
        assert_eq!(err, CmError::unsupported("get_course_sets"));
    }

    #[tokio::test]
    async fn test_defined_checks_follow_point_lookups() {
        assert!(!Empty.is_section_defined("s1").await.unwrap());
        assert!(
            Empty
                .is_course_set_defined("cs1")
                .await
                .unwrap_err()
                .is_unsupported()
        );
    }
}
