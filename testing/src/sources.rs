use async_trait::async_trait;
use cm_core::{
    AcademicSession, CmError, CmResult, CourseManagementQuery, CourseSet, Enrollment, Membership,
    Section
};
use std::collections::HashMap;

/// Source that implements nothing; every query answers Unsupported.
pub struct SilentSource {
    name: String
}

impl SilentSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl CourseManagementQuery for SilentSource {
    fn source_name(&self) -> &str {
        &self.name
    }
}

/// Source whose backend is down.
///
/// Lookups used by role resolution and the federation tests answer a fault.
/// The remaining queries fall back to Unsupported.
pub struct FaultySource {
    name: String,
    reason: String
}

impl FaultySource {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into()
        }
    }

    fn fail<T>(&self) -> CmResult<T> {
        Err(CmError::fault(&self.name, &self.reason))
    }
}

#[async_trait]
impl CourseManagementQuery for FaultySource {
    fn source_name(&self) -> &str {
        &self.name
    }

    async fn get_course_set(&self, _eid: &str) -> CmResult<CourseSet> {
        self.fail()
    }

    async fn get_academic_sessions(&self) -> CmResult<Vec<AcademicSession>> {
        self.fail()
    }

    async fn get_section(&self, _eid: &str) -> CmResult<Section> {
        self.fail()
    }

    async fn get_sections(&self, _course_offering_eid: &str) -> CmResult<Vec<Section>> {
        self.fail()
    }

    async fn get_section_memberships(&self, _section_eid: &str) -> CmResult<Vec<Membership>> {
        self.fail()
    }

    async fn get_section_role(
        &self,
        _section_eid: &str,
        _user_id: &str
    ) -> CmResult<Option<String>> {
        self.fail()
    }

    async fn find_enrolled_sections(&self, _user_id: &str) -> CmResult<Vec<Section>> {
        self.fail()
    }

    async fn find_current_sections_with_member(&self, _user_id: &str) -> CmResult<Vec<Section>> {
        self.fail()
    }

    async fn find_instructing_sections(&self, _user_id: &str) -> CmResult<Vec<Section>> {
        self.fail()
    }

    async fn get_enrollments(&self, _enrollment_set_eid: &str) -> CmResult<Vec<Enrollment>> {
        self.fail()
    }

    async fn get_instructors_of_record_ids(
        &self,
        _enrollment_set_eid: &str
    ) -> CmResult<Vec<String>> {
        self.fail()
    }

    async fn is_enrolled(&self, _user_id: &str, _enrollment_set_eid: &str) -> CmResult<bool> {
        self.fail()
    }

    async fn find_section_roles(&self, _user_id: &str) -> CmResult<HashMap<String, String>> {
        self.fail()
    }
}
