//! In-memory course management source.
//!
//! Holds a complete course management catalog behind a `RwLock` and answers
//! every [`CourseManagementQuery`] operation. Administrative mutations keep
//! the one-record-per-key invariants: one enrollment per (user, enrollment
//! set) and one membership per (user, container).

use async_trait::async_trait;
use cm_core::{
    AcademicSession, CanonicalCourse, CmError, CmResult, ContainerKind, ContainerRef,
    CourseManagementQuery, CourseOffering, CourseSet, EntityKind, Enrollment, EnrollmentSet,
    Membership, Section
};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Default)]
struct Catalog {
    sessions: BTreeMap<String, AcademicSession>,
    course_sets: BTreeMap<String, CourseSet>,
    canonical_courses: BTreeMap<String, CanonicalCourse>,
    offerings: BTreeMap<String, CourseOffering>,
    sections: BTreeMap<String, Section>,
    enrollment_sets: BTreeMap<String, EnrollmentSet>,
    section_categories: BTreeMap<String, String>,

    /// course set eid -> canonical course eids
    canonical_in_set: BTreeMap<String, BTreeSet<String>>,
    /// course set eid -> course offering eids
    offerings_in_set: BTreeMap<String, BTreeSet<String>>,
    /// cross listings; symmetric
    canonical_equivalents: BTreeMap<String, BTreeSet<String>>,
    offering_equivalents: BTreeMap<String, BTreeSet<String>>,

    /// (enrollment set eid, user id) -> enrollment
    enrollments: BTreeMap<(String, String), Enrollment>,
    /// container -> user id -> membership
    memberships: BTreeMap<ContainerRef, BTreeMap<String, Membership>>
}

impl Catalog {
    fn require<'a, T>(
        map: &'a BTreeMap<String, T>,
        kind: EntityKind,
        eid: &str
    ) -> CmResult<&'a T> {
        map.get(eid).ok_or_else(|| CmError::not_found(kind, eid))
    }

    fn members_of(&self, container: &ContainerRef) -> Vec<Membership> {
        self.memberships
            .get(container)
            .map(|by_user| by_user.values().cloned().collect())
            .unwrap_or_default()
    }

    fn roles_of(&self, kind: ContainerKind, user_id: &str) -> HashMap<String, String> {
        self.memberships
            .iter()
            .filter(|(container, _)| container.kind == kind)
            .filter_map(|(container, by_user)| {
                by_user
                    .get(user_id)
                    .map(|m| (container.eid.clone(), m.role.clone()))
            })
            .collect()
    }

    fn is_current_offering(&self, offering_eid: &str) -> bool {
        self.offerings
            .get(offering_eid)
            .and_then(|o| o.academic_session_eid.as_ref())
            .and_then(|session_eid| self.sessions.get(session_eid))
            .is_some_and(|session| session.current)
    }

    fn sections_matching(&self, predicate: impl Fn(&Section) -> bool) -> Vec<Section> {
        self.sections
            .values()
            .filter(|s| predicate(s))
            .cloned()
            .collect()
    }

    fn has_current_enrollment(&self, enrollment_set_eid: &str, user_id: &str) -> bool {
        self.enrollments
            .get(&(enrollment_set_eid.to_string(), user_id.to_string()))
            .is_some_and(|e| !e.dropped)
    }

    fn linked(links: &BTreeMap<String, BTreeSet<String>>, eid: &str) -> BTreeSet<String> {
        links.get(eid).cloned().unwrap_or_default()
    }
}

/// Course management source backed by process memory.
///
/// Operations named in [`InMemoryCourseManagement::with_unsupported`]
/// answer [`CmError::Unsupported`], which lets one catalog stand in for a
/// partial source in a federation.
pub struct InMemoryCourseManagement {
    name: String,
    catalog: RwLock<Catalog>,
    unsupported: HashSet<String>
}

impl InMemoryCourseManagement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            catalog: RwLock::new(Catalog::default()),
            unsupported: HashSet::new()
        }
    }

    #[must_use]
    pub fn with_unsupported<I, S>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        self.unsupported
            .extend(operations.into_iter().map(Into::into));
        self
    }

    fn supports(&self, operation: &str) -> CmResult<()> {
        if self.unsupported.contains(operation) {
            Err(CmError::unsupported(operation))
        } else {
            Ok(())
        }
    }

    // Administrative mutations

    pub fn upsert_academic_session(&self, session: AcademicSession) {
        debug!(source = %self.name, eid = %session.eid, "Saving academic session");
        self.catalog
            .write()
            .sessions
            .insert(session.eid.clone(), session);
    }

    /// Fails with NotFound when the parent course set is unknown.
    pub fn upsert_course_set(&self, course_set: CourseSet) -> CmResult<()> {
        let mut catalog = self.catalog.write();
        if let Some(parent) = &course_set.parent_eid {
            Catalog::require(&catalog.course_sets, EntityKind::CourseSet, parent)?;
        }
        debug!(source = %self.name, eid = %course_set.eid, "Saving course set");
        catalog
            .course_sets
            .insert(course_set.eid.clone(), course_set);
        Ok(())
    }

    pub fn upsert_canonical_course(&self, course: CanonicalCourse) {
        debug!(source = %self.name, eid = %course.eid, "Saving canonical course");
        self.catalog
            .write()
            .canonical_courses
            .insert(course.eid.clone(), course);
    }

    /// Fails with NotFound when the canonical course or the academic session
    /// is unknown.
    pub fn upsert_course_offering(&self, offering: CourseOffering) -> CmResult<()> {
        let mut catalog = self.catalog.write();
        Catalog::require(
            &catalog.canonical_courses,
            EntityKind::CanonicalCourse,
            &offering.canonical_course_eid
        )?;
        if let Some(session) = &offering.academic_session_eid {
            Catalog::require(&catalog.sessions, EntityKind::AcademicSession, session)?;
        }
        debug!(source = %self.name, eid = %offering.eid, "Saving course offering");
        catalog.offerings.insert(offering.eid.clone(), offering);
        Ok(())
    }

    /// Fails with NotFound when the course offering is unknown.
    pub fn upsert_enrollment_set(&self, enrollment_set: EnrollmentSet) -> CmResult<()> {
        let mut catalog = self.catalog.write();
        Catalog::require(
            &catalog.offerings,
            EntityKind::CourseOffering,
            &enrollment_set.course_offering_eid
        )?;
        debug!(source = %self.name, eid = %enrollment_set.eid, "Saving enrollment set");
        catalog
            .enrollment_sets
            .insert(enrollment_set.eid.clone(), enrollment_set);
        Ok(())
    }

    /// Fails with NotFound when the offering, the parent section or the
    /// attached enrollment set is unknown.
    pub fn upsert_section(&self, section: Section) -> CmResult<()> {
        let mut catalog = self.catalog.write();
        Catalog::require(
            &catalog.offerings,
            EntityKind::CourseOffering,
            &section.course_offering_eid
        )?;
        if let Some(parent) = &section.parent_eid {
            Catalog::require(&catalog.sections, EntityKind::Section, parent)?;
        }
        if let Some(set) = &section.enrollment_set_eid {
            Catalog::require(&catalog.enrollment_sets, EntityKind::EnrollmentSet, set)?;
        }
        debug!(source = %self.name, eid = %section.eid, "Saving section");
        catalog.sections.insert(section.eid.clone(), section);
        Ok(())
    }

    pub fn add_section_category(&self, code: impl Into<String>, description: impl Into<String>) {
        self.catalog
            .write()
            .section_categories
            .insert(code.into(), description.into());
    }

    pub fn add_canonical_course_to_course_set(
        &self,
        course_set_eid: &str,
        canonical_course_eid: &str
    ) -> CmResult<()> {
        let mut catalog = self.catalog.write();
        Catalog::require(&catalog.course_sets, EntityKind::CourseSet, course_set_eid)?;
        Catalog::require(
            &catalog.canonical_courses,
            EntityKind::CanonicalCourse,
            canonical_course_eid
        )?;
        catalog
            .canonical_in_set
            .entry(course_set_eid.to_string())
            .or_default()
            .insert(canonical_course_eid.to_string());
        Ok(())
    }

    pub fn add_course_offering_to_course_set(
        &self,
        course_set_eid: &str,
        course_offering_eid: &str
    ) -> CmResult<()> {
        let mut catalog = self.catalog.write();
        Catalog::require(&catalog.course_sets, EntityKind::CourseSet, course_set_eid)?;
        Catalog::require(
            &catalog.offerings,
            EntityKind::CourseOffering,
            course_offering_eid
        )?;
        catalog
            .offerings_in_set
            .entry(course_set_eid.to_string())
            .or_default()
            .insert(course_offering_eid.to_string());
        Ok(())
    }

    /// Cross-lists canonical courses; every course becomes equivalent to
    /// every other one in the list.
    pub fn set_equivalent_canonical_courses(&self, eids: &[&str]) -> CmResult<()> {
        let mut catalog = self.catalog.write();
        for eid in eids {
            Catalog::require(&catalog.canonical_courses, EntityKind::CanonicalCourse, eid)?;
        }
        link_all(&mut catalog.canonical_equivalents, eids);
        Ok(())
    }

    pub fn set_equivalent_course_offerings(&self, eids: &[&str]) -> CmResult<()> {
        let mut catalog = self.catalog.write();
        for eid in eids {
            Catalog::require(&catalog.offerings, EntityKind::CourseOffering, eid)?;
        }
        link_all(&mut catalog.offering_equivalents, eids);
        Ok(())
    }

    /// Adds the enrollment, or replaces the existing one for the same user
    /// and enrollment set.
    pub fn add_or_update_enrollment(&self, enrollment: Enrollment) -> CmResult<()> {
        let mut catalog = self.catalog.write();
        Catalog::require(
            &catalog.enrollment_sets,
            EntityKind::EnrollmentSet,
            &enrollment.enrollment_set_eid
        )?;
        debug!(
            source = %self.name,
            user_id = %enrollment.user_id,
            enrollment_set_eid = %enrollment.enrollment_set_eid,
            "Saving enrollment"
        );
        let key = (
            enrollment.enrollment_set_eid.clone(),
            enrollment.user_id.clone()
        );
        catalog.enrollments.insert(key, enrollment);
        Ok(())
    }

    /// Returns whether an enrollment was removed.
    pub fn remove_enrollment(&self, user_id: &str, enrollment_set_eid: &str) -> bool {
        self.catalog
            .write()
            .enrollments
            .remove(&(enrollment_set_eid.to_string(), user_id.to_string()))
            .is_some()
    }

    /// Adds the membership, or replaces the existing one for the same user
    /// and container.
    pub fn add_or_update_membership(&self, membership: Membership) -> CmResult<()> {
        let mut catalog = self.catalog.write();
        let container = &membership.container;
        match container.kind {
            ContainerKind::CourseSet => {
                Catalog::require(&catalog.course_sets, EntityKind::CourseSet, &container.eid)?;
            }
            ContainerKind::CourseOffering => {
                Catalog::require(
                    &catalog.offerings,
                    EntityKind::CourseOffering,
                    &container.eid
                )?;
            }
            ContainerKind::Section => {
                Catalog::require(&catalog.sections, EntityKind::Section, &container.eid)?;
            }
        }
        debug!(
            source = %self.name,
            user_id = %membership.user_id,
            container = %container.eid,
            role = %membership.role,
            "Saving membership"
        );
        catalog
            .memberships
            .entry(container.clone())
            .or_default()
            .insert(membership.user_id.clone(), membership);
        Ok(())
    }

    /// Returns whether a membership was removed.
    pub fn remove_membership(&self, user_id: &str, container: &ContainerRef) -> bool {
        self.catalog
            .write()
            .memberships
            .get_mut(container)
            .and_then(|by_user| by_user.remove(user_id))
            .is_some()
    }
}

fn link_all(links: &mut BTreeMap<String, BTreeSet<String>>, eids: &[&str]) {
    for eid in eids {
        let others = eids.iter().filter(|other| *other != eid).map(|o| o.to_string());
        links.entry(eid.to_string()).or_default().extend(others);
    }
}

fn sorted_by_start(mut sessions: Vec<AcademicSession>) -> Vec<AcademicSession> {
    // None < Some, so absent start dates come first
    sessions.sort_by_key(|s| s.start_date);
    sessions
}

#[async_trait]
impl CourseManagementQuery for InMemoryCourseManagement {
    fn source_name(&self) -> &str {
        &self.name
    }

    async fn get_course_sets(&self) -> CmResult<Vec<CourseSet>> {
        self.supports("get_course_sets")?;
        Ok(self.catalog.read().course_sets.values().cloned().collect())
    }

    async fn get_course_set(&self, eid: &str) -> CmResult<CourseSet> {
        self.supports("get_course_set")?;
        let catalog = self.catalog.read();
        Catalog::require(&catalog.course_sets, EntityKind::CourseSet, eid).cloned()
    }

    async fn get_child_course_sets(&self, parent_eid: &str) -> CmResult<Vec<CourseSet>> {
        self.supports("get_child_course_sets")?;
        let catalog = self.catalog.read();
        Catalog::require(&catalog.course_sets, EntityKind::CourseSet, parent_eid)?;
        Ok(catalog
            .course_sets
            .values()
            .filter(|cs| cs.parent_eid.as_deref() == Some(parent_eid))
            .cloned()
            .collect())
    }

    async fn get_course_set_memberships(&self, course_set_eid: &str) -> CmResult<Vec<Membership>> {
        self.supports("get_course_set_memberships")?;
        let catalog = self.catalog.read();
        Catalog::require(&catalog.course_sets, EntityKind::CourseSet, course_set_eid)?;
        Ok(catalog.members_of(&ContainerRef::course_set(course_set_eid)))
    }

    async fn is_empty(&self, course_set_eid: &str) -> CmResult<bool> {
        self.supports("is_empty")?;
        let catalog = self.catalog.read();
        let has_courses = catalog
            .canonical_in_set
            .get(course_set_eid)
            .is_some_and(|c| !c.is_empty());
        let has_offerings = catalog
            .offerings_in_set
            .get(course_set_eid)
            .is_some_and(|o| !o.is_empty());
        let has_children = catalog
            .course_sets
            .values()
            .any(|cs| cs.parent_eid.as_deref() == Some(course_set_eid));
        Ok(!(has_courses || has_offerings || has_children))
    }

    async fn find_course_sets(&self, category: &str) -> CmResult<Vec<CourseSet>> {
        self.supports("find_course_sets")?;
        let mut found: Vec<CourseSet> = self
            .catalog
            .read()
            .course_sets
            .values()
            .filter(|cs| cs.category.as_deref() == Some(category))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(found)
    }

    async fn get_canonical_course(&self, eid: &str) -> CmResult<CanonicalCourse> {
        self.supports("get_canonical_course")?;
        let catalog = self.catalog.read();
        Catalog::require(&catalog.canonical_courses, EntityKind::CanonicalCourse, eid).cloned()
    }

    async fn get_equivalent_canonical_courses(
        &self,
        canonical_course_eid: &str
    ) -> CmResult<Vec<CanonicalCourse>> {
        self.supports("get_equivalent_canonical_courses")?;
        let catalog = self.catalog.read();
        Catalog::require(
            &catalog.canonical_courses,
            EntityKind::CanonicalCourse,
            canonical_course_eid
        )?;
        Ok(
            Catalog::linked(&catalog.canonical_equivalents, canonical_course_eid)
                .iter()
                .filter_map(|eid| catalog.canonical_courses.get(eid).cloned())
                .collect()
        )
    }

    async fn get_canonical_courses(&self, course_set_eid: &str) -> CmResult<Vec<CanonicalCourse>> {
        self.supports("get_canonical_courses")?;
        let catalog = self.catalog.read();
        Catalog::require(&catalog.course_sets, EntityKind::CourseSet, course_set_eid)?;
        Ok(Catalog::linked(&catalog.canonical_in_set, course_set_eid)
            .iter()
            .filter_map(|eid| catalog.canonical_courses.get(eid).cloned())
            .collect())
    }

    async fn get_academic_sessions(&self) -> CmResult<Vec<AcademicSession>> {
        self.supports("get_academic_sessions")?;
        let sessions = self.catalog.read().sessions.values().cloned().collect();
        Ok(sorted_by_start(sessions))
    }

    async fn get_current_academic_sessions(&self) -> CmResult<Vec<AcademicSession>> {
        self.supports("get_current_academic_sessions")?;
        let sessions = self
            .catalog
            .read()
            .sessions
            .values()
            .filter(|s| s.current)
            .cloned()
            .collect();
        Ok(sorted_by_start(sessions))
    }

    async fn get_academic_session(&self, eid: &str) -> CmResult<AcademicSession> {
        self.supports("get_academic_session")?;
        let catalog = self.catalog.read();
        Catalog::require(&catalog.sessions, EntityKind::AcademicSession, eid).cloned()
    }

    async fn get_course_offering(&self, eid: &str) -> CmResult<CourseOffering> {
        self.supports("get_course_offering")?;
        let catalog = self.catalog.read();
        Catalog::require(&catalog.offerings, EntityKind::CourseOffering, eid).cloned()
    }

    async fn get_equivalent_course_offerings(
        &self,
        course_offering_eid: &str
    ) -> CmResult<Vec<CourseOffering>> {
        self.supports("get_equivalent_course_offerings")?;
        let catalog = self.catalog.read();
        Catalog::require(
            &catalog.offerings,
            EntityKind::CourseOffering,
            course_offering_eid
        )?;
        Ok(
            Catalog::linked(&catalog.offering_equivalents, course_offering_eid)
                .iter()
                .filter_map(|eid| catalog.offerings.get(eid).cloned())
                .collect()
        )
    }

    async fn get_course_offering_memberships(
        &self,
        course_offering_eid: &str
    ) -> CmResult<Vec<Membership>> {
        self.supports("get_course_offering_memberships")?;
        let catalog = self.catalog.read();
        Catalog::require(
            &catalog.offerings,
            EntityKind::CourseOffering,
            course_offering_eid
        )?;
        Ok(catalog.members_of(&ContainerRef::course_offering(course_offering_eid)))
    }

    async fn get_course_offerings_in_course_set(
        &self,
        course_set_eid: &str
    ) -> CmResult<Vec<CourseOffering>> {
        self.supports("get_course_offerings_in_course_set")?;
        let catalog = self.catalog.read();
        Catalog::require(&catalog.course_sets, EntityKind::CourseSet, course_set_eid)?;
        Ok(Catalog::linked(&catalog.offerings_in_set, course_set_eid)
            .iter()
            .filter_map(|eid| catalog.offerings.get(eid).cloned())
            .collect())
    }

    async fn find_course_offerings(
        &self,
        course_set_eid: &str,
        academic_session_eid: &str
    ) -> CmResult<Vec<CourseOffering>> {
        self.supports("find_course_offerings")?;
        let catalog = self.catalog.read();
        Catalog::require(&catalog.course_sets, EntityKind::CourseSet, course_set_eid)?;
        Ok(Catalog::linked(&catalog.offerings_in_set, course_set_eid)
            .iter()
            .filter_map(|eid| catalog.offerings.get(eid))
            .filter(|o| o.academic_session_eid.as_deref() == Some(academic_session_eid))
            .cloned()
            .collect())
    }

    async fn find_active_course_offerings_in_canonical_course(
        &self,
        canonical_course_eid: &str
    ) -> CmResult<Vec<CourseOffering>> {
        self.supports("find_active_course_offerings_in_canonical_course")?;
        let catalog = self.catalog.read();
        Catalog::require(
            &catalog.canonical_courses,
            EntityKind::CanonicalCourse,
            canonical_course_eid
        )?;
        Ok(catalog
            .offerings
            .values()
            .filter(|o| o.canonical_course_eid == canonical_course_eid)
            .filter(|o| catalog.is_current_offering(&o.eid))
            .cloned()
            .collect())
    }

    async fn get_section(&self, eid: &str) -> CmResult<Section> {
        self.supports("get_section")?;
        let catalog = self.catalog.read();
        Catalog::require(&catalog.sections, EntityKind::Section, eid).cloned()
    }

    async fn get_sections(&self, course_offering_eid: &str) -> CmResult<Vec<Section>> {
        self.supports("get_sections")?;
        let catalog = self.catalog.read();
        Catalog::require(
            &catalog.offerings,
            EntityKind::CourseOffering,
            course_offering_eid
        )?;
        Ok(catalog.sections_matching(|s| s.course_offering_eid == course_offering_eid))
    }

    async fn get_child_sections(&self, parent_section_eid: &str) -> CmResult<Vec<Section>> {
        self.supports("get_child_sections")?;
        let catalog = self.catalog.read();
        Catalog::require(&catalog.sections, EntityKind::Section, parent_section_eid)?;
        Ok(catalog.sections_matching(|s| s.parent_eid.as_deref() == Some(parent_section_eid)))
    }

    async fn get_section_memberships(&self, section_eid: &str) -> CmResult<Vec<Membership>> {
        self.supports("get_section_memberships")?;
        let catalog = self.catalog.read();
        Catalog::require(&catalog.sections, EntityKind::Section, section_eid)?;
        Ok(catalog.members_of(&ContainerRef::section(section_eid)))
    }

    async fn get_section_role(&self, section_eid: &str, user_id: &str) -> CmResult<Option<String>> {
        self.supports("get_section_role")?;
        Ok(self
            .catalog
            .read()
            .memberships
            .get(&ContainerRef::section(section_eid))
            .and_then(|by_user| by_user.get(user_id))
            .map(|m| m.role.clone()))
    }

    async fn get_section_categories(&self) -> CmResult<Vec<String>> {
        self.supports("get_section_categories")?;
        Ok(self
            .catalog
            .read()
            .section_categories
            .keys()
            .cloned()
            .collect())
    }

    async fn get_section_category_description(&self, code: &str) -> CmResult<Option<String>> {
        self.supports("get_section_category_description")?;
        Ok(self.catalog.read().section_categories.get(code).cloned())
    }

    async fn find_enrolled_sections(&self, user_id: &str) -> CmResult<Vec<Section>> {
        self.supports("find_enrolled_sections")?;
        let catalog = self.catalog.read();
        Ok(catalog.sections_matching(|s| {
            s.enrollment_set_eid
                .as_deref()
                .is_some_and(|set| catalog.has_current_enrollment(set, user_id))
        }))
    }

    async fn find_current_sections_with_member(&self, user_id: &str) -> CmResult<Vec<Section>> {
        self.supports("find_current_sections_with_member")?;
        let catalog = self.catalog.read();
        Ok(catalog.sections_matching(|s| {
            catalog.is_current_offering(&s.course_offering_eid)
                && catalog
                    .memberships
                    .get(&ContainerRef::section(s.eid.as_str()))
                    .is_some_and(|by_user| by_user.contains_key(user_id))
        }))
    }

    async fn find_instructing_sections(&self, user_id: &str) -> CmResult<Vec<Section>> {
        self.supports("find_instructing_sections")?;
        let catalog = self.catalog.read();
        Ok(catalog.sections_matching(|s| {
            s.enrollment_set_eid
                .as_ref()
                .and_then(|set| catalog.enrollment_sets.get(set))
                .is_some_and(|set| set.official_instructors.contains(user_id))
        }))
    }

    async fn find_instructing_sections_in_session(
        &self,
        user_id: &str,
        academic_session_eid: &str
    ) -> CmResult<Vec<Section>> {
        self.supports("find_instructing_sections_in_session")?;
        let catalog = self.catalog.read();
        Ok(catalog.sections_matching(|s| {
            let in_session = catalog
                .offerings
                .get(&s.course_offering_eid)
                .is_some_and(|o| o.academic_session_eid.as_deref() == Some(academic_session_eid));
            in_session
                && s.enrollment_set_eid
                    .as_ref()
                    .and_then(|set| catalog.enrollment_sets.get(set))
                    .is_some_and(|set| set.official_instructors.contains(user_id))
        }))
    }

    async fn get_enrollment_set(&self, eid: &str) -> CmResult<EnrollmentSet> {
        self.supports("get_enrollment_set")?;
        let catalog = self.catalog.read();
        Catalog::require(&catalog.enrollment_sets, EntityKind::EnrollmentSet, eid).cloned()
    }

    async fn get_enrollment_sets(&self, course_offering_eid: &str) -> CmResult<Vec<EnrollmentSet>> {
        self.supports("get_enrollment_sets")?;
        let catalog = self.catalog.read();
        Catalog::require(
            &catalog.offerings,
            EntityKind::CourseOffering,
            course_offering_eid
        )?;
        Ok(catalog
            .enrollment_sets
            .values()
            .filter(|set| set.course_offering_eid == course_offering_eid)
            .cloned()
            .collect())
    }

    async fn get_enrollments(&self, enrollment_set_eid: &str) -> CmResult<Vec<Enrollment>> {
        self.supports("get_enrollments")?;
        let catalog = self.catalog.read();
        Catalog::require(
            &catalog.enrollment_sets,
            EntityKind::EnrollmentSet,
            enrollment_set_eid
        )?;
        Ok(catalog
            .enrollments
            .values()
            .filter(|e| e.enrollment_set_eid == enrollment_set_eid && !e.dropped)
            .cloned()
            .collect())
    }

    async fn find_enrollment(
        &self,
        user_id: &str,
        enrollment_set_eid: &str
    ) -> CmResult<Option<Enrollment>> {
        self.supports("find_enrollment")?;
        Ok(self
            .catalog
            .read()
            .enrollments
            .get(&(enrollment_set_eid.to_string(), user_id.to_string()))
            .cloned())
    }

    async fn get_instructors_of_record_ids(
        &self,
        enrollment_set_eid: &str
    ) -> CmResult<Vec<String>> {
        self.supports("get_instructors_of_record_ids")?;
        let catalog = self.catalog.read();
        let set = Catalog::require(
            &catalog.enrollment_sets,
            EntityKind::EnrollmentSet,
            enrollment_set_eid
        )?;
        Ok(set.official_instructors.iter().cloned().collect())
    }

    async fn is_enrolled(&self, user_id: &str, enrollment_set_eid: &str) -> CmResult<bool> {
        self.supports("is_enrolled")?;
        Ok(self
            .catalog
            .read()
            .has_current_enrollment(enrollment_set_eid, user_id))
    }

    async fn is_enrolled_in_any(
        &self,
        user_id: &str,
        enrollment_set_eids: &[String]
    ) -> CmResult<bool> {
        self.supports("is_enrolled_in_any")?;
        let catalog = self.catalog.read();
        Ok(enrollment_set_eids
            .iter()
            .any(|set| catalog.has_current_enrollment(set, user_id)))
    }

    async fn find_currently_enrolled_enrollment_sets(
        &self,
        user_id: &str
    ) -> CmResult<Vec<EnrollmentSet>> {
        self.supports("find_currently_enrolled_enrollment_sets")?;
        let catalog = self.catalog.read();
        Ok(catalog
            .enrollment_sets
            .values()
            .filter(|set| catalog.has_current_enrollment(&set.eid, user_id))
            .filter(|set| catalog.is_current_offering(&set.course_offering_eid))
            .cloned()
            .collect())
    }

    async fn find_course_set_roles(&self, user_id: &str) -> CmResult<HashMap<String, String>> {
        self.supports("find_course_set_roles")?;
        Ok(self
            .catalog
            .read()
            .roles_of(ContainerKind::CourseSet, user_id))
    }

    async fn find_course_offering_roles(&self, user_id: &str) -> CmResult<HashMap<String, String>> {
        self.supports("find_course_offering_roles")?;
        Ok(self
            .catalog
            .read()
            .roles_of(ContainerKind::CourseOffering, user_id))
    }

    async fn find_section_roles(&self, user_id: &str) -> CmResult<HashMap<String, String>> {
        self.supports("find_section_roles")?;
        Ok(self
            .catalog
            .read()
            .roles_of(ContainerKind::Section, user_id))
    }
}
