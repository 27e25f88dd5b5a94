use chrono::NaiveDate;
use cm_core::{
    AcademicSession, CanonicalCourse, ContainerRef, CourseOffering, CourseSet, Enrollment,
    EnrollmentSet, Membership, Section
};
use storage::InMemoryCourseManagement;

pub const PAST_SESSION: &str = "SP10";
pub const CURRENT_SESSION: &str = "F20";
pub const UNSCHEDULED_SESSION: &str = "TBD";

pub const SCIENCE_SET: &str = "SCIENCE";
pub const CHEMISTRY: &str = "CHEM101";
pub const CHEMISTRY_OFFERING: &str = "CHEM101-F20";
pub const LECTURE_ENROLLMENT: &str = "CHEM101-LEC-ES";
pub const LAB_ENROLLMENT: &str = "CHEM101-LAB-ES";
pub const LECTURE: &str = "CHEM101-LEC1";
pub const LAB: &str = "CHEM101-LAB1";

pub const INSTRUCTOR: &str = "prof_i";
pub const STUDENT: &str = "student_a";
pub const DROPPED_STUDENT: &str = "student_d";
pub const TEACHING_ASSISTANT: &str = "ta_t";
pub const DEPARTMENT_ADMIN: &str = "admin_x";

pub fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn session(eid: &str, start_date: Option<NaiveDate>, current: bool) -> AcademicSession {
    AcademicSession {
        eid: eid.to_string(),
        title: format!("Session {eid}"),
        description: String::new(),
        start_date,
        end_date: None,
        current
    }
}

pub fn course_set(eid: &str, title: &str, category: Option<&str>) -> CourseSet {
    CourseSet {
        eid: eid.to_string(),
        title: title.to_string(),
        description: String::new(),
        category: category.map(String::from),
        parent_eid: None
    }
}

pub fn canonical_course(eid: &str) -> CanonicalCourse {
    CanonicalCourse {
        eid: eid.to_string(),
        title: format!("Course {eid}"),
        description: String::new()
    }
}

pub fn course_offering(eid: &str, canonical_course_eid: &str, session_eid: &str) -> CourseOffering {
    CourseOffering {
        eid: eid.to_string(),
        title: format!("Offering {eid}"),
        description: String::new(),
        status: None,
        academic_session_eid: Some(session_eid.to_string()),
        canonical_course_eid: canonical_course_eid.to_string(),
        start_date: None,
        end_date: None
    }
}

pub fn enrollment_set(eid: &str, offering_eid: &str, instructors: &[&str]) -> EnrollmentSet {
    EnrollmentSet {
        eid: eid.to_string(),
        title: format!("Enrollment set {eid}"),
        description: String::new(),
        category: None,
        default_enrollment_credits: None,
        course_offering_eid: offering_eid.to_string(),
        official_instructors: instructors.iter().map(|s| s.to_string()).collect()
    }
}

pub fn section(eid: &str, offering_eid: &str, enrollment_set_eid: Option<&str>) -> Section {
    Section {
        eid: eid.to_string(),
        title: format!("Section {eid}"),
        description: String::new(),
        category: None,
        parent_eid: None,
        enrollment_set_eid: enrollment_set_eid.map(String::from),
        course_offering_eid: offering_eid.to_string()
    }
}

pub fn enrollment(user_id: &str, enrollment_set_eid: &str) -> Enrollment {
    Enrollment {
        user_id: user_id.to_string(),
        enrollment_set_eid: enrollment_set_eid.to_string(),
        status: "enrolled".to_string(),
        credits: None,
        grading_scheme: None,
        dropped: false
    }
}

pub fn membership(user_id: &str, role: &str, container: ContainerRef) -> Membership {
    Membership {
        user_id: user_id.to_string(),
        role: role.to_string(),
        container,
        status: None
    }
}

/// Builds a source holding one current chemistry offering.
///
/// - `LECTURE` uses `LECTURE_ENROLLMENT`, graded by `INSTRUCTOR`
/// - `LAB` is a child of `LECTURE` and uses `LAB_ENROLLMENT`
/// - `STUDENT` is enrolled in both sets, `DROPPED_STUDENT` dropped the lecture
/// - `TEACHING_ASSISTANT` is a `GSI` member of the lab
/// - `DEPARTMENT_ADMIN` holds the `Admin` role on `SCIENCE_SET`
pub fn sample_catalog(name: &str) -> InMemoryCourseManagement {
    let cm = InMemoryCourseManagement::new(name);
    if let Err(e) = populate(&cm) {
        panic!("sample catalog is inconsistent: {e}");
    }
    cm
}

fn populate(cm: &InMemoryCourseManagement) -> cm_core::CmResult<()> {
    cm.upsert_academic_session(session(PAST_SESSION, date(2010, 1, 15), false));
    cm.upsert_academic_session(session(CURRENT_SESSION, date(2020, 9, 1), true));
    cm.upsert_academic_session(session(UNSCHEDULED_SESSION, None, false));

    cm.upsert_course_set(course_set(SCIENCE_SET, "Science", Some("DEPT")))?;
    cm.upsert_canonical_course(canonical_course(CHEMISTRY));
    cm.upsert_course_offering(course_offering(
        CHEMISTRY_OFFERING,
        CHEMISTRY,
        CURRENT_SESSION
    ))?;
    cm.add_canonical_course_to_course_set(SCIENCE_SET, CHEMISTRY)?;
    cm.add_course_offering_to_course_set(SCIENCE_SET, CHEMISTRY_OFFERING)?;

    cm.upsert_enrollment_set(enrollment_set(
        LECTURE_ENROLLMENT,
        CHEMISTRY_OFFERING,
        &[INSTRUCTOR]
    ))?;
    cm.upsert_enrollment_set(enrollment_set(LAB_ENROLLMENT, CHEMISTRY_OFFERING, &[]))?;

    cm.upsert_section(section(LECTURE, CHEMISTRY_OFFERING, Some(LECTURE_ENROLLMENT)))?;
    cm.upsert_section(Section {
        parent_eid: Some(LECTURE.to_string()),
        ..section(LAB, CHEMISTRY_OFFERING, Some(LAB_ENROLLMENT))
    })?;
    cm.add_section_category("LEC", "Lecture");
    cm.add_section_category("LAB", "Laboratory");

    cm.add_or_update_enrollment(enrollment(STUDENT, LECTURE_ENROLLMENT))?;
    cm.add_or_update_enrollment(enrollment(STUDENT, LAB_ENROLLMENT))?;
    cm.add_or_update_enrollment(Enrollment {
        dropped: true,
        ..enrollment(DROPPED_STUDENT, LECTURE_ENROLLMENT)
    })?;

    cm.add_or_update_membership(membership(
        TEACHING_ASSISTANT,
        "GSI",
        ContainerRef::section(LAB)
    ))?;
    cm.add_or_update_membership(membership(
        DEPARTMENT_ADMIN,
        "Admin",
        ContainerRef::course_set(SCIENCE_SET)
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_catalog_builds() {
        let _cm = sample_catalog("sample");
    }
}
