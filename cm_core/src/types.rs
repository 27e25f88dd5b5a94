use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumString};

/// Reserved internal role for students enrolled in a section's enrollment set.
pub const ENROLLMENT_ROLE: &str = "Student";

/// Reserved internal role for official graders (instructors of record).
pub const OFFICIAL_INSTRUCTOR_ROLE: &str = "I";

/// Identity used to deduplicate entities merged from several sources.
///
/// Entities use their eid. Enrollments and memberships are always queried
/// within a single container, so the user id identifies them there.
pub trait Identified {
    fn identity(&self) -> &str;
}

impl Identified for String {
    fn identity(&self) -> &str {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicSession {
    pub eid: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSet {
    pub eid: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    pub parent_eid: Option<String>
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalCourse {
    pub eid: String,
    pub title: String,
    #[serde(default)]
    pub description: String
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOffering {
    pub eid: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: Option<String>,
    pub academic_session_eid: Option<String>,
    pub canonical_course_eid: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>
}

/// A lecture, lab, discussion... within a course offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub eid: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    pub parent_eid: Option<String>,
    pub enrollment_set_eid: Option<String>,
    pub course_offering_eid: String
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentSet {
    pub eid: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    pub default_enrollment_credits: Option<String>,
    pub course_offering_eid: String,
    #[serde(default)]
    pub official_instructors: BTreeSet<String>
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub user_id: String,
    pub enrollment_set_eid: String,
    pub status: String,
    pub credits: Option<String>,
    pub grading_scheme: Option<String>,
    #[serde(default)]
    pub dropped: bool
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumString,
    Display
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContainerKind {
    CourseSet,
    CourseOffering,
    Section
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRef {
    pub kind: ContainerKind,
    pub eid: String
}

impl ContainerRef {
    pub fn course_set(eid: impl Into<String>) -> Self {
        Self {
            kind: ContainerKind::CourseSet,
            eid: eid.into()
        }
    }

    pub fn course_offering(eid: impl Into<String>) -> Self {
        Self {
            kind: ContainerKind::CourseOffering,
            eid: eid.into()
        }
    }

    pub fn section(eid: impl Into<String>) -> Self {
        Self {
            kind: ContainerKind::Section,
            eid: eid.into()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub user_id: String,
    pub role: String,
    pub container: ContainerRef,
    pub status: Option<String>
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionCategory {
    pub code: String,
    pub description: String
}

macro_rules! identified_by {
    ($ty:ty, $field:ident) => {
        impl Identified for $ty {
            fn identity(&self) -> &str {
                &self.$field
            }
        }
    };
}

identified_by!(AcademicSession, eid);
identified_by!(CourseSet, eid);
identified_by!(CanonicalCourse, eid);
identified_by!(CourseOffering, eid);
identified_by!(Section, eid);
identified_by!(EnrollmentSet, eid);
identified_by!(Enrollment, user_id);
identified_by!(Membership, user_id);
