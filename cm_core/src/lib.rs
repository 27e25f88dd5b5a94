//! # Course Management Core
//!
//! Shared types and traits for the course management role bridge.
//!
//! This crate provides:
//! - Read-only domain types (sessions, course sets, offerings, sections,
//!   enrollment sets, enrollments, memberships)
//! - The [`CourseManagementQuery`] facade every data source implements
//! - Reserved internal role tokens

pub mod traits;
pub mod types;

pub use errors::{CmError, CmResult, EntityKind};
pub use traits::CourseManagementQuery;
pub use types::{
    AcademicSession, CanonicalCourse, ContainerKind, ContainerRef, CourseOffering, CourseSet,
    ENROLLMENT_ROLE, Enrollment, EnrollmentSet, Identified, Membership, OFFICIAL_INSTRUCTOR_ROLE,
    Section, SectionCategory
};
