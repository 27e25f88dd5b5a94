//! # Course Management Errors
//!
//! Error handling for the course management role bridge.
//!
//! Every course management source answers with one of three signals besides
//! success:
//! - `NotFound`: the requested id is unknown to that source
//! - `Unsupported`: the source has no opinion on the query
//! - `Fault`: anything else; the source is broken
//!
//! The first two are benign ("I don't know") and are absorbed by the
//! federation layer. Faults are never absorbed.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Result alias used by every course management query.
pub type CmResult<T> = Result<T, CmError>;

/// Kind of entity named in a not-found signal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    AcademicSession,
    CourseSet,
    CanonicalCourse,
    CourseOffering,
    Section,
    EnrollmentSet,
    Enrollment,
    Membership,
    SectionCategory
}

/// Course management query errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CmError {
    #[error("No {kind} with id {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Operation not supported by this source: {operation}")]
    Unsupported { operation: String },

    #[error("Source {source_name} failed: {reason}")]
    Fault { source_name: String, reason: String }
}

impl CmError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into()
        }
    }

    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into()
        }
    }

    pub fn fault(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fault {
            source_name: source_name.into(),
            reason: reason.to_string()
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }

    /// NotFound and Unsupported mean "this source doesn't know".
    pub fn is_benign(&self) -> bool {
        self.is_not_found() || self.is_unsupported()
    }

    /// Short label for logs and metric tags.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Unsupported { .. } => "unsupported",
            Self::Fault { .. } => "fault"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_kind_and_id() {
        let err = CmError::not_found(EntityKind::CourseSet, "x");
        assert_eq!(err.to_string(), "No course_set with id x");
        assert!(err.is_not_found());
        assert!(err.is_benign());
    }

    #[test]
    fn test_fault_is_not_benign() {
        let err = CmError::fault("registrar", "connection reset");
        assert!(!err.is_benign());
        assert_eq!(err.outcome(), "fault");
        assert!(err.to_string().contains("registrar"));
    }

    #[test]
    fn test_unsupported_is_benign() {
        let err = CmError::unsupported("find_course_sets");
        assert!(err.is_unsupported());
        assert!(!err.is_not_found());
        assert!(err.is_benign());
    }

    #[test]
    fn test_entity_kind_round_trips_through_strings() {
        let kind: EntityKind = "enrollment_set".parse().unwrap();
        assert_eq!(kind, EntityKind::EnrollmentSet);
        assert_eq!(kind.to_string(), "enrollment_set");
    }
}
