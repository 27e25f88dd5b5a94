//! # Federated Course Management
//!
//! Presents several course management sources as one query facade.
//!
//! Sources are consulted in precedence order. NotFound and Unsupported from
//! one source never hide the answer of another; faults abort the query.

pub mod error;
mod merge;
pub mod registry;
pub mod service;
pub mod telemetry;

pub use error::{FederationError, FederationResult};
pub use registry::SourceRegistry;
pub use service::FederatedCourseManagement;
pub use telemetry::FederationTelemetry;
