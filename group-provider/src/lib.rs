//! # Course Management Group Provider
//!
//! Answers "which role does this user hold in this group" for groups made
//! of course sections.
//!
//! Internal roles come from a chain of [`RoleResolver`] strategies over a
//! course management query facade and are converted to external roles by a
//! [`RoleMapping`]. Only source faults surface as errors; unknown sections
//! and unsupported queries simply contribute nothing.

pub mod error;
pub mod group_id;
pub mod provider;
pub mod resolver;
pub mod role_mapping;
pub mod telemetry;

pub use error::{GroupProviderError, GroupProviderResult};
pub use group_id::{pack_id, unpack_id};
pub use provider::{CourseManagementGroupProvider, GroupProvider};
pub use resolver::{AncestorRoleResolver, ResolverKind, RoleResolver, SectionRoleResolver};
pub use role_mapping::RoleMapping;
pub use telemetry::ProviderTelemetry;
