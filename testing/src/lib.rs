//! Shared test fixtures for the course management workspace.
//!
//! Provides:
//! - Entity builders with sensible defaults
//! - A sample catalog (one chemistry offering with a lecture and a lab)
//! - Stub sources that fail or decline every lookup, for federation tests

mod fixtures;
mod sources;

pub use fixtures::*;
pub use sources::{FaultySource, SilentSource};
