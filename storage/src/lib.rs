//! # Storage Layer
//!
//! In-memory course management catalog. Serves as the local source of a
//! federation and as the backing store for integration tests.

pub mod memory;

pub use memory::InMemoryCourseManagement;
