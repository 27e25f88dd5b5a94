//! # Configuration System
//!
//! Centralized configuration management for the course management role
//! bridge.
//!
//! This crate provides:
//! - Configuration structures (federation sources, resolver chain, role
//!   mapping)
//! - Environment variable loading (12-factor app principles)
//! - Configuration file loading (TOML/YAML)
//! - Configuration precedence (explicit > env > file > defaults)
//! - Configuration validation

pub mod config;
pub mod file_loader;
pub mod loader;
pub mod precedence;
pub mod validator;

pub use config::{
    Config, FederationConfig, RESOLVER_ANCESTOR, RESOLVER_SECTION, ResolverConfig,
    RoleMappingConfig,
};
pub use file_loader::{ConfigFileError, load_from_file, load_from_toml, load_from_yaml};
pub use loader::{EnvConfigError, load_from_env};
pub use precedence::merge_configs;
pub use crate::validator::validate;
pub use ::validator::Validate;
