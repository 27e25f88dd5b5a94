//! # Configuration File Loading
//!
//! Loads configuration from TOML or YAML files, detecting the format from
//! the file extension.

use crate::config::Config;
use std::io;
use std::path::Path;

/// Configuration file loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error
    },

    #[error("Failed to parse TOML: {0}")]
    TomlParse(String),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(String),

    #[error("Config file has no extension")]
    NoExtension,

    #[error("Unsupported config file format: {0}")]
    UnsupportedFormat(String)
}

fn read(path: &Path) -> Result<String, ConfigFileError> {
    std::fs::read_to_string(path).map_err(|source| {
        let path = path.display().to_string();
        match source.kind() {
            io::ErrorKind::NotFound => ConfigFileError::NotFound(path),
            _ => ConfigFileError::Read { path, source }
        }
    })
}

/// Load configuration from a TOML file.
///
/// ## Example
/// ```toml
/// [federation]
/// sources = ["registrar", "local"]
///
/// [resolvers]
/// chain = ["section", "ancestor"]
///
/// [roles]
/// default_role = "access"
///
/// [roles.mapping]
/// Student = "access"
/// Instructor = "maintain"
/// ```
pub fn load_from_toml(path: &Path) -> Result<Config, ConfigFileError> {
    toml::from_str(&read(path)?).map_err(|e| ConfigFileError::TomlParse(e.to_string()))
}

/// Load configuration from a YAML file.
pub fn load_from_yaml(path: &Path) -> Result<Config, ConfigFileError> {
    serde_yaml::from_str(&read(path)?).map_err(|e| ConfigFileError::YamlParse(e.to_string()))
}

/// Load configuration from file, picking the parser by extension.
///
/// # M-CANONICAL-DOCS
///
/// ## Supported Formats
/// - `.toml`
/// - `.yaml` / `.yml`
///
/// ## Usage
/// ```rust,no_run
/// use config::load_from_file;
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = load_from_file(Path::new("cm-bridge.yaml"))?;
///     println!("Default role: {}", config.roles.default_role);
///     Ok(())
/// }
/// ```
///
/// ## Error Handling
/// The extension is checked before the file is touched. A missing file is
/// `NotFound`; any other IO failure is `Read` and keeps its `io::Error`.
/// Validation is a separate step (see [`crate::validate`]).
pub fn load_from_file(path: &Path) -> Result<Config, ConfigFileError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or(ConfigFileError::NoExtension)?
        .to_ascii_lowercase();

    match extension.as_str() {
        "toml" => load_from_toml(path),
        "yaml" | "yml" => load_from_yaml(path),
        _ => Err(ConfigFileError::UnsupportedFormat(extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bridge.toml");

        let toml_content = r#"
[federation]
sources = ["registrar", "local"]

[resolvers]
chain = ["section"]

[roles]
default_role = "guest"
preferences = ["maintain", "access"]

[roles.mapping]
Student = "access"
TA = "maintain"
"#;
        fs::write(&path, toml_content).unwrap();

        let config = load_from_toml(&path).unwrap();
        assert_eq!(config.federation.sources, vec!["registrar", "local"]);
        assert_eq!(config.resolvers.chain, vec!["section"]);
        assert_eq!(config.roles.default_role, "guest");
        assert_eq!(config.roles.mapping.get("TA").unwrap(), "maintain");
        assert_eq!(config.roles.enrollment_role, "Student");
        assert_eq!(config.roles.preferences, vec!["maintain", "access"]);
    }

    #[test]
    fn test_load_from_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bridge.yaml");

        let yaml_content = r#"
federation:
  sources: [sis, local]
roles:
  official_instructor_role: Instructor
  mapping:
    Instructor: maintain
"#;
        fs::write(&path, yaml_content).unwrap();

        let config = load_from_file(&path).unwrap();
        assert_eq!(config.federation.sources, vec!["sis", "local"]);
        assert_eq!(config.resolvers.chain, vec!["section", "ancestor"]);
        assert_eq!(config.roles.official_instructor_role, "Instructor");
        assert_eq!(config.roles.default_role, "access");
    }

    #[test]
    fn test_load_from_file_missing() {
        let result = load_from_file(Path::new("/nonexistent/bridge.toml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_unreadable_path_is_not_reported_missing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bridge.toml");
        fs::create_dir(&path).unwrap();

        let err = load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigFileError::Read { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_load_from_file_unsupported_extension() {
        let result = load_from_file(Path::new("bridge.json"));
        assert!(matches!(result, Err(ConfigFileError::UnsupportedFormat(ext)) if ext == "json"));
    }

    #[test]
    fn test_load_from_file_without_extension() {
        let result = load_from_file(Path::new("bridge"));
        assert!(matches!(result, Err(ConfigFileError::NoExtension)));
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[federation\nsources = ").unwrap();

        assert!(matches!(
            load_from_toml(&path),
            Err(ConfigFileError::TomlParse(_))
        ));
    }
}
