//! Service configuration
//!
//! Loaded from a JSON file. Every field except `endpoints` has a default.
//!
//! ```json
//! {
//!   "listen_address": "127.0.0.1:8080",
//!   "default_page_size": 50,
//!   "max_page_size": 1000,
//!   "seed_path": "./seed.json",
//!   "endpoints": [
//!     {
//!       "collection": "users",
//!       "root": "user",
//!       "identifiers": { "age": "int64", "user": { "message": "User" } },
//!       "messages": { "User": { "profile": { "message": "Profile" } } }
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filtering::Declarations;
use crate::transpiler::{PageSizeLimits, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "CONFIG_READ_FAILED",
            Self::Parse(_) => "CONFIG_PARSE_FAILED",
            Self::Invalid(_) => "CONFIG_INVALID",
        }
    }
}

/// One listable collection and the identifiers its filters may use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub collection: String,

    #[serde(flatten)]
    pub declarations: Declarations,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to (default 127.0.0.1:8080)
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Page size used when a request leaves it unset (default 50)
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Upper bound for every request (default 1000)
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// JSON seed for the in-memory store (optional)
    #[serde(default)]
    pub seed_path: Option<PathBuf>,

    pub endpoints: Vec<EndpointConfig>,
}

fn default_listen_address() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}
fn default_max_page_size() -> usize {
    MAX_PAGE_SIZE
}

impl ServiceConfig {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: ServiceConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_page_size == 0 {
            return Err(ConfigError::Invalid("default_page_size must be > 0".into()));
        }

        if self.max_page_size < self.default_page_size {
            return Err(ConfigError::Invalid(format!(
                "max_page_size {} is below default_page_size {}",
                self.max_page_size, self.default_page_size
            )));
        }

        if self.endpoints.is_empty() {
            return Err(ConfigError::Invalid("at least one endpoint is required".into()));
        }

        let mut seen = HashSet::new();
        for endpoint in &self.endpoints {
            if endpoint.collection.is_empty() {
                return Err(ConfigError::Invalid("endpoint collection must not be empty".into()));
            }
            if !seen.insert(endpoint.collection.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate endpoint collection '{}'",
                    endpoint.collection
                )));
            }
        }

        Ok(())
    }

    pub fn page_limits(&self) -> PageSizeLimits {
        PageSizeLimits {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }

    pub fn endpoint(&self, collection: &str) -> Option<&EndpointConfig> {
        self.endpoints.iter().find(|e| e.collection == collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::Type;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_applied() {
        let config = ServiceConfig::from_json(r#"{"endpoints": [{"collection": "users"}]}"#).unwrap();
        assert_eq!(config.listen_address, "127.0.0.1:8080");
        assert_eq!(config.default_page_size, 50);
        assert_eq!(config.max_page_size, 1000);
        assert_eq!(config.seed_path, None);
        assert_eq!(config.page_limits(), PageSizeLimits::default());
    }

    #[test]
    fn test_load_declarations_flattened() {
        let file = write_config(
            r#"{
                "default_page_size": 10,
                "max_page_size": 20,
                "endpoints": [{
                    "collection": "users",
                    "root": "user",
                    "identifiers": {"age": "int64", "user": {"message": "User"}},
                    "messages": {"User": {"profile": {"message": "Profile"}}}
                }]
            }"#,
        );
        let config = ServiceConfig::load(file.path()).unwrap();
        let users = config.endpoint("users").unwrap();
        assert_eq!(users.declarations.root.as_deref(), Some("user"));
        assert_eq!(users.declarations.ident("age"), Some(&Type::Int64));
        assert_eq!(
            users.declarations.field("User", "profile"),
            Some(&Type::Message("Profile".into()))
        );
        assert!(users.declarations.supports("AND"));
        assert_eq!(config.page_limits().max_page_size, 20);
    }

    #[test]
    fn test_missing_file() {
        let err = ServiceConfig::load(Path::new("/nonexistent/filterstore.json")).unwrap_err();
        assert_eq!(err.code(), "CONFIG_READ_FAILED");
    }

    #[test]
    fn test_malformed_json() {
        let err = ServiceConfig::from_json("{ not json").unwrap_err();
        assert_eq!(err.code(), "CONFIG_PARSE_FAILED");
    }

    #[test]
    fn test_zero_default_page_size_rejected() {
        let err = ServiceConfig::from_json(
            r#"{"default_page_size": 0, "endpoints": [{"collection": "users"}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID");
    }

    #[test]
    fn test_max_below_default_rejected() {
        let err = ServiceConfig::from_json(
            r#"{"default_page_size": 100, "max_page_size": 10, "endpoints": [{"collection": "users"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("max_page_size"));
    }

    #[test]
    fn test_no_endpoints_rejected() {
        let err = ServiceConfig::from_json(r#"{"endpoints": []}"#).unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID");
    }

    #[test]
    fn test_duplicate_collection_rejected() {
        let err = ServiceConfig::from_json(
            r#"{"endpoints": [{"collection": "users"}, {"collection": "users"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }
}
