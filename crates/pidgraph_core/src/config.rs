//! Repository configuration.
//!
//! # Responsibility
//! - Name the logical graphs a repository writes to and reads from.
//! - Carry search defaults.
//!
//! # Invariants
//! - Only logical names are configured; physical graphs come from the
//!   graph configuration lookup at call time.

use crate::model::vocab::rdfs;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_PAGE_SIZE: u32 = 25;
const MAX_PAGE_SIZE: u32 = 500;

/// Configuration parse or validation failure.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid repository config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid repository config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Logical graph names and search defaults of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Logical graph receiving inserts, updates and deletes.
    pub insert_graph: String,
    /// Logical graphs unioned for reads and link resolution.
    pub query_graphs: Vec<String>,
    #[serde(default = "default_label_predicate")]
    pub label_predicate: String,
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "max_page_size")]
    pub max_page_size: u32,
}

impl RepositoryConfig {
    pub fn new(insert_graph: impl Into<String>, query_graphs: Vec<String>) -> Self {
        Self {
            insert_graph: insert_graph.into(),
            query_graphs,
            label_predicate: default_label_predicate(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates graph names and page sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.insert_graph.trim().is_empty() {
            return Err(ConfigError::Invalid("insert_graph cannot be empty".to_string()));
        }
        if self.query_graphs.is_empty() {
            return Err(ConfigError::Invalid(
                "query_graphs must name at least one graph".to_string(),
            ));
        }
        if self.query_graphs.iter().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "query_graphs cannot contain empty names".to_string(),
            ));
        }
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(ConfigError::Invalid("page sizes must be positive".to_string()));
        }
        if self.default_page_size > self.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "default_page_size {} exceeds max_page_size {}",
                self.default_page_size, self.max_page_size
            )));
        }
        Ok(())
    }

    /// Effective page size for a requested limit.
    pub fn page_size(&self, requested: Option<u32>) -> u32 {
        match requested {
            None | Some(0) => self.default_page_size,
            Some(value) => value.min(self.max_page_size),
        }
    }
}

fn default_label_predicate() -> String {
    rdfs::LABEL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn max_page_size() -> u32 {
    MAX_PAGE_SIZE
}
