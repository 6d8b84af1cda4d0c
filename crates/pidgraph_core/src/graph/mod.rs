//! Logical-to-physical graph routing.
//!
//! # Responsibility
//! - Translate logical graph names into the physical graphs backing them.
//! - Provide lookup implementations for composition roots.
//!
//! # Invariants
//! - Lookups are evaluated on every call; the router never caches results.
//! - An empty or unknown logical-name set is a configuration error.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod router;
pub mod sqlite_config;
pub mod static_config;

pub use router::GraphRouter;
pub use sqlite_config::SqliteGraphConfigurationStore;
pub use static_config::StaticGraphConfiguration;

pub type GraphConfigResult<T> = Result<T, GraphConfigError>;

/// Graph configuration lookup or resolution failure.
#[derive(Debug)]
pub enum GraphConfigError {
    /// No logical graph names were given.
    EmptyGraphSet,
    /// Logical graph name has no physical graph in the current configuration.
    UnknownGraph(String),
    /// No configuration version has been published yet.
    NoCurrentConfiguration,
    /// Configuration source could not be read.
    Source(String),
}

impl Display for GraphConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyGraphSet => write!(f, "no logical graph names given"),
            Self::UnknownGraph(name) => {
                write!(f, "logical graph `{name}` has no physical graph configured")
            }
            Self::NoCurrentConfiguration => write!(f, "no graph configuration has been published"),
            Self::Source(message) => write!(f, "graph configuration source failed: {message}"),
        }
    }
}

impl Error for GraphConfigError {}

impl From<rusqlite::Error> for GraphConfigError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Source(value.to_string())
    }
}

/// Source of the current logical-to-physical graph mapping.
pub trait GraphConfigurationLookup {
    /// Physical graphs currently backing `logical_name`, in configured order.
    ///
    /// An unknown name yields an empty list.
    fn physical_graphs(&self, logical_name: &str) -> GraphConfigResult<Vec<String>>;
}
