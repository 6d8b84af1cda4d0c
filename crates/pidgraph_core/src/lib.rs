//! Entity persistence over RDF graph stores.
//!
//! Entities are trees of properties keyed by predicate IRI. Repositories
//! turn them into triples in a routed named graph, resolve links by
//! business identifier at write time, and rebuild trees from query rows.

pub mod config;
pub mod db;
pub mod graph;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sparql;

pub use config::{ConfigError, RepositoryConfig};
pub use graph::{
    GraphConfigError, GraphConfigurationLookup, GraphRouter, SqliteGraphConfigurationStore,
    StaticGraphConfiguration,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::descriptor::{DescriptorSet, NodeKind, PropertyDescriptor};
pub use model::entity::{Entity, Literal, Value};
pub use repo::entity_repo::{EntityRepository, RepoError, RepoResult, SparqlEntityRepository};
pub use repo::query::SearchCriteria;
pub use service::entity_service::{EntityService, ServiceError, ServiceResult};
pub use service::lock::{InProcessLockService, LockError, LockService, LockToken};
pub use sparql::{EndpointError, MemoryEndpoint, SolutionRow, SparqlEndpoint, Term};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
