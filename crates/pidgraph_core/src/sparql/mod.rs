//! SPARQL statement rendering and endpoint contracts.
//!
//! # Responsibility
//! - Escape and validate every variable value placed into a statement.
//! - Define the request/response contract of the remote graph store.
//! - Provide an embedded in-memory endpoint for tests and local tooling.
//!
//! # Invariants
//! - Untrusted text is never concatenated into a statement unescaped.
//! - IRIs are validated as absolute URIs before they are rendered.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod endpoint;
pub mod escape;
pub mod memory;
pub mod param;

pub use endpoint::{EndpointError, EndpointResult, SolutionRow, SparqlEndpoint, Term};
pub use memory::MemoryEndpoint;
pub use param::ParameterizedStatement;

pub type SparqlResult<T> = Result<T, SparqlError>;

/// Statement rendering error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SparqlError {
    /// Value bound as IRI is not an absolute URI.
    InvalidIri(String),
    /// Template placeholder has no bound value.
    UnboundParameter(String),
}

impl Display for SparqlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIri(value) => write!(f, "cannot render `{value}` as an iri"),
            Self::UnboundParameter(name) => write!(f, "statement parameter `@{name}` is unbound"),
        }
    }
}

impl Error for SparqlError {}
