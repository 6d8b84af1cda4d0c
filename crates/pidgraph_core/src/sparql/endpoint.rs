//! Remote graph store contract.
//!
//! # Responsibility
//! - Define the request/response operations the persistence engine needs.
//! - Define the result row shape handed to the result transformer.
//!
//! # Invariants
//! - Implementations never retry; failures surface as [`EndpointError`].
//! - Deadlines and retry policy belong to the transport implementation.

use crate::model::entity::{Literal, Value};
use crate::model::vocab::xsd;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type EndpointResult<T> = Result<T, EndpointError>;

/// Transport-level failure of a query or update call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    /// Store could not be reached or initialized.
    Unavailable(String),
    /// Store rejected or failed a query.
    Query(String),
    /// Store rejected or failed an update.
    Update(String),
    /// Store answered with a result form the caller did not ask for.
    UnexpectedResult(&'static str),
}

impl Display for EndpointError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "graph store unavailable: {message}"),
            Self::Query(message) => write!(f, "graph store query failed: {message}"),
            Self::Update(message) => write!(f, "graph store update failed: {message}"),
            Self::UnexpectedResult(expected) => {
                write!(f, "graph store returned an unexpected result, expected {expected}")
            }
        }
    }
}

impl Error for EndpointError {}

/// One RDF term bound in a result row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Iri(String),
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
    BlankNode(String),
}

impl Term {
    pub fn iri(value: impl Into<String>) -> Self {
        Self::Iri(value.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Lexical text of the term (IRI, literal value or blank node label).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Iri(value) | Self::BlankNode(value) => value,
            Self::Literal { value, .. } => value,
        }
    }

    /// Converts the term into an entity property value.
    ///
    /// `xsd:string` literals become untyped literals. Language tags are
    /// dropped. Blank nodes become `_:`-prefixed references.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Iri(value) => Value::Reference(value.clone()),
            Self::BlankNode(label) => Value::Reference(format!("_:{label}")),
            Self::Literal {
                value, datatype, ..
            } => match datatype.as_deref() {
                None | Some(xsd::STRING) => Value::Literal(Literal::plain(value.clone())),
                Some(datatype) => Value::Literal(Literal::typed(value.clone(), datatype)),
            },
        }
    }
}

/// One solution of a SELECT query, keyed by variable name without `?`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SolutionRow {
    bindings: BTreeMap<String, Term>,
}

impl SolutionRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, variable: &str, term: Term) -> Self {
        self.insert(variable, term);
        self
    }

    pub fn insert(&mut self, variable: &str, term: Term) {
        self.bindings.insert(variable.to_string(), term);
    }

    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.bindings.get(variable)
    }
}

/// Request/response access to a SPARQL 1.1 query and update service.
pub trait SparqlEndpoint {
    fn select(&self, query: &str) -> EndpointResult<Vec<SolutionRow>>;
    fn ask(&self, query: &str) -> EndpointResult<bool>;
    fn update(&self, statement: &str) -> EndpointResult<()>;
}

impl<T: SparqlEndpoint + ?Sized> SparqlEndpoint for &T {
    fn select(&self, query: &str) -> EndpointResult<Vec<SolutionRow>> {
        (**self).select(query)
    }

    fn ask(&self, query: &str) -> EndpointResult<bool> {
        (**self).ask(query)
    }

    fn update(&self, statement: &str) -> EndpointResult<()> {
        (**self).update(statement)
    }
}
