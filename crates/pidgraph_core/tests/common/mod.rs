#![allow(dead_code)]

use pidgraph_core::sparql::EndpointResult;
use pidgraph_core::{MemoryEndpoint, RepositoryConfig, SolutionRow, SparqlEndpoint};
use std::cell::{Cell, RefCell};

pub const CURRENT_GRAPH: &str = "https://pid.example.org/graphs/resources/current";
pub const GROUPS_GRAPH: &str = "https://pid.example.org/graphs/consumer-groups";
pub const RESOURCE_TYPE: &str = "https://pid.example.org/kos/19050/PidUri";
pub const ENDPOINT_TYPE: &str = "https://pid.example.org/kos/19050/Endpoint";
pub const HAS_LABEL: &str = "https://pid.example.org/kos/19050/hasLabel";
pub const HAS_VERSION: &str = "https://pid.example.org/kos/19050/hasVersion";
pub const HAS_ENDPOINT: &str = "https://pid.example.org/kos/19050/distribution";
pub const IS_DERIVED_FROM: &str = "https://pid.example.org/kos/19050/isDerivedFrom";

/// Config writing to and reading from one physical graph.
pub fn single_graph_config() -> RepositoryConfig {
    RepositoryConfig::new(CURRENT_GRAPH, vec![CURRENT_GRAPH.to_string()])
}

/// Memory endpoint that records every update request it receives.
pub struct CountingEndpoint {
    inner: MemoryEndpoint,
    updates: Cell<usize>,
    bodies: RefCell<Vec<String>>,
}

impl CountingEndpoint {
    pub fn new() -> Self {
        Self {
            inner: MemoryEndpoint::new().unwrap(),
            updates: Cell::new(0),
            bodies: RefCell::new(Vec::new()),
        }
    }

    pub fn update_calls(&self) -> usize {
        self.updates.get()
    }

    pub fn last_update(&self) -> Option<String> {
        self.bodies.borrow().last().cloned()
    }

    pub fn inner(&self) -> &MemoryEndpoint {
        &self.inner
    }
}

impl SparqlEndpoint for CountingEndpoint {
    fn select(&self, query: &str) -> EndpointResult<Vec<SolutionRow>> {
        self.inner.select(query)
    }

    fn ask(&self, query: &str) -> EndpointResult<bool> {
        self.inner.ask(query)
    }

    fn update(&self, statement: &str) -> EndpointResult<()> {
        self.updates.set(self.updates.get() + 1);
        self.bodies.borrow_mut().push(statement.to_string());
        self.inner.update(statement)
    }
}

/// Whether `graph` holds at least one triple with `subject`.
pub fn graph_has_subject(endpoint: &dyn SparqlEndpoint, graph: &str, subject: &str) -> bool {
    endpoint
        .ask(&format!(
            "ASK {{ GRAPH <{graph}> {{ <{subject}> ?predicate ?object }} }}"
        ))
        .unwrap()
}
