//! Embedded in-memory endpoint backed by an oxigraph store.
//!
//! # Responsibility
//! - Execute generated statements without a remote service.
//! - Map oxigraph solutions to [`SolutionRow`] values.
//!
//! # Invariants
//! - The default graph of a query is only what its `FROM` clauses name.
//! - Every statement body is logged at `trace` only.

use crate::sparql::endpoint::{EndpointError, EndpointResult, SolutionRow, SparqlEndpoint, Term};
use log::{debug, trace};
use oxigraph::model::Term as StoreTerm;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use std::time::Instant;

/// SPARQL endpoint over a process-local oxigraph store.
pub struct MemoryEndpoint {
    store: Store,
}

impl MemoryEndpoint {
    /// Creates an empty in-memory store.
    pub fn new() -> EndpointResult<Self> {
        let store = Store::new().map_err(|err| EndpointError::Unavailable(err.to_string()))?;
        Ok(Self { store })
    }

    /// Number of quads across all graphs.
    pub fn quad_count(&self) -> EndpointResult<usize> {
        self.store
            .len()
            .map_err(|err| EndpointError::Unavailable(err.to_string()))
    }
}

impl SparqlEndpoint for MemoryEndpoint {
    fn select(&self, query: &str) -> EndpointResult<Vec<SolutionRow>> {
        let started_at = Instant::now();
        trace!("event=endpoint_select module=sparql statement={query}");

        let results = self
            .store
            .query(query)
            .map_err(|err| EndpointError::Query(err.to_string()))?;
        let QueryResults::Solutions(solutions) = results else {
            return Err(EndpointError::UnexpectedResult("solutions"));
        };

        let mut rows = Vec::new();
        for solution in solutions {
            let solution = solution.map_err(|err| EndpointError::Query(err.to_string()))?;
            let mut row = SolutionRow::new();
            for (variable, term) in solution.iter() {
                row.insert(variable.as_str(), convert_term(term));
            }
            rows.push(row);
        }

        debug!(
            "event=endpoint_select module=sparql status=ok rows={} duration_ms={}",
            rows.len(),
            started_at.elapsed().as_millis()
        );
        Ok(rows)
    }

    fn ask(&self, query: &str) -> EndpointResult<bool> {
        trace!("event=endpoint_ask module=sparql statement={query}");
        match self
            .store
            .query(query)
            .map_err(|err| EndpointError::Query(err.to_string()))?
        {
            QueryResults::Boolean(value) => Ok(value),
            _ => Err(EndpointError::UnexpectedResult("boolean")),
        }
    }

    fn update(&self, statement: &str) -> EndpointResult<()> {
        let started_at = Instant::now();
        trace!("event=endpoint_update module=sparql statement={statement}");

        self.store
            .update(statement)
            .map_err(|err| EndpointError::Update(err.to_string()))?;

        debug!(
            "event=endpoint_update module=sparql status=ok bytes={} duration_ms={}",
            statement.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn convert_term(term: &StoreTerm) -> Term {
    match term {
        StoreTerm::NamedNode(node) => Term::Iri(node.as_str().to_string()),
        StoreTerm::BlankNode(node) => Term::BlankNode(node.as_str().to_string()),
        StoreTerm::Literal(literal) => Term::Literal {
            value: literal.value().to_string(),
            datatype: Some(literal.datatype().as_str().to_string()),
            language: literal.language().map(str::to_string),
        },
        #[allow(unreachable_patterns)]
        other => Term::Literal {
            value: other.to_string(),
            datatype: None,
            language: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryEndpoint;
    use crate::sparql::endpoint::{SparqlEndpoint, Term};

    #[test]
    fn update_then_select_returns_bound_terms() {
        let endpoint = MemoryEndpoint::new().unwrap();
        endpoint
            .update(
                "INSERT DATA { GRAPH <https://example.org/g> { \
                 <https://example.org/s> <https://example.org/p> \"v\" } }",
            )
            .unwrap();

        let rows = endpoint
            .select(
                "SELECT ?o FROM <https://example.org/g> \
                 WHERE { <https://example.org/s> <https://example.org/p> ?o }",
            )
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("o").map(Term::as_str), Some("v"));
        assert_eq!(endpoint.quad_count().unwrap(), 1);
    }

    #[test]
    fn ask_rejects_select_queries() {
        let endpoint = MemoryEndpoint::new().unwrap();
        assert!(endpoint.ask("SELECT * WHERE { ?s ?p ?o }").is_err());
        assert!(!endpoint.ask("ASK { ?s ?p ?o }").unwrap());
    }
}
