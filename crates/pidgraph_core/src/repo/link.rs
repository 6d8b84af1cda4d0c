//! Link statements joined by business identifier.
//!
//! A link property stores the relation to another top-level entity. The
//! writer only knows the target's business identifier (`hasPID`), so the
//! statement binds the target's subject at execution time.
//!
//! # Invariants
//! - Zero matches create nothing and are not an error.
//! - Several entities sharing one business identifier yield several links;
//!   identifier uniqueness is the caller's concern.

use crate::model::uri::is_absolute_uri;
use crate::model::vocab::pid;
use crate::repo::entity_repo::RepoResult;
use crate::sparql::ParameterizedStatement;
use log::warn;

const SCOPED_LINK_TEMPLATE: &str = "INSERT { GRAPH @insertGraph { @subject @predicate ?linked } }
WHERE {
  GRAPH ?graph { ?linked @businessKey @target . }
  FILTER(?graph IN (@queryGraphs))
}";

const UNSCOPED_LINK_TEMPLATE: &str = "INSERT { @subject @predicate ?linked }
WHERE { ?linked @businessKey @target . }";

/// Physical graphs a write is directed to and may read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteScope {
    pub insert_graph: Option<String>,
    pub query_graphs: Vec<String>,
}

impl WriteScope {
    pub fn new(insert_graph: impl Into<String>, query_graphs: Vec<String>) -> Self {
        Self {
            insert_graph: Some(insert_graph.into()),
            query_graphs,
        }
    }

    /// Scope writing to and matching against the default graph.
    pub fn default_graph() -> Self {
        Self::default()
    }

    fn scoped_graphs(&self) -> Option<(&str, &[String])> {
        match self.insert_graph.as_deref() {
            Some(insert_graph) if !self.query_graphs.is_empty() => {
                Some((insert_graph, self.query_graphs.as_slice()))
            }
            _ => None,
        }
    }
}

/// Builds the insert-where statement for one link value.
///
/// Returns `None` when `target` is not an absolute URI; such values are
/// dropped with a warning.
pub fn build_link_statement(
    subject: &str,
    predicate: &str,
    target: &str,
    scope: &WriteScope,
) -> RepoResult<Option<String>> {
    let target = target.trim();
    if !is_absolute_uri(target) {
        warn!(
            "event=link_skipped module=repo status=skipped reason=target_not_uri predicate={predicate}"
        );
        return Ok(None);
    }

    let mut statement = match scope.scoped_graphs() {
        Some((insert_graph, query_graphs)) => {
            let mut statement = ParameterizedStatement::new(SCOPED_LINK_TEMPLATE);
            statement
                .set_uri("insertGraph", insert_graph)?
                .set_uri_list("queryGraphs", query_graphs)?;
            statement
        }
        None => ParameterizedStatement::new(UNSCOPED_LINK_TEMPLATE),
    };
    statement
        .set_uri("subject", subject)?
        .set_uri("predicate", predicate)?
        .set_uri("businessKey", pid::HAS_PID)?
        .set_uri("target", target)?;

    Ok(Some(statement.render()?))
}

#[cfg(test)]
mod tests {
    use super::{build_link_statement, WriteScope};

    #[test]
    fn scoped_statement_filters_query_graphs() {
        let scope = WriteScope::new(
            "https://example.org/g/insert",
            vec![
                "https://example.org/g/a".to_string(),
                "https://example.org/g/b".to_string(),
            ],
        );
        let statement = build_link_statement(
            "https://example.org/r1",
            "https://example.org/isDerivedFrom",
            "https://pid.example.org/target",
            &scope,
        )
        .unwrap()
        .unwrap();

        assert!(statement.starts_with("INSERT { GRAPH <https://example.org/g/insert>"));
        assert!(statement.contains(
            "FILTER(?graph IN (<https://example.org/g/a>, <https://example.org/g/b>))"
        ));
        assert!(statement.contains(
            "?linked <https://pid.example.org/kos/19050/hasPID> <https://pid.example.org/target>"
        ));
    }

    #[test]
    fn unscoped_statement_uses_default_graph() {
        let statement = build_link_statement(
            "https://example.org/r1",
            "https://example.org/isDerivedFrom",
            "https://pid.example.org/target",
            &WriteScope::default_graph(),
        )
        .unwrap()
        .unwrap();

        assert!(!statement.contains("GRAPH"));
        assert!(statement.starts_with(
            "INSERT { <https://example.org/r1> <https://example.org/isDerivedFrom> ?linked }"
        ));
    }

    #[test]
    fn non_uri_targets_are_skipped() {
        let statement = build_link_statement(
            "https://example.org/r1",
            "https://example.org/isDerivedFrom",
            "just text",
            &WriteScope::default_graph(),
        )
        .unwrap();
        assert!(statement.is_none());
    }
}
