//! Read statements: single fetch, search and existence checks.
//!
//! Every query names its physical graphs through `FROM` clauses, so the
//! store's own default graph is never consulted.

use crate::model::uri::{is_absolute_uri, validate_absolute_uri};
use crate::model::vocab::rdf;
use crate::repo::entity_repo::RepoResult;
use crate::sparql::escape::format_iri;
use crate::sparql::ParameterizedStatement;

const GET_BY_ID_TEMPLATE: &str = "SELECT ?subject ?predicate ?object
@from
WHERE {
  {
    @subject ?predicate ?object .
    BIND(@subject AS ?subject)
  }@nestedBranch
}";

const NESTED_BRANCH_TEMPLATE: &str = "
  UNION
  {
    @subject ?nestedPredicate ?subject .
    FILTER(?nestedPredicate IN (@nestedPredicates))
    ?subject ?predicate ?object .
  }";

const SEARCH_TEMPLATE: &str = "SELECT DISTINCT ?subject ?predicate ?object
@from
WHERE {
  {
    SELECT DISTINCT ?subject
    WHERE {
@typeFilter@labelFilter
    }
    ORDER BY ?subject
    LIMIT @limit
    OFFSET @offset
  }@identifierBranch
  ?subject ?predicate ?object .
}
ORDER BY ?subject";

const EXISTS_TEMPLATE: &str = "ASK
@from
WHERE {
@typeFilter
}";

/// Search filter and paging options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Case-insensitive substring matched against the label predicate.
    pub label: Option<String>,
    /// Page size; `None` or `Some(0)` uses the configured default.
    pub limit: Option<u32>,
    pub offset: u32,
    /// Identifiers returned regardless of type and label filters.
    pub identifiers: Vec<String>,
}

impl SearchCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_identifiers(mut self, identifiers: Vec<String>) -> Self {
        self.identifiers = identifiers;
        self
    }
}

/// Selects the triples of `id` and of entities nested under it.
pub fn render_get_by_id(
    id: &str,
    query_graphs: &[String],
    nested_predicates: &[&str],
) -> RepoResult<String> {
    validate_absolute_uri(id)?;

    let nested_branch = if nested_predicates.is_empty() {
        String::new()
    } else {
        let mut branch = ParameterizedStatement::new(NESTED_BRANCH_TEMPLATE);
        branch
            .set_uri("subject", id)?
            .set_uri_list("nestedPredicates", nested_predicates)?;
        branch.render()?
    };

    let mut statement = ParameterizedStatement::new(GET_BY_ID_TEMPLATE);
    statement
        .set_fragment("from", render_from(query_graphs)?)
        .set_fragment("nestedBranch", nested_branch)
        .set_uri("subject", id)?;
    Ok(statement.render()?)
}

/// Selects triples of a type-filtered, label-filtered page of subjects,
/// unioned with the subjects named in `criteria.identifiers`.
///
/// Identifiers that are not absolute URIs are left out silently.
pub fn render_search(
    criteria: &SearchCriteria,
    types: &[String],
    query_graphs: &[String],
    label_predicate: &str,
    limit: u32,
) -> RepoResult<String> {
    let label_filter = match criteria.label.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => {
            let mut filter = ParameterizedStatement::new(
                "\n      ?subject @labelPredicate ?label .\n      FILTER(CONTAINS(LCASE(STR(?label)), LCASE(@labelText)))",
            );
            filter
                .set_uri("labelPredicate", label_predicate)?
                .set_literal("labelText", label);
            filter.render()?
        }
        _ => String::new(),
    };

    let identifiers: Vec<&str> = criteria
        .identifiers
        .iter()
        .map(|identifier| identifier.trim())
        .filter(|identifier| is_absolute_uri(identifier))
        .collect();
    let identifier_branch = if identifiers.is_empty() {
        String::new()
    } else {
        let rendered = identifiers
            .iter()
            .map(|identifier| format_iri(identifier))
            .collect::<Result<Vec<_>, _>>()?
            .join(" ");
        format!("\n  UNION\n  {{ VALUES ?subject {{ {rendered} }} }}")
    };

    let mut statement = ParameterizedStatement::new(SEARCH_TEMPLATE);
    statement
        .set_fragment("from", render_from(query_graphs)?)
        .set_fragment("typeFilter", render_type_filter("?subject", types)?)
        .set_fragment("labelFilter", label_filter)
        .set_fragment("identifierBranch", identifier_branch)
        .set_integer("limit", u64::from(limit))
        .set_integer("offset", u64::from(criteria.offset));
    Ok(statement.render()?)
}

/// Asks whether `id` exists with one of `types` (any triple if empty).
pub fn render_exists(id: &str, types: &[String], query_graphs: &[String]) -> RepoResult<String> {
    validate_absolute_uri(id)?;
    let mut statement = ParameterizedStatement::new(EXISTS_TEMPLATE);
    statement
        .set_fragment("from", render_from(query_graphs)?)
        .set_fragment("typeFilter", render_type_filter(&format_iri(id)?, types)?);
    Ok(statement.render()?)
}

fn render_from(query_graphs: &[String]) -> RepoResult<String> {
    let clauses = query_graphs
        .iter()
        .map(|graph| format_iri(graph).map(|graph| format!("FROM {graph}")))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(clauses.join("\n"))
}

fn render_type_filter(subject: &str, types: &[String]) -> RepoResult<String> {
    if types.is_empty() {
        return Ok(format!("      {subject} ?anyPredicate ?anyObject ."));
    }
    let mut filter = ParameterizedStatement::new(
        "      @typePredicate ?type .\n      FILTER(?type IN (@types))",
    );
    filter
        .set_fragment("typePredicate", format!("{subject} {}", format_iri(rdf::TYPE)?))
        .set_uri_list("types", types)?;
    Ok(filter.render()?)
}
