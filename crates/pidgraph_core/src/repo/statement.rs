//! Entity-to-triple statement builder.
//!
//! # Responsibility
//! - Turn an entity tree plus descriptors into insert triples.
//! - Collect auxiliary update operations (link inserts) alongside.
//! - Render insert and subject-delete update statements.
//!
//! # Invariants
//! - Blank values are skipped; no tombstones are written.
//! - Reference-set predicates are written as IRIs whatever the schema says.
//! - Nested entities are written under their own subject, into the same
//!   insert graph as their parent.
//! - Triples follow property iteration order.

use crate::model::descriptor::{DescriptorSet, NodeKind, PropertyDescriptor};
use crate::model::entity::{canonical_date_time, Entity, Literal, Value};
use crate::model::uri::{is_absolute_uri, validate_absolute_uri};
use crate::model::vocab::{is_reference_predicate, pid, xsd};
use crate::repo::entity_repo::RepoResult;
use crate::repo::link::{build_link_statement, WriteScope};
use crate::sparql::escape::{format_iri, format_literal};
use crate::sparql::ParameterizedStatement;
use chrono::DateTime;

const STATEMENT_SEPARATOR: &str = " ;\n";

/// Output of the builder for one entity tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertFragments {
    /// Rendered `s p o .` triples for one insert block.
    pub triples: Vec<String>,
    /// Complete update operations that cannot be expressed as triples.
    pub auxiliary: Vec<String>,
}

impl InsertFragments {
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty() && self.auxiliary.is_empty()
    }

    fn merge(&mut self, other: InsertFragments) {
        self.triples.extend(other.triples);
        self.auxiliary.extend(other.auxiliary);
    }

    fn triple(subject: &str, predicate: &str, object: String) -> Self {
        Self {
            triples: vec![format!("{subject} {predicate} {object} .")],
            auxiliary: Vec::new(),
        }
    }
}

/// Builds triples and auxiliary statements for `entity` and its nested entities.
///
/// # Errors
/// - `RepoError::InvalidUri` when the entity or a nested entity id is not
///   an absolute URI.
/// - `RepoError::Statement` when a predicate or datatype cannot be rendered.
pub fn build_insert_fragments(
    entity: &Entity,
    descriptors: &DescriptorSet,
    scope: &WriteScope,
) -> RepoResult<InsertFragments> {
    validate_absolute_uri(&entity.id)?;
    let subject = format_iri(&entity.id)?;

    let mut fragments = InsertFragments::default();
    for (predicate, values) in &entity.properties {
        let predicate_iri = format_iri(predicate)?;
        let descriptor = descriptors.get(predicate);
        for value in values {
            let target = PropertyTarget {
                subject_id: &entity.id,
                subject: &subject,
                predicate,
                predicate_iri: &predicate_iri,
                descriptor,
            };
            fragments.merge(build_value(&target, value, descriptors, scope)?);
        }
    }
    Ok(fragments)
}

/// Renders the insert update for already built fragments.
///
/// Returns `None` when there is nothing to write.
pub fn render_insert(
    fragments: &InsertFragments,
    insert_graph: Option<&str>,
) -> RepoResult<Option<String>> {
    let mut operations = Vec::with_capacity(fragments.auxiliary.len() + 1);

    if !fragments.triples.is_empty() {
        let body = fragments.triples.join("\n");
        let mut statement = match insert_graph {
            Some(graph) => {
                let mut statement = ParameterizedStatement::new("INSERT DATA { GRAPH @graph {\n@triples\n} }");
                statement.set_uri("graph", graph)?;
                statement
            }
            None => ParameterizedStatement::new("INSERT DATA {\n@triples\n}"),
        };
        statement.set_fragment("triples", body);
        operations.push(statement.render()?);
    }
    operations.extend(fragments.auxiliary.iter().cloned());

    if operations.is_empty() {
        return Ok(None);
    }
    Ok(Some(operations.join(STATEMENT_SEPARATOR)))
}

/// Renders an update removing every triple whose subject is `subject`.
pub fn render_delete_subject(subject: &str, graph: Option<&str>) -> RepoResult<String> {
    validate_absolute_uri(subject)?;
    let mut statement = match graph {
        Some(graph) => {
            let mut statement = ParameterizedStatement::new(
                "DELETE WHERE { GRAPH @graph { @subject ?predicate ?object . } }",
            );
            statement.set_uri("graph", graph)?;
            statement
        }
        None => ParameterizedStatement::new("DELETE WHERE { @subject ?predicate ?object . }"),
    };
    statement.set_uri("subject", subject)?;
    Ok(statement.render()?)
}

/// Joins update operations into one request body.
pub fn join_statements<S: AsRef<str>>(statements: &[S]) -> String {
    statements
        .iter()
        .map(AsRef::as_ref)
        .filter(|statement| !statement.trim().is_empty())
        .collect::<Vec<_>>()
        .join(STATEMENT_SEPARATOR)
}

struct PropertyTarget<'a> {
    subject_id: &'a str,
    subject: &'a str,
    predicate: &'a str,
    predicate_iri: &'a str,
    descriptor: Option<&'a PropertyDescriptor>,
}

fn build_value(
    target: &PropertyTarget<'_>,
    value: &Value,
    descriptors: &DescriptorSet,
    scope: &WriteScope,
) -> RepoResult<InsertFragments> {
    let text = match value {
        Value::Nested(nested) => return build_nested(target, nested, descriptors, scope),
        Value::Literal(literal) if literal.is_blank() => return Ok(InsertFragments::default()),
        Value::Literal(literal) => normalize_lexical(literal, target.descriptor),
        Value::Reference(uri) if uri.trim().is_empty() => return Ok(InsertFragments::default()),
        Value::Reference(uri) => uri.trim().to_string(),
    };

    if is_link_property(target.predicate, target.descriptor) {
        let link = build_link_statement(target.subject_id, target.predicate, &text, scope)?;
        return Ok(InsertFragments {
            triples: Vec::new(),
            auxiliary: link.into_iter().collect(),
        });
    }

    let object = render_object(target, value, &text)?;
    Ok(InsertFragments::triple(
        target.subject,
        target.predicate_iri,
        object,
    ))
}

fn build_nested(
    target: &PropertyTarget<'_>,
    nested: &Entity,
    descriptors: &DescriptorSet,
    scope: &WriteScope,
) -> RepoResult<InsertFragments> {
    let empty = DescriptorSet::new();
    let nested_descriptors = descriptors
        .nested(target.predicate, nested.type_uri())
        .unwrap_or(&empty);

    let mut fragments = build_insert_fragments(nested, nested_descriptors, scope)?;
    if is_link_property(target.predicate, target.descriptor) {
        let link = build_link_statement(target.subject_id, target.predicate, &nested.id, scope)?;
        fragments.auxiliary.extend(link);
    } else {
        fragments.merge(InsertFragments::triple(
            target.subject,
            target.predicate_iri,
            format_iri(&nested.id)?,
        ));
    }
    Ok(fragments)
}

fn render_object(target: &PropertyTarget<'_>, value: &Value, text: &str) -> RepoResult<String> {
    let looks_like_uri = is_absolute_uri(text);
    let node_kind = target.descriptor.and_then(|descriptor| descriptor.node_kind);

    if looks_like_uri && is_reference_predicate(target.predicate) {
        return Ok(format_iri(text)?);
    }
    if looks_like_uri && node_kind == Some(NodeKind::Iri) {
        return Ok(format_iri(text)?);
    }
    if looks_like_uri && matches!(value, Value::Reference(_)) {
        return Ok(format_iri(text)?);
    }

    let descriptor_datatype = target
        .descriptor
        .filter(|descriptor| descriptor.node_kind == Some(NodeKind::Literal))
        .and_then(|descriptor| descriptor.datatype.as_deref());
    if let Some(datatype) = descriptor_datatype {
        return Ok(format_literal(text, Some(datatype))?);
    }

    if let Value::Literal(Literal {
        datatype: Some(datatype),
        ..
    }) = value
    {
        return Ok(format_literal(text, Some(datatype))?);
    }

    Ok(format_literal(text, None)?)
}

fn is_link_property(predicate: &str, descriptor: Option<&PropertyDescriptor>) -> bool {
    predicate == pid::HAS_LATER_VERSION || descriptor.is_some_and(PropertyDescriptor::is_link)
}

fn normalize_lexical(literal: &Literal, descriptor: Option<&PropertyDescriptor>) -> String {
    let declared = descriptor.and_then(|descriptor| descriptor.datatype.as_deref());
    let is_date_time = literal.datatype.as_deref() == Some(xsd::DATE_TIME)
        || declared == Some(xsd::DATE_TIME);
    if is_date_time {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(literal.lexical.trim()) {
            return canonical_date_time(&parsed);
        }
    }
    literal.lexical.clone()
}
