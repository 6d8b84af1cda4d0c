//! Flat result rows to entity trees.
//!
//! # Invariants
//! - Entities appear in order of first subject appearance.
//! - Values of one predicate keep row order.
//! - An externally supplied subject always wins over row subjects.
//! - Empty input produces empty output, never an error.

use crate::model::entity::{Entity, Value};
use crate::sparql::endpoint::{SolutionRow, Term};
use std::collections::BTreeMap;

pub const SUBJECT_VAR: &str = "subject";
pub const PREDICATE_VAR: &str = "predicate";
pub const OBJECT_VAR: &str = "object";

/// Groups `(subject, predicate, object)` rows into one entity per subject.
///
/// Rows missing any of the three bindings are ignored.
pub fn group_by_subject(rows: &[SolutionRow]) -> Vec<Entity> {
    let mut entities: Vec<Entity> = Vec::new();
    let mut positions: BTreeMap<String, usize> = BTreeMap::new();

    for row in rows {
        let (Some(subject), Some((predicate, object))) =
            (row.get(SUBJECT_VAR), predicate_object(row))
        else {
            continue;
        };
        let index = *positions
            .entry(subject.as_str().to_string())
            .or_insert_with(|| {
                entities.push(Entity::new(subject.as_str()));
                entities.len() - 1
            });
        entities[index].add(predicate, object);
    }

    entities
}

/// Groups `(predicate, object)` rows of one known subject.
///
/// Any `subject` binding in the rows is ignored.
pub fn group_for_subject(subject: &str, rows: &[SolutionRow]) -> Entity {
    let mut entity = Entity::new(subject);
    for (predicate, object) in rows.iter().filter_map(predicate_object) {
        entity.add(predicate, object);
    }
    entity
}

/// Replaces references of `root` that point at one of `others` by the
/// nested entity, recursively.
pub fn assemble_tree(root: Entity, others: Vec<Entity>) -> Entity {
    if others.is_empty() {
        return root;
    }
    let by_id: BTreeMap<String, Entity> = others
        .into_iter()
        .map(|entity| (entity.id.clone(), entity))
        .collect();
    let mut path = vec![root.id.clone()];
    nest_references(root, &by_id, &mut path)
}

fn nest_references(
    mut entity: Entity,
    by_id: &BTreeMap<String, Entity>,
    path: &mut Vec<String>,
) -> Entity {
    for (_, values) in entity.properties.iter_mut() {
        for value in values.iter_mut() {
            let Value::Reference(uri) = value else {
                continue;
            };
            if path.contains(uri) {
                continue;
            }
            let Some(nested) = by_id.get(uri.as_str()) else {
                continue;
            };
            path.push(uri.clone());
            let nested = nest_references(nested.clone(), by_id, path);
            path.pop();
            *value = Value::nested(nested);
        }
    }
    entity
}

fn predicate_object(row: &SolutionRow) -> Option<(&str, Value)> {
    let predicate = match row.get(PREDICATE_VAR)? {
        Term::Iri(predicate) => predicate.as_str(),
        _ => return None,
    };
    let object = row.get(OBJECT_VAR)?.to_value();
    Some((predicate, object))
}
