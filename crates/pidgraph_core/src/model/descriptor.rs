//! Property descriptors supplied by the schema collaborator.
//!
//! Descriptors are advisory: a predicate without a descriptor falls back to
//! the default dispatch of the statement builder.

use crate::model::vocab::pid;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema classification of a property's value shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Iri,
    Literal,
    BlankNode,
}

/// Per-predicate schema facts used by the persistence engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    #[serde(default)]
    pub node_kind: Option<NodeKind>,
    #[serde(default)]
    pub datatype: Option<String>,
    /// Group key; [`pid::LINK_TYPES_GROUP`] marks link properties.
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub min_count: Option<u32>,
    #[serde(default)]
    pub max_count: Option<u32>,
    /// Descriptor sets for nested entities, keyed by their `rdf:type`.
    #[serde(default)]
    pub nested: BTreeMap<String, DescriptorSet>,
}

impl PropertyDescriptor {
    pub fn iri() -> Self {
        Self {
            node_kind: Some(NodeKind::Iri),
            ..Self::default()
        }
    }

    pub fn literal(datatype: Option<&str>) -> Self {
        Self {
            node_kind: Some(NodeKind::Literal),
            datatype: datatype.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn link() -> Self {
        Self {
            node_kind: Some(NodeKind::Iri),
            group: Some(pid::LINK_TYPES_GROUP.to_string()),
            ..Self::default()
        }
    }

    /// Adds a nested descriptor set for entities typed `type_uri`.
    pub fn with_nested(mut self, type_uri: &str, descriptors: DescriptorSet) -> Self {
        self.nested.insert(type_uri.to_string(), descriptors);
        self
    }

    pub fn is_link(&self) -> bool {
        self.group.as_deref() == Some(pid::LINK_TYPES_GROUP)
    }

    /// Whether at most one value is allowed.
    pub fn is_single_valued(&self) -> bool {
        self.max_count == Some(1)
    }
}

/// Descriptor lookup by predicate IRI.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DescriptorSet {
    descriptors: BTreeMap<String, PropertyDescriptor>,
}

impl DescriptorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, predicate: &str, descriptor: PropertyDescriptor) -> Self {
        self.insert(predicate, descriptor);
        self
    }

    pub fn insert(&mut self, predicate: &str, descriptor: PropertyDescriptor) {
        self.descriptors.insert(predicate.to_string(), descriptor);
    }

    pub fn get(&self, predicate: &str) -> Option<&PropertyDescriptor> {
        self.descriptors.get(predicate)
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptor set for a nested value of `predicate` typed `type_uri`.
    pub fn nested(&self, predicate: &str, type_uri: Option<&str>) -> Option<&DescriptorSet> {
        let descriptor = self.get(predicate)?;
        descriptor.nested.get(type_uri?)
    }

    /// Predicates whose values are nested entities.
    pub fn nested_predicates(&self) -> Vec<&str> {
        self.descriptors
            .iter()
            .filter(|(_, descriptor)| !descriptor.nested.is_empty())
            .map(|(predicate, _)| predicate.as_str())
            .collect()
    }

    /// Parses a descriptor set handed over as JSON by the schema service.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
