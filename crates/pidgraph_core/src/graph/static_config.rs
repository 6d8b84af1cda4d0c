//! In-memory graph configuration for composition roots and tests.

use crate::graph::{GraphConfigResult, GraphConfigurationLookup};
use std::collections::BTreeMap;

/// Fixed logical-to-physical graph mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticGraphConfiguration {
    mappings: BTreeMap<String, Vec<String>>,
}

impl StaticGraphConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, logical_name: &str, physical_graphs: &[&str]) -> Self {
        self.insert(
            logical_name,
            physical_graphs.iter().map(|graph| graph.to_string()).collect(),
        );
        self
    }

    pub fn insert(&mut self, logical_name: &str, physical_graphs: Vec<String>) {
        self.mappings.insert(logical_name.to_string(), physical_graphs);
    }

    pub fn mappings(&self) -> &BTreeMap<String, Vec<String>> {
        &self.mappings
    }
}

impl GraphConfigurationLookup for StaticGraphConfiguration {
    fn physical_graphs(&self, logical_name: &str) -> GraphConfigResult<Vec<String>> {
        Ok(self.mappings.get(logical_name).cloned().unwrap_or_default())
    }
}
