//! Graph router used by the repository facade.

use crate::graph::{GraphConfigError, GraphConfigResult, GraphConfigurationLookup};
use log::debug;

/// Resolves logical graph names through a lookup, or passes them through.
#[derive(Clone, Copy)]
pub struct GraphRouter<'cfg> {
    lookup: Option<&'cfg dyn GraphConfigurationLookup>,
}

impl<'cfg> GraphRouter<'cfg> {
    /// Router that resolves through `lookup` on every call.
    pub fn configured(lookup: &'cfg dyn GraphConfigurationLookup) -> Self {
        Self {
            lookup: Some(lookup),
        }
    }

    /// Router where every logical name is its own physical graph.
    pub fn direct() -> Self {
        Self { lookup: None }
    }

    /// Physical graph that receives inserts for `logical_name`.
    ///
    /// # Errors
    /// - [`GraphConfigError::UnknownGraph`] when nothing is configured.
    pub fn resolve_insert_graph(&self, logical_name: &str) -> GraphConfigResult<String> {
        let Some(lookup) = self.lookup else {
            return Ok(logical_name.to_string());
        };

        let physical = lookup
            .physical_graphs(logical_name)?
            .into_iter()
            .next()
            .ok_or_else(|| GraphConfigError::UnknownGraph(logical_name.to_string()))?;
        debug!(
            "event=graph_resolve module=graph status=ok mode=insert logical={logical_name} physical={physical}"
        );
        Ok(physical)
    }

    /// Union of the physical graphs of `logical_names`, without duplicates.
    ///
    /// Order follows first appearance.
    ///
    /// # Errors
    /// - [`GraphConfigError::EmptyGraphSet`] for an empty input.
    /// - [`GraphConfigError::UnknownGraph`] for a name without physical graphs.
    pub fn resolve_query_graphs<S: AsRef<str>>(
        &self,
        logical_names: &[S],
    ) -> GraphConfigResult<Vec<String>> {
        if logical_names.is_empty() {
            return Err(GraphConfigError::EmptyGraphSet);
        }

        let mut resolved: Vec<String> = Vec::new();
        for name in logical_names {
            let name = name.as_ref();
            let physical = match self.lookup {
                Some(lookup) => lookup.physical_graphs(name)?,
                None => vec![name.to_string()],
            };
            if physical.is_empty() {
                return Err(GraphConfigError::UnknownGraph(name.to_string()));
            }
            for graph in physical {
                if !resolved.contains(&graph) {
                    resolved.push(graph);
                }
            }
        }

        debug!(
            "event=graph_resolve module=graph status=ok mode=query logical_count={} physical_count={}",
            logical_names.len(),
            resolved.len()
        );
        Ok(resolved)
    }
}
