//! Versioned graph configurations persisted in SQLite.
//!
//! # Responsibility
//! - Publish new logical-to-physical mappings as immutable versions.
//! - Serve lookups from the version currently marked as current.
//!
//! # Invariants
//! - At most one version is current at any time.
//! - Publishing writes the version and switches `is_current` atomically.
//! - Every lookup reads the database; nothing is cached in process.

use crate::db::migrations::latest_version;
use crate::graph::{GraphConfigError, GraphConfigResult, GraphConfigurationLookup};
use log::info;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::collections::BTreeMap;

/// Graph configuration store over a migrated SQLite connection.
pub struct SqliteGraphConfigurationStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGraphConfigurationStore<'conn> {
    /// Wraps a connection opened through [`crate::db::open_db`].
    ///
    /// # Errors
    /// - [`GraphConfigError::Source`] when the schema is not fully migrated.
    pub fn try_new(conn: &'conn Connection) -> GraphConfigResult<Self> {
        let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if version != latest_version() {
            return Err(GraphConfigError::Source(format!(
                "graph configuration schema at version {version}, expected {}",
                latest_version()
            )));
        }
        Ok(Self { conn })
    }

    /// Stores `mappings` as a new version and makes it current.
    ///
    /// Returns the new version number.
    pub fn publish(&self, mappings: &BTreeMap<String, Vec<String>>) -> GraphConfigResult<i64> {
        let tx = rusqlite::Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        tx.execute(
            "UPDATE graph_configurations SET is_current = 0 WHERE is_current = 1;",
            [],
        )?;
        tx.execute(
            "INSERT INTO graph_configurations (is_current) VALUES (1);",
            [],
        )?;
        let version = tx.last_insert_rowid();

        for (logical_name, physical_graphs) in mappings {
            for (position, physical_graph) in physical_graphs.iter().enumerate() {
                tx.execute(
                    "INSERT OR IGNORE INTO graph_mappings (
                        config_version,
                        logical_name,
                        physical_graph,
                        position
                    ) VALUES (?1, ?2, ?3, ?4);",
                    params![version, logical_name, physical_graph, position as i64],
                )?;
            }
        }
        tx.commit()?;

        info!(
            "event=graph_config_publish module=graph status=ok version={version} logical_count={}",
            mappings.len()
        );
        Ok(version)
    }

    /// Version currently used for lookups, if any was published.
    pub fn current_version(&self) -> GraphConfigResult<Option<i64>> {
        let version = self
            .conn
            .query_row(
                "SELECT version FROM graph_configurations WHERE is_current = 1;",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(version)
    }

    /// Full mapping stored under `version`.
    pub fn mappings_for_version(
        &self,
        version: i64,
    ) -> GraphConfigResult<BTreeMap<String, Vec<String>>> {
        let mut stmt = self.conn.prepare(
            "SELECT logical_name, physical_graph
             FROM graph_mappings
             WHERE config_version = ?1
             ORDER BY logical_name ASC, position ASC;",
        )?;
        let mut rows = stmt.query([version])?;
        let mut mappings: BTreeMap<String, Vec<String>> = BTreeMap::new();
        while let Some(row) = rows.next()? {
            let logical_name: String = row.get(0)?;
            let physical_graph: String = row.get(1)?;
            mappings.entry(logical_name).or_default().push(physical_graph);
        }
        Ok(mappings)
    }
}

impl GraphConfigurationLookup for SqliteGraphConfigurationStore<'_> {
    fn physical_graphs(&self, logical_name: &str) -> GraphConfigResult<Vec<String>> {
        let version = self
            .current_version()?
            .ok_or(GraphConfigError::NoCurrentConfiguration)?;

        let mut stmt = self.conn.prepare(
            "SELECT physical_graph
             FROM graph_mappings
             WHERE config_version = ?1
               AND logical_name = ?2
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query(params![version, logical_name])?;
        let mut graphs = Vec::new();
        while let Some(row) = rows.next()? {
            graphs.push(row.get(0)?);
        }
        Ok(graphs)
    }
}
