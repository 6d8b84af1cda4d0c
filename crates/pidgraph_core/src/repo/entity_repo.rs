//! Entity repository contract and SPARQL implementation.
//!
//! # Responsibility
//! - Provide get/create/update/delete/search/exists over a graph store.
//! - Route every statement through the caller-supplied graph router.
//! - Buffer writes while a transaction is open, send them otherwise.
//!
//! # Invariants
//! - Ids are validated before any endpoint call.
//! - Endpoint errors are returned unchanged and never retried.
//! - The repository holds no locks; callers serialize concurrent edits.

use crate::config::RepositoryConfig;
use crate::graph::{GraphConfigError, GraphRouter};
use crate::model::descriptor::DescriptorSet;
use crate::model::entity::Entity;
use crate::model::uri::{validate_absolute_uri, InvalidUriError};
use crate::repo::link::WriteScope;
use crate::repo::query::{render_exists, render_get_by_id, render_search, SearchCriteria};
use crate::repo::statement::{
    build_insert_fragments, join_statements, render_delete_subject, render_insert,
};
use crate::repo::transaction::Transaction;
use crate::repo::transform::{assemble_tree, group_by_subject, group_for_subject, SUBJECT_VAR};
use crate::sparql::{EndpointError, SolutionRow, SparqlEndpoint, SparqlError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error; each variant maps to a distinct caller decision.
#[derive(Debug)]
pub enum RepoError {
    /// Identifier is not a well-formed absolute URI.
    InvalidUri(String),
    /// Single-entity fetch found nothing.
    NotFound(String),
    /// Logical graph names could not be resolved.
    Configuration(GraphConfigError),
    /// Graph store call failed.
    Endpoint(EndpointError),
    /// Statement could not be rendered.
    Statement(SparqlError),
    TransactionAlreadyOpen,
    NoOpenTransaction,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUri(value) => write!(f, "not a well-formed absolute uri: `{value}`"),
            Self::NotFound(id) => write!(f, "entity not found: {id}"),
            Self::Configuration(err) => write!(f, "{err}"),
            Self::Endpoint(err) => write!(f, "{err}"),
            Self::Statement(err) => write!(f, "{err}"),
            Self::TransactionAlreadyOpen => write!(f, "a transaction is already open"),
            Self::NoOpenTransaction => write!(f, "no transaction is open"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Configuration(err) => Some(err),
            Self::Endpoint(err) => Some(err),
            Self::Statement(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InvalidUriError> for RepoError {
    fn from(value: InvalidUriError) -> Self {
        Self::InvalidUri(value.value)
    }
}

impl From<GraphConfigError> for RepoError {
    fn from(value: GraphConfigError) -> Self {
        Self::Configuration(value)
    }
}

impl From<EndpointError> for RepoError {
    fn from(value: EndpointError) -> Self {
        Self::Endpoint(value)
    }
}

impl From<SparqlError> for RepoError {
    fn from(value: SparqlError) -> Self {
        Self::Statement(value)
    }
}

/// Repository interface for entity persistence.
///
/// The graph router and descriptor sets are supplied per call by the caller.
pub trait EntityRepository {
    fn get_by_id(
        &self,
        router: &GraphRouter<'_>,
        id: &str,
        descriptors: &DescriptorSet,
    ) -> RepoResult<Entity>;
    fn create(
        &mut self,
        router: &GraphRouter<'_>,
        entity: &Entity,
        descriptors: &DescriptorSet,
    ) -> RepoResult<()>;
    fn update(
        &mut self,
        router: &GraphRouter<'_>,
        entity: &Entity,
        descriptors: &DescriptorSet,
    ) -> RepoResult<()>;
    fn delete(&mut self, router: &GraphRouter<'_>, id: &str) -> RepoResult<()>;
    fn search(
        &self,
        router: &GraphRouter<'_>,
        criteria: &SearchCriteria,
        types: &[String],
    ) -> RepoResult<Vec<Entity>>;
    fn exists(&self, router: &GraphRouter<'_>, id: &str, types: &[String]) -> RepoResult<bool>;
    fn begin_transaction(&mut self) -> RepoResult<()>;
    fn commit(&mut self) -> RepoResult<()>;
    fn discard(&mut self) -> RepoResult<()>;
}

/// Entity repository over a SPARQL endpoint.
pub struct SparqlEntityRepository<'e> {
    endpoint: &'e dyn SparqlEndpoint,
    config: RepositoryConfig,
    transaction: Option<Transaction>,
}

impl<'e> SparqlEntityRepository<'e> {
    pub fn new(endpoint: &'e dyn SparqlEndpoint, config: RepositoryConfig) -> Self {
        Self {
            endpoint,
            config,
            transaction: None,
        }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// Number of statements waiting for commit.
    pub fn pending_statements(&self) -> usize {
        self.transaction.as_ref().map_or(0, Transaction::len)
    }

    fn write_scope(&self, router: &GraphRouter<'_>) -> RepoResult<WriteScope> {
        let insert_graph = router.resolve_insert_graph(&self.config.insert_graph)?;
        let query_graphs = router.resolve_query_graphs(&self.config.query_graphs)?;
        Ok(WriteScope::new(insert_graph, query_graphs))
    }

    fn render_entity_insert(
        &self,
        entity: &Entity,
        descriptors: &DescriptorSet,
        scope: &WriteScope,
    ) -> RepoResult<Option<String>> {
        let fragments = build_insert_fragments(entity, descriptors, scope)?;
        debug!(
            "event=statement_build module=repo status=ok triples={} auxiliary={}",
            fragments.triples.len(),
            fragments.auxiliary.len()
        );
        render_insert(&fragments, scope.insert_graph.as_deref())
    }

    fn execute_update(&mut self, operation: &'static str, statement: String) -> RepoResult<()> {
        if let Some(tx) = self.transaction.as_mut() {
            tx.push(statement);
            debug!(
                "event=repo_write module=repo status=queued op={operation} tx_id={} pending={}",
                tx.id(),
                tx.len()
            );
            return Ok(());
        }

        let started_at = Instant::now();
        match self.endpoint.update(&statement) {
            Ok(()) => {
                info!(
                    "event=repo_write module=repo status=ok op={operation} bytes={} duration_ms={}",
                    statement.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=repo_write module=repo status=error op={operation} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err.into())
            }
        }
    }
}

impl EntityRepository for SparqlEntityRepository<'_> {
    fn get_by_id(
        &self,
        router: &GraphRouter<'_>,
        id: &str,
        descriptors: &DescriptorSet,
    ) -> RepoResult<Entity> {
        validate_absolute_uri(id)?;
        let query_graphs = router.resolve_query_graphs(&self.config.query_graphs)?;
        let query = render_get_by_id(id, &query_graphs, &descriptors.nested_predicates())?;
        let rows = self.endpoint.select(&query)?;

        let (root_rows, nested_rows): (Vec<SolutionRow>, Vec<SolutionRow>) =
            rows.into_iter().partition(|row| {
                row.get(SUBJECT_VAR)
                    .map_or(true, |subject| subject.as_str() == id)
            });
        if root_rows.is_empty() {
            debug!("event=repo_get module=repo status=not_found");
            return Err(RepoError::NotFound(id.to_string()));
        }

        let root = group_for_subject(id, &root_rows);
        let nested = group_by_subject(&nested_rows);
        debug!(
            "event=repo_get module=repo status=ok rows={} nested={}",
            root_rows.len() + nested_rows.len(),
            nested.len()
        );
        Ok(assemble_tree(root, nested))
    }

    fn create(
        &mut self,
        router: &GraphRouter<'_>,
        entity: &Entity,
        descriptors: &DescriptorSet,
    ) -> RepoResult<()> {
        entity.validate()?;
        let scope = self.write_scope(router)?;
        let Some(statement) = self.render_entity_insert(entity, descriptors, &scope)? else {
            warn!("event=repo_write module=repo status=skipped op=create reason=empty_entity");
            return Ok(());
        };
        self.execute_update("create", statement)
    }

    fn update(
        &mut self,
        router: &GraphRouter<'_>,
        entity: &Entity,
        descriptors: &DescriptorSet,
    ) -> RepoResult<()> {
        entity.validate()?;
        let scope = self.write_scope(router)?;
        let delete = render_delete_subject(&entity.id, scope.insert_graph.as_deref())?;
        let insert = self
            .render_entity_insert(entity, descriptors, &scope)?
            .unwrap_or_default();
        self.execute_update("update", join_statements(&[delete, insert]))
    }

    fn delete(&mut self, router: &GraphRouter<'_>, id: &str) -> RepoResult<()> {
        validate_absolute_uri(id)?;
        let insert_graph = router.resolve_insert_graph(&self.config.insert_graph)?;
        let statement = render_delete_subject(id, Some(&insert_graph))?;
        self.execute_update("delete", statement)
    }

    fn search(
        &self,
        router: &GraphRouter<'_>,
        criteria: &SearchCriteria,
        types: &[String],
    ) -> RepoResult<Vec<Entity>> {
        let query_graphs = router.resolve_query_graphs(&self.config.query_graphs)?;
        let limit = self.config.page_size(criteria.limit);
        let query = render_search(
            criteria,
            types,
            &query_graphs,
            &self.config.label_predicate,
            limit,
        )?;
        let rows = self.endpoint.select(&query)?;
        let entities = group_by_subject(&rows);
        debug!(
            "event=repo_search module=repo status=ok rows={} entities={} limit={limit} offset={}",
            rows.len(),
            entities.len(),
            criteria.offset
        );
        Ok(entities)
    }

    fn exists(&self, router: &GraphRouter<'_>, id: &str, types: &[String]) -> RepoResult<bool> {
        validate_absolute_uri(id)?;
        let query_graphs = router.resolve_query_graphs(&self.config.query_graphs)?;
        let query = render_exists(id, types, &query_graphs)?;
        Ok(self.endpoint.ask(&query)?)
    }

    fn begin_transaction(&mut self) -> RepoResult<()> {
        if self.transaction.is_some() {
            return Err(RepoError::TransactionAlreadyOpen);
        }
        let tx = Transaction::new();
        debug!("event=tx_begin module=repo status=ok tx_id={}", tx.id());
        self.transaction = Some(tx);
        Ok(())
    }

    fn commit(&mut self) -> RepoResult<()> {
        let tx = self
            .transaction
            .take()
            .ok_or(RepoError::NoOpenTransaction)?;
        if tx.is_empty() {
            debug!("event=tx_commit module=repo status=skipped tx_id={} reason=empty", tx.id());
            return Ok(());
        }

        let started_at = Instant::now();
        match self.endpoint.update(&tx.render()) {
            Ok(()) => {
                info!(
                    "event=tx_commit module=repo status=ok tx_id={} statements={} age_ms={} duration_ms={}",
                    tx.id(),
                    tx.len(),
                    tx.age_ms(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=tx_commit module=repo status=error tx_id={} statements={} error={err}",
                    tx.id(),
                    tx.len()
                );
                Err(err.into())
            }
        }
    }

    fn discard(&mut self) -> RepoResult<()> {
        let tx = self
            .transaction
            .take()
            .ok_or(RepoError::NoOpenTransaction)?;
        info!(
            "event=tx_discard module=repo status=ok tx_id={} statements={}",
            tx.id(),
            tx.len()
        );
        Ok(())
    }
}
