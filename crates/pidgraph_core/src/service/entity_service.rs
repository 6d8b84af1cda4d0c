//! Entity use-case service.
//!
//! # Responsibility
//! - Provide stable get/create/update/delete entry points.
//! - Run update and delete under an exclusive lock on the entity id.
//!
//! # Invariants
//! - A locked write is committed as one request or not at all.
//! - The lock is released on every path once acquired.

use crate::graph::GraphRouter;
use crate::model::descriptor::DescriptorSet;
use crate::model::entity::Entity;
use crate::repo::entity_repo::{EntityRepository, RepoError, RepoResult};
use crate::service::lock::{LockError, LockService};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

const DEFAULT_LOCK_TTL: Duration = Duration::from_secs(30);

/// Service error for entity use-cases.
#[derive(Debug)]
pub enum ServiceError {
    Repo(RepoError),
    Lock(LockError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Lock(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Lock(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<LockError> for ServiceError {
    fn from(value: LockError) -> Self {
        Self::Lock(value)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Use-case service wrapper for entity persistence.
pub struct EntityService<R: EntityRepository, L: LockService> {
    repo: R,
    locks: L,
    lock_ttl: Duration,
}

impl<R: EntityRepository, L: LockService> EntityService<R, L> {
    pub fn new(repo: R, locks: L) -> Self {
        Self {
            repo,
            locks,
            lock_ttl: DEFAULT_LOCK_TTL,
        }
    }

    /// Overrides how long an edit lock stays valid without release.
    pub fn with_lock_ttl(mut self, lock_ttl: Duration) -> Self {
        self.lock_ttl = lock_ttl;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn get(
        &self,
        router: &GraphRouter<'_>,
        id: &str,
        descriptors: &DescriptorSet,
    ) -> ServiceResult<Entity> {
        Ok(self.repo.get_by_id(router, id, descriptors)?)
    }

    /// Creates an entity; ids are fresh, so no lock is taken.
    pub fn create(
        &mut self,
        router: &GraphRouter<'_>,
        entity: &Entity,
        descriptors: &DescriptorSet,
    ) -> ServiceResult<()> {
        Ok(self.repo.create(router, entity, descriptors)?)
    }

    /// Replaces the stored triples of `entity.id` under an edit lock.
    ///
    /// # Errors
    /// - [`ServiceError::Lock`] with [`LockError::Held`] when another editor
    ///   holds the lock.
    pub fn update(
        &mut self,
        router: &GraphRouter<'_>,
        entity: &Entity,
        descriptors: &DescriptorSet,
    ) -> ServiceResult<()> {
        self.locked_write("update", &entity.id, |repo| {
            repo.update(router, entity, descriptors)
        })
    }

    /// Deletes the triples of `id` under an edit lock.
    pub fn delete(&mut self, router: &GraphRouter<'_>, id: &str) -> ServiceResult<()> {
        self.locked_write("delete", id, |repo| repo.delete(router, id))
    }

    fn locked_write<F>(&mut self, operation: &'static str, id: &str, write: F) -> ServiceResult<()>
    where
        F: FnOnce(&mut R) -> RepoResult<()>,
    {
        let token = self.locks.acquire(id, self.lock_ttl)?;
        let outcome = transactional(&mut self.repo, write);
        let released = self.locks.release(&token);

        match (&outcome, &released) {
            (Ok(()), Ok(())) => {
                info!("event=entity_write module=service status=ok op={operation}");
            }
            (Err(err), _) => {
                warn!("event=entity_write module=service status=error op={operation} error={err}");
            }
            (Ok(()), Err(err)) => {
                warn!(
                    "event=lock_release module=service status=error op={operation} error={err}"
                );
            }
        }

        outcome?;
        released?;
        Ok(())
    }
}

fn transactional<R, F>(repo: &mut R, write: F) -> RepoResult<()>
where
    R: EntityRepository,
    F: FnOnce(&mut R) -> RepoResult<()>,
{
    repo.begin_transaction()?;
    if let Err(err) = write(repo) {
        repo.discard()?;
        return Err(err);
    }
    repo.commit()
}
