//! Named exclusive locks with expiry.
//!
//! # Invariants
//! - At most one live holder per resource name.
//! - An expired lock is free; the next acquire replaces it.
//! - Release only succeeds for the token that acquired the lock.

use log::{debug, warn};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use uuid::Uuid;

pub type LockResult<T> = Result<T, LockError>;

/// Lock service error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    /// Another holder owns an unexpired lock on the resource.
    Held(String),
    /// Token does not own the resource (never acquired, expired or taken over).
    NotHeld(String),
    /// Lock table is unusable after a panic in another holder.
    Poisoned,
}

impl Display for LockError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Held(resource) => write!(f, "resource is locked: {resource}"),
            Self::NotHeld(resource) => write!(f, "lock is not held: {resource}"),
            Self::Poisoned => write!(f, "lock table poisoned"),
        }
    }
}

impl Error for LockError {}

/// Proof of ownership returned by [`LockService::acquire`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockToken {
    pub resource: String,
    pub owner: Uuid,
}

/// Exclusive named locks.
pub trait LockService {
    fn acquire(&self, resource: &str, ttl: Duration) -> LockResult<LockToken>;
    fn release(&self, token: &LockToken) -> LockResult<()>;
}

impl<T: LockService + ?Sized> LockService for &T {
    fn acquire(&self, resource: &str, ttl: Duration) -> LockResult<LockToken> {
        (**self).acquire(resource, ttl)
    }

    fn release(&self, token: &LockToken) -> LockResult<()> {
        (**self).release(token)
    }
}

#[derive(Debug)]
struct LockEntry {
    owner: Uuid,
    expires_at: Instant,
}

/// Process-local lock table.
#[derive(Debug, Default)]
pub struct InProcessLockService {
    entries: Mutex<HashMap<String, LockEntry>>,
}

impl InProcessLockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `resource` currently has an unexpired holder.
    pub fn is_locked(&self, resource: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| {
                entries
                    .get(resource)
                    .is_some_and(|entry| entry.expires_at > Instant::now())
            })
            .unwrap_or(false)
    }
}

impl LockService for InProcessLockService {
    fn acquire(&self, resource: &str, ttl: Duration) -> LockResult<LockToken> {
        let mut entries = self.entries.lock().map_err(|_| LockError::Poisoned)?;
        let now = Instant::now();
        if let Some(entry) = entries.get(resource) {
            if entry.expires_at > now {
                debug!("event=lock_acquire module=service status=conflict");
                return Err(LockError::Held(resource.to_string()));
            }
            warn!("event=lock_acquire module=service status=expired_takeover");
        }

        let owner = Uuid::new_v4();
        entries.insert(
            resource.to_string(),
            LockEntry {
                owner,
                expires_at: now + ttl,
            },
        );
        debug!(
            "event=lock_acquire module=service status=ok ttl_ms={}",
            ttl.as_millis()
        );
        Ok(LockToken {
            resource: resource.to_string(),
            owner,
        })
    }

    fn release(&self, token: &LockToken) -> LockResult<()> {
        let mut entries = self.entries.lock().map_err(|_| LockError::Poisoned)?;
        match entries.get(&token.resource) {
            Some(entry) if entry.owner == token.owner => {
                entries.remove(&token.resource);
                debug!("event=lock_release module=service status=ok");
                Ok(())
            }
            _ => Err(LockError::NotHeld(token.resource.clone())),
        }
    }
}
