//! Buffered update statements committed as one request.
//!
//! # Invariants
//! - Statements keep submission order.
//! - The transaction owns statement text only, never entities or descriptors.

use crate::repo::statement::join_statements;
use std::time::Instant;
use uuid::Uuid;

/// Ordered buffer of pending update statements.
#[derive(Debug)]
pub struct Transaction {
    id: Uuid,
    statements: Vec<String>,
    opened_at: Instant,
}

impl Transaction {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            statements: Vec::new(),
            opened_at: Instant::now(),
        }
    }

    /// Correlation id used in log events.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn push(&mut self, statement: String) {
        self.statements.push(statement);
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn age_ms(&self) -> u128 {
        self.opened_at.elapsed().as_millis()
    }

    /// Request body containing every buffered statement.
    pub fn render(&self) -> String {
        join_statements(&self.statements)
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}
