//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Serialize concurrent edits of one entity through named locks.

pub mod entity_service;
pub mod lock;
