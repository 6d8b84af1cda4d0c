//! Repository layer: entity persistence over a SPARQL graph store.
//!
//! # Responsibility
//! - Define the entity repository contract used by services.
//! - Build update statements from entity trees and rebuild trees from rows.
//! - Keep statement rendering isolated from endpoint transport.
//!
//! # Invariants
//! - Statements are assembled with placeholder binding only; caller text is
//!   never concatenated into statement templates.
//! - Repository APIs return semantic errors (`NotFound`, `InvalidUri`) in
//!   addition to endpoint transport errors.

pub mod entity_repo;
pub mod link;
pub mod query;
pub mod statement;
pub mod transaction;
pub mod transform;
