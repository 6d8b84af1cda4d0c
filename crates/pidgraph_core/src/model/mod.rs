//! Entity model persisted as RDF triples.
//!
//! # Responsibility
//! - Define the in-memory entity tree handed to and returned by repositories.
//! - Define the schema descriptors that drive literal/reference dispatch.
//! - Keep vocabulary IRIs used by the persistence engine in one place.
//!
//! # Invariants
//! - Every entity is identified by an absolute URI before it is written.
//! - Value shape (literal, reference, nested) is decided once, at ingestion.

pub mod descriptor;
pub mod entity;
pub mod uri;
pub mod vocab;
