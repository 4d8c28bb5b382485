//! Repository layer: entity store contract and in-memory implementation.
//!
//! # Responsibility
//! - Define one data access contract shared by every entity type.
//! - Keep locking and identifier allocation inside the store boundary.
//!
//! # Invariants
//! - Stores are shape-agnostic; all entity knowledge comes through `Entity`.
//! - Not-found is an empty result, never an error.

pub mod entity_store;
