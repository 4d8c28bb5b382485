//! Domain model for the business directory.
//!
//! # Responsibility
//! - Define the capability contract every stored entity implements.
//! - Define the country/province/locality/address/branch/company records.
//!
//! # Invariants
//! - Every stored record carries a store-issued `EntityId`.
//! - Records point at their parents by id; there are no back-references.

pub mod business;
pub mod entity;
