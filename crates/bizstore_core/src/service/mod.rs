//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate entity store calls into business-directory operations.
//! - Keep foreign-key checks out of the shape-agnostic store.

pub mod directory_service;
