//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for crimes.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Every rich-typed field crosses the storage boundary through `convert`.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod crime_repo;
