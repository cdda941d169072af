//! Domain model for crime records.
//!
//! # Responsibility
//! - Define the canonical `Crime` value record and its stable identifier.
//! - Expose identifier generation as an injectable capability.
//!
//! # Invariants
//! - Every crime is identified by a stable `CrimeId` assigned exactly once.
//! - The model holds data only; persistence shape lives in `convert`/`repo`.

pub mod crime;
