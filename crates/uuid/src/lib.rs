//! Synthetic identifier utilities.
//!
//! Every resource emitted by the converter carries a run-local synthetic identifier. Inside
//! a bundle, resources refer to each other through `urn:uuid:` references built from that
//! identifier, so the textual form must be stable and predictable.
//!
//! ## Canonical form
//! - Lowercase, hyphenated UUID text
//! - Example: `550e8400-e29b-41d4-a716-446655440000`
//! - Internal reference: `urn:uuid:550e8400-e29b-41d4-a716-446655440000`
//!
//! ## Identifier sources
//! Identifiers are minted through the [`IdSource`] trait so the bundle assembler never
//! reaches for a global generator:
//! - [`RandomIds`] mints UUID v4 values and is the production default.
//! - [`SequentialIds`] mints counter-backed values. Two runs over the same input with a fresh
//!   `SequentialIds` produce byte-identical documents.

mod resource_id;

pub use resource_id::{IdSource, RandomIds, ResourceId, SequentialIds, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
