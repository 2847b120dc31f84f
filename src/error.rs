//! Errors raised by the CIDR subtraction core.
//!
//! Feed readers and writers wrap these in `Box<dyn Error>` together with
//! file and line context.

use crate::models::{Block, Family};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CidrError {
    /// Text that does not parse as `addr/len` for the expected family.
    #[error("invalid prefix '{input}': {reason}")]
    InvalidPrefix { input: String, reason: String },

    /// A split was attempted where `excluded` is not strictly inside `container`.
    #[error("cannot decompose {container} around {excluded}: not strictly contained")]
    InvalidDecomposition { container: Block, excluded: Block },

    /// A block was offered to a forest of the other address family.
    #[error("{block} is not an {expected} block")]
    FamilyMismatch { block: Block, expected: Family },

    /// Two blocks of a collected list share addresses.
    #[error("Overlap found: {first} and {second}")]
    Overlap { first: Block, second: Block },

    #[error("Blocks out of order: {first} before {second}")]
    OutOfOrder { first: Block, second: Block },
}

impl CidrError {
    pub(crate) fn invalid_prefix(input: &str, reason: impl Into<String>) -> Self {
        CidrError::InvalidPrefix {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
