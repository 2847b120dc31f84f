//! CIDR subtraction engine.
//!
//! - [`decompose`] - complement of one block inside another
//! - [`subtract`] - applying exclusion lists to a forest
//! - [`collect`] - gathering and ordering the live leaves

mod collect;
mod decompose;
mod subtract;

// Re-export public functions
pub use collect::{check_disjoint, collect};
pub use decompose::decompose;
pub use subtract::{subtract, subtract_one, Outcome, SubtractReport};
