//! Domain models for the CIDR subtraction engine.
//!
//! - [`Block`] - a network prefix of either address family
//! - [`Forest`] and [`Node`] - the arena tree exclusions are applied to

mod block;
mod forest;

// Re-export public types
pub use block::{
    get_cidr_mask, lo_mask, range_to_blocks, Block, Family, MAX_LENGTH_V4, MAX_LENGTH_V6,
};
pub use forest::{Forest, Node, NodeId};
