//! Prefix-complement decomposition.
//!
//! Removing one block from a larger one leaves exactly one sibling block per
//! prefix length between the two.

use crate::error::CidrError;
use crate::models::Block;

/// Blocks covering `container` minus `excluded`, largest first.
///
/// For every level `i` in `container.len + 1 ..= excluded.len` the result
/// holds the sibling of `excluded`'s ancestor at depth `i`.
///
/// # Examples
/// ```
/// use cidr_exclude::models::Block;
/// use cidr_exclude::processing::decompose;
/// let container: Block = "10.0.0.0/8".parse().unwrap();
/// let excluded: Block = "10.0.0.0/10".parse().unwrap();
/// let parts = decompose(container, excluded).unwrap();
/// assert_eq!(parts[0].to_string(), "10.128.0.0/9");
/// assert_eq!(parts[1].to_string(), "10.64.0.0/10");
/// ```
pub fn decompose(container: Block, excluded: Block) -> Result<Vec<Block>, CidrError> {
    if !container.is_supernet_of(&excluded) {
        return Err(CidrError::InvalidDecomposition {
            container,
            excluded,
        });
    }

    let family = container.family();
    let width = family.max_length();
    let start = container.prefix_len() + 1;
    let end = excluded.prefix_len();

    let mut parts = Vec::with_capacity((end - container.prefix_len()) as usize);
    for level in start..=end {
        let ancestor = excluded.prefix_bits(level);
        let bit = 1u128 << (width - level);
        parts.push(Block::from_bits(family, ancestor ^ bit, level));
    }
    Ok(parts)
}
