//! Gathering the live leaves of a forest.

use crate::error::CidrError;
use crate::models::{Block, Forest, NodeId};

/// Live leaf blocks of `forest`, sorted by network address then prefix length.
pub fn collect(forest: &Forest) -> Vec<Block> {
    let mut blocks = Vec::new();
    for &root in forest.roots() {
        collect_live(forest, root, &mut blocks);
    }
    blocks.sort();
    blocks
}

fn collect_live(forest: &Forest, id: NodeId, blocks: &mut Vec<Block>) {
    let node = forest.node(id);
    if node.dead {
        return;
    }
    if node.is_leaf() {
        blocks.push(node.block);
    } else {
        for &child in &node.children {
            collect_live(forest, child, blocks);
        }
    }
}

// return error if the sorted list has overlapping or out-of-order blocks
pub fn check_disjoint(blocks: &[Block]) -> Result<(), CidrError> {
    for pair in blocks.windows(2) {
        let (first, second) = (pair[0], pair[1]);
        if first > second {
            return Err(CidrError::OutOfOrder { first, second });
        }
        if first.overlaps(&second) {
            return Err(CidrError::Overlap { first, second });
        }
    }
    Ok(())
}
