//! Exclusion tree over address blocks.
//!
//! All nodes of a [`Forest`] live in one arena and refer to each other by
//! [`NodeId`]. Roots are the base blocks the forest was seeded with; a node
//! gains children only when an exclusion splits it.

use super::{Block, Family};
use crate::error::CidrError;
use std::fmt::Write;

/// Index of a node inside its [`Forest`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One block of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub block: Block,
    /// Empty until split; afterwards the children partition `block`.
    pub children: Vec<NodeId>,
    /// Set when this exact block is excluded. Only authoritative on leaves.
    pub dead: bool,
    pub parent: Option<NodeId>,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Ordered set of root nodes of one address family.
#[derive(Debug, Clone)]
pub struct Forest {
    family: Family,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Forest {
    pub fn new(family: Family) -> Forest {
        Forest {
            family,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Seed a forest with one root per base block.
    pub fn from_blocks<I>(family: Family, blocks: I) -> Result<Forest, CidrError>
    where
        I: IntoIterator<Item = Block>,
    {
        let mut forest = Forest::new(family);
        for block in blocks {
            forest.add_root(block)?;
        }
        Ok(forest)
    }

    pub fn add_root(&mut self, block: Block) -> Result<NodeId, CidrError> {
        self.check_family(&block)?;
        let id = self.push(block, None);
        self.roots.push(id);
        Ok(id)
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Every node with its id, in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i), node))
    }

    /// Total nodes ever created, dead and split ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn mark_dead(&mut self, id: NodeId) {
        self.nodes[id.0].dead = true;
    }

    /// Give a leaf its children, one new leaf per block.
    pub fn split(&mut self, id: NodeId, blocks: Vec<Block>) {
        debug_assert!(self.node(id).is_leaf(), "split of an already split node");
        let children: Vec<NodeId> = blocks
            .into_iter()
            .map(|block| self.push(block, Some(id)))
            .collect();
        self.nodes[id.0].children = children;
    }

    pub(crate) fn check_family(&self, block: &Block) -> Result<(), CidrError> {
        if block.family() != self.family {
            return Err(CidrError::FamilyMismatch {
                block: *block,
                expected: self.family,
            });
        }
        Ok(())
    }

    fn push(&mut self, block: Block, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            block,
            children: Vec::new(),
            dead: false,
            parent,
        });
        id
    }

    /// Number of parent hops up to the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = self.node(id).parent;
        while let Some(parent) = cur {
            depth += 1;
            cur = self.node(parent).parent;
        }
        depth
    }

    /// One line per node, prefixed with one `+` per level, dead nodes flagged.
    pub fn render_tree(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<(NodeId, usize)> = self.roots.iter().rev().map(|&id| (id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);
            let dead = if node.dead { " dead" } else { "" };
            let _ = writeln!(out, "{}<Node {}{}>", "+".repeat(depth), node.block, dead);
            stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        }
        out
    }
}
