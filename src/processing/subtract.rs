//! Subtraction of exclusion prefixes from a [`Forest`].
//!
//! Nodes are split lazily: a block is only broken up when an exclusion
//! first lands strictly inside it, and then only into the blocks
//! [`decompose`] returns.

use super::decompose;
use crate::error::CidrError;
use crate::models::{Block, Forest, NodeId};

/// What applying one exclusion did to the forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The node equal to the exclusion was marked dead.
    Killed,
    /// The leaf was split around the exclusion.
    Split(NodeId),
    /// The addresses were already excluded.
    Covered,
    /// No node of the forest overlaps the exclusion.
    Ignored,
}

/// Per-pass counters, logged after each exclusion list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SubtractReport {
    pub killed: usize,
    pub split: usize,
    pub covered: usize,
    pub ignored: usize,
}

impl SubtractReport {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Killed => self.killed += 1,
            Outcome::Split(_) => self.split += 1,
            Outcome::Covered => self.covered += 1,
            Outcome::Ignored => self.ignored += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.killed + self.split + self.covered + self.ignored
    }
}

impl std::fmt::Display for SubtractReport {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "killed={} split={} covered={} ignored={}",
            self.killed, self.split, self.covered, self.ignored
        )
    }
}

/// Apply `exclusions` to `forest` in order.
pub fn subtract(forest: &mut Forest, exclusions: &[Block]) -> Result<SubtractReport, CidrError> {
    let mut report = SubtractReport::default();
    for exclusion in exclusions {
        let outcome = subtract_one(forest, *exclusion)?;
        log::trace!("exclude {exclusion}: {outcome:?}");
        report.record(outcome);
    }
    log::debug!(
        "{} pass: {} exclusions {report}, forest has {} nodes",
        forest.family(),
        report.total(),
        forest.len()
    );
    Ok(report)
}

/// Apply a single exclusion.
///
/// Walks one sibling list per level: an equal node is marked dead, a node
/// strictly containing the exclusion is either descended into (already
/// split) or split now. The first match ends the walk.
pub fn subtract_one(forest: &mut Forest, exclusion: Block) -> Result<Outcome, CidrError> {
    forest.check_family(&exclusion)?;

    let mut siblings: Vec<NodeId> = forest.roots().to_vec();
    let mut inside_coverage = false;
    loop {
        let mut descend = None;
        for &id in &siblings {
            let node = forest.node(id);
            if node.block == exclusion {
                forest.mark_dead(id);
                return Ok(Outcome::Killed);
            }
            if node.block.is_supernet_of(&exclusion) {
                if !node.is_leaf() {
                    descend = Some(node.children.clone());
                    break;
                }
                // Splitting a dead leaf would bring its other addresses back to life.
                if node.dead {
                    return Ok(Outcome::Covered);
                }
                let parts = decompose(node.block, exclusion)?;
                forest.split(id, parts);
                return Ok(Outcome::Split(id));
            }
        }

        match descend {
            Some(children) => {
                siblings = children;
                inside_coverage = true;
            }
            None => {
                // Inside a split node but in none of its children: the gap
                // left by an earlier exclusion. Exclusions wider than every
                // sibling end here too; they mark nothing.
                return Ok(if inside_coverage {
                    Outcome::Covered
                } else {
                    Outcome::Ignored
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Family;
    use crate::processing::collect;

    fn block(s: &str) -> Block {
        s.parse().unwrap()
    }

    fn blocks(list: &[&str]) -> Vec<Block> {
        list.iter().map(|s| block(s)).collect()
    }

    fn forest(roots: &[&str]) -> Forest {
        let family = block(roots[0]).family();
        Forest::from_blocks(family, blocks(roots)).unwrap()
    }

    fn live_count(forest: &Forest) -> u128 {
        collect(forest)
            .iter()
            .map(|b| b.address_count().unwrap())
            .sum()
    }

    fn dead_states(forest: &Forest) -> Vec<(Block, bool, usize)> {
        forest
            .nodes()
            .map(|(_, node)| (node.block, node.dead, node.children.len()))
            .collect()
    }

    fn assert_partitioned(forest: &Forest) {
        let mut stack: Vec<NodeId> = forest.roots().to_vec();
        while let Some(id) = stack.pop() {
            let node = forest.node(id);
            if node.is_leaf() {
                continue;
            }
            let children: Vec<Block> = node
                .children
                .iter()
                .map(|c| forest.node(*c).block)
                .collect();
            let total: u128 = children.iter().map(|b| b.address_count().unwrap()).sum();
            assert_eq!(
                total,
                node.block.address_count().unwrap(),
                "children of {} leave a gap",
                node.block
            );
            for (i, a) in children.iter().enumerate() {
                assert!(node.block.is_supernet_of(a));
                for b in &children[i + 1..] {
                    assert!(!a.overlaps(b), "{a} overlaps {b}");
                }
            }
            for c in &node.children {
                assert_eq!(forest.node(*c).parent, Some(id));
            }
            stack.extend(node.children.iter().copied());
        }
    }

    #[test]
    fn test_subtract_single() {
        let mut f = forest(&["10.0.0.0/8"]);
        let report = subtract(&mut f, &blocks(&["10.1.0.0/16"])).unwrap();
        assert_eq!(report.split, 1);

        assert_eq!(
            collect(&f),
            blocks(&[
                "10.0.0.0/16",
                "10.2.0.0/15",
                "10.4.0.0/14",
                "10.8.0.0/13",
                "10.16.0.0/12",
                "10.32.0.0/11",
                "10.64.0.0/10",
                "10.128.0.0/9",
            ])
        );
        assert_eq!(live_count(&f), (1 << 24) - (1 << 16));
        assert!(!f.node(f.roots()[0]).dead);
        assert_partitioned(&f);
    }

    #[test]
    fn test_subtract_nested_in_gap() {
        let mut f = forest(&["10.0.0.0/8"]);
        subtract(&mut f, &blocks(&["10.1.0.0/16"])).unwrap();
        let before = collect(&f);

        let outcome = subtract_one(&mut f, block("10.1.1.0/24")).unwrap();
        assert_eq!(outcome, Outcome::Covered);
        assert_eq!(collect(&f), before);
        assert_eq!(live_count(&f), (1 << 24) - (1 << 16));
    }

    #[test]
    fn test_subtract_recurses_into_children() {
        let mut f = forest(&["10.0.0.0/8"]);
        subtract(&mut f, &blocks(&["10.1.0.0/16", "10.200.0.0/16", "10.200.5.0/24"])).unwrap();

        assert_eq!(
            live_count(&f),
            (1 << 24) - (1 << 16) - (1 << 16),
            "10.200.5.0/24 lies in an excluded gap"
        );

        let outcome = subtract_one(&mut f, block("10.129.0.0/16")).unwrap();
        assert!(matches!(outcome, Outcome::Split(_)));
        assert_eq!(live_count(&f), (1 << 24) - 3 * (1 << 16));
        assert_partitioned(&f);
    }

    #[test]
    fn test_subtract_out_of_coverage() {
        let mut f = forest(&["10.0.0.0/8"]);
        let report = subtract(&mut f, &blocks(&["192.168.0.0/16"])).unwrap();
        assert_eq!(report.ignored, 1);
        assert_eq!(f.len(), 1);
        let root = f.node(f.roots()[0]);
        assert!(!root.dead);
        assert!(root.is_leaf());
        assert_eq!(collect(&f), blocks(&["10.0.0.0/8"]));
    }

    #[test]
    fn test_subtract_exact_match_idempotent() {
        let mut once = forest(&["1.0.0.0/8", "2.0.0.0/8"]);
        subtract(&mut once, &blocks(&["1.0.0.0/8", "2.128.0.0/9"])).unwrap();

        let mut twice = forest(&["1.0.0.0/8", "2.0.0.0/8"]);
        subtract(&mut twice, &blocks(&["1.0.0.0/8", "2.128.0.0/9"])).unwrap();
        subtract(&mut twice, &blocks(&["1.0.0.0/8", "2.128.0.0/9"])).unwrap();

        assert_eq!(dead_states(&once), dead_states(&twice));
        assert_eq!(collect(&once), collect(&twice));
        assert_eq!(collect(&once), blocks(&["2.0.0.0/9"]));
    }

    #[test]
    fn test_subtract_first_match_wins() {
        let mut f = forest(&["1.0.0.0/8", "2.0.0.0/8", "3.0.0.0/8"]);
        let outcome = subtract_one(&mut f, block("2.0.0.0/8")).unwrap();
        assert_eq!(outcome, Outcome::Killed);
        assert_eq!(collect(&f), blocks(&["1.0.0.0/8", "3.0.0.0/8"]));
    }

    #[test]
    fn test_subtract_dead_leaf_not_resurrected() {
        let mut f = forest(&["10.0.0.0/8"]);
        subtract(&mut f, &blocks(&["10.0.0.0/8"])).unwrap();

        let outcome = subtract_one(&mut f, block("10.1.0.0/16")).unwrap();
        assert_eq!(outcome, Outcome::Covered);
        assert!(collect(&f).is_empty());
        assert_eq!(f.len(), 1);
    }

    #[test]
    fn test_subtract_exact_match_on_split_node() {
        let mut f = forest(&["10.0.0.0/8"]);
        subtract(&mut f, &blocks(&["10.1.0.0/16", "10.0.0.0/8"])).unwrap();
        assert!(collect(&f).is_empty());
    }

    #[test]
    fn test_subtract_wider_exclusion() {
        let mut f = forest(&["1.0.0.0/8", "2.0.0.0/8"]);
        let outcome = subtract_one(&mut f, block("0.0.0.0/6")).unwrap();
        assert_eq!(outcome, Outcome::Ignored);
        assert_eq!(collect(&f), blocks(&["1.0.0.0/8", "2.0.0.0/8"]));
        assert_eq!(f.len(), 2);

        let mut f = forest(&["10.0.0.0/8"]);
        subtract(&mut f, &blocks(&["10.1.0.0/16"])).unwrap();
        let before = collect(&f);
        let outcome = subtract_one(&mut f, block("10.0.0.0/9")).unwrap();
        assert_eq!(outcome, Outcome::Covered);
        assert_eq!(collect(&f), before);
        assert!(f.nodes().all(|(_, node)| !node.dead));
    }

    #[test]
    fn test_subtract_family_mismatch() {
        let mut f = Forest::from_blocks(Family::V6, blocks(&["2000::/3"])).unwrap();
        let err = subtract(&mut f, &blocks(&["10.0.0.0/8"])).unwrap_err();
        assert!(matches!(err, CidrError::FamilyMismatch { .. }));
    }

    #[test]
    fn test_subtract_v6() {
        let mut f = Forest::from_blocks(Family::V6, blocks(&["2000::/3"])).unwrap();
        let report = subtract(
            &mut f,
            &blocks(&["2001::/32", "2001:db8::/32", "2002::/16", "2400:cb00::/32"]),
        )
        .unwrap();
        assert_eq!(report.split, 4);
        assert_partitioned(&f);

        let live = collect(&f);
        let excluded: u128 = 3 * (1u128 << 96) + (1u128 << 112);
        assert_eq!(live_count(&f), (1u128 << 125) - excluded);
        for b in &blocks(&["2001::/32", "2001:db8::/32", "2002::/16", "2400:cb00::/32"]) {
            assert!(live.iter().all(|l| !l.overlaps(b)), "{b} still live");
        }
    }

    #[test]
    fn test_subtract_many_keeps_partition() {
        let mut f = forest(&["1.0.0.0/8", "27.0.0.0/8", "36.0.0.0/8"]);
        let exclusions = blocks(&[
            "1.0.1.0/24",
            "1.0.2.0/23",
            "1.0.8.0/21",
            "1.0.32.0/19",
            "1.1.0.0/24",
            "1.1.2.0/23",
            "27.8.0.0/13",
            "27.16.0.0/12",
            "27.36.0.0/14",
            "36.0.0.0/22",
            "36.0.8.0/21",
            "36.1.0.0/16",
            "1.0.2.0/24",
        ]);
        subtract(&mut f, &exclusions).unwrap();
        assert_partitioned(&f);

        let excluded: u128 = exclusions[..12]
            .iter()
            .map(|b| b.address_count().unwrap())
            .sum();
        assert_eq!(live_count(&f), 3 * (1 << 24) - excluded);
    }
}
