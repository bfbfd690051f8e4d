//! Grouping of structurally identical matches.

use crate::path::ConcretePath;
use crate::query::Match;
use crate::tree::Node;

/// Locations sharing the same mapping content.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// The shared content, as first seen.
    pub node: Node,
    /// Every location holding that content, in discovery order.
    pub paths: Vec<ConcretePath>,
}

/// Partitions matches by deep equality of their content.
///
/// Groups come out in the order their first member was found, and each group
/// keeps its locations in the order they were found.
pub fn group_matches(matches: Vec<Match>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for Match { node, path } in matches {
        if let Some(group) = groups.iter_mut().find(|group| group.node == node) {
            group.paths.push(path);
        } else {
            groups.push(Group {
                node,
                paths: vec![path],
            });
        }
    }
    groups
}

/// Drops matches that are already references.
pub fn without_refs(matches: Vec<Match>) -> Vec<Match> {
    matches
        .into_iter()
        .filter(|found| !found.node.is_ref())
        .collect()
}
