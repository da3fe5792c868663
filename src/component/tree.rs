//! Tree walks over a forest of children.

use std::collections::{HashMap, HashSet};

use super::child::Child;
use super::node::Node;

/// Depth-first, pre-order traversal of every node in `roots`.
///
/// Fragments are transparent: their entries are visited as if they were
/// direct children of the enclosing node.
pub fn walk_depth_first(roots: &[Child]) -> Vec<&Node> {
    let mut result = Vec::new();
    let mut stack: Vec<&Child> = roots.iter().rev().collect();
    while let Some(current) = stack.pop() {
        match current {
            Child::Component(component) => {
                let node = component.node();
                result.push(node);
                // Push children in reverse so the first child is visited first.
                stack.extend(node.children().iter().rev());
            }
            Child::Fragment(items) => stack.extend(items.iter().rev()),
            _ => {}
        }
    }
    result
}

/// Find the first node with the given id.
pub fn find_by_id<'a>(roots: &'a [Child], id: &str) -> Option<&'a Node> {
    walk_depth_first(roots).into_iter().find(|node| node.id() == id)
}

/// All node ids in traversal order.
pub fn collect_ids(roots: &[Child]) -> Vec<&str> {
    walk_depth_first(roots).into_iter().map(Node::id).collect()
}

/// Ids that occur more than once, in order of first repetition.
pub fn duplicate_ids(roots: &[Child]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();
    for id in collect_ids(roots) {
        let count = counts.entry(id).or_insert(0);
        *count += 1;
        if *count > 1 && reported.insert(id) {
            duplicates.push(id.to_owned());
        }
    }
    duplicates
}
