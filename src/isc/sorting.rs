//! Canonical ordering of a tree
//!
//! [sort_tree] returns a sorted deep copy; the input is never touched. Every level is ordered by
//! `(priority, type, secondary key)`:
//!
//! - priority comes from the dialect's fixed table ([Dialect::sort_priority]); unlisted types
//!   rank 0 and therefore come first, which keeps plain parameters above blocks
//! - the secondary key of a `subnet` is its address as numbers, so `10.2.0.0` sorts before
//!   `10.10.0.0`; everything else compares its raw value
//!
//! The sort is stable: children with equal keys keep their source order.

use crate::isc::ast::{Child, Node, RootNode};
use crate::isc::dialect::Dialect;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SecondaryKey {
    Numeric(Vec<u32>),
    Text(Option<String>),
}

/// Numeric octets of a dotted address, if every part is a number.
fn octets(value: &str) -> Option<Vec<u32>> {
    value.split('.').map(|part| part.parse::<u32>().ok()).collect()
}

fn secondary_key(child: &Child) -> SecondaryKey {
    let value = child.value();
    if child.node_type() == "subnet" {
        if let Some(parts) = value.and_then(octets) {
            return SecondaryKey::Numeric(parts);
        }
    }
    SecondaryKey::Text(value.map(str::to_string))
}

fn compare(dialect: Dialect, a: &Child, b: &Child) -> Ordering {
    dialect
        .sort_priority(a.node_type())
        .cmp(&dialect.sort_priority(b.node_type()))
        .then_with(|| a.node_type().cmp(b.node_type()))
        .then_with(|| secondary_key(a).cmp(&secondary_key(b)))
}

fn sort_children(children: &mut [Child], dialect: Dialect) {
    children.sort_by(|a, b| compare(dialect, a, b));
    for child in children.iter_mut() {
        if let Some(node) = child.as_node_mut() {
            sort_node(node, dialect);
        }
    }
}

fn sort_node(node: &mut Node, dialect: Dialect) {
    sort_children(&mut node.children, dialect);
}

/// A sorted deep copy of `tree`.
pub fn sort_tree(tree: &RootNode, dialect: Dialect) -> RootNode {
    let mut sorted = tree.clone();
    sort_children(&mut sorted.children, dialect);
    sorted
}
