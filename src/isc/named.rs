//! BIND named.conf over the generic tree
//!
//! named.conf has no typed model here; the generic tree already holds every statement. Blocks
//! close with `};` and top-level blocks are separated by one blank line.

use crate::isc::ast::{Container, Node, RootNode};
use crate::isc::building::build;
use crate::isc::dialect::Dialect;
use crate::isc::error::IscError;
use crate::isc::formats::{serialize, SerializeOptions};
use crate::isc::lexing::tokenize;

pub fn loads(source: &str) -> Result<RootNode, IscError> {
    build(&tokenize(source, Dialect::Named)?)
}

pub fn dumps(tree: &RootNode) -> String {
    serialize(tree, &SerializeOptions::for_dialect(Dialect::Named))
}

/// Top-level `zone` blocks, including those inside views.
pub fn zones(tree: &RootNode) -> Vec<&Node> {
    let mut found: Vec<&Node> = tree.nodes().filter(|node| node.node_type == "zone").collect();
    for view in tree.nodes().filter(|node| node.node_type == "view") {
        found.extend(view.nodes().filter(|node| node.node_type == "zone"));
    }
    found
}
