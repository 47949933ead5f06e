//! Testing utilities for tree assertions
//!
//! Fluent assertions over the generic tree, so tests state the whole expected shape instead of
//! indexing into `children` by hand:
//!
//! ```rust,ignore
//! use iscconf::isc::testing::assert_tree;
//!
//! assert_tree(&tree)
//!     .child_count(2)
//!     .child(1, |subnet| {
//!         subnet
//!             .node_type("subnet")
//!             .value("10.5.5.0")
//!             .child_count(2)
//!             .child(0, |range| {
//!                 range.is_property().node_type("range");
//!             });
//!     });
//! ```
//!
//! Failures name the path to the offending child (`children[1].children[0]`).
//!
//! Shared sample files live under `tests/fixtures/`; [fixture] reads one by name.

use crate::isc::ast::{Child, RootNode};
use std::path::PathBuf;

fn summarize(children: &[Child]) -> String {
    children
        .iter()
        .map(|child| child.node_type().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn assert_tree(tree: &RootNode) -> TreeAssertion<'_> {
    TreeAssertion {
        children: &tree.children,
    }
}

pub struct TreeAssertion<'a> {
    children: &'a [Child],
}

impl<'a> TreeAssertion<'a> {
    pub fn child_count(self, expected: usize) -> Self {
        assert_eq!(
            self.children.len(),
            expected,
            "Expected {} top-level children, found {}: [{}]",
            expected,
            self.children.len(),
            summarize(self.children)
        );
        self
    }

    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(ChildAssertion<'a>),
    {
        assertion(child_at(self.children, index, "children"));
        self
    }

    /// Top-level types in order.
    pub fn types(self, expected: &[&str]) -> Self {
        let actual: Vec<_> = self.children.iter().map(Child::node_type).collect();
        assert_eq!(actual, expected, "top-level types differ");
        self
    }
}

fn child_at<'a>(children: &'a [Child], index: usize, context: &str) -> ChildAssertion<'a> {
    assert!(
        index < children.len(),
        "{}: index {} out of bounds ({} children: [{}])",
        context,
        index,
        children.len(),
        summarize(children)
    );
    ChildAssertion {
        child: &children[index],
        context: format!("{}[{}]", context, index),
    }
}

pub struct ChildAssertion<'a> {
    child: &'a Child,
    context: String,
}

impl<'a> ChildAssertion<'a> {
    pub fn node_type(self, expected: &str) -> Self {
        assert_eq!(
            self.child.node_type(),
            expected,
            "{}: wrong type",
            self.context
        );
        self
    }

    pub fn value(self, expected: &str) -> Self {
        assert_eq!(
            self.child.value(),
            Some(expected),
            "{}: wrong value",
            self.context
        );
        self
    }

    pub fn no_value(self) -> Self {
        assert_eq!(self.child.value(), None, "{}: expected no value", self.context);
        self
    }

    pub fn parameters(self, expected: &str) -> Self {
        assert_eq!(
            self.child.parameters(),
            Some(expected),
            "{}: wrong parameters",
            self.context
        );
        self
    }

    pub fn comment(self, expected: &str) -> Self {
        assert_eq!(
            self.child.comment(),
            Some(expected),
            "{}: wrong comment",
            self.context
        );
        self
    }

    pub fn is_node(self) -> Self {
        assert!(self.child.is_node(), "{}: expected a declaration", self.context);
        self
    }

    pub fn is_property(self) -> Self {
        assert!(!self.child.is_node(), "{}: expected a property", self.context);
        self
    }

    fn children(&self) -> &'a [Child] {
        match self.child {
            Child::Node(node) => &node.children,
            Child::Property(_) => &[],
        }
    }

    pub fn child_count(self, expected: usize) -> Self {
        let children = self.children();
        assert_eq!(
            children.len(),
            expected,
            "{}: expected {} children, found {}: [{}]",
            self.context,
            expected,
            children.len(),
            summarize(children)
        );
        self
    }

    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(ChildAssertion<'a>),
    {
        let context = format!("{}.children", self.context);
        assertion(child_at(self.children(), index, &context));
        self
    }
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Contents of `tests/fixtures/<name>`; panics if it is missing.
pub fn fixture(name: &str) -> String {
    let path = fixture_path(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("cannot read fixture {}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isc::ast::{Node, PropertyNode};

    fn sample() -> RootNode {
        RootNode::new().with_child(
            Node::new("host", Some("a".into()), None)
                .with_comment(Some("# printer".into()))
                .with_child(PropertyNode::new("fixed-address", Some("10.0.0.5".into()), None)),
        )
    }

    #[test]
    fn test_fluent_assertions() {
        assert_tree(&sample()).child_count(1).types(&["host"]).child(0, |host| {
            host.is_node()
                .value("a")
                .comment("# printer")
                .child_count(1)
                .child(0, |address| {
                    address.is_property().node_type("fixed-address").value("10.0.0.5");
                });
        });
    }

    #[test]
    #[should_panic(expected = "children[0].children: index 3 out of bounds")]
    fn test_out_of_bounds_names_the_path() {
        assert_tree(&sample()).child(0, |host| {
            host.child(3, |_| {});
        });
    }
}
