//! Generic configuration tree
//!
//! The dialect-agnostic node model every brace dialect parses into: a [RootNode] owning
//! [Node] declarations (which nest) and [PropertyNode] statements (leaves). Ownership is a
//! strict tree: a node owns its children, nothing points back up, and removing a child simply
//! drops it.
//!
//! Equality is structural and ignores order and comments. Two leaves are equal when type, value
//! and parameters are equal; two declarations additionally need the same children as a multiset.
//! That is the notion of "the same configuration" round-trip checks rely on, since serializing
//! does not preserve whitespace, comments' placement or sibling order after a sort.

use serde::Serialize;
use std::fmt;

/// A semicolon-terminated leaf statement.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PropertyNode {
    #[serde(rename = "type")]
    pub node_type: String,
    pub value: Option<String>,
    pub parameters: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// A block statement that owns an ordered list of children.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: String,
    pub value: Option<String>,
    pub parameters: Option<String>,
    pub children: Vec<Child>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// The top-level container. Its children are emitted without an enclosing block.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RootNode {
    pub children: Vec<Child>,
}

/// Anything a block can hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Child {
    Node(Node),
    Property(PropertyNode),
}

impl PropertyNode {
    pub fn new(
        node_type: impl Into<String>,
        value: Option<String>,
        parameters: Option<String>,
    ) -> Self {
        PropertyNode {
            node_type: node_type.into(),
            value,
            parameters,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }
}

impl Node {
    pub fn new(
        node_type: impl Into<String>,
        value: Option<String>,
        parameters: Option<String>,
    ) -> Self {
        Node {
            node_type: node_type.into(),
            value,
            parameters,
            children: Vec::new(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(child.into());
        self
    }
}

impl RootNode {
    pub const TYPE: &'static str = "Root";

    pub fn new() -> Self {
        RootNode::default()
    }

    pub fn node_type(&self) -> &'static str {
        Self::TYPE
    }

    pub fn with_child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(child.into());
        self
    }
}

impl Child {
    pub fn node_type(&self) -> &str {
        match self {
            Child::Node(node) => &node.node_type,
            Child::Property(prop) => &prop.node_type,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Child::Node(node) => node.value.as_deref(),
            Child::Property(prop) => prop.value.as_deref(),
        }
    }

    pub fn parameters(&self) -> Option<&str> {
        match self {
            Child::Node(node) => node.parameters.as_deref(),
            Child::Property(prop) => prop.parameters.as_deref(),
        }
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            Child::Node(node) => node.comment.as_deref(),
            Child::Property(prop) => prop.comment.as_deref(),
        }
    }

    pub fn set_comment(&mut self, comment: Option<String>) {
        match self {
            Child::Node(node) => node.comment = comment,
            Child::Property(prop) => prop.comment = comment,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Child::Node(node) => Some(node),
            Child::Property(_) => None,
        }
    }

    pub fn as_node_mut(&mut self) -> Option<&mut Node> {
        match self {
            Child::Node(node) => Some(node),
            Child::Property(_) => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertyNode> {
        match self {
            Child::Property(prop) => Some(prop),
            Child::Node(_) => None,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Child::Node(_))
    }
}

impl From<Node> for Child {
    fn from(node: Node) -> Self {
        Child::Node(node)
    }
}

impl From<PropertyNode> for Child {
    fn from(prop: PropertyNode) -> Self {
        Child::Property(prop)
    }
}

/// Mutation and lookup shared by [Node] and [RootNode].
pub trait Container {
    fn children(&self) -> &[Child];

    fn children_mut(&mut self) -> &mut Vec<Child>;

    fn add_child(&mut self, child: impl Into<Child>) {
        self.children_mut().push(child.into());
    }

    /// Remove and return the child at `index`, if there is one.
    fn remove_child(&mut self, index: usize) -> Option<Child> {
        let children = self.children_mut();
        (index < children.len()).then(|| children.remove(index))
    }

    /// Drop every child `predicate` selects; returns how many went.
    fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Child) -> bool,
    {
        let children = self.children_mut();
        let before = children.len();
        children.retain(|child| !predicate(child));
        before - children.len()
    }

    /// First child with this type and, when given, this value.
    fn find(&self, node_type: &str, value: Option<&str>) -> Option<&Child> {
        self.children().iter().find(|child| {
            child.node_type() == node_type && value.map_or(true, |v| child.value() == Some(v))
        })
    }

    fn find_mut(&mut self, node_type: &str, value: Option<&str>) -> Option<&mut Child> {
        self.children_mut().iter_mut().find(|child| {
            child.node_type() == node_type && value.map_or(true, |v| child.value() == Some(v))
        })
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = &Node> + '_> {
        Box::new(self.children().iter().filter_map(Child::as_node))
    }

    fn properties(&self) -> Box<dyn Iterator<Item = &PropertyNode> + '_> {
        Box::new(self.children().iter().filter_map(Child::as_property))
    }
}

impl Container for Node {
    fn children(&self) -> &[Child] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Child> {
        &mut self.children
    }
}

impl Container for RootNode {
    fn children(&self) -> &[Child] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Child> {
        &mut self.children
    }
}

/// Multiset equality: every child on one side pairs with a distinct equal child on the other.
fn same_children(left: &[Child], right: &[Child]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut used = vec![false; right.len()];
    left.iter().all(|child| {
        let found = right
            .iter()
            .enumerate()
            .position(|(idx, other)| !used[idx] && child == other);
        match found {
            Some(idx) => {
                used[idx] = true;
                true
            }
            None => false,
        }
    })
}

impl PartialEq for PropertyNode {
    fn eq(&self, other: &Self) -> bool {
        self.node_type == other.node_type
            && self.value == other.value
            && self.parameters == other.parameters
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.node_type == other.node_type
            && self.value == other.value
            && self.parameters == other.parameters
            && same_children(&self.children, &other.children)
    }
}

impl PartialEq for RootNode {
    fn eq(&self, other: &Self) -> bool {
        same_children(&self.children, &other.children)
    }
}

/// `type value parameters` with absent parts left out.
pub(crate) fn statement_line(
    node_type: &str,
    value: Option<&str>,
    parameters: Option<&str>,
) -> String {
    [Some(node_type), value, parameters]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Display for PropertyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&statement_line(
            &self.node_type,
            self.value.as_deref(),
            self.parameters.as_deref(),
        ))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&statement_line(
            &self.node_type,
            self.value.as_deref(),
            self.parameters.as_deref(),
        ))
    }
}

impl fmt::Display for RootNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(Self::TYPE)
    }
}
