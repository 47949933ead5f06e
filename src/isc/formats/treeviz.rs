//! Treeviz formatter for configuration trees
//!
//! One line per node, nesting drawn with box connectors, labels truncated so the tree stays
//! scannable:
//!
//! ```text
//! ⧉ Root
//! ├─ • ddns-update-style none
//! └─ § subnet 10.5.5.0 netmask 255.255.255.224
//!   ├─ • range 10.5.5.26 10.5.5.30
//!   └─ • option routers 10.5.5.1
//! ```
//!
//! Icons
//!     Root: ⧉
//!     Declaration: §
//!     Property: •

use crate::isc::ast::{Child, RootNode};

const MAX_LABEL: usize = 40;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        s.to_string()
    }
}

fn format_child(child: &Child, prefix: &str, is_last: bool, output: &mut String) {
    let connector = if is_last { "└─" } else { "├─" };
    let (icon, label) = match child {
        Child::Node(node) => ("§", node.to_string()),
        Child::Property(prop) => ("•", prop.to_string()),
    };
    output.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        icon,
        truncate(&label, MAX_LABEL)
    ));

    if let Child::Node(node) = child {
        let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        let count = node.children.len();
        for (i, grandchild) in node.children.iter().enumerate() {
            format_child(grandchild, &child_prefix, i + 1 == count, output);
        }
    }
}

/// Human-readable outline of a tree.
pub fn to_treeviz_str(tree: &RootNode) -> String {
    let mut output = format!("⧉ {}\n", RootNode::TYPE);
    let count = tree.children.len();
    for (i, child) in tree.children.iter().enumerate() {
        format_child(child, "", i + 1 == count, &mut output);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isc::ast::{Node, PropertyNode};

    #[test]
    fn test_outline() {
        let tree = RootNode::new()
            .with_child(PropertyNode::new("ddns-update-style", Some("none".into()), None))
            .with_child(
                Node::new(
                    "subnet",
                    Some("10.5.5.0".into()),
                    Some("netmask 255.255.255.224".into()),
                )
                .with_child(PropertyNode::new("range", Some("10.5.5.26 10.5.5.30".into()), None))
                .with_child(PropertyNode::new("option routers", Some("10.5.5.1".into()), None)),
            );
        assert_eq!(
            to_treeviz_str(&tree),
            "⧉ Root\n├─ • ddns-update-style none\n└─ § subnet 10.5.5.0 netmask 255.255.255.224\n  ├─ • range 10.5.5.26 10.5.5.30\n  └─ • option routers 10.5.5.1\n"
        );
    }

    #[test]
    fn test_long_labels_are_truncated() {
        assert_eq!(truncate("abcdef", 3), "abc…");
        assert_eq!(truncate("abc", 3), "abc");
    }
}
