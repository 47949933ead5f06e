//! Generic tree serializer
//!
//! The inverse of the tree builder: walks a [RootNode] and writes indented ISC text. Output is
//! not byte-identical to what was parsed (whitespace is canonical), but parsing it again gives
//! an equal tree.

use super::isc_writer::IscWriter;
use crate::isc::ast::{statement_line, Child, RootNode};
use crate::isc::dialect::{CloseBrace, Dialect};
use serde::{Deserialize, Serialize};

/// Layout knobs for [serialize].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializeOptions {
    pub indent_width: usize,
    pub close_brace: CloseBrace,
    /// Separate top-level blocks with an empty line
    pub blank_line_after_top_level_block: bool,
}

impl SerializeOptions {
    /// The house style of each dialect: dhcpd closes with `}`, named with `};` and a blank line
    /// after every top-level block.
    pub fn for_dialect(dialect: Dialect) -> Self {
        SerializeOptions {
            indent_width: 4,
            close_brace: dialect.close_brace(),
            blank_line_after_top_level_block: dialect == Dialect::Named,
        }
    }

    pub fn with_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }
}

impl Default for SerializeOptions {
    fn default() -> Self {
        SerializeOptions::for_dialect(Dialect::Dhcpd)
    }
}

fn write_child(writer: &mut IscWriter, child: &Child, options: &SerializeOptions) {
    if let Some(comment) = child.comment() {
        writer.comment(comment);
    }
    match child {
        Child::Property(prop) => writer.statement(&prop.to_string()),
        Child::Node(node) => {
            writer.open(&statement_line(
                &node.node_type,
                node.value.as_deref(),
                node.parameters.as_deref(),
            ));
            for grandchild in &node.children {
                write_child(writer, grandchild, options);
            }
            writer.close(options.close_brace);
        }
    }
}

/// Render a tree as ISC configuration text.
///
/// With `blank_line_after_top_level_block`, an empty line separates a top-level block from
/// whatever follows it; the last block ends the output without one.
pub fn serialize(tree: &RootNode, options: &SerializeOptions) -> String {
    let mut writer = IscWriter::new(options.indent_width);
    let mut children = tree.children.iter().peekable();
    while let Some(child) = children.next() {
        write_child(&mut writer, child, options);
        if options.blank_line_after_top_level_block
            && matches!(child, Child::Node(_))
            && children.peek().is_some()
        {
            writer.blank();
        }
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isc::ast::{Node, PropertyNode};
    use crate::isc::building::build;
    use crate::isc::lexing::tokenize;

    fn s(text: &str) -> Option<String> {
        Some(text.to_string())
    }

    #[test]
    fn test_dhcpd_subnet() {
        let tree = RootNode::new().with_child(
            Node::new("subnet", s("10.152.187.0"), s("netmask 255.255.255.0")).with_child(
                PropertyNode::new(
                    "option domain-name-servers",
                    s("ns1.example.org, ns2.example.org"),
                    None,
                ),
            ),
        );
        assert_eq!(
            serialize(&tree, &SerializeOptions::default()),
            "subnet 10.152.187.0 netmask 255.255.255.0 {\n    option domain-name-servers ns1.example.org, ns2.example.org;\n}\n"
        );
    }

    #[test]
    fn test_named_style() {
        let tree = RootNode::new()
            .with_child(
                Node::new("options", None, None)
                    .with_child(Node::new("forwarders", None, None).with_child(
                        PropertyNode::new("62.31.176.39", None, None),
                    )),
            )
            .with_child(PropertyNode::new("include", s("\"/etc/rndc.key\""), None));
        insta::assert_snapshot!(serialize(&tree, &SerializeOptions::for_dialect(Dialect::Named)), @r###"
        options {
            forwarders {
                62.31.176.39;
            };
        };

        include "/etc/rndc.key";
        "###);
    }

    #[test]
    fn test_named_output_has_no_trailing_blank_line() {
        let tree = RootNode::new()
            .with_child(Node::new("options", None, None).with_child(PropertyNode::new("recursion", s("no"), None)))
            .with_child(Node::new("logging", None, None));
        assert_eq!(
            serialize(&tree, &SerializeOptions::for_dialect(Dialect::Named)),
            "options {\n    recursion no;\n};\n\nlogging {\n};\n"
        );
    }

    #[test]
    fn test_comment_precedes_statement() {
        let tree = RootNode::new().with_child(
            PropertyNode::new("ddns-update-style", s("none"), None)
                .with_comment(s("# dynamic dns\n# off")),
        );
        assert_eq!(
            serialize(&tree, &SerializeOptions::default()),
            "# dynamic dns\n# off\nddns-update-style none;\n"
        );
    }

    #[test]
    fn test_not_authoritative_stays_a_bare_keyword() {
        let tokens = tokenize("not authoritative;\n", Dialect::Dhcpd).unwrap();
        let tree = build(&tokens).unwrap();
        assert_eq!(
            serialize(&tree, &SerializeOptions::default()),
            "not authoritative;\n"
        );
    }

    #[test]
    fn test_indent_width_is_configurable() {
        let tree = RootNode::new()
            .with_child(Node::new("group", None, None).with_child(PropertyNode::new("a", s("1"), None)));
        let options = SerializeOptions::default().with_indent_width(2);
        assert_eq!(serialize(&tree, &options), "group {\n  a 1;\n}\n");
    }
}
