//! Tree builder
//!
//!     Consumes the flat token stream and assembles the generic tree. Nesting comes only from
//!     brace tokens, so the builder keeps an explicit stack of open declarations instead of
//!     recursing:
//!
//!         1. A property token is split and appended to the innermost open block.
//!         2. A declaration token is split and pushed as a new open block.
//!         3. A section end pops the innermost block and appends it to its parent.
//!
//!     Blocks are attached to their parent when they close. Nothing is appended to a parent
//!     while one of its children is open, so source order is preserved.
//!
//! Comments
//!
//!     Comment tokens are buffered. Consecutive comment lines are joined with newlines and the
//!     result attaches to the next property or declaration, including one that follows a
//!     closing brace. A comment with nothing after it is dropped with a warning.
//!
//! Balance
//!
//!     A closing brace with no open block is a [StructureError::UnexpectedClose]. Input that
//!     ends with blocks still open is a [StructureError::Unclosed]: the builder does not guess
//!     where the missing brace belongs.

use crate::isc::ast::{Child, Node, PropertyNode, RootNode};
use crate::isc::classify::split;
use crate::isc::error::{IscError, StructureError, UnknownStatementError};
use crate::isc::token::{Token, TokenKind};
use tracing::{debug, trace, warn};

/// Incremental builder for the generic tree.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    root: RootNode,
    /// Open declarations with the line they started on, innermost last
    stack: Vec<(Node, usize)>,
    pending_comment: Option<String>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder::default()
    }

    /// Depth of the innermost open block; 0 at the top level.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn attach(&mut self, child: Child) {
        match self.stack.last_mut() {
            Some((node, _)) => node.children.push(child),
            None => self.root.children.push(child),
        }
    }

    fn scope(&self) -> String {
        self.stack
            .last()
            .map(|(node, _)| node.to_string())
            .unwrap_or_else(|| RootNode::TYPE.to_string())
    }

    fn buffer_comment(&mut self, text: &str) {
        let line = text.trim();
        match self.pending_comment.as_mut() {
            Some(pending) => {
                pending.push('\n');
                pending.push_str(line);
            }
            None => self.pending_comment = Some(line.to_string()),
        }
    }

    /// Feed one token.
    pub fn push(&mut self, token: &Token) -> Result<(), IscError> {
        match token.kind {
            TokenKind::Whitespace | TokenKind::Newline => {}
            TokenKind::Comment => self.buffer_comment(&token.text),
            TokenKind::SectionEnd => {
                let (node, _) = self.stack.pop().ok_or(StructureError::UnexpectedClose {
                    line: token.line,
                    column: token.column,
                })?;
                trace!(depth = self.stack.len(), node = %node, "close");
                self.attach(Child::Node(node));
            }
            kind if kind.is_declaration() => {
                let parts = split(token);
                let node = Node::new(parts.key, parts.value, parts.parameters)
                    .with_comment(self.pending_comment.take());
                trace!(depth = self.stack.len(), node = %node, "open");
                self.stack.push((node, token.line));
            }
            kind if kind.is_property() => {
                let parts = split(token);
                let prop = PropertyNode::new(parts.key, parts.value, parts.parameters)
                    .with_comment(self.pending_comment.take());
                self.attach(Child::Property(prop));
            }
            _ => {
                return Err(UnknownStatementError {
                    statement: token.text.clone(),
                    scope: self.scope(),
                    line: token.line,
                }
                .into())
            }
        }
        Ok(())
    }

    /// Close the pass and hand back the tree.
    pub fn finish(mut self) -> Result<RootNode, StructureError> {
        if let Some((node, line)) = self.stack.pop() {
            return Err(StructureError::Unclosed {
                open: node.to_string(),
                line,
            });
        }
        if let Some(comment) = self.pending_comment.take() {
            warn!(%comment, "trailing comment has no statement to attach to; dropped");
        }
        Ok(self.root)
    }
}

/// Build a tree from a complete token stream.
pub fn build(tokens: &[Token]) -> Result<RootNode, IscError> {
    let mut builder = TreeBuilder::new();
    for token in tokens {
        builder.push(token)?;
    }
    let root = builder.finish()?;
    debug!(children = root.children.len(), "built tree");
    Ok(root)
}
