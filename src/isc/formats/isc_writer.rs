//! Indented ISC text emitter
//!
//! A small line-oriented writer shared by the generic serializer and the typed models. It owns
//! the indentation level, so callers only say what to emit, never how far to indent it.

use crate::isc::dialect::CloseBrace;

#[derive(Debug, Clone)]
pub struct IscWriter {
    out: String,
    indent_width: usize,
    level: usize,
}

impl IscWriter {
    pub fn new(indent_width: usize) -> Self {
        IscWriter {
            out: String::new(),
            indent_width,
            level: 0,
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    fn indent(&mut self) {
        let width = self.indent_width * self.level;
        self.out.extend(std::iter::repeat(' ').take(width));
    }

    /// One line at the current indentation.
    pub fn line(&mut self, text: &str) {
        self.indent();
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// A semicolon-terminated statement.
    pub fn statement(&mut self, text: &str) {
        self.indent();
        self.out.push_str(text);
        self.out.push_str(";\n");
    }

    /// Every line of a stored comment, re-indented. Comment markers are part of the text.
    pub fn comment(&mut self, comment: &str) {
        for line in comment.lines() {
            self.line(line.trim());
        }
    }

    /// `header {` and one level deeper.
    pub fn open(&mut self, header: &str) {
        if header.is_empty() {
            self.line("{");
        } else {
            self.line(&format!("{} {{", header));
        }
        self.level += 1;
    }

    /// Back one level and close the block.
    pub fn close(&mut self, brace: CloseBrace) {
        self.level = self.level.saturating_sub(1);
        self.line(brace.as_str());
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    pub fn finish(self) -> String {
        self.out
    }
}
