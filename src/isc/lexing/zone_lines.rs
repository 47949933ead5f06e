//! Zone-file statement partitioning
//!
//! Zone files are line oriented rather than brace oriented: a statement ends at a newline,
//! except inside parentheses, where newlines and `;` comments are part of one continued
//! statement. Record data has no fixed length, so a record is recognized by locating its type
//! keyword instead of by a pattern over the whole line.
//!
//! Indentation carries no meaning: whether a record names its owner is decided from the words
//! alone (see [has_label]).

use super::words::{normalize, split_words};
use crate::isc::error::LexError;
use crate::isc::token::{Directive, RecordType, Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// Classes a resource record may carry.
pub const RECORD_CLASSES: &[&str] = &["IN", "CS", "CH", "HS"];

/// Plain seconds, or BIND's unit form such as `1h30m`.
static TTL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d+|(?:\d+[sSmMhHdDwW])+)$").unwrap());

pub fn is_ttl(word: &str) -> bool {
    TTL_REGEX.is_match(word)
}

pub fn is_class(word: &str) -> bool {
    RECORD_CLASSES
        .iter()
        .any(|class| class.eq_ignore_ascii_case(word))
}

/// A purely numeric word can only be a TTL, never an owner.
fn is_numeric(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit())
}

/// Whether the words before the type keyword start with an owner name.
///
/// The first word is the owner unless it is numeric or a class keyword, and only when something
/// precedes the type at all.
pub fn has_label(prefix: &[String]) -> bool {
    prefix
        .first()
        .is_some_and(|first| !is_numeric(first) && !is_class(first))
}

/// Whether `prefix` can precede a type keyword: an optional owner, then at most one TTL and at
/// most one class, in either order.
fn is_record_prefix(prefix: &[String]) -> bool {
    let rest = if has_label(prefix) { &prefix[1..] } else { prefix };
    let ttls = rest.iter().filter(|w| is_ttl(w)).count();
    let classes = rest.iter().filter(|w| is_class(w)).count();
    ttls <= 1 && classes <= 1 && ttls + classes == rest.len()
}

/// Find the record type among the first four words.
///
/// The right-most candidate whose preceding words form a valid prefix wins, so an owner that
/// happens to spell a type (`a A 192.0.2.1`) is still read as the owner. At least one word of
/// record data has to follow the type.
pub fn locate_record_type(words: &[String]) -> Option<(usize, RecordType)> {
    let limit = words.len().saturating_sub(1).min(4);
    (0..limit).rev().find_map(|idx| {
        let rtype = RecordType::from_mnemonic(&words[idx])?;
        is_record_prefix(&words[..idx]).then_some((idx, rtype))
    })
}

struct Partitioner {
    tokens: Vec<Token>,
    current: String,
    start: (usize, usize),
    comment: Option<(String, usize, usize)>,
    comment_kept: bool,
    in_quote: bool,
    escaped: bool,
    depth: usize,
    opened_at: usize,
    line: usize,
    column: usize,
}

impl Partitioner {
    fn new() -> Self {
        Partitioner {
            tokens: Vec::new(),
            current: String::new(),
            start: (1, 1),
            comment: None,
            comment_kept: false,
            in_quote: false,
            escaped: false,
            depth: 0,
            opened_at: 0,
            line: 1,
            column: 1,
        }
    }

    fn push(&mut self, ch: char) {
        if self.current.is_empty() {
            self.start = (self.line, self.column);
        }
        self.current.push(ch);
    }

    fn finish_comment(&mut self) {
        if let Some((text, line, column)) = self.comment.take() {
            if self.comment_kept {
                self.tokens
                    .push(Token::new(TokenKind::Comment, text.trim_end(), line, column));
            }
        }
    }

    fn finish_statement(&mut self) -> Result<(), LexError> {
        let raw = std::mem::take(&mut self.current);
        let normalized = normalize(&raw);
        if normalized.is_empty() {
            return Ok(());
        }
        let (line, column) = self.start;
        let words = split_words(&normalized);

        let kind = if words[0].starts_with('$') {
            match Directive::from_keyword(&words[0]) {
                Some(directive) => TokenKind::Directive(directive),
                None => return Err(LexError::no_match(line, column, &normalized)),
            }
        } else {
            match locate_record_type(&words) {
                Some((_, rtype)) => TokenKind::Record(rtype),
                None => return Err(LexError::no_match(line, column, &normalized)),
            }
        };

        self.tokens.push(Token::new(kind, normalized, line, column));
        Ok(())
    }

    fn feed(&mut self, ch: char) -> Result<(), LexError> {
        if self.comment.is_some() {
            if ch != '\n' {
                if let Some((text, _, _)) = self.comment.as_mut() {
                    text.push(ch);
                }
                return Ok(());
            }
            self.finish_comment();
        }

        if self.in_quote {
            self.current.push(ch);
            if self.escaped {
                self.escaped = false;
            } else if ch == '\\' {
                self.escaped = true;
            } else if ch == '"' {
                self.in_quote = false;
            }
            return Ok(());
        }

        match ch {
            '"' => {
                self.in_quote = true;
                self.push(ch);
            }
            ';' => {
                if self.depth == 0 {
                    self.finish_statement()?;
                }
                self.comment_kept = self.depth == 0;
                self.comment = Some((String::from(";"), self.line, self.column));
            }
            '(' => {
                if self.depth == 0 {
                    self.opened_at = self.line;
                }
                self.depth += 1;
                self.push(' ');
            }
            ')' => {
                if self.depth == 0 {
                    return Err(LexError::UnbalancedParenthesis { line: self.line });
                }
                self.depth -= 1;
                self.push(' ');
            }
            '\n' => {
                if self.depth == 0 {
                    self.finish_statement()?;
                } else {
                    self.push(' ');
                }
            }
            _ => self.push(ch),
        }
        Ok(())
    }

    fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }
}

/// Partition a zone file into directive, record and comment tokens.
///
/// `source` must end with a newline.
pub fn partition(source: &str) -> Result<Vec<Token>, LexError> {
    let mut partitioner = Partitioner::new();
    for ch in source.chars() {
        partitioner.feed(ch)?;
        partitioner.advance(ch);
    }
    partitioner.finish_comment();
    if partitioner.depth > 0 {
        return Err(LexError::UnbalancedParenthesis {
            line: partitioner.opened_at,
        });
    }
    partitioner.finish_statement()?;
    Ok(partitioner.tokens)
}
