//! First-match regex scanner
//!
//! Walks the source left to right. At every position the rules are tried in table order and
//! the first non-empty match becomes a token; the cursor then moves past it. Line and column
//! are recomputed from the newlines inside each consumed slice.
//!
//! Parenthesized groups nest to any depth, which no regex can follow. [scan_grouped] first
//! masks everything inside parentheses, so the rules only ever see a flat `( ... )` and the
//! token text is cut from the original source at the same byte range.

use super::words::normalize;
use crate::isc::error::LexError;
use crate::isc::token::{Token, TokenKind};
use regex::Regex;

/// Scan `source` with an ordered rule table.
///
/// Statement tokens have their whitespace normalized (see [normalize]); comments, whitespace
/// and newlines keep their raw text.
pub fn scan(source: &str, rules: &[(TokenKind, Regex)]) -> Result<Vec<Token>, LexError> {
    scan_view(source, source, rules)
}

/// Scan `source` with parenthesized groups masked; see [mask_groups].
pub fn scan_grouped(source: &str, rules: &[(TokenKind, Regex)]) -> Result<Vec<Token>, LexError> {
    scan_view(&mask_groups(source), source, rules)
}

/// Replace the inside of every parenthesized group with `x`, keeping byte offsets and newlines.
///
/// Quotes and `#` comments outside a group are honored, so a `(` in either one does not open a
/// group. Inside a group everything is masked, quotes included, until the depth returns to
/// zero. An unclosed group masks the rest of the source and the rules fail on it.
pub fn mask_groups(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut in_comment = false;
    let mut escaped = false;

    for ch in source.chars() {
        if depth > 0 {
            if in_quote {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == '"' {
                    in_quote = false;
                }
            } else {
                match ch {
                    '"' => in_quote = true,
                    '(' => depth += 1,
                    ')' => depth -= 1,
                    _ => {}
                }
            }
            if depth == 0 {
                out.push(')');
            } else if ch == '\n' {
                out.push('\n');
            } else {
                out.extend(std::iter::repeat('x').take(ch.len_utf8()));
            }
            continue;
        }

        if in_comment {
            in_comment = ch != '\n';
        } else if in_quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_quote = false;
            }
        } else {
            match ch {
                '"' => in_quote = true,
                '#' => in_comment = true,
                '(' => depth = 1,
                _ => {}
            }
        }
        out.push(ch);
    }
    out
}

fn scan_view(view: &str, source: &str, rules: &[(TokenKind, Regex)]) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut line = 1;
    let mut column = 1;

    while pos < source.len() {
        let rest = &view[pos..];
        let (kind, len) = rules
            .iter()
            .find_map(|(kind, regex)| {
                regex
                    .find(rest)
                    .map(|m| m.end())
                    .filter(|end| *end > 0)
                    .map(|end| (*kind, end))
            })
            .ok_or_else(|| LexError::no_match(line, column, &source[pos..]))?;
        let matched = &source[pos..pos + len];

        let text = match kind {
            TokenKind::Comment | TokenKind::Whitespace | TokenKind::Newline => {
                matched.trim_end_matches('\r').to_string()
            }
            _ => normalize(matched),
        };
        tokens.push(Token::new(kind, text, line, column));

        for ch in matched.chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        pos += matched.len();
    }

    Ok(tokens)
}
