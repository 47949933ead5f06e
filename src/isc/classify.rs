//! Token classifier
//!
//! Splits a statement token into the `(key, value, parameters)` triple the tree stores. Each
//! token kind has exactly one rule; the rules encode how ISC grammar groups words:
//!
//! | kind | key | value | parameters |
//! |---|---|---|---|
//! | option | words 1-2 | rest | - |
//! | single key | word 1 | rest | - |
//! | single value | all but last | last word | - |
//! | multi value, failover | words 1-2 | word 3 | words 4+ |
//! | boolean | whole clause | - | - |
//! | event | leading keyword | rest | - |
//! | formula | left of `=` | `= right` | - |
//! | everything else | word 1 | word 2 | words 3+ |
//!
//! The fallback never drops words, so a statement without a dedicated rule still serializes
//! back to what was read.
//!
//! Zone records split differently: see [split_record].

use crate::isc::error::LexError;
use crate::isc::lexing::words::split_words;
use crate::isc::lexing::zone_lines::{has_label, is_class, is_ttl, locate_record_type};
use crate::isc::token::{RecordType, Token, TokenKind};
use serde::Serialize;

/// A statement broken into the parts a node stores.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Split {
    pub key: String,
    pub value: Option<String>,
    pub parameters: Option<String>,
}

impl Split {
    pub fn new(key: impl Into<String>, value: Option<String>, parameters: Option<String>) -> Self {
        Split {
            key: key.into(),
            value,
            parameters,
        }
    }
}

fn join(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Statement text without its terminator (`;`, `{`, or a named `};`).
pub fn statement_body(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_suffix('{')
        .or_else(|| text.strip_suffix(';'))
        .unwrap_or(text);
    text.trim_end()
}

fn split_first(words: &[String], count: usize) -> Split {
    let count = count.min(words.len());
    Split::new(words[..count].join(" "), join(&words[count..]), None)
}

fn split_last(words: &[String]) -> Split {
    match words.split_last() {
        Some((last, rest)) if !rest.is_empty() => {
            Split::new(rest.join(" "), Some(last.clone()), None)
        }
        _ => Split::new(words.join(" "), None, None),
    }
}

fn split_multi(words: &[String]) -> Split {
    let key_len = 2.min(words.len());
    Split::new(
        words[..key_len].join(" "),
        words.get(2).cloned(),
        words.get(3..).and_then(join),
    )
}

fn split_generic(words: &[String]) -> Split {
    Split::new(
        words.first().cloned().unwrap_or_default(),
        words.get(1).cloned(),
        words.get(2..).and_then(join),
    )
}

fn split_event(body: &str) -> Split {
    let end = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(body.len());
    let (key, rest) = body.split_at(end);
    let rest = rest.trim();
    Split::new(key, (!rest.is_empty()).then(|| rest.to_string()), None)
}

/// Byte offset of the first `=` outside a quoted string.
fn unquoted_equals(body: &str) -> Option<usize> {
    let mut in_quote = false;
    let mut escaped = false;
    for (idx, ch) in body.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' if in_quote => escaped = true,
            '"' => in_quote = !in_quote,
            '=' if !in_quote => return Some(idx),
            _ => {}
        }
    }
    None
}

fn split_formula(body: &str) -> Split {
    match unquoted_equals(body) {
        Some(idx) => {
            let lhs = body[..idx].trim();
            let rhs = body[idx + 1..].trim();
            Split::new(lhs, Some(format!("= {}", rhs)), None)
        }
        None => split_generic(&split_words(body)),
    }
}

/// Split a statement token into key, value and parameters.
pub fn split(token: &Token) -> Split {
    let body = statement_body(&token.text);
    let words = split_words(body);
    match token.kind {
        TokenKind::ParameterOption => split_first(&words, 2),
        TokenKind::ParameterSingleKey => split_first(&words, 1),
        TokenKind::ParameterSingleValue => split_last(&words),
        TokenKind::ParameterMultiValue
        | TokenKind::ParameterFailover
        | TokenKind::DeclarationFailover => split_multi(&words),
        TokenKind::ParameterBoolean => Split::new(words.join(" "), None, None),
        TokenKind::EventGeneral => split_event(body),
        TokenKind::FormulaGeneral => split_formula(body),
        TokenKind::DeclarationGeneral
        | TokenKind::ParameterGeneral
        | TokenKind::SectionEnd
        | TokenKind::Directive(_)
        | TokenKind::Record(_)
        | TokenKind::Comment
        | TokenKind::Newline
        | TokenKind::Whitespace => split_generic(&words),
    }
}

/// A zone record broken into its five fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordParts {
    /// Owner name; `None` when the record reuses the previous owner
    pub label: Option<String>,
    pub ttl: Option<String>,
    /// Defaults to `IN`
    pub class: String,
    pub rtype: RecordType,
    pub rdata: String,
}

/// Split a zone record token into `(label, ttl, class, type, rdata)`.
///
/// Missing fields are filled in a fixed order: TTL first (a numeric word), then class (one of
/// `IN CS CH HS`, default `IN`), then label. The first word is the label only when it is
/// neither numeric nor a class keyword, so `3600 IN A ...` has a TTL and no label.
pub fn split_record(token: &Token) -> Result<RecordParts, LexError> {
    let words = split_words(&token.text);
    let (idx, rtype) = locate_record_type(&words)
        .ok_or_else(|| LexError::no_match(token.line, token.column, &token.text))?;

    let prefix = &words[..idx];
    let owned = has_label(prefix);
    let fields = &prefix[usize::from(owned)..];
    let ttl = fields.iter().find(|w| is_ttl(w)).cloned();
    let class = fields
        .iter()
        .find(|w| is_class(w))
        .map(|w| w.to_ascii_uppercase())
        .unwrap_or_else(|| "IN".to_string());
    let label = owned.then(|| words[0].clone());

    Ok(RecordParts {
        label,
        ttl,
        class,
        rtype,
        rdata: words[idx + 1..].join(" "),
    })
}
