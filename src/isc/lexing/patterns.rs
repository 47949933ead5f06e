//! Ordered pattern tables for the brace dialects
//!
//! Each table is a list of `(kind, pattern)` pairs tried in declaration order; the first
//! pattern that matches at the scan position wins. Order is grammar knowledge: a failover
//! block has to be tried before the generic declaration, every keyed parameter form before the
//! generic parameter.
//!
//! Patterns are written against a few placeholders that expand to shared fragments:
//!
//! - `<quoted>`: a double-quoted string with backslash escapes
//! - `<parens>`: a parenthesized group; the dhcpd scanner masks group contents first (see
//!   [scan_grouped](super::scanner::scan_grouped)), so nesting depth never reaches the regex
//! - `<body>`: one atom of statement text: a quoted string, a parenthesized group, or any
//!   character except `; { } " # ( )`
//! - `<body-noeq>`: like `<body>` but a bare `=` is excluded
//! - `<block>`: a flat `{ ... }` group, used by option definitions such as
//!   `option x code 1 = { text, ip-address };`
//! - `<group>`: a flat `{ ... }` group that may hold quoted strings
//!
//! Parentheses are what lets a statement continue across lines with `;` or `#` inside it:
//! both are only terminators at parenthesis depth zero.

use crate::isc::token::TokenKind;
use once_cell::sync::Lazy;
use regex::Regex;

const QUOTED: &str = r#""(?:[^"\\]|\\[\s\S])*""#;

const PARENS: &str = r#"\((?:[^()"]|<quoted>)*\)"#;

const BODY: &str = r##"(?:<quoted>|<parens>|[^;{}"#()])"##;

const BODY_NOEQ: &str = r##"(?:<quoted>|<parens>|[^;{}"#()=])"##;

const BLOCK: &str = r"\{[^{}]*\}";

const GROUP: &str = r#"\{(?:<quoted>|[^{}"])*\}"#;

/// DHCPd statements, most specific first.
pub const DHCPD_PATTERNS: &[(TokenKind, &str)] = &[
    // failover peer "name" {
    (TokenKind::DeclarationFailover, r"failover\s<body>*?\{"),
    // option x = expr;  option x code N = type;  (ahead of declarations: `= { ... }` is a record type)
    (
        TokenKind::FormulaGeneral,
        r"(?:option|v6relay)\s<body-noeq>*?=(?:<block>|<body>)*?;",
    ),
    // subnet ... {   host x {   if a = b {
    (TokenKind::DeclarationGeneral, r"[\w]<body>*?\{"),
    // set x = y;  execute(...);  log(...);
    (
        TokenKind::EventGeneral,
        r"(?:(?:set|unset)\s<body>*?|(?:execute|log)\s*<parens><body>*?);",
    ),
    (TokenKind::ParameterBoolean, r"(?:not\s+)?authoritative\s*;"),
    // range6 ... temporary; keeps all of its words
    (
        TokenKind::ParameterGeneral,
        r"range6\s[^;{}\n]*\btemporary\s*;",
    ),
    (
        TokenKind::ParameterSingleKey,
        r"(?:allow|deny|ignore|match|spawn|range6?|fixed-address6?|fixed-prefix6|prefix6|dynamic-bootp-lease-cutoff)\s<body>*?;",
    ),
    (
        TokenKind::ParameterSingleValue,
        r"(?:hardware|host-identifier|load|lease|peer|my\s+state)\s<body>*?;",
    ),
    (TokenKind::ParameterMultiValue, r"server-duid\s<body>*?;"),
    (TokenKind::ParameterOption, r"option\s<body>*?;"),
    (TokenKind::ParameterFailover, r"failover\s<body>*?;"),
    (TokenKind::ParameterGeneral, r"[\w]<body>*?;"),
    (TokenKind::SectionEnd, r"\}"),
    (TokenKind::Newline, r"\n"),
    (TokenKind::Whitespace, r"[^\S\n]+"),
    (TokenKind::Comment, r"#[^\n]*"),
];

/// named.conf statements. Comments come first: `//` and `/*` would otherwise start a statement.
pub const NAMED_PATTERNS: &[(TokenKind, &str)] = &[
    (TokenKind::Comment, r"//[^\n]*"),
    (TokenKind::Comment, r"/\*[\s\S]*?\*/"),
    (TokenKind::Comment, r"#[^\n]*"),
    // inet * allow { localhost; } keys { "rndc-key"; };
    // a group closed by a bare `}` and followed by more words belongs to the statement
    (
        TokenKind::ParameterGeneral,
        r##"(?:<quoted>|[^\s;{}"#()])<body>*?(?:<group>\s*(?:<quoted>|[^\s;{}"#()])<body>*?)+(?:<group>\s*)?;"##,
    ),
    (TokenKind::DeclarationGeneral, r##"(?:<quoted>|[^\s;{}"#()])<body>*?\{"##),
    (TokenKind::ParameterGeneral, r##"(?:<quoted>|[^\s;{}"#()])<body>*?;"##),
    (TokenKind::SectionEnd, r"\}(?:[ \t]*;)?"),
    (TokenKind::Newline, r"\n"),
    (TokenKind::Whitespace, r"[^\S\n]+"),
];

/// Substitute the placeholders and anchor the pattern at the scan position.
pub fn expand(pattern: &str) -> String {
    let expanded = pattern
        .replace("<body-noeq>", BODY_NOEQ)
        .replace("<body>", BODY)
        .replace("<block>", BLOCK)
        .replace("<group>", GROUP)
        .replace("<parens>", PARENS)
        .replace("<quoted>", QUOTED);
    format!(r"\A(?:{})", expanded)
}

fn compile(table: &[(TokenKind, &str)]) -> Vec<(TokenKind, Regex)> {
    table
        .iter()
        .map(|(kind, pattern)| {
            let regex = Regex::new(&expand(pattern))
                .unwrap_or_else(|e| panic!("invalid {:?} pattern: {}", kind, e));
            (*kind, regex)
        })
        .collect()
}

pub static DHCPD_RULES: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| compile(DHCPD_PATTERNS));

pub static NAMED_RULES: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| compile(NAMED_PATTERNS));
