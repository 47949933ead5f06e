//! Lexer
//!
//! Turns configuration text into a flat, source-ordered token stream.
//!
//! Structure:
//!     The brace dialects (dhcpd, named) run an ordered regex table through a first-match
//!     scanner: at every position the first rule that matches wins, so the tables list the most
//!     specific statement forms first. Zone files are partitioned by line instead, honoring
//!     parenthesized continuations, and each statement is classified by locating its record
//!     type keyword.
//!
//!     Statement text is normalized while lexing: whitespace runs outside quotes collapse to a
//!     single space. Splitting into words later on is quote aware for the same reason.
//!
//! The pieces:
//! - [patterns]: the ordered rule tables for dhcpd and named
//! - [scanner]: the first-match scanner shared by both tables
//! - [words]: quote-aware word splitting and whitespace normalization
//! - [zone_lines]: the zone-file partitioner

pub mod patterns;
pub mod scanner;
pub mod words;
pub mod zone_lines;

use crate::isc::dialect::Dialect;
use crate::isc::error::LexError;
use crate::isc::token::Token;
use tracing::debug;

pub use words::{normalize, split_words};

/// Preprocesses source text to ensure it ends with a newline.
///
/// Comments and zone-file statements are terminated by a newline, including the last one.
pub fn ensure_source_ends_with_newline(source: &str) -> String {
    if !source.is_empty() && !source.ends_with('\n') {
        format!("{}\n", source)
    } else {
        source.to_string()
    }
}

/// Tokenize a whole configuration file in the given dialect.
pub fn tokenize(source: &str, dialect: Dialect) -> Result<Vec<Token>, LexError> {
    let source = ensure_source_ends_with_newline(source);
    let tokens = match dialect {
        Dialect::Dhcpd => scanner::scan_grouped(&source, &patterns::DHCPD_RULES)?,
        Dialect::Named => scanner::scan(&source, &patterns::NAMED_RULES)?,
        Dialect::Zone => zone_lines::partition(&source)?,
    };
    debug!(%dialect, tokens = tokens.len(), "tokenized");
    Ok(tokens)
}
