//! Error types for every stage of the text -> tree -> text pipeline
//!
//! Each stage owns one error type so callers can tell a scanning failure from a structural one.
//! [IscError] wraps them all for callers that chain stages with `?`.
//!
//! None of these are recoverable: the pipeline refuses to guess, so a failure always ends the
//! pass that raised it.

use thiserror::Error;

/// No pattern in the active dialect table matched at the scan position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// Nothing in the pattern table matches the text at this position
    #[error("no token matches at line {line}, column {column}: {remainder:?}")]
    NoMatch {
        line: usize,
        column: usize,
        remainder: String,
    },

    /// A zone-file continuation was closed without being opened, or never closed
    #[error("unbalanced parenthesis at line {line}")]
    UnbalancedParenthesis { line: usize },
}

impl LexError {
    /// Build a [LexError::NoMatch], keeping only the first line of the unmatched text.
    pub fn no_match(line: usize, column: usize, rest: &str) -> Self {
        let remainder = rest.lines().next().unwrap_or_default().to_string();
        LexError::NoMatch {
            line,
            column,
            remainder,
        }
    }
}

/// Braces that do not balance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// A closing brace arrived while no declaration was open
    #[error("closing brace at line {line}, column {column} has no matching declaration")]
    UnexpectedClose { line: usize, column: usize },

    /// Input ended while a declaration was still open
    #[error("declaration `{open}` opened at line {line} is never closed")]
    Unclosed { open: String, line: usize },
}

/// The typed model has nowhere to put a statement the lexer recognized.
///
/// This signals a gap between the grammar tables and the object model, never bad user input
/// that could be skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{statement}` (line {line}) is not accepted inside {scope}")]
pub struct UnknownStatementError {
    pub statement: String,
    pub scope: String,
    pub line: usize,
}

/// A typed object was constructed from values it cannot hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// An option needs at least a name or a code
    #[error("an option needs a name or a code")]
    NamelessOption,

    /// A field failed to parse into its typed form
    #[error("invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    /// Record data had the wrong shape for its type
    #[error("{rtype} record expects {expected}, got {got:?}")]
    RecordData {
        rtype: String,
        expected: &'static str,
        got: String,
    },
}

impl ConstructionError {
    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        ConstructionError::InvalidField {
            field,
            value: value.into(),
        }
    }
}

/// Any failure raised while going from text to a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IscError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    UnknownStatement(#[from] UnknownStatementError),

    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_keeps_first_line() {
        let err = LexError::no_match(3, 5, "@@@ junk\nnext line");
        assert_eq!(
            err,
            LexError::NoMatch {
                line: 3,
                column: 5,
                remainder: "@@@ junk".to_string()
            }
        );
        assert!(err.to_string().contains("line 3, column 5"));
    }

    #[test]
    fn test_umbrella_conversion() {
        fn fails() -> Result<(), IscError> {
            Err(StructureError::UnexpectedClose { line: 1, column: 1 })?
        }
        assert!(matches!(fails(), Err(IscError::Structure(_))));
    }
}
