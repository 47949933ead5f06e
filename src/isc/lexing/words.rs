//! Quote-aware word splitting
//!
//! Statement text is split the way a shell would split it: runs of whitespace separate words,
//! but a double-quoted string is one piece no matter what it contains. A quoted piece glued to
//! bare text (`prefix"a b"suffix`) stays one word.
//!
//! The pieces come from a logos lexer; stitching adjacent non-whitespace pieces back together
//! happens here.

use logos::Logos;

#[derive(Logos, Debug, PartialEq, Clone, Copy)]
enum Piece {
    #[regex(r#""([^"\\]|\\.)*""#)]
    Quoted,

    #[regex(r"\s+")]
    Whitespace,

    #[regex(r#"[^\s"]+"#)]
    Bare,
}

/// Split `text` into words, keeping quoted strings intact.
///
/// An unterminated quote is not an error here; the stray `"` is glued to the surrounding word.
pub fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut lexer = Piece::lexer(text);

    while let Some(piece) = lexer.next() {
        match piece {
            Ok(Piece::Whitespace) => {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            }
            Ok(Piece::Quoted) | Ok(Piece::Bare) | Err(()) => current.push_str(lexer.slice()),
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Collapse every whitespace run outside quotes into one space and trim both ends.
pub fn normalize(text: &str) -> String {
    split_words(text).join(" ")
}
