use std::fmt;

use thiserror::Error;

pub mod lexer;

/// Every Ook! token is this prefix followed by one marker glyph
pub const TOKEN_PREFIX: &str = "Ook";

pub const COMMENT_OPEN: (char, char) = ('/', '*');
pub const COMMENT_CLOSE: (char, char) = ('*', '/');

/// The only information a token carries once lexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    // `Ook!`
    Bang,
    // `Ook?`
    Question,
    // `Ook.`
    Dot,
}

impl Marker {
    pub fn from_glyph(c: char) -> Option<Marker> {
        match c {
            '!' => Some(Marker::Bang),
            '?' => Some(Marker::Question),
            '.' => Some(Marker::Dot),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Marker::Bang => '!',
            Marker::Question => '?',
            Marker::Dot => '.',
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", TOKEN_PREFIX, self.glyph())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    #[error("Comment opened at {line:}:{col:} is never closed")]
    UnclosedComment { line: usize, col: usize },

    #[error("Invalid token: unexpected {found:?} at position {position:} ({line:}:{col:})")]
    InvalidToken {
        found: char,
        position: usize,
        line: usize,
        col: usize,
    },
}
