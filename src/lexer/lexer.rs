use tracing::debug;

use super::{LexerError, Marker, COMMENT_CLOSE, COMMENT_OPEN, TOKEN_PREFIX};

#[derive(Debug, Clone, Copy)]
struct Location {
    line: usize,
    col: usize,
    position: usize,
}

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /** Human Readable positions in file */
    pub cur_line: usize,
    pub cur_col: usize,

    /** 'raw' format / offset within the file (in terms of 'codepoints') */
    pub codepoint_offset: usize,

    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(chars: &'a str) -> Lexer<'a> {
        Lexer {
            cur_col: 1,
            cur_line: 1,

            codepoint_offset: 0,

            chars: chars.chars().peekable(),
        }
    }

    /// Where the next consumed char sits, positions are 1-based
    fn location(&self) -> Location {
        Location {
            line: self.cur_line,
            col: self.cur_col,
            position: self.codepoint_offset + 1,
        }
    }

    fn invalid(found: char, at: Location) -> LexerError {
        LexerError::InvalidToken {
            found,
            position: at.position,
            line: at.line,
            col: at.col,
        }
    }

    fn consume_char(&mut self) -> Option<char> {
        match self.chars.next() {
            Some(c) => {
                self.cur_col += 1;
                if c == '\n' {
                    self.cur_line += 1;
                    self.cur_col = 1;
                }
                self.codepoint_offset += 1;
                Some(c)
            }
            None => None,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.consume_char();
        }
    }

    /// Skips everything up to and including the comment closer,
    /// the opener has already been consumed
    fn skip_comment(&mut self, opened_at: Location) -> Result<(), LexerError> {
        let mut prev = None;
        loop {
            match self.consume_char() {
                Some(c) if prev == Some(COMMENT_CLOSE.0) && c == COMMENT_CLOSE.1 => break Ok(()),
                Some(c) => prev = Some(c),
                None => {
                    break Err(LexerError::UnclosedComment {
                        line: opened_at.line,
                        col: opened_at.col,
                    })
                }
            }
        }
    }

    /// Finishes a token whose first prefix char has already been consumed
    fn finish_token(&mut self, start: Location, first: char) -> Result<Marker, LexerError> {
        for expected in TOKEN_PREFIX.chars().skip(1) {
            let at = self.location();
            match self.consume_char() {
                Some(c) if c == expected => {}
                Some(c) => return Err(Self::invalid(c, at)),
                // the token got cut off so blame the token as a whole
                None => return Err(Self::invalid(first, start)),
            }
        }

        let at = self.location();
        match self.consume_char() {
            Some(c) => Marker::from_glyph(c).ok_or_else(|| Self::invalid(c, at)),
            None => Err(Self::invalid(first, start)),
        }
    }

    pub fn next_marker(&mut self) -> Result<Option<Marker>, LexerError> {
        loop {
            self.skip_whitespace();

            let start = self.location();
            match self.consume_char() {
                None => return Ok(None),
                Some(c) if c == COMMENT_OPEN.0 => match self.chars.peek() {
                    Some(&next) if next == COMMENT_OPEN.1 => {
                        self.consume_char();
                        self.skip_comment(start)?;
                    }
                    _ => return Err(Self::invalid(c, start)),
                },
                Some(c) if TOKEN_PREFIX.starts_with(c) => {
                    return self.finish_token(start, c).map(Some)
                }
                Some(c) => return Err(Self::invalid(c, start)),
            }
        }
    }

    pub fn collect_results(&mut self) -> Result<Vec<Marker>, LexerError> {
        let mut v = vec![];
        while let Some(marker) = self.next_marker()? {
            v.push(marker);
        }
        debug!(markers = v.len(), lines = self.cur_line, "lexed source");
        Ok(v)
    }
}
