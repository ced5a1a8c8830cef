use arrayvec::ArrayVec;

use std::io;

use crate::err::LexError;

pub const PREFIX_LENGTH: usize = 16;
pub const FIELD_LENGTH: usize = 32;

#[derive(Debug)]
pub enum TokenKind {
    /// Response tag at the start of a line, e.g. `+CGPSINFO: `.
    Prefix(ArrayVec<[u8; PREFIX_LENGTH]>),
    Field(ArrayVec<[u8; FIELD_LENGTH]>),
    CommaSeparator,
    LineEnding,
}

#[derive(Debug)]
pub struct Token {
    pub kind: TokenKind,
}

impl Token {
    pub fn new(kind: TokenKind) -> Self {
        Token { kind }
    }

    pub fn is_line_ending(&self) -> bool {
        match self.kind {
            TokenKind::LineEnding => true,
            _ => false,
        }
    }
}

/// Splits raw modem output into prefixes, comma separated fields and line
/// endings.
///
/// A `Field` token always follows a `Prefix` or a `CommaSeparator`, even if
/// the field is empty, so positional parsing never loses track of empty
/// fields such as the ones in `+CGPSINFO: ,,,,,,,,`.
pub struct Tokenizer<R> {
    input: io::Bytes<R>,
    peek_buf: Option<u8>,
    line_start: bool,
    expect_field: bool,
}

impl<R: io::Read> Tokenizer<R> {
    pub fn new(input: R) -> Result<Self, io::Error> {
        let mut tk = Tokenizer {
            input: input.bytes(),
            peek_buf: None,
            line_start: true,
            expect_field: false,
        };

        tk.advance()?;

        Ok(tk)
    }

    pub fn advance(&mut self) -> Result<Option<u8>, io::Error> {
        let prev = self.peek_buf;

        self.peek_buf = match self.input.next() {
            None => None,
            Some(Err(e)) => {
                self.peek_buf = None;
                return Err(e);
            }
            Some(Ok(v)) => Some(v),
        };

        Ok(prev)
    }

    fn read_prefix(&mut self) -> Result<Token, LexError> {
        let mut buf = ArrayVec::<[u8; PREFIX_LENGTH]>::new();
        while let Some(c) = self.peek_buf {
            if is_delimiter(c) {
                break;
            }
            buf.try_push(c).map_err(|e| (e, PREFIX_LENGTH))?;
            self.advance()?;

            if c == b':' {
                if self.peek_buf == Some(b' ') {
                    buf.try_push(b' ').map_err(|e| (e, PREFIX_LENGTH))?;
                    self.advance()?;
                }
                break;
            }
        }
        Ok(Token::new(TokenKind::Prefix(buf)))
    }

    /// Reads up to the next delimiter. Bytes beyond `FIELD_LENGTH` are
    /// consumed but dropped, so an oversized field is truncated instead of
    /// breaking the rest of the line.
    fn read_field(&mut self) -> Result<Token, LexError> {
        let mut buf = ArrayVec::<[u8; FIELD_LENGTH]>::new();
        let mut dropped = 0;
        while let Some(c) = self.peek_buf {
            if is_delimiter(c) {
                break;
            }
            if buf.try_push(c).is_err() {
                dropped += 1;
            }
            self.advance()?;
        }
        if dropped > 0 {
            debug!("Truncated field by {} bytes", dropped);
        }
        Ok(Token::new(TokenKind::Field(buf)))
    }
}

#[inline]
fn is_delimiter(c: u8) -> bool {
    c == b',' || c == b'\r' || c == b'\n'
}

impl<R: io::Read> Iterator for Tokenizer<R> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.peek_buf == Some(b'\r') {
            try_some!(self.advance());
        }

        if self.expect_field {
            self.expect_field = false;
            return Some(self.read_field());
        }

        match self.peek_buf {
            None => None,
            Some(b'\n') => {
                try_some!(self.advance());
                self.line_start = true;
                Some(Ok(Token::new(TokenKind::LineEnding)))
            }
            Some(b',') => {
                try_some!(self.advance());
                self.line_start = false;
                self.expect_field = true;
                Some(Ok(Token::new(TokenKind::CommaSeparator)))
            }
            Some(b'+') if self.line_start => {
                self.line_start = false;
                self.expect_field = true;
                Some(self.read_prefix())
            }
            Some(_) => {
                self.line_start = false;
                Some(self.read_field())
            }
        }
    }
}
