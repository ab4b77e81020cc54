//! Lexer - turns source text into positioned tokens
//!
//! Scanning is byte-oriented. Multi-character operators are matched with
//! bounded lookahead and always prefer the longest valid match. The lexer
//! never fails: unknown bytes become [`TokenKind::Illegal`] tokens and the
//! end of input yields [`TokenKind::Eof`] on every further call.

use crate::token::{lookup_ident, Token, TokenKind};
use core_types::SourcePosition;

/// Source lexer with a single forward cursor
pub struct Lexer<'a> {
    input: &'a [u8],
    /// Byte offset of the current (next unconsumed) byte
    position: usize,
    /// Line of the current byte
    line: u32,
    /// Column of the current byte
    column: u32,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            input: source.as_bytes(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Scan and return the next token
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        let start = self.current_position();
        if self.is_at_end() {
            return Token::new(TokenKind::Eof, "", start);
        }

        let ch = self.advance();
        let kind = match ch {
            b'=' => {
                if self.match_byte(b'=') {
                    TokenKind::Eq
                } else if self.match_byte(b'>') {
                    TokenKind::DoubleArrow
                } else {
                    TokenKind::Assign
                }
            }
            b'+' => {
                if self.match_byte(b'+') {
                    TokenKind::Increment
                } else {
                    TokenKind::Plus
                }
            }
            b'-' => {
                if self.match_byte(b'>') {
                    TokenKind::ObjectAccess
                } else if self.match_byte(b'-') {
                    TokenKind::Decrement
                } else {
                    TokenKind::Minus
                }
            }
            b'*' => TokenKind::Multiply,
            b'/' => TokenKind::Divide,
            b'%' => TokenKind::Modulo,
            b'.' => TokenKind::Concat,
            b'!' => {
                if self.match_byte(b'=') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Not
                }
            }
            b'<' => self.scan_less_than(),
            b'>' => {
                if self.match_byte(b'=') {
                    TokenKind::Gte
                } else {
                    TokenKind::Gt
                }
            }
            // Only the doubled forms are operators
            b'&' => {
                if self.match_byte(b'&') {
                    TokenKind::And
                } else {
                    TokenKind::Illegal
                }
            }
            b'|' => {
                if self.match_byte(b'|') {
                    TokenKind::Or
                } else {
                    TokenKind::Illegal
                }
            }
            b'?' => self.scan_question(),
            b':' => {
                if self.match_byte(b':') {
                    TokenKind::StaticAccess
                } else {
                    TokenKind::Colon
                }
            }
            b'\\' => TokenKind::NamespaceSeparator,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b'"' | b'\'' => return self.scan_string(ch, start),
            b'$' => return self.scan_variable(start),
            c if is_letter(c) => return self.scan_identifier(start),
            c if c.is_ascii_digit() => return self.scan_number(start),
            _ => TokenKind::Illegal,
        };

        Token::new(kind, self.slice(start.offset, self.position), start)
    }

    /// Scan the whole input, returning every token up to and including EOF
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.is(TokenKind::Eof);
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    /// `<` has already been consumed
    fn scan_less_than(&mut self) -> TokenKind {
        if self.peek() == b'=' && self.peek_at(1) == b'>' {
            self.advance();
            self.advance();
            TokenKind::Spaceship
        } else if self.match_byte(b'=') {
            TokenKind::Lte
        } else if self.peek() == b'?'
            && self.peek_at(1) == b'p'
            && self.peek_at(2) == b'h'
            && self.peek_at(3) == b'p'
        {
            for _ in 0..4 {
                self.advance();
            }
            TokenKind::PhpOpen
        } else {
            TokenKind::Lt
        }
    }

    /// `?` has already been consumed
    fn scan_question(&mut self) -> TokenKind {
        if self.match_byte(b'>') {
            TokenKind::PhpClose
        } else if self.match_byte(b'?') {
            if self.match_byte(b'=') {
                TokenKind::QuestionQuestionAssign
            } else {
                TokenKind::QuestionQuestion
            }
        } else if self.peek() == b'-' && self.peek_at(1) == b'>' {
            self.advance();
            self.advance();
            TokenKind::QuestionArrow
        } else {
            TokenKind::Question
        }
    }

    /// Opening delimiter has already been consumed. Escapes are skipped,
    /// not interpreted; the literal keeps the raw text between delimiters.
    fn scan_string(&mut self, delimiter: u8, start: SourcePosition) -> Token {
        let content_start = self.position;
        let mut content_end = self.position;

        while !self.is_at_end() {
            let c = self.advance();
            if c == delimiter {
                break;
            }
            if c == b'\\' && !self.is_at_end() {
                self.advance();
            }
            content_end = self.position;
        }

        Token::new(
            TokenKind::String,
            self.slice(content_start, content_end),
            start,
        )
    }

    /// `$` has already been consumed
    fn scan_variable(&mut self, start: SourcePosition) -> Token {
        self.read_identifier_run();
        Token::new(
            TokenKind::Variable,
            self.slice(start.offset, self.position),
            start,
        )
    }

    /// First letter has already been consumed
    fn scan_identifier(&mut self, start: SourcePosition) -> Token {
        self.read_identifier_run();
        let literal = self.slice(start.offset, self.position);
        Token::new(lookup_ident(&literal), literal, start)
    }

    /// First digit has already been consumed
    fn scan_number(&mut self, start: SourcePosition) -> Token {
        let mut kind = TokenKind::Int;
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
            kind = TokenKind::Float;
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        Token::new(kind, self.slice(start.offset, self.position), start)
    }

    fn read_identifier_run(&mut self) {
        while !self.is_at_end() && (is_letter(self.peek()) || self.peek().is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                b' ' | b'\t' | b'\n' | b'\r' if !self.is_at_end() => {
                    self.advance();
                }
                // `//` is the only comment form
                b'/' if self.peek_at(1) == b'/' => self.skip_line_comment(),
                _ => return,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while !self.is_at_end() && self.peek() != b'\n' {
            self.advance();
        }
    }

    fn slice(&self, start: usize, end: usize) -> String {
        String::from_utf8_lossy(&self.input[start..end]).into_owned()
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.input
            .get(self.position + offset)
            .copied()
            .unwrap_or(0)
    }

    fn advance(&mut self) -> u8 {
        let ch = self.peek();
        if self.is_at_end() {
            return ch;
        }
        self.position += 1;
        if ch == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    fn match_byte(&mut self, expected: u8) -> bool {
        if self.is_at_end() || self.peek() != expected {
            return false;
        }
        self.advance();
        true
    }

    fn current_position(&self) -> SourcePosition {
        SourcePosition {
            line: self.line,
            column: self.column,
            offset: self.position,
        }
    }
}

/// Identifier bytes: ASCII letters, underscore, and any byte above 127
pub(crate) fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_' || ch > 127
}
