//! Pull-based lexer producing typed tokens for the command parser.
//!
//! The lexer never fails: malformed input (an unterminated quote or
//! redirection qualifier) comes back as a [`TokenKind::Error`] token whose
//! value is the message. After end of input it keeps returning
//! [`TokenKind::Eof`].

use std::fmt;

use serde::Serialize;

use super::types::Pos;

/// Token type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Run of spaces, tabs or carriage returns.
    Space,
    Newline,
    Semicolon,
    Pipe,
    /// Unquoted word.
    Bare,
    SingleQuoted,
    DoubleQuoted,
    /// Redirection operator plus optional `[...]` qualifier, e.g. `>>[1=2]`.
    RedirLeader,
    /// Lexical error; the token value holds the message.
    Error,
    Eof,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Space => "space",
            TokenKind::Newline => "newline",
            TokenKind::Semicolon => "semicolon",
            TokenKind::Pipe => "pipe",
            TokenKind::Bare => "bareword",
            TokenKind::SingleQuoted => "single-quoted string",
            TokenKind::DoubleQuoted => "double-quoted string",
            TokenKind::RedirLeader => "redirection",
            TokenKind::Error => "error",
            TokenKind::Eof => "EOF",
        }
    }

    /// Whether this token can start a term.
    pub fn is_term(self) -> bool {
        matches!(
            self,
            TokenKind::Bare | TokenKind::SingleQuoted | TokenKind::DoubleQuoted
        )
    }
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub pos: Pos,
    /// Raw source text (or the message, for `Error` tokens).
    pub val: String,
    /// Set when this token ends the input and further typing would extend it.
    pub may_continue: bool,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Pos, val: impl Into<String>) -> Self {
        Self {
            kind,
            pos,
            val: val.into(),
            may_continue: false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("EOF"),
            TokenKind::Error => f.write_str(&self.val),
            kind if self.val.chars().count() > 10 => {
                let head: String = self.val.chars().take(10).collect();
                write!(f, "{} {:?}...", kind.as_str(), head)
            }
            kind => write!(f, "{} {:?}", kind.as_str(), self.val),
        }
    }
}

fn is_space(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\r'
}

fn is_bare(c: char) -> bool {
    !(is_space(c) || matches!(c, '\n' | ';' | '|' | '\'' | '"' | '<' | '>'))
}

/// Scanner over one source text.
pub struct Lexer<'a> {
    name: &'a str,
    input: &'a str,
    pos: usize,
    /// Start of the most recently produced token.
    last_pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(name: &'a str, input: &'a str) -> Self {
        Self {
            name,
            input,
            pos: 0,
            last_pos: 0,
        }
    }

    /// Script name, for diagnostics.
    pub fn name(&self) -> &str {
        self.name
    }

    /// 1-based line of the most recently produced token.
    pub fn line_number(&self) -> usize {
        1 + self.input[..self.last_pos].matches('\n').count()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Advance past every leading char matching `pred`.
    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        let len = self
            .rest()
            .find(|c: char| !pred(c))
            .unwrap_or(self.rest().len());
        self.pos += len;
    }

    fn emit(&mut self, kind: TokenKind, start: usize) -> Token {
        let mut token = Token::new(kind, start, &self.input[start..self.pos]);
        token.may_continue = self.pos == self.input.len()
            && matches!(kind, TokenKind::Bare | TokenKind::RedirLeader);
        token
    }

    fn error(&self, start: usize, msg: &str, may_continue: bool) -> Token {
        let mut token = Token::new(TokenKind::Error, start, msg);
        token.may_continue = may_continue;
        token
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> Token {
        let start = self.pos;
        self.last_pos = start;

        let Some(c) = self.peek_char() else {
            return Token::new(TokenKind::Eof, start, "");
        };

        match c {
            c if is_space(c) => {
                self.eat_while(is_space);
                self.emit(TokenKind::Space, start)
            }
            '\n' => {
                self.pos += 1;
                self.emit(TokenKind::Newline, start)
            }
            ';' => {
                self.pos += 1;
                self.emit(TokenKind::Semicolon, start)
            }
            '|' => {
                self.pos += 1;
                self.emit(TokenKind::Pipe, start)
            }
            '\'' => self.single_quoted(start),
            '"' => self.double_quoted(start),
            '<' | '>' => self.redir_leader(start),
            _ => {
                self.eat_while(is_bare);
                self.emit(TokenKind::Bare, start)
            }
        }
    }

    fn single_quoted(&mut self, start: usize) -> Token {
        // Skip the opening quote.
        let body = &self.input[start + 1..];
        match body.find('\'') {
            Some(end) => {
                self.pos = start + 1 + end + 1;
                self.emit(TokenKind::SingleQuoted, start)
            }
            None => {
                self.pos = self.input.len();
                self.error(start, "unterminated single-quoted string", true)
            }
        }
    }

    fn double_quoted(&mut self, start: usize) -> Token {
        let mut esc = false;
        for (i, c) in self.input[start + 1..].char_indices() {
            if esc {
                esc = false;
                continue;
            }
            match c {
                '\\' => esc = true,
                '"' => {
                    self.pos = start + 1 + i + 1;
                    return self.emit(TokenKind::DoubleQuoted, start);
                }
                _ => {}
            }
        }
        self.pos = self.input.len();
        self.error(start, "unterminated double-quoted string", true)
    }

    fn redir_leader(&mut self, start: usize) -> Token {
        self.eat_while(|c| c == '<' || c == '>');
        if self.peek_char() == Some('[') {
            match self.rest().find(']') {
                Some(end) => self.pos += end + 1,
                None => {
                    self.pos = self.input.len();
                    return self.error(start, "unterminated redirection qualifier", true);
                }
            }
        }
        self.emit(TokenKind::RedirLeader, start)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields tokens up to, not including, `Eof`.
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}
