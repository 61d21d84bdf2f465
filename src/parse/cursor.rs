//! Three-token lookahead and pushback over the lexer.

use super::lexer::{Lexer, Token, TokenKind};

/// Maximum number of tokens that may be pushed back at once.
pub const LOOKAHEAD: usize = 3;

/// Token cursor with bounded pushback.
///
/// Pending tokens are kept as a stack: the top is the next token [`next`]
/// returns. Pushing past [`LOOKAHEAD`] is a bug in the caller and panics.
///
/// [`next`]: TokenCursor::next
pub struct TokenCursor<'a> {
    lexer: Lexer<'a>,
    pending: Vec<Token>,
    /// Most recently returned token, for [`TokenCursor::backup`].
    last: Option<Token>,
}

impl<'a> TokenCursor<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        Self {
            lexer,
            pending: Vec::with_capacity(LOOKAHEAD),
            last: None,
        }
    }

    /// Line of the most recently lexed token.
    pub fn line_number(&self) -> usize {
        self.lexer.line_number()
    }

    /// Number of tokens waiting to be replayed.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn push(&mut self, token: Token) {
        assert!(
            self.pending.len() < LOOKAHEAD,
            "token pushback exceeds lookahead of {LOOKAHEAD}"
        );
        self.pending.push(token);
    }

    /// Consume and return the next token.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Token {
        let token = match self.pending.pop() {
            Some(token) => token,
            None => self.lexer.next_token(),
        };
        log::trace!("{}: token {token}", self.lexer.name());
        self.last = Some(token.clone());
        token
    }

    /// Un-consume the token most recently returned by [`TokenCursor::next`].
    pub fn backup(&mut self) {
        let Some(token) = self.last.take() else {
            panic!("backup without a token to push back");
        };
        self.push(token);
    }

    /// Push back the last returned token and, in front of it, `t1`.
    ///
    /// The stream then yields `t1` followed by the last returned token.
    pub fn backup2(&mut self, t1: Token) {
        self.backup();
        self.push(t1);
    }

    /// Push back the last returned token, `t1` and `t2`.
    ///
    /// The stream then yields `t2`, `t1`, then the last returned token.
    pub fn backup3(&mut self, t2: Token, t1: Token) {
        self.backup();
        self.push(t1);
        self.push(t2);
    }

    /// Return the next token without consuming it.
    pub fn peek(&mut self) -> &Token {
        if self.pending.is_empty() {
            let token = self.lexer.next_token();
            self.push(token);
        }
        &self.pending[self.pending.len() - 1]
    }

    /// Consume tokens up to and including the next non-space one.
    pub fn next_non_space(&mut self) -> Token {
        loop {
            let token = self.next();
            if token.kind != TokenKind::Space {
                return token;
            }
        }
    }

    /// Skip spaces and return the following token without consuming it.
    pub fn peek_non_space(&mut self) -> &Token {
        self.next_non_space();
        self.backup();
        self.peek()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(input: &str) -> TokenCursor<'_> {
        TokenCursor::new(Lexer::new("test", input))
    }

    #[test]
    fn next_and_peek() {
        let mut c = cursor("a b");
        assert_eq!(c.peek().val, "a");
        assert_eq!(c.peek().val, "a");
        assert_eq!(c.next().val, "a");
        assert_eq!(c.next().kind, TokenKind::Space);
        assert_eq!(c.next().val, "b");
        assert_eq!(c.next().kind, TokenKind::Eof);
    }

    #[test]
    fn backup_replays_last() {
        let mut c = cursor("a b");
        let a = c.next();
        c.backup();
        assert_eq!(c.pending(), 1);
        assert_eq!(c.next(), a);
        assert_eq!(c.pending(), 0);
    }

    #[test]
    fn backup2_replays_in_order() {
        let mut c = cursor("a b c");
        let a = c.next_non_space();
        let b = c.next_non_space();
        c.backup2(a.clone());
        assert_eq!(c.next(), a);
        assert_eq!(c.next(), b);
        assert_eq!(c.next().kind, TokenKind::Space);
        assert_eq!(c.next().val, "c");
    }

    #[test]
    fn backup3_replays_in_order() {
        let mut c = cursor("a b c d");
        let a = c.next_non_space();
        let b = c.next_non_space();
        let cc = c.next_non_space();
        c.backup3(a.clone(), b.clone());
        assert_eq!(c.pending(), LOOKAHEAD);
        assert_eq!(c.next(), a);
        assert_eq!(c.next(), b);
        assert_eq!(c.next(), cc);
        assert_eq!(c.next_non_space().val, "d");
    }

    #[test]
    fn non_space_helpers() {
        let mut c = cursor("   a  b");
        assert_eq!(c.peek_non_space().val, "a");
        assert_eq!(c.next().val, "a");
        assert_eq!(c.next_non_space().val, "b");
        assert_eq!(c.peek_non_space().kind, TokenKind::Eof);
    }

    #[test]
    fn peek_then_backup_of_earlier_token() {
        let mut c = cursor("a b");
        c.next();
        c.peek();
        c.backup();
        assert_eq!(c.pending(), 2);
        assert_eq!(c.next().val, "a");
        assert_eq!(c.next().kind, TokenKind::Space);
    }

    #[test]
    #[should_panic(expected = "exceeds lookahead")]
    fn overflow_panics() {
        let mut c = cursor("a b c d");
        let a = c.next();
        c.peek();
        c.backup3(a.clone(), a);
    }

    #[test]
    #[should_panic(expected = "backup without a token")]
    fn double_backup_panics() {
        let mut c = cursor("a");
        c.next();
        c.backup();
        c.backup();
    }
}
