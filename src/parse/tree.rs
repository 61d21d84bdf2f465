//! Recursive-descent parser for a single command line.
//!
//! [`Tree`] is the parse session: it remembers the script name, the source
//! text, the resulting [`CommandNode`] and the completion [`Context`]. The
//! transient state (lexer, lookahead buffer, node under construction) lives
//! in a private `Parser` that exists only for the duration of
//! [`Tree::parse`].

use super::cursor::TokenCursor;
use super::error::{DEFAULT_LABEL, ErrorKind, ParseError, Result};
use super::lexer::{Lexer, Token, TokenKind};
use super::types::{CommandNode, Context, Fd, Located, Node, OpenFlags, Redir, StringNode};
use super::unquote::unquote;

/// The representation of a single parsed script.
#[derive(Debug, Clone)]
pub struct Tree {
    /// Name of the script represented by the tree.
    pub name: String,
    /// Name of the top-level script during parsing, used in error messages.
    pub parse_name: String,
    /// Parsed command. `None` before parsing and after a failed
    /// non-interactive parse.
    pub root: Option<CommandNode>,
    /// Completion context left by the last parsed term.
    pub ctx: Option<Context>,
    label: String,
    text: String,
    tab: bool,
    parsed: bool,
}

impl Tree {
    /// Allocate an empty tree with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parse_name: String::new(),
            root: None,
            ctx: None,
            label: DEFAULT_LABEL.to_string(),
            text: String::new(),
            tab: false,
            parsed: false,
        }
    }

    /// Override the label that prefixes error messages.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Source text of the last parse.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the last parse was an interactive (completion) parse.
    pub fn is_tab(&self) -> bool {
        self.tab
    }

    /// Parse `text` into this tree.
    ///
    /// On failure of a normal parse `root` is cleared. On failure of an
    /// interactive parse (`tab == true`) the partial `root` is kept and
    /// `ctx` is cleared instead. A tree can be parsed only once.
    pub fn parse(&mut self, text: &str, tab: bool) -> Result<()> {
        if self.parsed {
            return Err(ParseError::new(
                &self.label,
                &self.name,
                0,
                ErrorKind::AlreadyParsed,
            ));
        }
        self.parsed = true;
        self.tab = tab;
        self.parse_name = self.name.clone();
        self.text = text.to_string();
        self.root = None;
        self.ctx = None;

        log::debug!("parsing {:?} (tab: {tab}, {} bytes)", self.name, text.len());

        let mut parser = Parser::new(&self.label, &self.parse_name, text);
        let result = parser.parse();
        let Parser { root, ctx, .. } = parser;

        match result {
            Ok(()) => {
                log::debug!(
                    "parsed {:?}: {} term(s), {} redirection(s)",
                    self.name,
                    root.args.len(),
                    root.redirs.len()
                );
                self.root = Some(root);
                self.ctx = ctx;
                Ok(())
            }
            Err(err) => {
                log::debug!("parse of {:?} failed: {err}", self.name);
                if tab {
                    self.root = Some(root);
                    self.ctx = None;
                } else {
                    self.root = None;
                    self.ctx = ctx;
                }
                Err(err)
            }
        }
    }

    /// Describe where `node` sits in the source, for diagnostics.
    ///
    /// Returns a `name:line:col` location and the node's text, truncated to
    /// 20 characters with a trailing `...`.
    pub fn error_context(&self, node: &impl Located) -> (String, String) {
        let pos = node.position();
        let before = self.text.get(..pos).unwrap_or(&self.text);
        let col = match before.rfind('\n') {
            Some(nl) => before.len() - (nl + 1),
            None => before.len(),
        };
        let line = 1 + before.matches('\n').count();

        let mut context = node.to_string();
        if context.chars().count() > 20 {
            let head: String = context.chars().take(20).collect();
            context = format!("{head}...");
        }
        (format!("{}:{line}:{col}", self.parse_name), context)
    }
}

/// Parse `text` as a fresh tree called `name`.
///
/// The tree is returned even on error so interactive callers can inspect
/// the partial root.
pub fn parse(name: &str, text: &str, tab: bool) -> (Tree, Result<()>) {
    let mut tree = Tree::new(name);
    let result = tree.parse(text, tab);
    (tree, result)
}

/// Transient parsing state.
struct Parser<'a> {
    label: &'a str,
    parse_name: &'a str,
    cursor: TokenCursor<'a>,
    root: CommandNode,
    ctx: Option<Context>,
}

impl<'a> Parser<'a> {
    fn new(label: &'a str, parse_name: &'a str, text: &'a str) -> Self {
        Self {
            label,
            parse_name,
            cursor: TokenCursor::new(Lexer::new(parse_name, text)),
            root: CommandNode::default(),
            ctx: None,
        }
    }

    fn error(&self, kind: ErrorKind) -> ParseError {
        ParseError::new(
            self.label,
            self.parse_name,
            self.cursor.line_number(),
            kind,
        )
    }

    fn unexpected(&self, token: &Token, context: &'static str) -> ParseError {
        self.error(ErrorKind::UnexpectedToken {
            found: token.to_string(),
            context,
        })
    }

    /// Top-level loop: terms and redirections until something else shows up.
    fn parse(&mut self) -> Result<()> {
        self.root = CommandNode::new(self.cursor.peek().pos);
        loop {
            let kind = self.cursor.peek_non_space().kind;
            match kind {
                kind if kind.is_term() => {
                    let term = self.term()?;
                    self.root.append(term);
                }
                TokenKind::RedirLeader => {
                    let redir = self.redir()?;
                    self.root.redirs.push(redir);
                }
                TokenKind::Error => {
                    let token = self.cursor.next();
                    return Err(self.error(ErrorKind::Lexical(token.val)));
                }
                // Left for an enclosing grammar, or end of input.
                _ => return Ok(()),
            }
        }
    }

    fn term(&mut self) -> Result<Node> {
        let token = self.cursor.next();
        if token.kind == TokenKind::Error {
            return Err(self.error(ErrorKind::Lexical(token.val)));
        }
        if !token.kind.is_term() {
            return Err(self.unexpected(&token, "term"));
        }
        let text = unquote(&token).map_err(|e| self.error(e.into()))?;
        self.ctx = token
            .may_continue
            .then(|| Context::argument(token.val.as_str()));
        Ok(Node::String(StringNode::new(token.pos, token.val, text)))
    }

    /// Parse an IO redirection.
    fn redir(&mut self) -> Result<Redir> {
        let leader = self.cursor.next();

        // `>>[1=2]` splits into direction `>>` and qualifier `1=2`.
        let (dir, qual) = match leader.val.split_once('[') {
            Some((dir, rest)) => (dir, rest.strip_suffix(']').unwrap_or(rest)),
            None => (leader.val.as_str(), ""),
        };

        let (flags, mut oldfd): (OpenFlags, Fd) = match dir {
            "<" => (OpenFlags::READ, 0),
            "<>" => (OpenFlags::READ_WRITE, 0),
            ">" => (OpenFlags::WRITE, 1),
            ">>" => (OpenFlags::APPEND, 1),
            _ => return Err(self.error(ErrorKind::UnexpectedDirection(dir.to_string()))),
        };

        if !qual.is_empty() {
            let Some((lhs, rhs)) = qual.split_once('=') else {
                // Filename redirection onto a different fd.
                oldfd = self.fd(qual, ErrorKind::InvalidOldFd)?;
                return self.filename_redir(oldfd, flags);
            };
            if !lhs.is_empty() {
                oldfd = self.fd(lhs, ErrorKind::InvalidOldFd)?;
            }
            if rhs.is_empty() {
                return Ok(Redir::Close { oldfd });
            }
            let newfd = self.fd(rhs, ErrorKind::InvalidNewFd)?;
            return Ok(Redir::Fd { oldfd, newfd });
        }

        self.filename_redir(oldfd, flags)
    }

    fn filename_redir(&mut self, oldfd: Fd, flags: OpenFlags) -> Result<Redir> {
        self.cursor.peek_non_space();
        let target = self.term()?;
        Ok(Redir::Filename {
            oldfd,
            flags,
            target,
        })
    }

    fn fd(&self, s: &str, invalid: fn(String) -> ErrorKind) -> Result<Fd> {
        s.parse().map_err(|_| self.error(invalid(s.to_string())))
    }
}
