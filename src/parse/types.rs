//! Types produced by the parser: the command AST and the completion context.

use std::fmt;

use serde::Serialize;

/// Byte offset into the parsed source text.
pub type Pos = usize;

/// A file descriptor number as written in a redirection qualifier.
pub type Fd = u32;

/// Anything that can be located in the source and rendered back as text.
///
/// Used by [`Tree::error_context`](super::Tree::error_context) to build diagnostics.
pub trait Located: fmt::Display {
    /// Byte offset of the first character of this node.
    fn position(&self) -> Pos;
}

/// A term node. The variant set is closed; callers match on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// A bareword or quoted string, already unquoted.
    String(StringNode),
}

impl Node {
    /// The unquoted value of this term.
    pub fn text(&self) -> &str {
        match self {
            Node::String(s) => &s.text,
        }
    }
}

impl Located for Node {
    fn position(&self) -> Pos {
        match self {
            Node::String(s) => s.pos,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::String(s) => s.fmt(f),
        }
    }
}

/// A string term: where it starts, how it was written, and what it means.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringNode {
    pub pos: Pos,
    /// Raw source text, quotes included.
    pub quoted: String,
    /// Semantic value after unquoting.
    pub text: String,
}

impl StringNode {
    pub fn new(pos: Pos, quoted: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            pos,
            quoted: quoted.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for StringNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.quoted)
    }
}

/// Flags a filename redirection opens its target with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OpenFlags {
    pub read: bool,
    pub write: bool,
    pub create: bool,
    pub truncate: bool,
    pub append: bool,
}

impl OpenFlags {
    /// `<`: read-only.
    pub const READ: OpenFlags = OpenFlags {
        read: true,
        write: false,
        create: false,
        truncate: false,
        append: false,
    };

    /// `<>`: read-write, created if missing.
    pub const READ_WRITE: OpenFlags = OpenFlags {
        read: true,
        write: true,
        create: true,
        truncate: false,
        append: false,
    };

    /// `>`: write-only, created if missing, truncated.
    pub const WRITE: OpenFlags = OpenFlags {
        read: false,
        write: true,
        create: true,
        truncate: true,
        append: false,
    };

    /// `>>`: write-only, created if missing, appended to.
    pub const APPEND: OpenFlags = OpenFlags {
        read: false,
        write: true,
        create: true,
        truncate: false,
        append: true,
    };

    /// The redirection direction these flags correspond to, if any.
    pub fn direction(&self) -> Option<&'static str> {
        match *self {
            OpenFlags::READ => Some("<"),
            OpenFlags::READ_WRITE => Some("<>"),
            OpenFlags::WRITE => Some(">"),
            OpenFlags::APPEND => Some(">>"),
            _ => None,
        }
    }

    /// Build `OpenOptions` that open a file the way these flags describe.
    pub fn to_open_options(&self) -> std::fs::OpenOptions {
        let mut opts = std::fs::OpenOptions::new();
        opts.read(self.read)
            .write(self.write)
            .create(self.create)
            .truncate(self.truncate)
            .append(self.append);
        opts
    }
}

/// An I/O redirection attached to a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Redir {
    /// Open `target` with `flags` and install it as `oldfd`.
    Filename {
        oldfd: Fd,
        flags: OpenFlags,
        target: Node,
    },
    /// Duplicate `newfd` onto `oldfd`.
    Fd { oldfd: Fd, newfd: Fd },
    /// Close `oldfd`.
    Close { oldfd: Fd },
}

impl Redir {
    /// The descriptor this redirection acts on.
    pub fn oldfd(&self) -> Fd {
        match self {
            Redir::Filename { oldfd, .. } | Redir::Fd { oldfd, .. } | Redir::Close { oldfd } => {
                *oldfd
            }
        }
    }
}

impl fmt::Display for Redir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Redir::Filename {
                oldfd,
                flags,
                target,
            } => {
                let dir = flags.direction().unwrap_or("?");
                write!(f, "{dir}[{oldfd}] {target}")
            }
            Redir::Fd { oldfd, newfd } => write!(f, "[{oldfd}={newfd}]"),
            Redir::Close { oldfd } => write!(f, "[{oldfd}=]"),
        }
    }
}

/// Root node: one command's terms and redirections, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CommandNode {
    pub pos: Pos,
    pub args: Vec<Node>,
    pub redirs: Vec<Redir>,
}

impl CommandNode {
    pub fn new(pos: Pos) -> Self {
        Self {
            pos,
            args: Vec::new(),
            redirs: Vec::new(),
        }
    }

    pub(crate) fn append(&mut self, arg: Node) {
        self.args.push(arg);
    }

    /// Unquoted values of all terms.
    pub fn words(&self) -> Vec<&str> {
        self.args.iter().map(Node::text).collect()
    }
}

impl Located for CommandNode {
    fn position(&self) -> Pos {
        self.pos
    }
}

impl fmt::Display for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let parts = self
            .args
            .iter()
            .map(|a| a as &dyn fmt::Display)
            .chain(self.redirs.iter().map(|r| r as &dyn fmt::Display));
        for part in parts {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// What an interactive caller may still complete after a parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Context {
    /// The last term sits at end of input and could still grow.
    Argument {
        /// Raw text of that term as typed so far.
        prefix: String,
    },
}

impl Context {
    pub fn argument(prefix: impl Into<String>) -> Self {
        Context::Argument {
            prefix: prefix.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(pos: Pos, quoted: &str, text: &str) -> Node {
        Node::String(StringNode::new(pos, quoted, text))
    }

    #[test]
    fn flags_direction() {
        assert_eq!(OpenFlags::READ.direction(), Some("<"));
        assert_eq!(OpenFlags::READ_WRITE.direction(), Some("<>"));
        assert_eq!(OpenFlags::WRITE.direction(), Some(">"));
        assert_eq!(OpenFlags::APPEND.direction(), Some(">>"));
        assert_eq!(OpenFlags::default().direction(), None);
    }

    #[test]
    fn redir_display() {
        let r = Redir::Filename {
            oldfd: 1,
            flags: OpenFlags::APPEND,
            target: term(7, "'log file'", "log file"),
        };
        assert_eq!(r.to_string(), ">>[1] 'log file'");
        assert_eq!(Redir::Fd { oldfd: 2, newfd: 1 }.to_string(), "[2=1]");
        assert_eq!(Redir::Close { oldfd: 0 }.to_string(), "[0=]");
    }

    #[test]
    fn command_display_terms_then_redirs() {
        let mut cmd = CommandNode::new(0);
        cmd.append(term(0, "echo", "echo"));
        cmd.append(term(5, "\"a b\"", "a b"));
        cmd.redirs.push(Redir::Close { oldfd: 2 });
        assert_eq!(cmd.to_string(), "echo \"a b\" [2=]");
        assert_eq!(cmd.words(), vec!["echo", "a b"]);
    }

    #[test]
    fn empty_command_display() {
        assert_eq!(CommandNode::new(0).to_string(), "");
    }

    #[test]
    fn redir_oldfd() {
        assert_eq!(Redir::Fd { oldfd: 3, newfd: 1 }.oldfd(), 3);
        assert_eq!(Redir::Close { oldfd: 4 }.oldfd(), 4);
    }

    #[test]
    fn serializes_tagged() {
        let json = serde_json::to_value(Redir::Close { oldfd: 1 }).unwrap();
        assert_eq!(json["type"], "close");
        assert_eq!(json["oldfd"], 1);
        let json = serde_json::to_value(Context::argument("ec")).unwrap();
        assert_eq!(json["type"], "argument");
        assert_eq!(json["prefix"], "ec");
    }
}
