pub mod cursor;
pub mod error;
pub mod lexer;
pub mod tree;
pub mod types;
pub mod unquote;

pub use cursor::{LOOKAHEAD, TokenCursor};
pub use error::{DEFAULT_LABEL, ErrorKind, ParseError};
pub use lexer::{Lexer, Token, TokenKind};
pub use tree::{Tree, parse};
pub use types::{CommandNode, Context, Fd, Located, Node, OpenFlags, Pos, Redir, StringNode};
pub use unquote::{UnquoteError, unquote};
