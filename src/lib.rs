//! dasc: the command-line parser of the das shell.
//!
//! Turns one command line into a [`CommandNode`]: its argument terms and its
//! I/O redirections, in source order. Interactive callers can also ask
//! for the completion [`Context`] left by the last term.
//!
//! ```
//! let (tree, result) = dasc::parse("stdin", "cat 'my file' >>[2] err.log", false);
//! assert!(result.is_ok());
//! let root = tree.root.unwrap();
//! assert_eq!(root.words(), vec!["cat", "my file"]);
//! assert_eq!(root.redirs[0].oldfd(), 2);
//! ```
//!
//! # Architecture
//!
//! - **[`parse`](mod@parse)** — Lexer, token cursor, recursive-descent parser, AST types.
//! - **[`config`]** — Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]** — `simplelog` setup for the `dasc` binary.

/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Logger initialisation.
pub mod logging;
/// Command-line parsing: lexer, token cursor, parser, AST.
pub mod parse;

pub use parse::{CommandNode, Context, Node, ParseError, Redir, Tree, parse};
