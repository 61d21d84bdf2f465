use dasc::parse::{ErrorKind, Node, OpenFlags, Redir, StringNode, Tree};

fn words_for(command: &str) -> Vec<String> {
    let (tree, result) = dasc::parse("test", command, false);
    assert!(result.is_ok(), "command: {command}: {result:?}");
    tree.root
        .expect("root after successful parse")
        .words()
        .into_iter()
        .map(String::from)
        .collect()
}

fn redirs_for(command: &str) -> Vec<Redir> {
    let (tree, result) = dasc::parse("test", command, false);
    assert!(result.is_ok(), "command: {command}: {result:?}");
    tree.root.expect("root after successful parse").redirs
}

fn error_for(command: &str) -> ErrorKind {
    let (tree, result) = dasc::parse("test", command, false);
    assert!(tree.root.is_none(), "command: {command}: root kept after error");
    result.expect_err(command).kind
}

fn term(pos: usize, quoted: &str, text: &str) -> Node {
    Node::String(StringNode::new(pos, quoted, text))
}

macro_rules! words_test {
    ($name:ident, $cmd:expr, [$($word:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            let expected: Vec<String> = vec![$($word.to_string()),*];
            assert_eq!(words_for($cmd), expected, "command: {}", $cmd);
        }
    };
}

macro_rules! redir_test {
    ($name:ident, $cmd:expr, $redir:expr) => {
        #[test]
        fn $name() {
            assert_eq!(redirs_for($cmd), vec![$redir], "command: {}", $cmd);
        }
    };
}

macro_rules! error_test {
    ($name:ident, $cmd:expr, $kind:pat) => {
        #[test]
        fn $name() {
            let kind = error_for($cmd);
            assert!(matches!(kind, $kind), "command: {}: got {:?}", $cmd, kind);
        }
    };
}

// ── Terms ──

words_test!(empty, "", []);
words_test!(only_space, "   \t ", []);
words_test!(single_word, "ls", ["ls"]);
words_test!(several_words, "ls -la /tmp", ["ls", "-la", "/tmp"]);
words_test!(extra_space, "  ls    -la  ", ["ls", "-la"]);
words_test!(single_quoted, "echo 'a b'", ["echo", "a b"]);
words_test!(single_quoted_backslash, r"echo 'a\tb'", ["echo", r"a\tb"]);
words_test!(double_quoted_tab, r#"echo "c\td""#, ["echo", "c\td"]);
words_test!(double_quoted_quote, r#"echo "say \"hi\"""#, ["echo", "say \"hi\""]);
words_test!(double_quoted_unicode, r#"echo "été""#, ["echo", "été"]);
words_test!(empty_strings, r#"'' """#, ["", ""]);
words_test!(adjacent_quotes_split, "a'b'c", ["a", "b", "c"]);
words_test!(unicode_bare, "écho ünïcode", ["écho", "ünïcode"]);
words_test!(equals_in_bare, "FOO=bar env", ["FOO=bar", "env"]);

// ── Permissive stop ──

words_test!(stop_at_pipe, "echo a | grep b", ["echo", "a"]);
words_test!(stop_at_semicolon, "echo a; rm -rf /", ["echo", "a"]);
words_test!(stop_at_newline, "echo a\necho b", ["echo", "a"]);
words_test!(stop_before_bad_direction_after_pipe, "ls | cat << x", ["ls"]);

// ── Redirections ──

redir_test!(
    write_file,
    "cmd > out.txt",
    Redir::Filename {
        oldfd: 1,
        flags: OpenFlags::WRITE,
        target: term(6, "out.txt", "out.txt"),
    }
);
redir_test!(
    append_file,
    "cmd >>log",
    Redir::Filename {
        oldfd: 1,
        flags: OpenFlags::APPEND,
        target: term(6, "log", "log"),
    }
);
redir_test!(
    read_file,
    "cmd < 'in put'",
    Redir::Filename {
        oldfd: 0,
        flags: OpenFlags::READ,
        target: term(6, "'in put'", "in put"),
    }
);
redir_test!(
    read_write_file,
    "cmd <> dev",
    Redir::Filename {
        oldfd: 0,
        flags: OpenFlags::READ_WRITE,
        target: term(7, "dev", "dev"),
    }
);
redir_test!(
    altered_oldfd,
    "cmd >[2] err",
    Redir::Filename {
        oldfd: 2,
        flags: OpenFlags::WRITE,
        target: term(9, "err", "err"),
    }
);
redir_test!(fd_dup, "cmd >>[1=2]", Redir::Fd { oldfd: 1, newfd: 2 });
redir_test!(fd_dup_default_oldfd, "cmd >[=3]", Redir::Fd { oldfd: 1, newfd: 3 });
redir_test!(fd_dup_input, "cmd <[5=0]", Redir::Fd { oldfd: 5, newfd: 0 });
redir_test!(fd_close, "cmd >[1=]", Redir::Close { oldfd: 1 });
redir_test!(fd_close_default, "cmd <[=]", Redir::Close { oldfd: 0 });
redir_test!(
    empty_qualifier,
    "cmd >[] f",
    Redir::Filename {
        oldfd: 1,
        flags: OpenFlags::WRITE,
        target: term(8, "f", "f"),
    }
);

#[test]
fn terms_and_redirections_interleave() {
    let (tree, result) = dasc::parse("test", "sort <in -r >[2=1] -u >out", false);
    assert!(result.is_ok());
    let root = tree.root.unwrap();
    assert_eq!(root.words(), vec!["sort", "-r", "-u"]);
    assert_eq!(root.redirs.len(), 3);
    assert!(matches!(root.redirs[0], Redir::Filename { oldfd: 0, .. }));
    assert_eq!(root.redirs[1], Redir::Fd { oldfd: 2, newfd: 1 });
    assert_eq!(root.redirs[2].to_string(), ">[1] out");
}

// ── Errors ──

error_test!(invalid_oldfd, "cmd >[x=2]", ErrorKind::InvalidOldFd(_));
error_test!(invalid_oldfd_plain, "cmd >[x] f", ErrorKind::InvalidOldFd(_));
error_test!(negative_oldfd, "cmd >[-1=2]", ErrorKind::InvalidOldFd(_));
error_test!(invalid_newfd, "cmd >[1=two]", ErrorKind::InvalidNewFd(_));
error_test!(heredoc_direction, "cat << EOF", ErrorKind::UnexpectedDirection(_));
error_test!(triple_direction, "cat >>> f", ErrorKind::UnexpectedDirection(_));
error_test!(bad_escape, r#"echo "bad\q""#, ErrorKind::Unquote(_));
error_test!(missing_target, "cmd >", ErrorKind::UnexpectedToken { context: "term", .. });
error_test!(target_is_redirection, "cmd > >f", ErrorKind::UnexpectedToken { .. });
error_test!(unterminated_single, "echo 'abc", ErrorKind::Lexical(_));
error_test!(unterminated_double, "echo \"abc", ErrorKind::Lexical(_));
error_test!(unterminated_qualifier, "echo >[1", ErrorKind::Lexical(_));
error_test!(unterminated_target, "x > 'a b", ErrorKind::Lexical(_));

#[test]
fn error_message_format() {
    let (_, result) = dasc::parse("script.das", "cmd >[x=2]", false);
    assert_eq!(
        result.unwrap_err().to_string(),
        "das: script.das:1: invalid oldfd in qualified redirection \"x\""
    );
}

#[test]
fn first_error_wins() {
    let (_, result) = dasc::parse("t", r#"echo "bad\q" >[x=1]"#, false);
    assert!(matches!(result.unwrap_err().kind, ErrorKind::Unquote(_)));
}

// ── Interactive parses ──

#[test]
fn tab_context_for_trailing_word() {
    let (tree, result) = dasc::parse("t", "git chec", true);
    assert!(result.is_ok());
    assert_eq!(tree.ctx, Some(dasc::Context::argument("chec")));
    assert_eq!(tree.root.unwrap().words(), vec!["git", "chec"]);
}

#[test]
fn tab_no_context_after_trailing_space() {
    let (tree, _) = dasc::parse("t", "git chec ", true);
    assert_eq!(tree.ctx, None);
}

#[test]
fn tab_error_keeps_root_drops_context() {
    let (tree, result) = dasc::parse("t", "echo partial >[z]", true);
    assert!(matches!(result.unwrap_err().kind, ErrorKind::InvalidOldFd(_)));
    assert_eq!(tree.ctx, None);
    assert_eq!(tree.root.unwrap().words(), vec!["echo", "partial"]);
}

#[test]
fn non_tab_error_drops_root() {
    let (tree, result) = dasc::parse("t", "echo partial >[z]", false);
    assert!(result.is_err());
    assert!(tree.root.is_none());
}

#[test]
fn session_rejects_second_parse() {
    let mut tree = Tree::new("t");
    assert!(tree.parse("a", false).is_ok());
    assert_eq!(tree.parse("b", false).unwrap_err().kind, ErrorKind::AlreadyParsed);
    assert_eq!(tree.text(), "a");
}

// ── Properties ──

#[test]
fn term_count_matches_word_count() {
    let samples = [
        "a",
        "a b c d e f",
        "'x y' z",
        r#"one "two three" 'four' five"#,
        "  lead trail  ",
    ];
    for sample in samples {
        let expected = shlex::split(sample).expect("sample is valid shell");
        let got = words_for(sample);
        assert_eq!(got.len(), expected.len(), "sample: {sample}");
    }
}

#[test]
fn bare_and_single_quoted_agree_with_shlex() {
    let samples = [
        "ls -la /tmp",
        "echo 'hello world'",
        r"printf '%s\n' x",
        "grep -r 'a  b' src/",
    ];
    for sample in samples {
        let expected = shlex::split(sample).expect("sample is valid shell");
        assert_eq!(words_for(sample), expected, "sample: {sample}");
    }
}

#[test]
fn bare_reparse_is_identity() {
    for word in ["ls", "-la", "a=b", "x.y", "/usr/bin/env"] {
        let once = words_for(word);
        let twice = words_for(&once[0]);
        assert_eq!(once, twice);
    }
}

#[test]
fn error_context_for_parsed_node() {
    let (tree, _) = dasc::parse("ctx", "cat \"a very long quoted argument\"", false);
    let root = tree.root.as_ref().unwrap();
    let (loc, text) = tree.error_context(&root.args[1]);
    assert_eq!(loc, "ctx:1:4");
    assert_eq!(text, "\"a very long quoted ...");
}
