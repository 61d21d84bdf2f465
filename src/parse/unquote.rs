//! Turning a term token's raw text into its semantic value.

use thiserror::Error;

use super::lexer::{Token, TokenKind};

/// Why a quoted literal could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnquoteError {
    #[error("cannot unquote {0} token")]
    NotATerm(&'static str),
    #[error("missing quote delimiters")]
    MissingDelimiters,
    #[error("unknown escape sequence \\{0}")]
    UnknownEscape(char),
    #[error("truncated escape sequence \\{0}")]
    TruncatedEscape(char),
    #[error("octal escape value {0} > 255")]
    OctalOutOfRange(u32),
    #[error("invalid code point U+{0:X} in escape sequence")]
    InvalidCodePoint(u32),
    #[error("newline in string literal")]
    Newline,
    #[error("unescaped quote in string literal")]
    StrayQuote,
    #[error("escaped bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Unquote a term token.
///
/// Barewords are returned unchanged; single-quoted strings lose their
/// delimiters and nothing else; double-quoted strings are decoded.
pub fn unquote(token: &Token) -> Result<String, UnquoteError> {
    match token.kind {
        TokenKind::Bare => Ok(token.val.clone()),
        TokenKind::SingleQuoted => strip_single(&token.val).map(str::to_string),
        TokenKind::DoubleQuoted => unquote_double(&token.val),
        other => Err(UnquoteError::NotATerm(other.as_str())),
    }
}

fn strip_single(val: &str) -> Result<&str, UnquoteError> {
    val.strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .ok_or(UnquoteError::MissingDelimiters)
}

/// Decode a double-quoted literal, delimiters included.
pub fn unquote_double(val: &str) -> Result<String, UnquoteError> {
    let body = val
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(UnquoteError::MissingDelimiters)?;

    // Fast path: nothing to decode.
    if !body.contains(['\\', '"', '\n']) {
        return Ok(body.to_string());
    }

    let mut out: Vec<u8> = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\n' => return Err(UnquoteError::Newline),
            '"' => return Err(UnquoteError::StrayQuote),
            '\\' => {
                let Some(e) = chars.next() else {
                    return Err(UnquoteError::TruncatedEscape('\\'));
                };
                match e {
                    'a' => out.push(0x07),
                    'b' => out.push(0x08),
                    'f' => out.push(0x0c),
                    'n' => out.push(b'\n'),
                    'r' => out.push(b'\r'),
                    't' => out.push(b'\t'),
                    'v' => out.push(0x0b),
                    '\\' => out.push(b'\\'),
                    '"' => out.push(b'"'),
                    '0'..='7' => {
                        let digits = take_digits(&mut chars, e, 2, 8)?;
                        let value = u32::from_str_radix(&digits, 8)
                            .map_err(|_| UnquoteError::TruncatedEscape(e))?;
                        let byte =
                            u8::try_from(value).map_err(|_| UnquoteError::OctalOutOfRange(value))?;
                        out.push(byte);
                    }
                    'x' => {
                        let digits = take_digits(&mut chars, e, 2, 16)?;
                        let byte = u8::from_str_radix(&digits, 16)
                            .map_err(|_| UnquoteError::TruncatedEscape(e))?;
                        out.push(byte);
                    }
                    'u' | 'U' => {
                        let n = if e == 'u' { 4 } else { 8 };
                        let digits = take_digits(&mut chars, e, n, 16)?;
                        let value = u32::from_str_radix(&digits, 16)
                            .map_err(|_| UnquoteError::TruncatedEscape(e))?;
                        let ch =
                            char::from_u32(value).ok_or(UnquoteError::InvalidCodePoint(value))?;
                        let mut buf = [0u8; 4];
                        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                    }
                    other => return Err(UnquoteError::UnknownEscape(other)),
                }
            }
            c => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    String::from_utf8(out).map_err(|_| UnquoteError::InvalidUtf8)
}

/// Collect exactly `n` more digits in `radix` following escape letter `e`.
///
/// For octal escapes `e` is itself the first digit and is included.
fn take_digits(
    chars: &mut std::str::Chars<'_>,
    e: char,
    n: usize,
    radix: u32,
) -> Result<String, UnquoteError> {
    let mut digits = String::with_capacity(n + 1);
    if radix == 8 {
        digits.push(e);
    }
    for _ in 0..n {
        match chars.next() {
            Some(d) if d.is_digit(radix) => digits.push(d),
            _ => return Err(UnquoteError::TruncatedEscape(e)),
        }
    }
    Ok(digits)
}
