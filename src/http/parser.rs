use thiserror::Error;

use crate::http::request::{Method, Request};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("request line needs a method and a path")]
    MissingTokens,
    #[error("request line longer than {limit} bytes")]
    TooLong { limit: usize },
}

/// Parses a request line into method, path and optional version.
///
/// `line` may still carry its `\r\n` terminator. Tokens are split on ASCII
/// whitespace and anything after the third token is ignored. The line is
/// handled as bytes: the path is kept raw, and a method or version that is
/// not UTF-8 is decoded lossily rather than rejected.
pub fn parse_request_line(line: &[u8]) -> Result<Request, ParseError> {
    let mut parts = line
        .split(u8::is_ascii_whitespace)
        .filter(|token| !token.is_empty());

    let method = parts.next().ok_or(ParseError::MissingTokens)?;
    let path = parts.next().ok_or(ParseError::MissingTokens)?;

    let mut request = Request::new(Method::parse(&String::from_utf8_lossy(method)), path);
    if let Some(version) = parts.next() {
        request = request.with_version(String::from_utf8_lossy(version));
    }

    Ok(request)
}

/// Index of the first `\n` in `buf`, if any.
pub fn find_line_end(buf: &[u8]) -> Option<usize> {
    buf.iter().position(|&b| b == b'\n')
}

/// True for a line made only of its terminator (`\n` or `\r\n`).
pub fn is_blank_line(line: &[u8]) -> bool {
    matches!(line, b"\n" | b"\r\n")
}
