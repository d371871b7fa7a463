//! HTTP/1.1 request-head parsing.
//!
//! Parses the request line and headers out of a byte buffer; the body is
//! the transport's concern. Only what dispatch needs is materialized:
//! method, path, query string, and headers.

use memchr::{memchr, memmem};
use thiserror::Error;

use strand_core::Method;

/// Terminator of the request head.
pub const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Errors produced while parsing a request head.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("request head is not terminated")]
    Incomplete,
    #[error("malformed request line")]
    InvalidRequestLine,
    #[error("unsupported method `{0}`")]
    UnsupportedMethod(String),
    #[error("unsupported protocol version")]
    UnsupportedVersion,
    #[error("malformed header line")]
    MalformedHeader,
    #[error("request head is not valid UTF-8")]
    InvalidUtf8,
}

/// The parsed request head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    headers: Vec<(String, String)>,
}

impl RequestHead {
    /// Build a head directly, bypassing the wire parser. Used by
    /// in-process dispatch and tests.
    #[must_use]
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = split_target(target);
        Self {
            method,
            path: path.to_string(),
            query: query.map(str::to_string),
            headers: Vec::new(),
        }
    }

    /// First header value for `name`, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All parsed headers in wire order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

/// Split a request target into path and query at the first `?`.
#[must_use]
pub fn split_target(target: &str) -> (&str, Option<&str>) {
    match memchr(b'?', target.as_bytes()) {
        Some(at) => (&target[..at], Some(&target[at + 1..])),
        None => (target, None),
    }
}

/// Parse a complete request head (including the blank-line terminator).
pub fn parse_head(buf: &[u8]) -> Result<RequestHead, ParseError> {
    let end = memmem::find(buf, HEAD_TERMINATOR).ok_or(ParseError::Incomplete)?;
    let head = std::str::from_utf8(&buf[..end]).map_err(|_| ParseError::InvalidUtf8)?;

    let mut lines = head.split("\r\n");
    let request_line = lines.next().ok_or(ParseError::InvalidRequestLine)?;

    let mut parts = request_line.split(' ');
    let method_str = parts.next().ok_or(ParseError::InvalidRequestLine)?;
    let target = parts.next().ok_or(ParseError::InvalidRequestLine)?;
    let version = parts.next().ok_or(ParseError::InvalidRequestLine)?;
    if parts.next().is_some() || target.is_empty() {
        return Err(ParseError::InvalidRequestLine);
    }
    if !version.starts_with("HTTP/1.") {
        return Err(ParseError::UnsupportedVersion);
    }
    let method = Method::parse(method_str)
        .ok_or_else(|| ParseError::UnsupportedMethod(method_str.to_string()))?;

    let mut headers = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let (name, value) = line.split_once(':').ok_or(ParseError::MalformedHeader)?;
        if name.is_empty() {
            return Err(ParseError::MalformedHeader);
        }
        headers.push((name.trim().to_string(), value.trim().to_string()));
    }

    let (path, query) = split_target(target);
    Ok(RequestHead {
        method,
        path: path.to_string(),
        query: query.map(str::to_string),
        headers,
    })
}
