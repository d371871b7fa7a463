//! Response state carried on the request context.

/// HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const CREATED: StatusCode = StatusCode(201);
    pub const NO_CONTENT: StatusCode = StatusCode(204);
    pub const MOVED_PERMANENTLY: StatusCode = StatusCode(301);
    pub const FOUND: StatusCode = StatusCode(302);
    pub const NOT_MODIFIED: StatusCode = StatusCode(304);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const UNAUTHORIZED: StatusCode = StatusCode(401);
    pub const FORBIDDEN: StatusCode = StatusCode(403);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const REQUEST_TIMEOUT: StatusCode = StatusCode(408);
    pub const PAYLOAD_TOO_LARGE: StatusCode = StatusCode(413);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);
    pub const SERVICE_UNAVAILABLE: StatusCode = StatusCode(503);

    /// Build a status code from its numeric value.
    #[must_use]
    pub fn from_u16(code: u16) -> Self {
        Self(code)
    }

    /// The numeric value.
    #[must_use]
    pub fn as_u16(self) -> u16 {
        self.0
    }

    /// The canonical reason phrase for the status line.
    #[must_use]
    pub fn canonical_reason(self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            304 => "Not Modified",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            408 => "Request Timeout",
            413 => "Payload Too Large",
            431 => "Request Header Fields Too Large",
            500 => "Internal Server Error",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }
}

/// The mutable response surface handlers write into.
///
/// Writes are cumulative and ordered: each handler observes the state left
/// by all of its predecessors. The transport serializes the final state
/// after the chain stops.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    /// A fresh `200 OK` response with no headers and an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Return to the pristine state. Part of the mandatory context reset
    /// between pooled requests.
    pub fn reset(&mut self) {
        self.status = StatusCode::OK;
        self.headers.clear();
        self.body.clear();
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Replace the status.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Look up a header by name, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing any existing value under the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self
            .headers
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            slot.1 = value;
        } else {
            self.headers.push((name, value));
        }
    }

    /// All headers in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// The body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Replace the body.
    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }

    /// Append to the body.
    pub fn append_body(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    /// Set `content-length` from the body if the header is absent.
    pub fn ensure_content_length(&mut self) {
        if self.header("content-length").is_none() {
            self.set_header("content-length", self.body.len().to_string());
        }
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_header_replaces_case_insensitively() {
        let mut response = Response::new();
        response.set_header("Content-Type", "text/plain");
        response.set_header("content-type", "application/json");
        assert_eq!(response.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(response.headers().len(), 1);
    }

    #[test]
    fn ensure_content_length_fills_from_body() {
        let mut response = Response::new();
        response.set_body(b"hello".to_vec());
        response.ensure_content_length();
        assert_eq!(response.header("content-length"), Some("5"));

        // An explicit value is not overwritten.
        response.append_body(b"!");
        response.ensure_content_length();
        assert_eq!(response.header("content-length"), Some("5"));
    }

    #[test]
    fn reset_restores_pristine_state() {
        let mut response = Response::new();
        response.set_status(StatusCode::NOT_FOUND);
        response.set_header("x-test", "1");
        response.append_body(b"gone");
        response.reset();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().is_empty());
        assert!(response.body().is_empty());
    }

    #[test]
    fn canonical_reasons() {
        assert_eq!(StatusCode::OK.canonical_reason(), "OK");
        assert_eq!(StatusCode::NOT_FOUND.canonical_reason(), "Not Found");
        assert_eq!(StatusCode::from_u16(799).canonical_reason(), "Unknown");
    }
}
