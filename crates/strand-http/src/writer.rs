//! HTTP response serialization.

use strand_core::{Response, StatusCode};

/// Writes HTTP responses into a reusable buffer.
pub struct ResponseWriter {
    buffer: Vec<u8>,
}

impl ResponseWriter {
    /// Create a new response writer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
        }
    }

    /// Serialize a response as a full HTTP/1.1 message.
    ///
    /// `content-length` is always computed from the body; any value a
    /// handler set is replaced so the framing can never lie.
    #[must_use]
    pub fn write(&mut self, response: &Response) -> Vec<u8> {
        self.buffer.clear();

        // Status line
        self.buffer.extend_from_slice(b"HTTP/1.1 ");
        self.write_status(response.status());
        self.buffer.extend_from_slice(b"\r\n");

        // Headers, minus any stale framing headers
        for (name, value) in response.headers() {
            if name.eq_ignore_ascii_case("content-length")
                || name.eq_ignore_ascii_case("transfer-encoding")
            {
                continue;
            }
            self.buffer.extend_from_slice(name.as_bytes());
            self.buffer.extend_from_slice(b": ");
            self.buffer.extend_from_slice(value.as_bytes());
            self.buffer.extend_from_slice(b"\r\n");
        }

        // Content-Length
        self.buffer.extend_from_slice(b"content-length: ");
        self.buffer
            .extend_from_slice(response.body().len().to_string().as_bytes());
        self.buffer.extend_from_slice(b"\r\n");

        // End of headers
        self.buffer.extend_from_slice(b"\r\n");

        // Body
        self.buffer.extend_from_slice(response.body());

        self.take_buffer()
    }

    fn write_status(&mut self, status: StatusCode) {
        self.buffer
            .extend_from_slice(status.as_u16().to_string().as_bytes());
        self.buffer.extend_from_slice(b" ");
        self.buffer
            .extend_from_slice(status.canonical_reason().as_bytes());
    }

    fn take_buffer(&mut self) -> Vec<u8> {
        let mut out = Vec::new();
        std::mem::swap(&mut out, &mut self.buffer);
        self.buffer = Vec::with_capacity(out.capacity());
        out
    }
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_sets_content_length() {
        let mut response = Response::new();
        response.set_header("content-type", "text/plain");
        response.set_body(b"hello".to_vec());

        let mut writer = ResponseWriter::new();
        let bytes = writer.write(&response);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("content-type: text/plain\r\n"));
        assert!(text.contains("content-length: 5\r\n"));
        assert!(text.ends_with("\r\n\r\nhello"));
    }

    #[test]
    fn stale_content_length_is_replaced() {
        let mut response = Response::new();
        response.set_header("content-length", "9999");
        response.set_body(b"ok".to_vec());

        let mut writer = ResponseWriter::new();
        let text = String::from_utf8_lossy(&writer.write(&response)).into_owned();
        assert!(text.contains("content-length: 2\r\n"));
        assert!(!text.contains("9999"));
    }

    #[test]
    fn status_line_uses_canonical_reason() {
        let mut response = Response::new();
        response.set_status(StatusCode::NOT_FOUND);
        let mut writer = ResponseWriter::new();
        let text = String::from_utf8_lossy(&writer.write(&response)).into_owned();
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
    }
}
