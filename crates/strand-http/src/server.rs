//! Blocking HTTP/1.1 server loop.
//!
//! One OS thread per connection: the accept loop hands each connection to
//! a scoped thread, and the scope itself is the drain barrier — when a
//! stop is requested the accept loop exits and `serve` does not return
//! until every in-flight connection thread has finished. Handler code
//! runs synchronously on the connection's thread; the transport never
//! suspends a handler chain.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::thread;
use std::time::Duration;

use strand_core::{Response, StatusCode};

use crate::parser::{self, HEAD_TERMINATOR, RequestHead};
use crate::shutdown::ShutdownController;
use crate::writer::ResponseWriter;

/// Poll interval of the nonblocking accept loop.
const ACCEPT_POLL: Duration = Duration::from_millis(10);
/// How long a connection may take to deliver its request head.
const READ_TIMEOUT: Duration = Duration::from_secs(5);
/// Upper bound on the request head.
const MAX_HEAD_BYTES: usize = 16 * 1024;

/// The dispatch surface the transport calls into for every parsed
/// request. Implemented by the application core.
pub trait HttpService: Sync {
    /// Produce the response for one request. Must not block indefinitely.
    fn call(&self, head: RequestHead) -> Response;
}

/// A bound listener plus its shutdown coordination.
pub struct Server {
    listener: TcpListener,
    shutdown: ShutdownController,
}

impl Server {
    /// Wrap an existing listener.
    #[must_use]
    pub fn new(listener: TcpListener, shutdown: ShutdownController) -> Self {
        Self { listener, shutdown }
    }

    /// The address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept and process connections until a shutdown is requested,
    /// then drain in-flight connections and return.
    ///
    /// Listener errors other than the nonblocking idle signal are
    /// returned, never hidden.
    pub fn serve<S: HttpService>(&self, service: &S) -> std::io::Result<()> {
        self.shutdown.begin();
        if let Err(err) = self.listener.set_nonblocking(true) {
            self.shutdown.mark_stopped();
            return Err(err);
        }

        let result = thread::scope(|scope| {
            loop {
                if self.shutdown.should_stop() {
                    break Ok(());
                }
                match self.listener.accept() {
                    Ok((stream, peer)) => {
                        tracing::debug!(%peer, "connection accepted");
                        scope.spawn(move || handle_connection(stream, service));
                    }
                    Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(ACCEPT_POLL);
                    }
                    Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                    Err(err) => {
                        tracing::warn!(error = %err, "accept failed");
                        break Err(err);
                    }
                }
            }
        });

        self.shutdown.mark_stopped();
        tracing::debug!("server stopped");
        result
    }
}

fn handle_connection<S: HttpService>(mut stream: TcpStream, service: &S) {
    let _ = stream.set_read_timeout(Some(READ_TIMEOUT));
    let _ = stream.set_nonblocking(false);

    let response = match read_head(&mut stream) {
        Ok(Some(head)) => {
            tracing::debug!(method = %head.method, path = %head.path, "request");
            // A panicking handler must not take the server down with it;
            // the connection thread answers 500 and the scope stays clean.
            catch_unwind(AssertUnwindSafe(|| service.call(head)))
                .unwrap_or_else(|_| error_response(StatusCode::INTERNAL_SERVER_ERROR))
        }
        Ok(None) => return,
        Err(status) => error_response(status),
    };

    write_response(&mut stream, &response);
}

/// Read until the head terminator arrives. `Ok(None)` means the peer went
/// away (or timed out) before sending a complete head.
fn read_head(stream: &mut TcpStream) -> Result<Option<RequestHead>, StatusCode> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => return Ok(None),
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if memchr::memmem::find(&buf, HEAD_TERMINATOR).is_some() {
                    break;
                }
                if buf.len() > MAX_HEAD_BYTES {
                    return Err(StatusCode::from_u16(431));
                }
            }
            Err(err)
                if err.kind() == std::io::ErrorKind::WouldBlock
                    || err.kind() == std::io::ErrorKind::TimedOut =>
            {
                return Ok(None);
            }
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
            Err(_) => return Ok(None),
        }
    }

    match parser::parse_head(&buf) {
        Ok(head) => Ok(Some(head)),
        Err(err) => {
            tracing::debug!(error = %err, "rejected request head");
            Err(StatusCode::BAD_REQUEST)
        }
    }
}

fn error_response(status: StatusCode) -> Response {
    let mut response = Response::new();
    response.set_status(status);
    response.set_body(status.canonical_reason().as_bytes().to_vec());
    response
}

fn write_response(stream: &mut TcpStream, response: &Response) {
    // Connections are not kept alive; drain time stays bounded during
    // graceful shutdown.
    let mut response = response.clone();
    response.set_header("connection", "close");
    let bytes = ResponseWriter::new().write(&response);
    if let Err(err) = stream.write_all(&bytes) {
        tracing::debug!(error = %err, "failed to write response");
    }
    let _ = stream.flush();
}
