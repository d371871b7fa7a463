//! The per-request context.
//!
//! [`Ctx`] carries the request method and path, the parameter bindings of
//! the currently executing chain link, the response surface, and the chain
//! cursor. One context is checked out per in-flight request; contexts are
//! pooled and fully reset before reuse (see [`crate::CtxPool`]).
//!
//! # Example
//!
//! ```ignore
//! app.get("/greet/:name", |c: &mut Ctx| {
//!     let name = c.params("name").unwrap_or("world").to_string();
//!     c.send(&format!("hello {name}"));
//! })?;
//! ```

use std::borrow::Cow;

use serde::Serialize;

use crate::chain::{ChainLink, ChainState, HandlerChain};
use crate::method::Method;
use crate::query::QueryString;
use crate::response::{Response, StatusCode};

/// Mutable per-request state handed to every handler in the chain.
pub struct Ctx {
    method: Method,
    path: String,
    query: Option<String>,
    chain: HandlerChain,
    response: Response,
}

impl Ctx {
    /// Create an empty context. Callers normally go through the pool,
    /// which resets before handing a context out.
    #[must_use]
    pub fn new() -> Self {
        Self {
            method: Method::Get,
            path: String::new(),
            query: None,
            chain: HandlerChain::new(),
            response: Response::new(),
        }
    }

    /// Full reset: bindings cleared, cursor cleared, response state
    /// cleared. Mandatory before a pooled context serves another request;
    /// nothing from the previous request may leak through.
    pub fn reset(&mut self) {
        self.method = Method::Get;
        self.path.clear();
        self.query = None;
        self.chain.reset();
        self.response.reset();
    }

    /// Populate the context for an inbound request.
    pub fn prepare(&mut self, method: Method, path: &str, query: Option<&str>) {
        self.method = method;
        self.path.clear();
        self.path.push_str(path);
        self.query = query.map(str::to_owned);
    }

    /// Install the matched handler chain. State becomes `Pending`.
    pub fn load_chain(&mut self, links: Vec<ChainLink>) {
        self.chain.load(links);
    }

    // ------------------------------------------------------------------
    // Request surface
    // ------------------------------------------------------------------

    /// The request method.
    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// The request path, without the query string.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path parameter binding for the currently executing chain link.
    ///
    /// The wildcard binds under the name `*`. An optional parameter that
    /// matched zero segments binds the empty string.
    #[must_use]
    pub fn params(&self, name: &str) -> Option<&str> {
        self.chain.current_params().and_then(|p| p.get(name))
    }

    /// First query-string value for `name`, percent-decoded.
    #[must_use]
    pub fn query(&self, name: &str) -> Option<Cow<'_, str>> {
        self.query
            .as_deref()
            .and_then(|raw| QueryString::parse(raw).get(name))
    }

    // ------------------------------------------------------------------
    // Chain execution
    // ------------------------------------------------------------------

    /// Run the chain: invoke the first handler and halt when control
    /// returns. Handlers advance the chain themselves via [`Ctx::next`].
    pub fn run(&mut self) {
        self.next();
    }

    /// Explicit continuation: advance the cursor and invoke the next
    /// handler synchronously on the same call stack, or do nothing if the
    /// chain is exhausted.
    pub fn next(&mut self) {
        if let Some(handler) = self.chain.advance() {
            (*handler)(self);
        }
    }

    /// Current chain state, for instrumentation.
    #[must_use]
    pub fn chain_state(&self) -> Option<ChainState> {
        self.chain.state()
    }

    /// Number of handlers invoked so far for this request.
    #[must_use]
    pub fn chain_position(&self) -> usize {
        self.chain.position()
    }

    // ------------------------------------------------------------------
    // Response surface
    // ------------------------------------------------------------------

    /// Set the response status. Chainable: `c.status(404).send("nope")`.
    pub fn status(&mut self, code: u16) -> &mut Self {
        self.response.set_status(StatusCode::from_u16(code));
        self
    }

    /// Replace the response body with `text`.
    pub fn send(&mut self, text: &str) -> &mut Self {
        self.response.set_body(text.as_bytes().to_vec());
        self
    }

    /// Replace the response body with raw bytes.
    pub fn send_bytes(&mut self, bytes: Vec<u8>) -> &mut Self {
        self.response.set_body(bytes);
        self
    }

    /// Append `text` to the response body.
    pub fn write(&mut self, text: &str) -> &mut Self {
        self.response.append_body(text.as_bytes());
        self
    }

    /// Serialize `value` as the JSON response body and set the content
    /// type.
    pub fn json<T: Serialize>(&mut self, value: &T) -> serde_json::Result<()> {
        let body = serde_json::to_vec(value)?;
        self.response.set_body(body);
        self.response
            .set_header("content-type", "application/json");
        Ok(())
    }

    /// Set a response header.
    pub fn set_header(&mut self, name: &str, value: &str) -> &mut Self {
        self.response.set_header(name, value);
        self
    }

    /// Read access to the response state left by handlers so far.
    #[must_use]
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Mutable access to the response state.
    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    /// Finalize: take the response out of the context and mark the chain
    /// finished.
    pub fn take_response(&mut self) -> Response {
        self.chain.finish();
        std::mem::take(&mut self.response)
    }
}

impl Default for Ctx {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ctx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ctx")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("state", &self.chain.state())
            .finish_non_exhaustive()
    }
}
