//! Express-inspired web framework with explicit handler-chain
//! continuation.
//!
//! strand maps an incoming request's method and path to an ordered chain
//! of handlers, extracts path parameters, supports route grouping with
//! prefix inheritance, static-file fallback, and a controlled process
//! lifecycle (bind, serve, graceful shutdown).
//!
//! # Quick Start
//!
//! ```ignore
//! use strand::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = App::new();
//!
//!     app.use_(middleware::logger());
//!     app.get("/hello/:name?", |c: &mut Ctx| {
//!         let name = c.params("name").filter(|n| !n.is_empty()).unwrap_or("world");
//!         let greeting = format!("hello, {name}");
//!         c.send(&greeting);
//!     })?;
//!
//!     app.listen("127.0.0.1:3000")?;
//!     Ok(())
//! }
//! ```
//!
//! # Design Philosophy
//!
//! 1. **Registration order is precedence** — routes are never reordered
//!    or deduplicated; the first structural match wins
//! 2. **Continuation is explicit** — a handler calls [`Ctx::next`] to
//!    pass control, or returns to short-circuit
//! 3. **Synchronous chains** — each request runs its handlers on its own
//!    thread of control; the executor never suspends
//! 4. **Build, then serve** — the route table is immutable while serving
//!
//! # Crate Structure
//!
//! - [`strand_core`] — context, handler chain, pool, response types
//! - [`strand_router`] — pattern compiler, route table, matcher
//! - [`strand_http`] — blocking HTTP/1.1 transport and lifecycle

#![forbid(unsafe_code)]

mod app;
mod group;
pub mod middleware;
mod settings;
mod static_files;

// Re-export crates
pub use strand_core as core;
pub use strand_http as http;
pub use strand_router as router;

pub use app::App;
pub use group::Group;
pub use settings::Settings;

// Re-export commonly used types
pub use strand_core::{
    ChainLink, ChainState, Ctx, CtxPool, Handler, HandlerChain, Method, Params, QueryString,
    Response, StatusCode, WILDCARD_NAME, handler,
};
pub use strand_http::{
    HttpService, ParseError, Phase, RequestHead, Server, ShutdownController, StaticFiles, etag,
};
pub use strand_router::{
    InvalidPatternError, MatchOptions, Pattern, RouteKind, RouteTable, Segment, match_route,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        App, ChainState, Ctx, Group, Handler, InvalidPatternError, Method, Params, Response,
        Settings, StatusCode, handler, middleware,
    };
    pub use serde::{Deserialize, Serialize};
}
