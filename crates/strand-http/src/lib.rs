//! Minimal blocking HTTP/1.1 transport for the strand web framework.
//!
//! This crate is the transport collaborator the routing core calls into:
//! it accepts connections, parses request heads, serializes responses,
//! and coordinates graceful shutdown. It deliberately stays small — the
//! engine it serves is the router, not the wire.
//!
//! # Features
//!
//! - Request-head parsing from byte buffers
//! - Response building with always-correct `content-length`
//! - Thread-per-connection serve loop with scope-based draining
//! - Graceful shutdown controller (idempotent, concurrent-safe)
//! - Static file serving keyed by wildcard-captured suffixes
//! - Entity-tag helper over response bodies

#![deny(unsafe_code)]

pub mod etag;
pub mod fs;
mod parser;
mod server;
mod shutdown;
mod writer;

pub use fs::{StaticFiles, mime_type_for_extension};
pub use parser::{HEAD_TERMINATOR, ParseError, RequestHead, parse_head, split_target};
pub use server::{HttpService, Server};
pub use shutdown::{Phase, ShutdownController};
pub use writer::ResponseWriter;
