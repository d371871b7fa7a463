//! Core types for the strand web framework.
//!
//! This crate provides the fundamental building blocks:
//! - [`Method`], the closed HTTP verb enumeration
//! - [`Params`], per-request path parameter bindings
//! - [`Handler`], [`ChainLink`], and [`HandlerChain`] — the ordered
//!   handler sequence with an explicit continuation cursor
//! - [`Ctx`], the pooled per-request context
//! - [`Response`] and [`StatusCode`], the response surface
//!
//! # Design Principles
//!
//! - Handlers run synchronously on the request's own thread of control;
//!   the chain executor never suspends
//! - Continuation is explicit: a handler passes control onward by calling
//!   [`Ctx::next`], or short-circuits by returning
//! - Contexts are pooled with a mandatory full reset on acquire
//! - All types are `Send + Sync` friendly

#![forbid(unsafe_code)]

mod chain;
mod ctx;
mod method;
mod params;
mod pool;
mod query;
mod response;

pub use chain::{ChainLink, ChainState, Handler, HandlerChain, handler};
pub use ctx::Ctx;
pub use method::Method;
pub use params::{Params, WILDCARD_NAME};
pub use pool::CtxPool;
pub use query::{QueryString, percent_decode};
pub use response::{Response, StatusCode};
