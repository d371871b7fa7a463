//! Built-in middleware.
//!
//! Middleware here is nothing special: each function returns an ordinary
//! handler meant for a `use` registration near the front of the chain.

use std::panic::{AssertUnwindSafe, catch_unwind};

use strand_core::Ctx;

/// Recovery middleware: converts a panic anywhere later in the chain
/// into a `500` response instead of letting it unwind through the
/// transport. Register it first so it wraps everything after it.
#[must_use]
pub fn recover() -> impl Fn(&mut Ctx) + Send + Sync + 'static {
    |ctx: &mut Ctx| {
        let outcome = catch_unwind(AssertUnwindSafe(|| ctx.next()));
        if outcome.is_err() {
            tracing::error!(method = %ctx.method(), path = ctx.path(), "handler panicked");
            ctx.response_mut().reset();
            ctx.status(500).send("Internal Server Error");
        }
    }
}

/// Request logging middleware: emits one event per request with the
/// final status after the rest of the chain has run.
#[must_use]
pub fn logger() -> impl Fn(&mut Ctx) + Send + Sync + 'static {
    |ctx: &mut Ctx| {
        let method = ctx.method();
        let path = ctx.path().to_string();
        ctx.next();
        tracing::info!(
            %method,
            path = %path,
            status = ctx.response().status().as_u16(),
            handlers = ctx.chain_position(),
            "request"
        );
    }
}
