//! Context pool.
//!
//! Contexts are reused across requests to avoid per-request allocation.
//! This is pure object reuse, not a cache: slots carry no identity, and a
//! checked-out context is owned exclusively by one request. The pool
//! resets every context on acquire, so a request that unwound mid-chain
//! (and whose context was therefore dropped instead of released) can
//! never corrupt a later request. Pooling is a performance knob,
//! orthogonal to correctness: behavior with pooling disabled is
//! identical.

use parking_lot::Mutex;

use crate::ctx::Ctx;

/// Upper bound on retained idle contexts.
const MAX_POOLED: usize = 512;

/// A pool of reusable [`Ctx`] objects with an acquire/release contract.
pub struct CtxPool {
    slots: Mutex<Vec<Box<Ctx>>>,
    enabled: bool,
}

impl CtxPool {
    /// Create a pool. With `enabled = false`, `acquire` always allocates
    /// and `release` always drops.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            slots: Mutex::new(Vec::new()),
            enabled,
        }
    }

    /// Check out a context. The context is fully reset before it is
    /// handed out, whether it came from the pool or a fresh allocation.
    #[must_use]
    pub fn acquire(&self) -> Box<Ctx> {
        let recycled = if self.enabled {
            self.slots.lock().pop()
        } else {
            None
        };
        let mut ctx = recycled.unwrap_or_else(|| Box::new(Ctx::new()));
        ctx.reset();
        ctx
    }

    /// Return a context for reuse. Excess contexts beyond the retention
    /// bound are dropped.
    pub fn release(&self, ctx: Box<Ctx>) {
        if !self.enabled {
            return;
        }
        let mut slots = self.slots.lock();
        if slots.len() < MAX_POOLED {
            slots.push(ctx);
        }
    }

    /// Number of idle contexts currently retained.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.slots.lock().len()
    }
}
