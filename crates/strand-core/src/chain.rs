//! Handler chain: the ordered handlers selected for one request, plus the
//! cursor that drives explicit continuation.
//!
//! The chain is an index into an ordered sequence rather than a tower of
//! nested closures: a handler runs, and control moves on only if it invokes
//! the continuation ([`Ctx::next`](crate::Ctx::next)), which advances the
//! cursor and calls the next handler on the same stack. This keeps the
//! state machine explicit and inspectable.

use std::sync::Arc;

use crate::ctx::Ctx;
use crate::params::Params;

/// A request handler.
///
/// Handlers run synchronously on the request's thread of control and may
/// pass control onward with [`Ctx::next`]. A handler that returns without
/// continuing short-circuits the rest of the chain.
pub type Handler = Arc<dyn Fn(&mut Ctx) + Send + Sync>;

/// Wrap a closure as a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(&mut Ctx) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// One matched route's contribution to a request's chain: its handlers and
/// the bindings its pattern produced for this path.
///
/// Links carry their own bindings so a middleware registered at
/// `/:param/*` observes its own `param` and `*` even when a later full
/// route binds different names against the same path.
#[derive(Clone)]
pub struct ChainLink {
    handlers: Arc<Vec<Handler>>,
    params: Params,
}

impl ChainLink {
    /// Create a link from a route's handlers and extracted bindings.
    #[must_use]
    pub fn new(handlers: Arc<Vec<Handler>>, params: Params) -> Self {
        Self { handlers, params }
    }

    /// The bindings this link's pattern extracted.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }
}

impl std::fmt::Debug for ChainLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainLink")
            .field("handlers", &self.handlers.len())
            .field("params", &self.params)
            .finish()
    }
}

/// Execution state of a request's chain.
///
/// `Pending` is set when the context is populated; `Running` while the
/// cursor walks the handlers; `Finished` once the cursor passes the end of
/// the chain or the response is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Pending,
    Running,
    Finished,
}

/// The ordered handler sequence for one request plus its cursor.
#[derive(Debug, Default)]
pub struct HandlerChain {
    links: Vec<ChainLink>,
    link: usize,
    handler: usize,
    invoked: usize,
    state: Option<ChainState>,
}

impl HandlerChain {
    /// An empty, unpopulated chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Populate the chain for a new request and move to `Pending`.
    pub fn load(&mut self, links: Vec<ChainLink>) {
        self.links = links;
        self.link = 0;
        self.handler = 0;
        self.invoked = 0;
        self.state = Some(ChainState::Pending);
    }

    /// Clear everything, returning the chain to its unpopulated state.
    pub fn reset(&mut self) {
        self.links.clear();
        self.link = 0;
        self.handler = 0;
        self.invoked = 0;
        self.state = None;
    }

    /// Current execution state, if the chain has been populated.
    #[must_use]
    pub fn state(&self) -> Option<ChainState> {
        self.state
    }

    /// How many handlers have been invoked so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.invoked
    }

    /// Bindings of the link whose handler is currently executing.
    #[must_use]
    pub fn current_params(&self) -> Option<&Params> {
        self.links.get(self.link).map(ChainLink::params)
    }

    /// Mark the chain finished. Called when the response is finalized.
    pub fn finish(&mut self) {
        if self.state.is_some() {
            self.state = Some(ChainState::Finished);
        }
    }

    /// Advance the cursor and hand back the next handler, or `None` (and
    /// transition to `Finished`) when the chain is exhausted.
    ///
    /// Crossing a link boundary makes that link's bindings current.
    pub fn advance(&mut self) -> Option<Handler> {
        if self.state == Some(ChainState::Finished) {
            return None;
        }
        while self.link < self.links.len() {
            let handlers = &self.links[self.link].handlers;
            if self.handler < handlers.len() {
                let next = Arc::clone(&handlers[self.handler]);
                self.handler += 1;
                self.invoked += 1;
                self.state = Some(ChainState::Running);
                return Some(next);
            }
            self.link += 1;
            self.handler = 0;
        }
        self.finish();
        None
    }
}
