//! Route table: registration-ordered storage of compiled routes.

use std::sync::Arc;

use strand_core::{Handler, Method};

use crate::pattern::Pattern;

/// What a route entry responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// One specific method, exact structural match.
    Verb(Method),
    /// Any method, exact structural match.
    All,
    /// Any method, prefix match. The middleware form.
    Use,
}

/// A registered route: kind, compiled pattern, and its ordered handlers.
///
/// Routes are immutable once registered and owned exclusively by the
/// table that created them. `seq` is the global registration sequence
/// number; it defines match precedence across the per-method lists and
/// the shared list.
pub struct Route {
    pub kind: RouteKind,
    pub seq: u64,
    pub pattern: Pattern,
    pub is_group: bool,
    pub(crate) handlers: Arc<Vec<Handler>>,
}

impl Route {
    /// Whether this entry matches by prefix rather than requiring full
    /// structural consumption of the path.
    #[must_use]
    pub fn prefix_matching(&self) -> bool {
        matches!(self.kind, RouteKind::Use) || self.is_group
    }

    /// Number of handlers this route contributes to a chain.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("kind", &self.kind)
            .field("seq", &self.seq)
            .field("pattern", &self.pattern.raw())
            .field("handlers", &self.handlers.len())
            .field("is_group", &self.is_group)
            .finish()
    }
}

/// Per-method ordered route lists plus a shared ordered list for
/// `Use`/`All` entries.
///
/// Registration order is preserved and defines precedence; entries are
/// never reordered or deduplicated. The table is built during
/// application setup and treated as effectively immutable while serving
/// (the owner synchronizes registration externally).
#[derive(Debug, Default)]
pub struct RouteTable {
    verbs: [Vec<Arc<Route>>; Method::COUNT],
    shared: Vec<Arc<Route>>,
    next_seq: u64,
}

impl RouteTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            verbs: std::array::from_fn(|_| Vec::new()),
            shared: Vec::new(),
            next_seq: 0,
        }
    }

    /// Append a route. Never reorders; first structurally matching route
    /// wins at dispatch time.
    pub fn push(
        &mut self,
        kind: RouteKind,
        pattern: Pattern,
        handlers: Vec<Handler>,
        is_group: bool,
    ) {
        let route = Arc::new(Route {
            kind,
            seq: self.next_seq,
            pattern,
            is_group,
            handlers: Arc::new(handlers),
        });
        self.next_seq += 1;
        match kind {
            RouteKind::Verb(method) => self.verbs[method.index()].push(route),
            RouteKind::All | RouteKind::Use => self.shared.push(route),
        }
    }

    /// Candidate routes for a request method, merged from the method's
    /// list and the shared list back into registration order.
    #[must_use]
    pub fn candidates(&self, method: Method) -> Vec<&Arc<Route>> {
        let verbs = &self.verbs[method.index()];
        let shared = &self.shared;
        let mut merged = Vec::with_capacity(verbs.len() + shared.len());
        let (mut v, mut s) = (0, 0);
        while v < verbs.len() && s < shared.len() {
            if verbs[v].seq < shared[s].seq {
                merged.push(&verbs[v]);
                v += 1;
            } else {
                merged.push(&shared[s]);
                s += 1;
            }
        }
        merged.extend(verbs[v..].iter());
        merged.extend(shared[s..].iter());
        merged
    }

    /// Total number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.len() + self.verbs.iter().map(Vec::len).sum::<usize>()
    }

    /// Returns true if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn handlers_of(route: &Route) -> Arc<Vec<Handler>> {
        Arc::clone(&route.handlers)
    }
}
