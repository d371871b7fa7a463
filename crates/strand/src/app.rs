//! The application: registration surface, dispatch entry point, and
//! process lifecycle.
//!
//! # Example
//!
//! ```ignore
//! use strand::prelude::*;
//!
//! let app = App::new();
//! app.get("/greet/:name", |c: &mut Ctx| {
//!     let name = c.params("name").unwrap_or("world").to_string();
//!     c.send(&format!("hello {name}"));
//! })?;
//! app.listen("127.0.0.1:3000")?;
//! ```

use std::net::{TcpListener, ToSocketAddrs};

use parking_lot::RwLock;

use strand_core::{Ctx, CtxPool, Handler, Method, Response, StatusCode, handler};
use strand_http::{HttpService, RequestHead, Server, ShutdownController, split_target};
use strand_router::{
    InvalidPatternError, MatchOptions, Pattern, RouteKind, RouteTable, match_route,
};

use crate::group::Group;
use crate::settings::Settings;
use crate::static_files;

/// An application: a route table, its settings, a context pool, and the
/// lifecycle handle.
///
/// All registration methods take `&self`; the table is built during
/// setup and only read while serving. Every [`Group`] created from this
/// app writes through to the same table.
pub struct App {
    table: RwLock<RouteTable>,
    settings: Settings,
    pool: CtxPool,
    shutdown: ShutdownController,
}

impl App {
    /// Create an application with default [`Settings`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Create an application with explicit settings.
    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        let pool = CtxPool::new(settings.context_pooling);
        Self {
            table: RwLock::new(RouteTable::new()),
            settings,
            pool,
            shutdown: ShutdownController::new(),
        }
    }

    /// The settings this application was built with.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a route: the parameterized operation every verb-specific
    /// entry point wraps. Handlers run in the given order under explicit
    /// continuation.
    pub fn register(
        &self,
        kind: RouteKind,
        path: &str,
        handlers: Vec<Handler>,
    ) -> Result<(), InvalidPatternError> {
        let pattern = Pattern::compile(path)?;
        self.push(kind, pattern, handlers, false);
        Ok(())
    }

    pub(crate) fn push(
        &self,
        kind: RouteKind,
        pattern: Pattern,
        handlers: Vec<Handler>,
        is_group: bool,
    ) {
        self.table.write().push(kind, pattern, handlers, is_group);
    }

    /// Register a CONNECT route.
    pub fn connect<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Connect), path, vec![handler(f)])
    }

    /// Register a DELETE route.
    pub fn delete<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Delete), path, vec![handler(f)])
    }

    /// Register a GET route.
    pub fn get<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Get), path, vec![handler(f)])
    }

    /// Register a HEAD route.
    pub fn head<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Head), path, vec![handler(f)])
    }

    /// Register an OPTIONS route.
    pub fn options<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Options), path, vec![handler(f)])
    }

    /// Register a PATCH route.
    pub fn patch<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Patch), path, vec![handler(f)])
    }

    /// Register a POST route.
    pub fn post<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Post), path, vec![handler(f)])
    }

    /// Register a PUT route.
    pub fn put<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Put), path, vec![handler(f)])
    }

    /// Register a TRACE route.
    pub fn trace<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Trace), path, vec![handler(f)])
    }

    /// Register a route for every method.
    pub fn all<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::All, path, vec![handler(f)])
    }

    /// Register middleware at the root: matches every request, any
    /// method.
    pub fn use_<F>(&self, f: F)
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        // The root pattern is trivially valid.
        let pattern = Pattern::compile("/").unwrap_or_else(|_| unreachable!());
        self.push(RouteKind::Use, pattern, vec![handler(f)], false);
    }

    /// Register middleware under a path prefix: matches any method, any
    /// path beginning with the prefix.
    pub fn use_at<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Use, path, vec![handler(f)])
    }

    /// Create a registration view that prefixes everything registered
    /// through it. Groups nest; a parameter or wildcard in the prefix is
    /// visible to every route beneath it.
    pub fn group(&self, prefix: &str) -> Result<Group<'_>, InvalidPatternError> {
        Ok(Group::new(self, Pattern::compile(prefix)?))
    }

    /// Register a static-file entry: an ordinary wildcard middleware
    /// route that serves bytes from `target` (a file or directory) and
    /// passes to the next route when nothing servable exists.
    pub fn static_route(
        &self,
        prefix: &str,
        target: impl Into<std::path::PathBuf>,
    ) -> Result<(), InvalidPatternError> {
        let pattern = static_files::static_pattern(Pattern::compile(prefix)?)?;
        self.push(
            RouteKind::Use,
            pattern,
            vec![static_files::static_handler(target.into())],
            false,
        );
        Ok(())
    }

    /// Number of registered routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.table.read().len()
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Dispatch entry point for transports speaking in strings. An
    /// unknown method or unmatched path resolves to a not-found
    /// response; nothing escapes this boundary as a panic or error.
    #[must_use]
    pub fn handle(&self, method: &str, target: &str) -> Response {
        match Method::parse(method) {
            Some(method) => self.test(method, target),
            None => not_found(),
        }
    }

    /// In-process dispatch, used by tests and by the transport. `target`
    /// may carry a query string.
    #[must_use]
    pub fn test(&self, method: Method, target: &str) -> Response {
        let (path, query) = split_target(target);
        self.dispatch(method, path, query)
    }

    fn dispatch(&self, method: Method, path: &str, query: Option<&str>) -> Response {
        let opts = MatchOptions {
            case_insensitive: self.settings.case_insensitive,
        };
        let matched = {
            let table = self.table.read();
            match_route(&table, method, path, opts)
        };
        let Some(matched) = matched else {
            return not_found();
        };

        let mut ctx = self.pool.acquire();
        ctx.prepare(method, path, query);
        ctx.load_chain(matched.into_links());
        ctx.run();
        let mut response = ctx.take_response();
        self.pool.release(ctx);

        response.ensure_content_length();
        response
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Bind `addr` and serve until [`App::shutdown`] is called. Blocks;
    /// bind and listener errors are returned, never hidden.
    pub fn listen<A: ToSocketAddrs>(&self, addr: A) -> std::io::Result<()> {
        let listener = TcpListener::bind(addr)?;
        self.serve(listener)
    }

    /// Serve on an existing listener until [`App::shutdown`] is called.
    /// Blocks until the transport has drained.
    pub fn serve(&self, listener: TcpListener) -> std::io::Result<()> {
        let server = Server::new(listener, self.shutdown.clone());
        if !self.settings.disable_startup_message {
            if let Ok(addr) = server.local_addr() {
                tracing::info!(%addr, routes = self.route_count(), "strand listening");
            }
        }
        server.serve(self)
    }

    /// Stop accepting, let in-flight requests finish, and return once
    /// the active `listen`/`serve` call has drained. Safe to call from
    /// any thread, repeatedly, and when nothing is serving.
    pub fn shutdown(&self) {
        self.shutdown.shutdown();
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpService for App {
    fn call(&self, head: RequestHead) -> Response {
        self.dispatch(head.method, &head.path, head.query.as_deref())
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("routes", &self.route_count())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

fn not_found() -> Response {
    let mut response = Response::new();
    response.set_status(StatusCode::NOT_FOUND);
    response.set_body(b"Not Found".to_vec());
    response.ensure_content_length();
    response
}
