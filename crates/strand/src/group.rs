//! Route groups: prefix-scoped registration views.
//!
//! A group never owns routes. It holds a compiled prefix and a reference
//! to the owning application, joins the prefix onto every pattern
//! registered through it, and forwards to the shared route table. A
//! parameter or wildcard in the prefix becomes part of each joined
//! pattern, so the matcher resolves it like any other segment — there is
//! no special-cased "inherited parameter".

use strand_core::{Ctx, Handler, Method, handler};
use strand_router::{InvalidPatternError, Pattern, RouteKind};

use crate::app::App;
use crate::static_files;

/// A prefix-scoped view over an application's route table.
pub struct Group<'a> {
    app: &'a App,
    prefix: Pattern,
}

impl<'a> Group<'a> {
    pub(crate) fn new(app: &'a App, prefix: Pattern) -> Self {
        Self { app, prefix }
    }

    /// The compiled prefix this group applies.
    #[must_use]
    pub fn prefix(&self) -> &Pattern {
        &self.prefix
    }

    /// Create a nested group; prefixes concatenate.
    pub fn group(&self, prefix: &str) -> Result<Group<'a>, InvalidPatternError> {
        let joined = self.prefix.join(&Pattern::compile(prefix)?)?;
        Ok(Group::new(self.app, joined))
    }

    /// Register a route beneath the prefix; the group counterpart of
    /// [`App::register`].
    pub fn register(
        &self,
        kind: RouteKind,
        path: &str,
        handlers: Vec<Handler>,
    ) -> Result<(), InvalidPatternError> {
        let pattern = self.prefix.join(&Pattern::compile(path)?)?;
        let is_group = matches!(kind, RouteKind::Use);
        self.app.push(kind, pattern, handlers, is_group);
        Ok(())
    }

    /// Register a CONNECT route beneath the prefix.
    pub fn connect<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Connect), path, vec![handler(f)])
    }

    /// Register a DELETE route beneath the prefix.
    pub fn delete<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Delete), path, vec![handler(f)])
    }

    /// Register a GET route beneath the prefix.
    pub fn get<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Get), path, vec![handler(f)])
    }

    /// Register a HEAD route beneath the prefix.
    pub fn head<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Head), path, vec![handler(f)])
    }

    /// Register an OPTIONS route beneath the prefix.
    pub fn options<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Options), path, vec![handler(f)])
    }

    /// Register a PATCH route beneath the prefix.
    pub fn patch<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Patch), path, vec![handler(f)])
    }

    /// Register a POST route beneath the prefix.
    pub fn post<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Post), path, vec![handler(f)])
    }

    /// Register a PUT route beneath the prefix.
    pub fn put<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Put), path, vec![handler(f)])
    }

    /// Register a TRACE route beneath the prefix.
    pub fn trace<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Verb(Method::Trace), path, vec![handler(f)])
    }

    /// Register a route for every method beneath the prefix.
    pub fn all<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::All, path, vec![handler(f)])
    }

    /// Register middleware at the group's own prefix.
    pub fn use_<F>(&self, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.use_at("/", f)
    }

    /// Register middleware beneath the prefix.
    pub fn use_at<F>(&self, path: &str, f: F) -> Result<(), InvalidPatternError>
    where
        F: Fn(&mut Ctx) + Send + Sync + 'static,
    {
        self.register(RouteKind::Use, path, vec![handler(f)])
    }

    /// Register a static-file entry beneath the prefix.
    pub fn static_route(
        &self,
        path: &str,
        target: impl Into<std::path::PathBuf>,
    ) -> Result<(), InvalidPatternError> {
        let joined = self.prefix.join(&Pattern::compile(path)?)?;
        let pattern = static_files::static_pattern(joined)?;
        self.app.push(
            RouteKind::Use,
            pattern,
            vec![static_files::static_handler(target.into())],
            true,
        );
        Ok(())
    }
}

impl std::fmt::Debug for Group<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("prefix", &self.prefix.raw())
            .finish_non_exhaustive()
    }
}
