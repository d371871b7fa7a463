//! Route matching.
//!
//! Given a request method and path, the matcher walks the table's
//! candidates in registration order and collects every structurally
//! matching entry into an ordered list of chain links, each carrying the
//! bindings its own pattern produced. `Use` entries match by prefix; verb
//! and `All` entries require full structural consumption. No match at all
//! is a first-class outcome (`None`), which the transport layer turns
//! into a not-found response.

use strand_core::{ChainLink, Method, Params, WILDCARD_NAME};

use crate::pattern::{Pattern, Segment};
use crate::route::RouteTable;

/// How much of the path a pattern must account for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Every path segment must be consumed.
    Full,
    /// The pattern must be consumed; trailing path segments may remain.
    Prefix,
}

/// Matching configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions {
    /// Compare literal segments case-insensitively. Matching is
    /// case-sensitive unless this is set.
    pub case_insensitive: bool,
}

/// The ordered chain selected for a request.
#[derive(Debug)]
pub struct RouteMatch {
    links: Vec<ChainLink>,
}

impl RouteMatch {
    /// Chain links in registration order, ready to install on a context.
    #[must_use]
    pub fn into_links(self) -> Vec<ChainLink> {
        self.links
    }

    /// Bindings of the final matched entry, typically the full route.
    #[must_use]
    pub fn params(&self) -> Option<&Params> {
        self.links.last().map(ChainLink::params)
    }

    /// Number of matched entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Never true: a `RouteMatch` holds at least one link.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Match a request against the table.
///
/// Returns `None` when no entry matches; a path that would match under a
/// different method is still `None` (there is no separate
/// method-not-allowed outcome).
#[must_use]
pub fn match_route(
    table: &RouteTable,
    method: Method,
    path: &str,
    opts: MatchOptions,
) -> Option<RouteMatch> {
    let segments: Vec<&str> = crate::pattern::split_segments(path).collect();
    let mut links = Vec::new();
    for route in table.candidates(method) {
        let kind = if route.prefix_matching() {
            MatchKind::Prefix
        } else {
            MatchKind::Full
        };
        if let Some(params) = match_pattern(&route.pattern, &segments, kind, opts) {
            links.push(ChainLink::new(RouteTable::handlers_of(route), params));
        }
    }
    if links.is_empty() {
        None
    } else {
        Some(RouteMatch { links })
    }
}

/// Match one compiled pattern against pre-split path segments.
#[must_use]
pub fn match_pattern(
    pattern: &Pattern,
    path: &[&str],
    kind: MatchKind,
    opts: MatchOptions,
) -> Option<Params> {
    let mut params = Params::new();
    if walk(pattern.segments(), path, kind, opts, &mut params) {
        Some(params)
    } else {
        None
    }
}

fn walk(
    segments: &[Segment],
    path: &[&str],
    kind: MatchKind,
    opts: MatchOptions,
    params: &mut Params,
) -> bool {
    let Some((segment, rest)) = segments.split_first() else {
        return match kind {
            MatchKind::Full => path.is_empty(),
            MatchKind::Prefix => true,
        };
    };

    match segment {
        Segment::Literal(literal) => match path.split_first() {
            Some((head, tail)) if segment_eq(literal, head, opts) => {
                walk(rest, tail, kind, opts, params)
            }
            _ => false,
        },
        Segment::Param { name, optional } => {
            if let Some((head, tail)) = path.split_first() {
                let mark = params.len();
                params.push(name.clone(), *head);
                if walk(rest, tail, kind, opts, params) {
                    return true;
                }
                params.truncate(mark);
            }
            if *optional {
                // Zero segments consumed: the parameter still binds, as
                // the empty string, so handlers need no existence check.
                let mark = params.len();
                params.push(name.clone(), "");
                if walk(rest, path, kind, opts, params) {
                    return true;
                }
                params.truncate(mark);
            }
            false
        }
        Segment::Wildcard => {
            if rest.is_empty() {
                params.push(WILDCARD_NAME, path.join("/"));
                return true;
            }
            // Interior wildcard (group composition): consume the longest
            // run of segments that still lets the tail match.
            for taken in (0..=path.len()).rev() {
                let mark = params.len();
                params.push(WILDCARD_NAME, path[..taken].join("/"));
                if walk(rest, &path[taken..], kind, opts, params) {
                    return true;
                }
                params.truncate(mark);
            }
            false
        }
    }
}

fn segment_eq(pattern: &str, path: &str, opts: MatchOptions) -> bool {
    if opts.case_insensitive {
        pattern.eq_ignore_ascii_case(path)
    } else {
        pattern == path
    }
}
