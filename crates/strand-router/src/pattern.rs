//! Route pattern compilation.
//!
//! A pattern string is compiled into an ordered sequence of segments:
//! literals, named parameters (`:name`, optional with a trailing `?`),
//! and a wildcard (`*`). Splitting skips empty segments, so duplicate
//! slashes collapse and a trailing slash is insignificant.

use thiserror::Error;

/// Malformed route pattern, reported at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPatternError {
    /// A wildcard appeared before the final segment of a user-supplied
    /// pattern.
    #[error("wildcard must be the final segment in `{pattern}`")]
    NonTerminalWildcard { pattern: String },
    /// Group composition would produce a pattern with two wildcards.
    #[error("pattern `{pattern}` would contain more than one wildcard")]
    MultipleWildcards { pattern: String },
    /// `:` with no parameter name.
    #[error("empty parameter name in `{pattern}`")]
    EmptyParamName { pattern: String },
    /// A segment starting with `*` that is not exactly `*`.
    #[error("malformed wildcard segment in `{pattern}`")]
    MalformedWildcard { pattern: String },
}

/// One `/`-delimited unit of a compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches one path segment exactly.
    Literal(String),
    /// Consumes one path segment and binds it; an optional parameter may
    /// instead consume none and bind the empty string.
    Param { name: String, optional: bool },
    /// Consumes a run of zero or more path segments as one binding.
    Wildcard,
}

/// A compiled, matchable representation of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Compile a user-supplied pattern string.
    ///
    /// Fails if a wildcard is not the final segment, or if parameter or
    /// wildcard syntax is malformed.
    pub fn compile(path: &str) -> Result<Self, InvalidPatternError> {
        let mut segments = Vec::new();
        for piece in split_segments(path) {
            segments.push(classify(piece, path)?);
        }
        if let Some(position) = segments.iter().position(|s| *s == Segment::Wildcard) {
            if position + 1 != segments.len() {
                return Err(InvalidPatternError::NonTerminalWildcard {
                    pattern: path.to_string(),
                });
            }
        }
        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// Join a group prefix with a sub-pattern.
    ///
    /// Both sides were validated individually by [`Pattern::compile`], so
    /// a join may legally place the prefix's terminal wildcard in an
    /// interior position; the matcher handles that structurally. Joining
    /// two patterns that each carry a wildcard is rejected.
    pub fn join(&self, sub: &Pattern) -> Result<Self, InvalidPatternError> {
        let raw = combine_paths(&self.raw, &sub.raw);
        if self.has_wildcard() && sub.has_wildcard() {
            return Err(InvalidPatternError::MultipleWildcards { pattern: raw });
        }
        let mut segments = self.segments.clone();
        segments.extend(sub.segments.iter().cloned());
        Ok(Self { raw, segments })
    }

    /// The pattern string as registered, before normalization.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The compiled segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the pattern contains a wildcard segment.
    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.segments.contains(&Segment::Wildcard)
    }
}

fn classify(piece: &str, pattern: &str) -> Result<Segment, InvalidPatternError> {
    if let Some(name) = piece.strip_prefix(':') {
        let (name, optional) = match name.strip_suffix('?') {
            Some(stripped) => (stripped, true),
            None => (name, false),
        };
        if name.is_empty() {
            return Err(InvalidPatternError::EmptyParamName {
                pattern: pattern.to_string(),
            });
        }
        return Ok(Segment::Param {
            name: name.to_string(),
            optional,
        });
    }
    if piece.starts_with('*') {
        if piece != "*" {
            return Err(InvalidPatternError::MalformedWildcard {
                pattern: pattern.to_string(),
            });
        }
        return Ok(Segment::Wildcard);
    }
    Ok(Segment::Literal(piece.to_string()))
}

/// Split a path or pattern into its non-empty segments.
///
/// `/` yields nothing; `/a//b/` yields `a`, `b`. Request paths are split
/// with the same rule, so normalization is symmetric.
pub fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|piece| !piece.is_empty())
}

/// Combine two path strings, collapsing duplicate slashes at the seam.
fn combine_paths(prefix: &str, path: &str) -> String {
    match (prefix.is_empty(), path.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => {
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            }
        }
        (false, true) => prefix.to_string(),
        (false, false) => {
            let prefix = prefix.trim_end_matches('/');
            let path = path.trim_start_matches('/');
            if path.is_empty() {
                if prefix.is_empty() {
                    "/".to_string()
                } else {
                    prefix.to_string()
                }
            } else {
                format!("{prefix}/{path}")
            }
        }
    }
}
