//! Route compilation and matching for the strand web framework.
//!
//! This crate turns `/`-delimited path templates into compiled patterns,
//! stores them in registration order, and selects the ordered handler
//! chain for an inbound request.
//!
//! # Features
//!
//! - Pattern compilation: literals, `:name`, `:name?`, terminal `*`
//! - Structural joining of group prefixes with sub-patterns
//! - Registration-order precedence, per-method lists plus a shared
//!   middleware list
//! - Prefix matching for `use` entries, full structural matching for
//!   routes

#![warn(unsafe_code)]

mod matcher;
mod pattern;
mod route;

pub use matcher::{MatchKind, MatchOptions, RouteMatch, match_pattern, match_route};
pub use pattern::{InvalidPatternError, Pattern, Segment, split_segments};
pub use route::{Route, RouteKind, RouteTable};
