//! Static-file route registration.
//!
//! The routing core contributes only the entry: a wildcard middleware
//! pattern whose handler delegates byte serving to
//! [`strand_http::StaticFiles`], keyed by the wildcard-captured suffix.
//! On a miss the handler passes control to the next route, so a later
//! fallback entry can still answer.

use std::path::PathBuf;

use strand_core::{Handler, WILDCARD_NAME, handler};
use strand_http::StaticFiles;
use strand_router::{InvalidPatternError, Pattern};

/// Append a terminal wildcard to `base` unless it already carries one.
pub(crate) fn static_pattern(base: Pattern) -> Result<Pattern, InvalidPatternError> {
    if base.has_wildcard() {
        return Ok(base);
    }
    base.join(&Pattern::compile("*")?)
}

/// Build the handler that bridges a matched wildcard to the file-system
/// collaborator.
pub(crate) fn static_handler(target: PathBuf) -> Handler {
    let files = StaticFiles::new(target);
    handler(move |ctx| {
        let suffix = ctx.params(WILDCARD_NAME).unwrap_or("").to_string();
        match files.serve(&suffix) {
            Some((bytes, mime)) => {
                ctx.set_header("content-type", mime);
                ctx.send_bytes(bytes);
            }
            None => ctx.next(),
        }
    })
}
