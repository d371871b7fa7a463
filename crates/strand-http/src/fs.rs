//! File-system collaborator for static serving.
//!
//! The routing core registers an ordinary wildcard middleware entry and
//! delegates byte serving here, keyed by the wildcard-captured suffix. A
//! root may be a single file (served for every matching path) or a
//! directory (the suffix selects a file beneath it).

use std::path::{Component, Path, PathBuf};

/// A static-serving root.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    /// Create a collaborator rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve `suffix` and read the target file.
    ///
    /// Returns the bytes and a content type, or `None` when nothing
    /// servable exists — the caller passes control to the next route in
    /// that case. Suffixes that try to escape the root (`..`) resolve to
    /// `None`.
    #[must_use]
    pub fn serve(&self, suffix: &str) -> Option<(Vec<u8>, &'static str)> {
        let target = if self.root.is_file() {
            self.root.clone()
        } else {
            let relative = sanitize(suffix)?;
            let mut target = self.root.join(relative);
            if target.is_dir() {
                target = target.join("index.html");
            }
            target
        };

        let bytes = std::fs::read(&target).ok()?;
        Some((bytes, mime_type_for_path(&target)))
    }
}

/// Reject path traversal; keep only plain name components.
fn sanitize(suffix: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(suffix.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(clean)
}

/// Content type by file extension. Unknown extensions fall back to
/// `application/octet-stream`.
#[must_use]
pub fn mime_type_for_extension(ext: &str) -> &'static str {
    match ext {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "text/javascript",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "yml" | "yaml" => "application/yaml",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "ico" => "image/x-icon",
        "wasm" => "application/wasm",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

fn mime_type_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or("application/octet-stream", mime_type_for_extension)
}
