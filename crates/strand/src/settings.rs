//! Application settings.

/// Tunables fixed at application construction.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Compare literal path segments case-insensitively. Matching is
    /// case-sensitive when unset.
    pub case_insensitive: bool,
    /// Suppress the log line emitted when the server starts listening.
    pub disable_startup_message: bool,
    /// Reuse contexts across requests. Disabling allocates a fresh
    /// context per request; observable behavior is identical.
    pub context_pooling: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            disable_startup_message: false,
            context_pooling: true,
        }
    }
}
