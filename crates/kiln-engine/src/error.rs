//! Error types for the instantiation engine
//!
//! Everything user- or specification-driven is a [`ResolveError`] and is
//! contained at the engine boundary; it never propagates past
//! `InstantiationEngine::instantiate`. Only defects in the engine's own task
//! bookkeeping are allowed to panic.

/// Failures surfaced by a resolver invocation
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    /// The specification is malformed or references an unresolvable construct
    #[error("invalid specification: {0}")]
    Specification(String),

    /// A runtime fault during construction, including captured panics
    ///
    /// The description may be empty when the underlying fault carries none.
    #[error("{0}")]
    Fault(String),

    /// The build exceeded its allotted time
    #[error("instantiation timed out after {elapsed_secs}s")]
    Timeout {
        /// Configured limit that was exhausted
        elapsed_secs: u64,
    },
}

impl ResolveError {
    /// Whether a retry could plausibly succeed without changing the spec
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fault(_) | Self::Timeout { .. })
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable held an unparseable value
    #[error("invalid value for {var}: '{value}'")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },
}
