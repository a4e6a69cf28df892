//! Resolved instances and the per-request result contract

use std::fmt;
use std::sync::Arc;

/// A live object produced by a resolver
///
/// Object-safe view over whatever the resolver constructed. The engine needs
/// exactly two capabilities from an instance: a canonical text
/// representation (its [`fmt::Display`]) and the runtime type path. A
/// blanket impl covers every displayable type, so resolvers return plain
/// domain objects.
pub trait Instance: fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Fully-qualified runtime type path of the concrete object
    fn type_name(&self) -> &'static str;
}

impl<T> Instance for T
where
    T: fmt::Debug + fmt::Display + Send + Sync + 'static,
{
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// Outcome of one instantiation request
///
/// Produced fresh on every request; only the underlying success object may
/// come from the cache. Failures carry the fault's human-readable
/// description, which may be empty when the fault carries none.
#[derive(Debug, Clone)]
pub enum InstantiationResult {
    /// The resolver produced (or the cache already held) an object
    Success {
        /// Shared read-only view of the instantiated object
        object: Arc<dyn Instance>,
        /// Markup-safe textual face with inline code spans restored
        face: String,
        /// Fully-qualified runtime type path of the object
        type_name: String,
    },
    /// Construction failed; the unit renders its failure inline
    Failure {
        /// Human-readable description of the failure
        message: String,
    },
}

impl InstantiationResult {
    /// Whether this is a success
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The textual face, if successful
    #[inline]
    #[must_use]
    pub fn face(&self) -> Option<&str> {
        match self {
            Self::Success { face, .. } => Some(face),
            Self::Failure { .. } => None,
        }
    }

    /// The runtime type path, if successful
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Success { type_name, .. } => Some(type_name),
            Self::Failure { .. } => None,
        }
    }

    /// The failure message, if failed
    #[inline]
    #[must_use]
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message } => Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Probe;

    impl fmt::Display for Probe {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("probe")
        }
    }

    #[test]
    fn blanket_instance_reports_qualified_type_path() {
        let instance: Arc<dyn Instance> = Arc::new(Probe);
        assert_eq!(instance.to_string(), "probe");
        assert!(instance.type_name().ends_with("::Probe"));
    }

    #[test]
    fn result_accessors() {
        let success = InstantiationResult::Success {
            object: Arc::new(Probe),
            face: "probe".to_string(),
            type_name: "tests::Probe".to_string(),
        };
        assert!(success.is_success());
        assert_eq!(success.face(), Some("probe"));
        assert_eq!(success.type_name(), Some("tests::Probe"));
        assert_eq!(success.failure_message(), None);

        let failure = InstantiationResult::Failure {
            message: "boom".to_string(),
        };
        assert!(!failure.is_success());
        assert_eq!(failure.face(), None);
        assert_eq!(failure.failure_message(), Some("boom"));
    }
}
