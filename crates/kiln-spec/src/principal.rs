//! Owner identity

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// The owner a specification is resolved for
///
/// Wraps the owner's identity URN (e.g. `urn:github:526301`). Immutable,
/// compared by value, and part of every cache key: the same specification
/// resolved for two different principals is two different cache entries,
/// since the resolver may be permitted to construct different things for
/// each of them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    /// Create a principal from an identity URN
    #[inline]
    pub fn new(urn: impl Into<String>) -> Self {
        Self(urn.into())
    }

    /// The identity URN
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    #[inline]
    fn from(urn: &str) -> Self {
        Self::new(urn)
    }
}

impl From<String> for Principal {
    #[inline]
    fn from(urn: String) -> Self {
        Self(urn)
    }
}
