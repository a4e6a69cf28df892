//! Unit type and registry trait

use crate::error::RegistryError;
use async_trait::async_trait;
use kiln_spec::{Principal, SpecValue};
use serde::{Deserialize, Serialize};

/// A named unit's specifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// What the unit does
    pub spec: SpecValue,
    /// Where the unit's output goes
    pub drain: SpecValue,
}

impl Unit {
    /// Create a unit from its two specifications
    #[inline]
    #[must_use]
    pub const fn new(spec: SpecValue, drain: SpecValue) -> Self {
        Self { spec, drain }
    }
}

/// Registry of units per owner
///
/// External collaborator seam: the engine only ever enumerates names and
/// fetches specifications through this trait. Implementations must be safe
/// to share across concurrent render requests.
#[async_trait]
pub trait UnitRegistry: std::fmt::Debug + Send + Sync {
    /// Names of all units the principal owns, sorted ascending
    ///
    /// # Errors
    /// Returns [`RegistryError::Backend`] if the underlying store fails.
    async fn unit_names(&self, principal: &Principal) -> Result<Vec<String>, RegistryError>;

    /// Look up one unit by name
    ///
    /// # Errors
    /// - [`RegistryError::UnitNotFound`] if the principal owns no such unit
    /// - [`RegistryError::Backend`] if the underlying store fails
    async fn unit(&self, principal: &Principal, name: &str) -> Result<Unit, RegistryError>;
}
