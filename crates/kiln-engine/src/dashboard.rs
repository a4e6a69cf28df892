//! Dashboard rendering
//!
//! Renders every unit a principal owns: name plus a face for the unit's
//! work specification and one for its drain specification. Per-unit
//! failures are already contained by the engine, so one broken
//! specification yields one `Failure` row while its siblings render
//! normally.

use crate::engine::InstantiationEngine;
use crate::instance::InstantiationResult;
use kiln_registry::{RegistryError, UnitRegistry};
use kiln_spec::Principal;
use std::sync::Arc;

/// One rendered unit row
#[derive(Debug, Clone)]
pub struct UnitFace {
    /// Unit name
    pub name: String,
    /// Face of the unit's work specification
    pub spec: InstantiationResult,
    /// Face of the unit's drain specification
    pub drain: InstantiationResult,
}

/// Renders a principal's units through the engine
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// Instantiation engine (shared cache)
    engine: InstantiationEngine,
    /// Source of unit names and specifications
    registry: Arc<dyn UnitRegistry>,
}

impl Dashboard {
    /// Create a dashboard over an engine and a registry
    #[inline]
    #[must_use]
    pub fn new(engine: InstantiationEngine, registry: Arc<dyn UnitRegistry>) -> Self {
        Self { engine, registry }
    }

    /// The underlying engine
    #[inline]
    #[must_use]
    pub fn engine(&self) -> &InstantiationEngine {
        &self.engine
    }

    /// Render all units the principal owns, in name order
    ///
    /// A unit whose specification is broken still produces a row (with its
    /// failure message); only failures of the registry itself propagate.
    ///
    /// # Errors
    /// Returns [`RegistryError`] if listing or fetching units fails.
    pub async fn render(&self, principal: &Principal) -> Result<Vec<UnitFace>, RegistryError> {
        let names = self.registry.unit_names(principal).await?;
        tracing::debug!("rendering {} units for {principal}", names.len());

        let mut rows = Vec::with_capacity(names.len());
        for name in names {
            let unit = self.registry.unit(principal, &name).await?;
            let (spec, drain) = tokio::join!(
                self.engine.instantiate(principal, &unit.spec),
                self.engine.instantiate(principal, &unit.drain),
            );
            rows.push(UnitFace { name, spec, drain });
        }
        Ok(rows)
    }
}
