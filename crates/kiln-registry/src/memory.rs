//! In-memory registry

use crate::error::RegistryError;
use crate::unit::{Unit, UnitRegistry};
use async_trait::async_trait;
use dashmap::DashMap;
use kiln_spec::Principal;
use std::collections::BTreeMap;

/// DashMap-backed registry
///
/// Units are held per principal in an ordered map, so name enumeration comes
/// out sorted without an extra pass. Suitable for tests and for embedding
/// where persistence is someone else's job.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    units: DashMap<Principal, BTreeMap<String, Unit>>,
}

impl InMemoryRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a unit, returning the previous value if any
    pub fn insert(&self, principal: Principal, name: impl Into<String>, unit: Unit) -> Option<Unit> {
        self.units
            .entry(principal)
            .or_default()
            .insert(name.into(), unit)
    }

    /// Remove a unit, returning it if it existed
    pub fn remove(&self, principal: &Principal, name: &str) -> Option<Unit> {
        self.units
            .get_mut(principal)
            .and_then(|mut owned| owned.remove(name))
    }

    /// Number of units the principal owns
    #[must_use]
    pub fn unit_count(&self, principal: &Principal) -> usize {
        self.units.get(principal).map_or(0, |owned| owned.len())
    }
}

#[async_trait]
impl UnitRegistry for InMemoryRegistry {
    async fn unit_names(&self, principal: &Principal) -> Result<Vec<String>, RegistryError> {
        Ok(self
            .units
            .get(principal)
            .map(|owned| owned.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn unit(&self, principal: &Principal, name: &str) -> Result<Unit, RegistryError> {
        self.units
            .get(principal)
            .and_then(|owned| owned.get(name).cloned())
            .ok_or_else(|| RegistryError::UnitNotFound {
                principal: principal.clone(),
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_spec::SpecValue;

    fn sample_unit(tag: &str) -> Unit {
        Unit::new(
            SpecValue::composite("com.kiln.Work", vec![SpecValue::text(tag)]),
            SpecValue::composite("com.kiln.drain.Log", vec![SpecValue::text(tag)]),
        )
    }

    #[tokio::test]
    async fn names_come_out_sorted() {
        let registry = InMemoryRegistry::new();
        let owner = Principal::new("urn:github:1");

        registry.insert(owner.clone(), "zulu", sample_unit("z"));
        registry.insert(owner.clone(), "alpha", sample_unit("a"));
        registry.insert(owner.clone(), "mike", sample_unit("m"));

        let names = registry.unit_names(&owner).await.unwrap();
        assert_eq!(names, vec!["alpha", "mike", "zulu"]);
    }

    #[tokio::test]
    async fn lookup_returns_the_stored_unit() {
        let registry = InMemoryRegistry::new();
        let owner = Principal::new("urn:github:1");
        let unit = sample_unit("a");

        registry.insert(owner.clone(), "alpha", unit.clone());

        let found = registry.unit(&owner, "alpha").await.unwrap();
        assert_eq!(found, unit);
    }

    #[tokio::test]
    async fn missing_unit_is_an_error() {
        let registry = InMemoryRegistry::new();
        let owner = Principal::new("urn:github:1");

        let err = registry.unit(&owner, "ghost").await.unwrap_err();
        assert!(matches!(err, RegistryError::UnitNotFound { name, .. } if name == "ghost"));
    }

    #[tokio::test]
    async fn principals_are_isolated() {
        let registry = InMemoryRegistry::new();
        let one = Principal::new("urn:github:1");
        let two = Principal::new("urn:github:2");

        registry.insert(one.clone(), "alpha", sample_unit("a"));

        assert_eq!(registry.unit_names(&one).await.unwrap().len(), 1);
        assert!(registry.unit_names(&two).await.unwrap().is_empty());
        assert!(registry.unit(&two, "alpha").await.is_err());
    }

    #[tokio::test]
    async fn insert_replaces_and_remove_deletes() {
        let registry = InMemoryRegistry::new();
        let owner = Principal::new("urn:github:1");

        assert!(registry
            .insert(owner.clone(), "alpha", sample_unit("a"))
            .is_none());
        let previous = registry.insert(owner.clone(), "alpha", sample_unit("b"));
        assert_eq!(previous, Some(sample_unit("a")));

        assert_eq!(registry.remove(&owner, "alpha"), Some(sample_unit("b")));
        assert_eq!(registry.unit_count(&owner), 0);
        assert!(registry.remove(&owner, "alpha").is_none());
    }
}
