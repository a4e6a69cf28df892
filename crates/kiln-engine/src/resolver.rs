//! Resolver boundary

use crate::error::ResolveError;
use crate::instance::Instance;
use async_trait::async_trait;
use kiln_spec::{Principal, SpecValue};
use std::fmt::Debug;
use std::sync::Arc;

/// Interprets a specification value into a live object
///
/// External collaborator: the engine never looks inside a specification
/// itself. Implementations run arbitrary user-authored construction logic on
/// behalf of the owning principal; the engine invokes them through the cache
/// (at most once per key among concurrent callers), bounds them with a
/// timeout, and contains their errors and panics at the instantiation
/// boundary.
#[async_trait]
pub trait Resolver: Debug + Send + Sync + 'static {
    /// Build the object the specification describes
    ///
    /// # Errors
    /// - [`ResolveError::Specification`] for a malformed specification or an
    ///   unresolvable construct
    /// - [`ResolveError::Fault`] for any runtime fault during construction
    async fn build(
        &self,
        principal: &Principal,
        spec: &SpecValue,
    ) -> Result<Arc<dyn Instance>, ResolveError>;
}
