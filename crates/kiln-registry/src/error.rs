//! Registry error types

use kiln_spec::Principal;

/// Registry failures
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    /// The principal owns no unit with the requested name
    #[error("unit not found: '{name}' (owner: {principal})")]
    UnitNotFound {
        /// Owner the lookup ran for
        principal: Principal,
        /// Requested unit name
        name: String,
    },

    /// The underlying store failed
    #[error("registry backend error: {0}")]
    Backend(String),
}
