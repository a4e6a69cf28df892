//! Kiln Engine - Spec instantiation & caching
//!
//! Takes a declarative specification, resolves it into a live object through
//! a pluggable [`Resolver`], memoizes successful resolutions per
//! (principal, specification), and contains every construction failure so
//! one broken unit never breaks its siblings.
//!
//! # Architecture
//!
//! ```text
//! (Principal, SpecValue) → CacheKey → InstanceCache → Resolver
//!                                          ↑______________↓
//!                              InstantiationEngine (containment boundary)
//!                                          ↓
//!                               InstantiationResult → presentation
//! ```
//!
//! # Guarantees
//!
//! - At-most-once resolution: concurrent requests for the same key trigger a
//!   single resolver invocation; all waiters observe the same outcome.
//! - No negative caching: failed attempts are never stored; the next request
//!   re-runs the resolver.
//! - Bounded growth: the cache is capacity- and TTL-bounded, both
//!   configurable.
//! - Containment: [`InstantiationEngine::instantiate`] never fails; resolver
//!   errors, timeouts, and panics all surface as
//!   [`InstantiationResult::Failure`].
//!
//! # Example
//!
//! ```rust,ignore
//! use kiln_engine::{EngineConfig, InstantiationEngine};
//! use kiln_spec::{Principal, SpecValue};
//!
//! # async fn example(resolver: std::sync::Arc<dyn kiln_engine::Resolver>) {
//! let engine = InstantiationEngine::with_config(resolver, EngineConfig::new());
//! let owner = Principal::new("urn:github:526301");
//! let spec = SpecValue::composite("com.kiln.drain.Log", vec![]);
//!
//! match engine.instantiate(&owner, &spec).await {
//!     kiln_engine::InstantiationResult::Success { face, type_name, .. } => {
//!         println!("{type_name}: {face}");
//!     }
//!     kiln_engine::InstantiationResult::Failure { message } => {
//!         println!("broken unit: {message}");
//!     }
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod face;
pub mod instance;
pub mod resolver;

// Re-exports for convenience
pub use cache::{CacheStats, InstanceCache};
pub use config::EngineConfig;
pub use dashboard::{Dashboard, UnitFace};
pub use engine::InstantiationEngine;
pub use error::{ConfigError, ResolveError};
pub use face::textual_face;
pub use instance::{Instance, InstantiationResult};
pub use resolver::Resolver;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the instantiation engine
    pub use crate::{
        Dashboard, EngineConfig, InstanceCache, InstantiationEngine, InstantiationResult,
        ResolveError, Resolver, UnitFace,
    };
    pub use kiln_spec::{CacheKey, Principal, SpecValue};
}
