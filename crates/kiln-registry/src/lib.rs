//! Kiln Registry - Named units per owner
//!
//! A unit is a named pair of specifications: the `spec` that describes what
//! the unit does and the `drain` that describes where its output goes. The
//! registry answers two questions for the engine:
//!
//! - which units does a principal own ([`UnitRegistry::unit_names`])
//! - what are a named unit's specifications ([`UnitRegistry::unit`])
//!
//! Storage is a collaborator concern; [`InMemoryRegistry`] is the bundled
//! implementation for tests and embedding.

#![warn(unreachable_pub)]

// Core modules
mod error;
mod memory;
mod unit;

// Re-exports
pub use error::RegistryError;
pub use memory::InMemoryRegistry;
pub use unit::{Unit, UnitRegistry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
