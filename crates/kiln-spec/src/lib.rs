//! Kiln Spec - Specification domain types
//!
//! The leaf types of the instantiation engine:
//!
//! - [`Principal`]: the owner a specification is resolved for
//! - [`SpecValue`]: an immutable, structurally-comparable specification tree
//! - [`CacheKey`]: 32-byte Blake3 derivation of (principal, specification)
//!
//! # Example
//!
//! ```rust
//! use kiln_spec::{CacheKey, Principal, SpecValue};
//!
//! let owner = Principal::new("urn:github:526301");
//! let spec = SpecValue::composite(
//!     "com.kiln.drain.Log",
//!     vec![SpecValue::text("s3://logs"), SpecValue::integer(7)],
//! );
//!
//! let key = CacheKey::derive(&owner, &spec);
//! assert_eq!(key, CacheKey::derive(&owner, &spec));
//! ```

#![warn(unreachable_pub)]

// Core modules
mod key;
mod principal;
mod value;

// Re-exports
pub use key::CacheKey;
pub use principal::Principal;
pub use value::SpecValue;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
