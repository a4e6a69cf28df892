//! Cache key derivation
//!
//! Turns an (owner, specification) pair into a canonical, hashable key. The
//! derivation is pure and total: it walks the specification tree feeding a
//! Blake3 hasher tagged, length-prefixed fields, so two distinct trees can
//! only collide with hash-collision probability and no framing ambiguity
//! (`["ab"]` vs `["a", "b"]`, list vs composite, and so on).

use crate::{Principal, SpecValue};
use std::fmt::{self, Display, Formatter};

/// A 32-byte cache key (Blake3)
///
/// Equal (principal, specification) pairs always derive equal keys.
/// Immutable and cheap to clone (Copy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey([u8; 32]);

// Node tags for framing the tree into the hasher.
const TAG_TEXT: u8 = 0;
const TAG_INTEGER: u8 = 1;
const TAG_BOOLEAN: u8 = 2;
const TAG_REFERENCE: u8 = 3;
const TAG_LIST: u8 = 4;
const TAG_COMPOSITE: u8 = 5;

impl CacheKey {
    /// Derive the key for an (owner, specification) pair
    ///
    /// Pure and total: never fails, has no side effects, and depends only on
    /// the structural content of its inputs.
    #[must_use]
    pub fn derive(principal: &Principal, spec: &SpecValue) -> Self {
        let mut hasher = blake3::Hasher::new();
        write_str(&mut hasher, principal.as_str());
        write_value(&mut hasher, spec);
        Self(*hasher.finalize().as_bytes())
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short string representation (first 16 hex chars)
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

fn write_str(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

fn write_value(hasher: &mut blake3::Hasher, value: &SpecValue) {
    match value {
        SpecValue::Text(text) => {
            hasher.update(&[TAG_TEXT]);
            write_str(hasher, text);
        }
        SpecValue::Integer(number) => {
            hasher.update(&[TAG_INTEGER]);
            hasher.update(&number.to_le_bytes());
        }
        SpecValue::Boolean(flag) => {
            hasher.update(&[TAG_BOOLEAN, u8::from(*flag)]);
        }
        SpecValue::Reference(name) => {
            hasher.update(&[TAG_REFERENCE]);
            write_str(hasher, name);
        }
        SpecValue::List(items) => {
            hasher.update(&[TAG_LIST]);
            hasher.update(&(items.len() as u64).to_le_bytes());
            for item in items {
                write_value(hasher, item);
            }
        }
        SpecValue::Composite { kind, args } => {
            hasher.update(&[TAG_COMPOSITE]);
            write_str(hasher, kind);
            hasher.update(&(args.len() as u64).to_le_bytes());
            for arg in args {
                write_value(hasher, arg);
            }
        }
    }
}
