//! Specification values
//!
//! A [`SpecValue`] is a declarative description of "what to build": a finite,
//! acyclic tree of typed literals, named references, lists, and nested
//! composite specifications. Two values are equal iff their trees are
//! structurally equal (order-sensitive for lists and arguments, value-equal
//! at the leaves), which is exactly the identity the cache keys on.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// A specification tree
///
/// Immutable once constructed; the owned-tree representation makes cycles
/// unrepresentable, so every value is finite and safe to hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecValue {
    /// Text literal
    Text(String),
    /// Integer literal
    Integer(i64),
    /// Boolean literal
    Boolean(bool),
    /// Named reference to another construct, resolved by the resolver
    Reference(String),
    /// Ordered list of values
    List(Vec<SpecValue>),
    /// Nested specification: a constructor kind applied to ordered arguments
    Composite {
        /// Fully-qualified constructor kind (e.g. `com.kiln.drain.Log`)
        kind: String,
        /// Ordered constructor arguments
        args: Vec<SpecValue>,
    },
}

impl SpecValue {
    /// Text literal
    #[inline]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Integer literal
    #[inline]
    #[must_use]
    pub const fn integer(value: i64) -> Self {
        Self::Integer(value)
    }

    /// Boolean literal
    #[inline]
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Boolean(value)
    }

    /// Named reference
    #[inline]
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    /// Ordered list
    #[inline]
    #[must_use]
    pub fn list(items: Vec<SpecValue>) -> Self {
        Self::List(items)
    }

    /// Nested composite specification
    #[inline]
    pub fn composite(kind: impl Into<String>, args: Vec<SpecValue>) -> Self {
        Self::Composite {
            kind: kind.into(),
            args,
        }
    }

    /// Whether this value is a leaf (no child values)
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        match self {
            Self::Text(_) | Self::Integer(_) | Self::Boolean(_) | Self::Reference(_) => true,
            Self::List(items) => items.is_empty(),
            Self::Composite { args, .. } => args.is_empty(),
        }
    }

    /// Total number of nodes in the tree, this one included
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::Text(_) | Self::Integer(_) | Self::Boolean(_) | Self::Reference(_) => 1,
            Self::List(items) => 1 + items.iter().map(SpecValue::node_count).sum::<usize>(),
            Self::Composite { args, .. } => {
                1 + args.iter().map(SpecValue::node_count).sum::<usize>()
            }
        }
    }
}

impl Display for SpecValue {
    /// Canonical constructor-style rendering, e.g.
    /// `com.kiln.drain.Log("s3://logs", 7)`
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => {
                f.write_str("\"")?;
                for ch in value.chars() {
                    match ch {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        _ => write!(f, "{ch}")?,
                    }
                }
                f.write_str("\"")
            }
            Self::Integer(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Reference(name) => write!(f, "@{name}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Composite { kind, args } => {
                write!(f, "{kind}(")?;
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_equality_at_leaves() {
        assert_eq!(SpecValue::text("a"), SpecValue::text("a"));
        assert_ne!(SpecValue::text("a"), SpecValue::text("b"));
        assert_ne!(SpecValue::text("1"), SpecValue::integer(1));
    }

    #[test]
    fn list_equality_is_order_sensitive() {
        let ab = SpecValue::list(vec![SpecValue::text("a"), SpecValue::text("b")]);
        let ba = SpecValue::list(vec![SpecValue::text("b"), SpecValue::text("a")]);
        assert_ne!(ab, ba);
    }

    #[test]
    fn nested_composites_compare_structurally() {
        let make = || {
            SpecValue::composite(
                "com.kiln.Pipeline",
                vec![
                    SpecValue::composite("com.kiln.Step", vec![SpecValue::integer(1)]),
                    SpecValue::reference("shared"),
                ],
            )
        };
        assert_eq!(make(), make());

        let other = SpecValue::composite(
            "com.kiln.Pipeline",
            vec![
                SpecValue::composite("com.kiln.Step", vec![SpecValue::integer(2)]),
                SpecValue::reference("shared"),
            ],
        );
        assert_ne!(make(), other);
    }

    #[test]
    fn display_renders_constructor_syntax() {
        let spec = SpecValue::composite(
            "com.kiln.drain.Log",
            vec![
                SpecValue::text("s3://logs"),
                SpecValue::integer(7),
                SpecValue::boolean(true),
                SpecValue::list(vec![SpecValue::reference("alpha")]),
            ],
        );
        assert_eq!(
            spec.to_string(),
            "com.kiln.drain.Log(\"s3://logs\", 7, true, [@alpha])"
        );
    }

    #[test]
    fn display_escapes_quotes_and_backslashes() {
        let spec = SpecValue::text("say \"hi\" \\ bye");
        assert_eq!(spec.to_string(), "\"say \\\"hi\\\" \\\\ bye\"");
    }

    #[test]
    fn node_count_walks_the_tree() {
        let spec = SpecValue::composite(
            "k",
            vec![
                SpecValue::list(vec![SpecValue::integer(1), SpecValue::integer(2)]),
                SpecValue::text("x"),
            ],
        );
        assert_eq!(spec.node_count(), 5);
        assert!(!spec.is_leaf());
        assert!(SpecValue::integer(1).is_leaf());
        assert!(SpecValue::list(vec![]).is_leaf());
    }

    #[test]
    fn serde_round_trip_preserves_structure() {
        let spec = SpecValue::composite(
            "com.kiln.Unit",
            vec![SpecValue::text("a"), SpecValue::boolean(false)],
        );
        let json = serde_json::to_string(&spec).unwrap();
        let back: SpecValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }
}
