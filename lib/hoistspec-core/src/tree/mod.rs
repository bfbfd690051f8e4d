//! In-memory document tree.
//!
//! A decoded API description is a [`Node`]: one mapping level whose values are
//! nested mappings, sequences or scalars. Keys are usually strings, but YAML
//! documents routinely use integer keys (`responses: { 200: ... }`), so a [`Key`]
//! can be either.
//!
//! Equality is structural and ignores key order, while iteration follows the
//! document order so that every pass over the tree is reproducible.

use std::fmt::{self, Display};

use indexmap::IndexMap;

use crate::ExtractError;

mod serde_impls;

/// Key of the reference entry written in place of a promoted schema.
pub const REF_KEY: &str = "$ref";

/// Prefix of a reference to a schema registered in `components.schemas`.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// A mapping key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// A string key, the common case.
    Str(String),
    /// An integer key, as produced by YAML for unquoted numbers.
    Int(i64),
}

impl Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(key) => f.write_str(key),
            Self::Int(key) => write!(f, "{key}"),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// `null`, `~` or an absent value.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer too large for [`Scalar::Int`].
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
}

/// Any value held by a [`Node`].
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum Value {
    /// A nested mapping.
    Mapping(Node),
    /// A sequence of values.
    Sequence(Vec<Value>),
    /// A leaf.
    Scalar(Scalar),
}

impl Value {
    /// Returns the mapping if this value is one.
    pub fn as_mapping(&self) -> Option<&Node> {
        match self {
            Self::Mapping(node) => Some(node),
            Self::Sequence(_) | Self::Scalar(_) => None,
        }
    }

    /// Returns the mutable mapping if this value is one.
    pub fn as_mapping_mut(&mut self) -> Option<&mut Node> {
        match self {
            Self::Mapping(node) => Some(node),
            Self::Sequence(_) | Self::Scalar(_) => None,
        }
    }

    /// Returns the string if this value is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::Str(value)) => Some(value),
            Self::Mapping(_) | Self::Sequence(_) | Self::Scalar(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::Str(value.to_string()))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Scalar(Scalar::Str(value))
    }
}

/// One mapping level of the document tree.
///
/// The underlying [`IndexMap`] is reachable through `Deref`, so the usual map
/// operations (`iter`, `insert`, `len`, ...) are available directly. Lookups by
/// textual key go through [`Node::get`], which also resolves integer keys.
#[derive(Debug, Clone, Default, PartialEq, derive_more::Deref, derive_more::DerefMut)]
pub struct Node(IndexMap<Key, Value>);

impl Node {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `key`.
    ///
    /// When no string key matches, the key is read as an integer and looked up
    /// again, so `"200"` finds an entry keyed by the number `200`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0
            .get(&Key::from(key))
            .or_else(|| self.0.get(&Key::Int(key.parse().ok()?)))
    }

    /// Mutable counterpart of [`Node::get`].
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        let key = if self.0.contains_key(&Key::from(key)) {
            Key::from(key)
        } else {
            Key::Int(key.parse().ok()?)
        };
        self.0.get_mut(&key)
    }

    /// Mutable lookup of an exact key, then of its textual form.
    pub(crate) fn get_key_mut(&mut self, key: &Key) -> Option<&mut Value> {
        if self.0.contains_key(key) {
            return self.0.get_mut(key);
        }
        self.get_mut(&key.to_string())
    }

    /// Returns the mapping stored under `name`, inserting an empty one if absent.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::NotAMapping`] if `name` holds a scalar or a sequence.
    pub fn get_or_create_child(&mut self, name: &str) -> Result<&mut Node, ExtractError> {
        let value = self
            .0
            .entry(Key::from(name))
            .or_insert_with(|| Value::Mapping(Node::new()));
        value.as_mapping_mut().ok_or_else(|| ExtractError::NotAMapping {
            name: name.to_string(),
        })
    }

    /// Tells whether `field` holds exactly the string `expected`.
    pub fn field_equals(&self, field: &str, expected: &str) -> bool {
        self.0
            .get(&Key::from(field))
            .and_then(Value::as_str)
            .is_some_and(|value| value == expected)
    }

    /// Tells whether this mapping is already a reference.
    pub fn is_ref(&self) -> bool {
        self.0.contains_key(&Key::from(REF_KEY))
    }

    /// Discards the whole content and leaves a single reference to `symbol`.
    pub fn replace_with_ref(&mut self, symbol: &str) {
        self.0.clear();
        self.0
            .insert(Key::from(REF_KEY), Value::from(schema_ref(symbol)));
    }

    /// Iterates over the mapping-typed children, in document order.
    pub fn child_mappings(&self) -> impl Iterator<Item = (&Key, &Node)> {
        self.0
            .iter()
            .filter_map(|(key, value)| value.as_mapping().map(|node| (key, node)))
    }
}

impl FromIterator<(Key, Value)> for Node {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Builds the reference to a schema registered under `symbol`.
pub fn schema_ref(symbol: &str) -> String {
    format!("{SCHEMA_REF_PREFIX}{symbol}")
}
