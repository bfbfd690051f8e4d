//! Paths into the document tree.
//!
//! A [`Query`] is parsed from the small dotted language used to locate inline
//! schemas, e.g. `$.paths.*.*.requestBody.content.*.schema`:
//!
//! - `name` - a literal key (numeric keys also match integer-keyed entries)
//! - `*` - any one mapping-valued child
//! - an empty segment (`..`, or a leading `.`) - this level or any deeper one
//! - `[?(@field=='value')]` - the current mapping has `field` equal to `value`
//!   (both alphanumeric); this segment ends the query
//!
//! A [`ConcretePath`] is what a query resolves to: the actual keys from the
//! root down to one matched mapping.

use std::fmt::{self, Display};
use std::sync::LazyLock;

use regex::Regex;

use crate::tree::Key;

/// Regular expression for the equality filter `[?(@field=='value')]`.
static FILTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[\?\(@(?<field>[[:alnum:]]+)=='(?<value>[[:alnum:]]+)'\)\]$")
        .expect("a valid regex")
});

/// One step of a [`Query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A literal key.
    Key(String),
    /// `*`: any one mapping-valued child.
    Any,
    /// Empty segment: zero or more intervening mapping levels.
    AnyDepth,
    /// `[?(@field=='value')]`: terminal equality test on the current mapping.
    Filter {
        /// The tested entry.
        field: String,
        /// The expected string value.
        value: String,
    },
    /// A filter-looking segment with an unsupported syntax. Never matches.
    Invalid(String),
}

impl From<&str> for Segment {
    fn from(token: &str) -> Self {
        if token.is_empty() {
            return Self::AnyDepth;
        }
        if token == "*" {
            return Self::Any;
        }
        if let Some(captures) = FILTER.captures(token) {
            return Self::Filter {
                field: captures["field"].to_string(),
                value: captures["value"].to_string(),
            };
        }
        if token.starts_with("[?") {
            return Self::Invalid(token.to_string());
        }
        Self::Key(token.to_string())
    }
}

impl Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) | Self::Invalid(key) => f.write_str(key),
            Self::Any => f.write_str("*"),
            Self::AnyDepth => Ok(()),
            Self::Filter { field, value } => write!(f, "[?(@{field}=='{value}')]"),
        }
    }
}

/// A parsed search pattern.
///
/// # Example
///
/// ```rust
/// use hoistspec_core::{Query, Segment};
///
/// let query = Query::from("$.components.schemas.*..[?(@type=='object')]");
///
/// assert_eq!(
///     query.segments(),
///     &[
///         Segment::Key("components".to_string()),
///         Segment::Key("schemas".to_string()),
///         Segment::Any,
///         Segment::AnyDepth,
///         Segment::Filter {
///             field: "type".to_string(),
///             value: "object".to_string(),
///         },
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    segments: Vec<Segment>,
}

impl Query {
    /// The steps of this query, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl From<&str> for Query {
    fn from(pattern: &str) -> Self {
        let pattern = match pattern.strip_prefix('$') {
            Some(rest) => rest.strip_prefix('.').unwrap_or(rest),
            None => pattern,
        };
        if pattern.is_empty() {
            return Self::default();
        }
        let segments = pattern.split('.').map(Segment::from).collect();
        Self { segments }
    }
}

impl From<&ConcretePath> for Query {
    fn from(path: &ConcretePath) -> Self {
        let segments = path
            .keys
            .iter()
            .map(|key| Segment::Key(key.to_string()))
            .collect();
        Self { segments }
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

/// The resolved location of a matched mapping, from the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConcretePath {
    keys: Vec<Key>,
}

impl ConcretePath {
    /// The keys from the root, in order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Tells whether this path designates the root.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Renders the key at `index`, if any.
    pub fn segment(&self, index: usize) -> Option<String> {
        self.keys.get(index).map(Key::to_string)
    }

    /// Renders the key `offset` positions before the end (`0` is the last key).
    pub fn segment_from_end(&self, offset: usize) -> Option<String> {
        let index = self.keys.len().checked_sub(offset + 1)?;
        self.segment(index)
    }

    pub(crate) fn child(&self, key: &Key) -> Self {
        let mut keys = self.keys.clone();
        keys.push(key.clone());
        Self { keys }
    }
}

impl<K: Into<Key>> FromIterator<K> for ConcretePath {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl Display for ConcretePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, key) in self.keys.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}
