//! Query interpreter.
//!
//! Walks a [`Node`] depth-first against a [`Query`] and reports every matched
//! mapping together with the concrete location it was found at. Only
//! mapping-valued children are ever traversed: scalars and sequences can
//! neither match nor contain matches.

use crate::path::{ConcretePath, Query, Segment};
use crate::tree::{Key, Node, Value};

/// A mapping found by a [`Query`], with its location.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Deep copy of the matched mapping.
    pub node: Node,
    /// Where the mapping was found.
    pub path: ConcretePath,
}

impl Node {
    /// Finds every mapping matching `query`, in document order.
    ///
    /// An empty result is not an error: queries that match nothing, and
    /// unsupported filter segments, simply yield no match.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hoistspec_core::{Node, Query};
    ///
    /// let document: Node = serde_json::from_str(
    ///     r#"{"components": {"schemas": {"Pet": {"type": "object"}, "Id": {"type": "string"}}}}"#,
    /// )?;
    ///
    /// let found = document.find(&Query::from("$.components.schemas.*.[?(@type=='object')]"));
    ///
    /// assert_eq!(found.len(), 1);
    /// assert_eq!(found[0].path.to_string(), "components.schemas.Pet");
    /// # Ok::<(), serde_json::Error>(())
    /// ```
    pub fn find(&self, query: &Query) -> Vec<Match> {
        let mut found = Vec::new();
        self.collect(query.segments(), &ConcretePath::default(), &mut found);
        found
    }

    fn collect(&self, segments: &[Segment], path: &ConcretePath, found: &mut Vec<Match>) {
        let Some((segment, rest)) = segments.split_first() else {
            found.push(Match {
                node: self.clone(),
                path: path.clone(),
            });
            return;
        };

        match segment {
            Segment::AnyDepth => {
                // this level, then every deeper one with the same pending segment
                self.collect(rest, path, found);
                for (key, child) in self.child_mappings() {
                    child.collect(segments, &path.child(key), found);
                }
            }
            Segment::Any => {
                for (key, child) in self.child_mappings() {
                    child.collect(rest, &path.child(key), found);
                }
            }
            Segment::Filter { field, value } => {
                if self.field_equals(field, value) {
                    found.push(Match {
                        node: self.clone(),
                        path: path.clone(),
                    });
                }
            }
            Segment::Invalid(_) => {}
            Segment::Key(name) => {
                if let Some((key, Value::Mapping(child))) = self.entry_for(name) {
                    child.collect(rest, &path.child(key), found);
                }
            }
        }
    }

    /// Looks `name` up as a string key, then as an integer key.
    fn entry_for(&self, name: &str) -> Option<(&Key, &Value)> {
        self.get_key_value(&Key::from(name))
            .or_else(|| self.get_key_value(&Key::Int(name.parse().ok()?)))
    }

    /// Resolves a concrete location to the mapping it designates.
    pub(crate) fn resolve_mut(&mut self, path: &ConcretePath) -> Option<&mut Node> {
        path.keys().iter().try_fold(self, |node, key| {
            node.get_key_mut(key).and_then(Value::as_mapping_mut)
        })
    }
}
