//! The schema extraction passes.
//!
//! Inline schemas are hoisted in four stages:
//!
//! 1. request bodies ([`REQUEST_SEARCH`])
//! 2. responses ([`RESPONSE_SEARCH`])
//! 3. properties of registered schemas that are objects themselves
//!    ([`EMBEDDED_OBJECT_SEARCH`])
//! 4. objects four levels below a registered schema, typically array items
//!    ([`EMBEDDED_ARRAY_OBJECT_SEARCH`])
//!
//! The last two stages repeat until a whole iteration finds nothing: hoisting an
//! object moves its own nested objects within reach of the search patterns.
//!
//! Each stage groups identical schemas, reuses an identical registry entry when
//! there is one, otherwise registers a copy under a fresh symbol, and finally
//! rewrites every location of the group into a `$ref`.

use tracing::{debug, info, trace};

use crate::ExtractError;
use crate::group::{Group, group_matches, without_refs};
use crate::naming::SymbolContext;
use crate::path::{ConcretePath, Query};
use crate::tree::{Key, Node, Value};
use crate::unique::unique_symbol;

/// Inline request body schemas.
pub const REQUEST_SEARCH: &str = "$.paths.*.*.requestBody.content.*.schema";
/// Inline response schemas.
pub const RESPONSE_SEARCH: &str = "$.paths.*.*.responses.*.content.*.schema";
/// Object properties of registered schemas.
pub const EMBEDDED_OBJECT_SEARCH: &str =
    "$.components.schemas.*.properties.*.[?(@type=='object')]";
/// Objects one level deeper than properties, such as array items.
pub const EMBEDDED_ARRAY_OBJECT_SEARCH: &str = "$.components.schemas.*.*.*.*.[?(@type=='object')]";

const COMPONENTS: &str = "components";
const SCHEMAS: &str = "schemas";

/// Counters for one search pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Number of inline schemas found.
    pub matches: usize,
    /// Number of distinct schemas among them.
    pub groups: usize,
}

/// Counters for one iteration of the embedded schemas loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbeddedReport {
    /// Object properties.
    pub objects: PassReport,
    /// Deeper objects, such as array items.
    pub array_objects: PassReport,
}

/// Progress counters of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
    /// Request bodies pass.
    pub requests: PassReport,
    /// Responses pass.
    pub responses: PassReport,
    /// Embedded schemas loop, one entry per iteration; the last one found nothing.
    pub iterations: Vec<EmbeddedReport>,
    /// Schemas registered under a new symbol.
    pub promoted: usize,
    /// Groups replaced by a reference to an identical, already registered schema.
    pub reused: usize,
}

/// Hoists inline schemas of a document into `components.schemas`.
///
/// The extractor owns the document for the duration of the run.
///
/// # Example
///
/// ```rust
/// use hoistspec_core::{Node, SchemaExtractor};
///
/// let document: Node = serde_json::from_str(r#"{
///     "paths": {
///         "/pets": {
///             "post": {
///                 "requestBody": {
///                     "content": {
///                         "application/json": {
///                             "schema": {"type": "object", "properties": {"name": {"type": "string"}}}
///                         }
///                     }
///                 }
///             }
///         }
///     }
/// }"#)?;
///
/// let (document, report) = SchemaExtractor::new(document).transform()?;
///
/// assert_eq!(report.promoted, 1);
/// let hoisted: Node = serde_json::from_str(r##"{
///     "paths": {
///         "/pets": {
///             "post": {
///                 "requestBody": {
///                     "content": {
///                         "application/json": {
///                             "schema": {"$ref": "#/components/schemas/PostPetsRequest"}
///                         }
///                     }
///                 }
///             }
///         }
///     },
///     "components": {
///         "schemas": {
///             "PostPetsRequest": {"type": "object", "properties": {"name": {"type": "string"}}}
///         }
///     }
/// }"##)?;
/// assert_eq!(document, hoisted);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct SchemaExtractor {
    document: Node,
    report: TransformReport,
}

impl SchemaExtractor {
    /// Creates an extractor for a decoded document.
    pub fn new(document: Node) -> Self {
        Self {
            document,
            report: TransformReport::default(),
        }
    }

    /// Runs every pass and returns the rewritten document.
    ///
    /// # Errors
    ///
    /// Any error aborts the whole run: a group that cannot be named, a location
    /// that vanished before being rewritten, or a `components`/`schemas` entry
    /// that is not a mapping.
    pub fn transform(mut self) -> Result<(Node, TransformReport), ExtractError> {
        self.report.requests = self.run_pass(SymbolContext::Request, REQUEST_SEARCH, true)?;
        self.report.responses = self.run_pass(SymbolContext::Response, RESPONSE_SEARCH, true)?;

        info!("Checking components.schemas for embedded schemas");
        for iteration in 1.. {
            let objects =
                self.run_pass(SymbolContext::EmbeddedObject, EMBEDDED_OBJECT_SEARCH, false)?;
            let array_objects = self.run_pass(
                SymbolContext::EmbeddedArrayItem,
                EMBEDDED_ARRAY_OBJECT_SEARCH,
                false,
            )?;
            debug!(iteration, ?objects, ?array_objects, "Embedded schemas iteration");
            self.report.iterations.push(EmbeddedReport {
                objects,
                array_objects,
            });
            if objects.matches == 0 && array_objects.matches == 0 {
                break;
            }
        }

        info!(
            promoted = self.report.promoted,
            reused = self.report.reused,
            iterations = self.report.iterations.len(),
            "Schema extraction done"
        );
        Ok((self.document, self.report))
    }

    fn run_pass(
        &mut self,
        context: SymbolContext,
        pattern: &str,
        skip_refs: bool,
    ) -> Result<PassReport, ExtractError> {
        let mut matches = self.document.find(&Query::from(pattern));
        if skip_refs {
            matches = without_refs(matches);
        }
        let match_count = matches.len();
        let groups = group_matches(matches);
        info!(
            "Found {match_count} embedded {context} schema in {} groups",
            groups.len()
        );

        let report = PassReport {
            matches: match_count,
            groups: groups.len(),
        };
        for group in groups {
            self.promote(context, group)?;
        }
        Ok(report)
    }

    fn promote(&mut self, context: SymbolContext, group: Group) -> Result<(), ExtractError> {
        let Group { node, paths } = group;
        let registry = registry(&mut self.document)?;

        let symbol = if let Some(existing) = find_matching_schema(registry, &node) {
            debug!(symbol = %existing, locations = paths.len(), "Reusing registered schema");
            self.report.reused += 1;
            existing
        } else {
            let candidate = context.symbol(&paths)?;
            let symbol = unique_symbol(registry, candidate);
            debug!(%symbol, locations = paths.len(), "Registering schema");
            registry.insert(Key::from(symbol.as_str()), Value::Mapping(node));
            self.report.promoted += 1;
            symbol
        };

        for path in &paths {
            replace_with_ref(&mut self.document, path, &symbol)?;
        }
        Ok(())
    }
}

/// Hoists the inline schemas of `document`, see [`SchemaExtractor`].
///
/// # Errors
///
/// Same as [`SchemaExtractor::transform`].
pub fn transform(document: Node) -> Result<Node, ExtractError> {
    SchemaExtractor::new(document)
        .transform()
        .map(|(document, _report)| document)
}

/// The `components.schemas` mapping, created on first use.
fn registry(document: &mut Node) -> Result<&mut Node, ExtractError> {
    document
        .get_or_create_child(COMPONENTS)?
        .get_or_create_child(SCHEMAS)
}

/// The first registered schema identical to `node`, in registry order.
fn find_matching_schema(registry: &Node, node: &Node) -> Option<String> {
    registry
        .child_mappings()
        .find(|(_, schema)| *schema == node)
        .map(|(name, _)| name.to_string())
}

fn replace_with_ref(
    document: &mut Node,
    path: &ConcretePath,
    symbol: &str,
) -> Result<(), ExtractError> {
    let target = document
        .resolve_mut(path)
        .ok_or_else(|| ExtractError::UnexpectedMatchCount {
            path: path.clone(),
            found: 0,
        })?;
    target.replace_with_ref(symbol);
    trace!(%path, %symbol, "Replaced with reference");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> Node {
        serde_json::from_value(value).expect("a JSON object")
    }

    fn schema_ref(symbol: &str) -> serde_json::Value {
        json!({"$ref": format!("#/components/schemas/{symbol}")})
    }

    fn json_body(schema: &serde_json::Value) -> serde_json::Value {
        json!({"content": {"application/json": {"schema": schema}}})
    }

    fn pet() -> serde_json::Value {
        json!({"type": "object", "properties": {"name": {"type": "string"}}})
    }

    fn error() -> serde_json::Value {
        json!({"type": "object", "properties": {"message": {"type": "string"}}})
    }

    #[test]
    fn should_hoist_request_body() {
        let document = node(json!({
            "paths": {"/v2/foo": {"post": {"requestBody": json_body(&pet())}}}
        }));

        let (document, report) = SchemaExtractor::new(document)
            .transform()
            .expect("transformed");

        assert_eq!(
            document,
            node(json!({
                "paths": {"/v2/foo": {"post": {"requestBody": json_body(&schema_ref("PostV2FooRequest"))}}},
                "components": {"schemas": {"PostV2FooRequest": pet()}}
            }))
        );
        assert_eq!(report.requests, PassReport { matches: 1, groups: 1 });
        assert_eq!(report.promoted, 1);
    }

    #[test]
    fn should_share_identical_responses() {
        let document = node(json!({
            "paths": {
                "/v2/foo": {"post": {"responses": {"400": json_body(&error())}}},
                "/v2/ping": {"post": {"responses": {"400": json_body(&error())}}}
            }
        }));

        let (document, report) = SchemaExtractor::new(document)
            .transform()
            .expect("transformed");

        assert_eq!(
            document,
            node(json!({
                "paths": {
                    "/v2/foo": {"post": {"responses": {"400": json_body(&schema_ref("CommonPost400Response"))}}},
                    "/v2/ping": {"post": {"responses": {"400": json_body(&schema_ref("CommonPost400Response"))}}}
                },
                "components": {"schemas": {"CommonPost400Response": error()}}
            }))
        );
        assert_eq!(report.responses, PassReport { matches: 2, groups: 1 });
    }

    #[test]
    fn should_collapse_status_class() {
        let document = node(json!({
            "paths": {
                "/v2/ping": {"post": {"responses": {
                    "200": json_body(&pet()),
                    "201": json_body(&pet())
                }}}
            }
        }));

        let document = transform(document).expect("transformed");

        let schemas = node(json!({"PostV2Ping2xxResponse": pet()}));
        assert_eq!(
            document
                .get("components")
                .and_then(Value::as_mapping)
                .and_then(|components| components.get("schemas")),
            Some(&Value::Mapping(schemas))
        );
    }

    #[test]
    fn should_skip_existing_refs() {
        let document = node(json!({
            "paths": {"/pets": {"get": {"responses": {"200": json_body(&schema_ref("Pet"))}}}},
            "components": {"schemas": {"Pet": pet()}}
        }));

        let (transformed, report) = SchemaExtractor::new(document.clone())
            .transform()
            .expect("transformed");

        assert_eq!(transformed, document);
        assert_eq!(report.responses, PassReport::default());
        assert_eq!(report.promoted, 0);
    }

    #[test]
    fn should_reuse_identical_registered_schema() {
        let document = node(json!({
            "paths": {"/pets": {"post": {"requestBody": json_body(&pet())}}},
            "components": {"schemas": {"Pet": pet()}}
        }));

        let (document, report) = SchemaExtractor::new(document)
            .transform()
            .expect("transformed");

        assert_eq!(
            document,
            node(json!({
                "paths": {"/pets": {"post": {"requestBody": json_body(&schema_ref("Pet"))}}},
                "components": {"schemas": {"Pet": pet()}}
            }))
        );
        assert_eq!(report.reused, 1);
        assert_eq!(report.promoted, 0);
    }

    #[test]
    fn should_make_colliding_symbol_unique() {
        let document = node(json!({
            "paths": {"/pets": {"post": {"requestBody": json_body(&pet())}}},
            "components": {"schemas": {"PostPetsRequest": error()}}
        }));

        let document = transform(document).expect("transformed");

        assert_eq!(
            document,
            node(json!({
                "paths": {"/pets": {"post": {"requestBody": json_body(&schema_ref("PostPetsRequest2"))}}},
                "components": {"schemas": {"PostPetsRequest": error(), "PostPetsRequest2": pet()}}
            }))
        );
    }

    #[test]
    fn should_hoist_embedded_objects_until_fixed_point() {
        let address = json!({
            "type": "object",
            "properties": {
                "geo": {"type": "object", "properties": {"lat": {"type": "number"}}}
            }
        });
        let document = node(json!({
            "components": {
                "schemas": {
                    "fooBar": {"type": "object", "properties": {"whizzBang": address}}
                }
            }
        }));

        let (document, report) = SchemaExtractor::new(document)
            .transform()
            .expect("transformed");

        assert_eq!(
            document,
            node(json!({
                "components": {
                    "schemas": {
                        "fooBar": {"type": "object", "properties": {"whizzBang": schema_ref("fooBarWhizzBang")}},
                        "fooBarWhizzBang": {"type": "object", "properties": {"geo": schema_ref("fooBarWhizzBangGeo")}},
                        "fooBarWhizzBangGeo": {"type": "object", "properties": {"lat": {"type": "number"}}}
                    }
                }
            }))
        );
        assert_eq!(report.iterations.len(), 3);
        assert_eq!(report.iterations.last(), Some(&EmbeddedReport::default()));
        assert_eq!(report.promoted, 2);
    }

    #[test]
    fn should_share_embedded_object_across_parents() {
        let whizz = json!({"type": "object", "properties": {"bang": {"type": "boolean"}}});
        let document = node(json!({
            "components": {
                "schemas": {
                    "fooBar": {"type": "object", "properties": {"whizzBang": whizz}},
                    "pingPong": {"type": "object", "properties": {"whizzBang": whizz}}
                }
            }
        }));

        let document = transform(document).expect("transformed");

        assert_eq!(
            document,
            node(json!({
                "components": {
                    "schemas": {
                        "fooBar": {"type": "object", "properties": {"whizzBang": schema_ref("CommonWhizzBang")}},
                        "pingPong": {"type": "object", "properties": {"whizzBang": schema_ref("CommonWhizzBang")}},
                        "CommonWhizzBang": whizz
                    }
                }
            }))
        );
    }

    #[test]
    fn should_hoist_array_items() {
        let tag = json!({"type": "object", "properties": {"label": {"type": "string"}}});
        let document = node(json!({
            "components": {
                "schemas": {
                    "pet": {
                        "type": "object",
                        "properties": {"tags": {"type": "array", "items": tag}}
                    }
                }
            }
        }));

        let document = transform(document).expect("transformed");

        assert_eq!(
            document,
            node(json!({
                "components": {
                    "schemas": {
                        "pet": {
                            "type": "object",
                            "properties": {"tags": {"type": "array", "items": schema_ref("TagsItem")}}
                        },
                        "TagsItem": tag
                    }
                }
            }))
        );
    }

    #[test]
    fn should_hoist_objects_revealed_by_requests() {
        let document = node(json!({
            "paths": {
                "/pets": {"post": {"requestBody": json_body(&json!({
                    "type": "object",
                    "properties": {
                        "owner": {"type": "object", "properties": {"name": {"type": "string"}}}
                    }
                }))}}
            }
        }));

        let document = transform(document).expect("transformed");

        assert_eq!(
            document,
            node(json!({
                "paths": {"/pets": {"post": {"requestBody": json_body(&schema_ref("PostPetsRequest"))}}},
                "components": {
                    "schemas": {
                        "PostPetsRequest": {"type": "object", "properties": {"owner": schema_ref("PostPetsRequestOwner")}},
                        "PostPetsRequestOwner": {"type": "object", "properties": {"name": {"type": "string"}}}
                    }
                }
            }))
        );
    }

    #[test]
    fn should_leave_document_without_inline_schemas_untouched() {
        let document = node(json!({
            "openapi": "3.0.0",
            "paths": {"/health": {"get": {"responses": {"204": {"description": "ok"}}}}}
        }));

        let (transformed, report) = SchemaExtractor::new(document.clone())
            .transform()
            .expect("transformed");

        assert_eq!(transformed, document);
        assert_eq!(report.iterations, vec![EmbeddedReport::default()]);
    }

    #[test]
    fn should_fail_when_components_is_not_a_mapping() {
        let document = node(json!({
            "paths": {"/pets": {"post": {"requestBody": json_body(&pet())}}},
            "components": "oops"
        }));

        let result = transform(document);

        assert!(matches!(
            result,
            Err(ExtractError::NotAMapping { name }) if name == "components"
        ));
    }

    #[test]
    fn should_fail_when_schemas_is_not_a_mapping() {
        let document = node(json!({
            "paths": {"/pets": {"post": {"requestBody": json_body(&pet())}}},
            "components": {"schemas": ["oops"]}
        }));

        let result = transform(document);

        assert!(matches!(
            result,
            Err(ExtractError::NotAMapping { name }) if name == "schemas"
        ));
    }

    #[test]
    fn should_fail_on_vanished_location() {
        let mut document = node(json!({"paths": {}}));
        let path: ConcretePath = ["paths", "/pets", "post"].into_iter().collect();

        let result = replace_with_ref(&mut document, &path, "Pet");

        assert!(matches!(
            result,
            Err(ExtractError::UnexpectedMatchCount { found: 0, .. })
        ));
    }
}
