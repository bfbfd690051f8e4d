//! # Hoistspec Core
//!
//! Hoist inline schemas of an OpenAPI document into named, deduplicated
//! `components.schemas` entries.
//!
//! Generated or hand-written API descriptions often repeat the same schema
//! inline, in request bodies, in responses, and nested inside other schemas.
//! Code generators then produce one anonymous type per occurrence. This crate
//! moves every such schema into `components.schemas` under a name derived from
//! where it was found, shares one entry between identical schemas, and leaves a
//! `$ref` at each original location.
//!
//! ## Quick Start
//!
//! ```rust
//! use hoistspec_core::{DocumentFormat, Node, SchemaExtractor};
//!
//! let input = r#"{
//!     "paths": {
//!         "/v2/foo": {
//!             "post": {
//!                 "responses": {
//!                     "200": {"content": {"application/json": {"schema": {"type": "object"}}}},
//!                     "201": {"content": {"application/json": {"schema": {"type": "object"}}}}
//!                 }
//!             }
//!         }
//!     }
//! }"#;
//!
//! let document = Node::decode(input, DocumentFormat::Json)?;
//! let (document, report) = SchemaExtractor::new(document).transform()?;
//!
//! assert_eq!(report.responses.matches, 2);
//! assert_eq!(report.responses.groups, 1);
//! let schemas = document
//!     .get("components")
//!     .and_then(|components| components.as_mapping())
//!     .and_then(|components| components.get("schemas"))
//!     .and_then(|schemas| schemas.as_mapping())
//!     .ok_or("no registry")?;
//! assert!(schemas.get("PostV2Foo2xxResponse").is_some());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Naming
//!
//! | Found at | Symbol |
//! |----------|--------|
//! | `paths./v2/foo.post.requestBody...schema` | `PostV2FooRequest` |
//! | `paths./v2/foo.post.responses.200...schema` | `PostV2Foo200Response` |
//! | `components.schemas.fooBar.properties.whizzBang` | `fooBarWhizzBang` |
//! | `components.schemas.pet.properties.tags.items` | `TagsItem` |
//!
//! Components the locations of a group disagree on are dropped, and the symbol
//! gets a `Common` prefix. Symbols already taken get a numeric suffix
//! (`Foo` → `Foo2` → `Foo3`).
//!
//! ## Queries
//!
//! Locations are searched with a small dot-separated path language, see
//! [`Query`]: literal keys, `*` for any key, an empty segment (`..`) for any
//! depth, and `[?(@field=='value')]` to keep mappings with a given string field.
//!
//! ## Features
//!
//! - `yaml`: YAML documents through `serde-saphyr`.

mod document;
mod error;
mod group;
mod naming;
mod path;
mod query;
mod transform;
mod tree;
mod unique;

pub use self::document::{DocumentError, DocumentFormat};
pub use self::error::ExtractError;
pub use self::group::{Group, group_matches, without_refs};
pub use self::naming::SymbolContext;
pub use self::path::{ConcretePath, Query, Segment};
pub use self::query::Match;
pub use self::transform::{
    EMBEDDED_ARRAY_OBJECT_SEARCH, EMBEDDED_OBJECT_SEARCH, EmbeddedReport, PassReport,
    REQUEST_SEARCH, RESPONSE_SEARCH, SchemaExtractor, TransformReport, transform,
};
pub use self::tree::{Key, Node, REF_KEY, SCHEMA_REF_PREFIX, Scalar, Value, schema_ref};
pub use self::unique::{next_symbol, unique_symbol};
