//! Symbol naming.
//!
//! A promoted schema is named after the locations it was found at, never after
//! its content. Each search context reads fixed positions of the location:
//!
//! ```text
//! paths . /v2/foo . post . requestBody . content . application/json . schema
//!   0       1        2         3           4            5               6
//! paths . /v2/foo . post . responses . 200 . content . application/json . schema
//!   0       1        2        3         4       5            6               7
//! components . schemas . fooBar . properties . whizzBang
//!     0           1         2          3           4
//! components . schemas . fooBar . properties . tags . items
//!     0           1         2          3         4      5
//! ```
//!
//! A component is kept only when all locations of the group agree on it; the
//! `Common` prefix marks a symbol missing some of its components.

use crate::ExtractError;
use crate::path::ConcretePath;

const ENDPOINT_INDEX: usize = 1;
const VERB_INDEX: usize = 2;
const STATUS_INDEX: usize = 4;
const PARENT_SCHEMA_INDEX: usize = 2;

const COMMON_PREFIX: &str = "Common";
const REQUEST_SUFFIX: &str = "Request";
const RESPONSE_SUFFIX: &str = "Response";
const ITEM_SUFFIX: &str = "Item";

/// Where a group of inline schemas was found, which drives how it is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SymbolContext {
    /// `paths.<endpoint>.<verb>.requestBody.content.<mime>.schema`
    #[display("request")]
    Request,
    /// `paths.<endpoint>.<verb>.responses.<status>.content.<mime>.schema`
    #[display("response")]
    Response,
    /// `components.schemas.<parent>.properties.<property>`
    #[display("embedded object")]
    EmbeddedObject,
    /// `components.schemas.<...>.<owner>.<item>`
    #[display("embedded array item")]
    EmbeddedArrayItem,
}

impl SymbolContext {
    /// Derives a symbol from the locations of a group.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::NoPaths`] for an empty group, and
    /// [`ExtractError::PathTooShort`] when a location lacks a position this
    /// context reads.
    ///
    /// # Example
    ///
    /// ```rust
    /// use hoistspec_core::{ConcretePath, SymbolContext};
    ///
    /// let path: ConcretePath = [
    ///     "paths", "/v2/mandate-imports", "POST", "requestBody", "content",
    ///     "application/json", "schema",
    /// ]
    /// .into_iter()
    /// .collect();
    ///
    /// let symbol = SymbolContext::Request.symbol(&[path])?;
    ///
    /// assert_eq!(symbol, "PostV2MandateImportsRequest");
    /// # Ok::<(), hoistspec_core::ExtractError>(())
    /// ```
    pub fn symbol(self, paths: &[ConcretePath]) -> Result<String, ExtractError> {
        match self {
            Self::Request => request_symbol(paths),
            Self::Response => response_symbol(paths),
            Self::EmbeddedObject => embedded_object_symbol(paths),
            Self::EmbeddedArrayItem => embedded_array_item_symbol(paths),
        }
    }
}

fn request_symbol(paths: &[ConcretePath]) -> Result<String, ExtractError> {
    ensure_len(paths, VERB_INDEX + 1)?;

    let parts = operation_parts(paths);
    Ok(assemble(parts, 2, REQUEST_SUFFIX))
}

fn response_symbol(paths: &[ConcretePath]) -> Result<String, ExtractError> {
    ensure_len(paths, STATUS_INDEX + 1)?;

    let mut parts = operation_parts(paths);
    parts.extend(common_status(paths));
    Ok(assemble(parts, 3, RESPONSE_SUFFIX))
}

fn embedded_object_symbol(paths: &[ConcretePath]) -> Result<String, ExtractError> {
    ensure_len(paths, PARENT_SCHEMA_INDEX + 2)?;

    let property = first_segment_from_end(paths, 0)?;
    let property = capitalize_first(&property);
    let symbol = match common_value(paths, |path| path.segment(PARENT_SCHEMA_INDEX)) {
        Some(parent) => format!("{parent}{property}"),
        None => format!("{COMMON_PREFIX}{property}"),
    };
    Ok(symbol)
}

fn embedded_array_item_symbol(paths: &[ConcretePath]) -> Result<String, ExtractError> {
    ensure_len(paths, 2)?;

    let symbol = match common_value(paths, |path| path.segment_from_end(1)) {
        Some(owner) => format!("{}{ITEM_SUFFIX}", capitalize_first(&owner)),
        None => {
            let owner = first_segment_from_end(paths, 1)?;
            format!("{COMMON_PREFIX}{}{ITEM_SUFFIX}", capitalize_first(&owner))
        }
    };
    Ok(symbol)
}

/// Verb then endpoint, each only when shared by every location.
fn operation_parts(paths: &[ConcretePath]) -> Vec<String> {
    let verb = common_value(paths, |path| path.segment(VERB_INDEX)).map(|verb| to_title(&verb));
    let endpoint = common_value(paths, |path| path.segment(ENDPOINT_INDEX))
        .map(|endpoint| sanitize_endpoint(&endpoint));
    verb.into_iter().chain(endpoint).collect()
}

fn assemble(parts: Vec<String>, complete: usize, suffix: &str) -> String {
    let prefix = (parts.len() != complete).then_some(COMMON_PREFIX);
    prefix
        .into_iter()
        .map(str::to_string)
        .chain(parts)
        .chain([suffix.to_string()])
        .collect()
}

fn ensure_len(paths: &[ConcretePath], required: usize) -> Result<(), ExtractError> {
    if paths.is_empty() {
        return Err(ExtractError::NoPaths);
    }
    match paths.iter().find(|path| path.len() < required) {
        Some(path) => Err(ExtractError::PathTooShort {
            path: path.clone(),
            required,
        }),
        None => Ok(()),
    }
}

fn first_segment_from_end(paths: &[ConcretePath], offset: usize) -> Result<String, ExtractError> {
    let first = paths.first().ok_or(ExtractError::NoPaths)?;
    first
        .segment_from_end(offset)
        .ok_or_else(|| ExtractError::PathTooShort {
            path: first.clone(),
            required: offset + 1,
        })
}

/// The value every location agrees on, if any.
fn common_value(
    paths: &[ConcretePath],
    read: impl Fn(&ConcretePath) -> Option<String>,
) -> Option<String> {
    let mut values = paths.iter().map(read);
    let first = values.next()??;
    values
        .all(|value| value.as_deref() == Some(first.as_str()))
        .then_some(first)
}

/// The shared status code, collapsed to its class (`2xx`) when only the class
/// is shared.
fn common_status(paths: &[ConcretePath]) -> Option<String> {
    let mut statuses = paths.iter().filter_map(|path| path.segment(STATUS_INDEX));
    let mut status = statuses.next()?;
    for other in statuses {
        if other != status {
            let class = status.chars().next()?;
            if other.chars().next() != Some(class) {
                return None;
            }
            status = format!("{class}xx");
        }
    }
    Some(status)
}

/// `/v2/mandate-imports` becomes `V2MandateImports`, `/API/petOwners` becomes
/// `ApiPetowners`.
fn sanitize_endpoint(endpoint: &str) -> String {
    endpoint
        .trim_matches('/')
        .split(['/', '-'])
        .map(to_title)
        .collect()
}

/// `POST` and `post` both become `Post`.
fn to_title(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
