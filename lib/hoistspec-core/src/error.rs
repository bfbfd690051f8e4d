use crate::path::ConcretePath;

/// Errors that abort a schema extraction run.
///
/// None of these are recoverable: they signal either a document whose shape
/// contradicts the `components.schemas` convention, or a location that cannot be
/// named. A run that hits one of them leaves no usable document behind.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum ExtractError {
    /// A symbol was requested for a group without any location.
    #[display("No paths found")]
    NoPaths,

    /// A location is too short for the naming strategy to read its components.
    #[display("Path '{path}' is too short: expected at least {required} segments")]
    PathTooShort {
        /// The offending location.
        path: ConcretePath,
        /// The minimal number of segments the strategy reads.
        required: usize,
    },

    /// Rewriting a location expected exactly one mapping there.
    #[display("Expected to find 1 object at '{path}', found {found}")]
    UnexpectedMatchCount {
        /// The location being rewritten.
        path: ConcretePath,
        /// How many mappings were actually found.
        found: usize,
    },

    /// A value that must be a mapping holds a scalar or a sequence.
    #[display("'{name}' is not a mapping")]
    NotAMapping {
        /// Key of the offending entry.
        name: String,
    },
}
