//! Document encodings.
//!
//! API descriptions come as YAML (the usual case) or JSON. YAML support needs
//! the `yaml` feature.

use std::path::Path;

use crate::tree::Node;

/// Encoding of a document, usually guessed from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum DocumentFormat {
    /// YAML, the default.
    #[display("YAML")]
    Yaml,
    /// JSON.
    #[display("JSON")]
    Json,
}

impl DocumentFormat {
    /// `.json` files are JSON, anything else is YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let is_json = path
            .as_ref()
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
        if is_json { Self::Json } else { Self::Yaml }
    }
}

/// Errors while decoding or encoding a document.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum DocumentError {
    /// The JSON input is malformed, or its root is not a mapping.
    #[display("JSON error: {_0}")]
    Json(serde_json::Error),

    /// The YAML input is malformed, or its root is not a mapping.
    #[cfg(feature = "yaml")]
    #[display("YAML error: {_0}")]
    YamlInput(serde_saphyr::Error),

    /// The document cannot be written as YAML.
    #[cfg(feature = "yaml")]
    #[display("YAML output error: {_0}")]
    YamlOutput(serde_saphyr::ser_error::Error),

    /// YAML was requested but the `yaml` feature is disabled.
    #[from(ignore)]
    #[display("YAML support requires the 'yaml' feature")]
    YamlDisabled,
}

impl Node {
    /// Decodes a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Json`] on malformed input or a non-mapping root.
    pub fn from_json_str(input: &str) -> Result<Self, DocumentError> {
        let node = serde_json::from_str(input)?;
        Ok(node)
    }

    /// Encodes the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        let output = serde_json::to_string_pretty(self)?;
        Ok(output)
    }

    /// Decodes a YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::YamlInput`] on malformed input or a non-mapping root.
    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(input: &str) -> Result<Self, DocumentError> {
        let node = serde_saphyr::from_str(input)?;
        Ok(node)
    }

    /// Encodes the document as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::YamlOutput`] if serialization fails.
    #[cfg(feature = "yaml")]
    pub fn to_yaml(&self) -> Result<String, DocumentError> {
        let output = serde_saphyr::to_string(self)?;
        Ok(output)
    }

    /// Decodes a document in the given format.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] on malformed input, a non-mapping root, or a
    /// YAML input without the `yaml` feature.
    pub fn decode(input: &str, format: DocumentFormat) -> Result<Self, DocumentError> {
        match format {
            DocumentFormat::Json => Self::from_json_str(input),
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => Self::from_yaml_str(input),
            #[cfg(not(feature = "yaml"))]
            DocumentFormat::Yaml => Err(DocumentError::YamlDisabled),
        }
    }

    /// Encodes the document in the given format.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentError`] if serialization fails, or for YAML output
    /// without the `yaml` feature.
    pub fn encode(&self, format: DocumentFormat) -> Result<String, DocumentError> {
        match format {
            DocumentFormat::Json => self.to_json(),
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => self.to_yaml(),
            #[cfg(not(feature = "yaml"))]
            DocumentFormat::Yaml => Err(DocumentError::YamlDisabled),
        }
    }
}
