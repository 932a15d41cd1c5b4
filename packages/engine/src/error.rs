//! Error types for the bind engine.
//!
//! `BindError` is the fatal taxonomy surfaced by decode and encode calls.
//! `MarkupError` covers the parser and writer adapters, and
//! `ConstructionError` is what typed model construction reports before the
//! decoder wraps it with element context. Coverage warnings are not errors;
//! see [`crate::diagnostics`].

use thiserror::Error;

/// Main error type for decode and encode operations.
#[derive(Debug, Error)]
pub enum BindError {
    /// A field matches no category, or a value has no strategy for its category.
    #[error("No category for field '{field}' of {model}: {reason}")]
    UnmappedCategory {
        model: &'static str,
        field: String,
        reason: String,
    },

    /// A present value failed to coerce to its declared primitive type.
    #[error("Cannot convert '{text}' to {target} for field '{field}' of {model} at {path}")]
    Conversion {
        model: &'static str,
        field: String,
        path: String,
        text: String,
        target: &'static str,
    },

    /// A collected field map failed structural validation.
    #[error("Failed to construct {model} at {path}: {source}")]
    ModelConstruction {
        model: &'static str,
        path: String,
        /// Serialized source element.
        element: String,
        /// Debug form of the collected field map.
        fields: String,
        #[source]
        source: ConstructionError,
    },

    /// The encoded fragment failed its render self-check.
    #[error("Encoded <{tag}> for {model} failed to render: {source}")]
    Encode {
        model: &'static str,
        tag: String,
        /// Debug form of the produced element.
        fragment: String,
        /// Debug form of the instance field map.
        instance: String,
        #[source]
        source: MarkupError,
    },

    /// Parsing or rendering markup failed.
    #[error(transparent)]
    Markup(#[from] MarkupError),
}

/// Errors from the markup parser and writer adapters.
#[derive(Debug, Error)]
pub enum MarkupError {
    /// The source text was not well-formed XML.
    #[error("XML parsing failed: {0}")]
    Parse(#[from] roxmltree::Error),

    /// The source bytes were not UTF-8.
    #[error("Document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The writer failed.
    #[error("XML writing failed: {0}")]
    Write(#[from] quick_xml::Error),

    /// IO error while writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A tag or attribute name is not a valid XML name.
    #[error("Invalid XML name: '{0}'")]
    InvalidName(String),

    /// Text contains a character XML 1.0 cannot represent.
    #[error("Invalid character U+{code:04X} in {context}")]
    InvalidCharacter { code: u32, context: String },
}

/// Typed model construction failure, before element context is attached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// A required field remained empty.
    #[error("missing required field '{0}'")]
    Missing(String),

    /// A field holds a value of the wrong kind.
    #[error("field '{field}' expected {expected}, found {found}")]
    WrongKind {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// An enumerated code is not one of the known codes.
    #[error("field '{field}' has unknown code '{code}'")]
    InvalidCode { field: String, code: String },

    /// A cross-field constraint of the model failed.
    #[error("constraint violated: {0}")]
    Constraint(String),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, BindError>;
