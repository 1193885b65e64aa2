//! Error types for the document model and its JSON boundary.

use thiserror::Error;

/// Errors raised while importing a layout document.
///
/// An import either succeeds completely or leaves the current document
/// untouched; none of these are ever partially applied.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The file is not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level value is not a JSON object.
    #[error("layout must be a JSON object")]
    NotAnObject,

    /// `components` is present but is not an array.
    #[error("`components` must be an array")]
    ComponentsNotArray,

    /// A component carries a `type` outside the four known kinds.
    #[error("component {index}: unknown type `{kind}`")]
    UnknownKind { index: usize, kind: String },

    /// A component is missing a field or has a field of the wrong type.
    #[error("component {index}: {reason}")]
    InvalidComponent { index: usize, reason: String },

    /// Two components share the same id.
    #[error("duplicate component id `{0}`")]
    DuplicateId(String),

    /// Reading the file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised when a property patch does not fit the component kind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    #[error("`{kind}` components have no `{key}` property")]
    UnknownProperty { kind: &'static str, key: String },

    #[error("property `{key}` expects a {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}

/// Errors raised when loading an `EditorConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors raised while writing a layout document.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
