//! Error types for schema reading, reference collapse, and validator setup.
//!
//! These are the structural failures that terminate an operation. They are
//! disjoint from validation diagnostics, which accumulate in a
//! [`ValidationReport`](crate::validator::ValidationReport) and are returned
//! to the caller as data.

use thiserror::Error;

/// Result alias for operations that can fail structurally.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Structural error raised by the reader, the collapse engine, or a
/// malformed schema encountered mid-validation.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The input text is not valid JSON.
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    /// A schema keyword holds the wrong JSON type, or a keyword value is
    /// unusable (for example an unparsable regular expression).
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// A fragment reference does not point at `#/definitions/<name>`.
    #[error("invalid reference '{reference}': a fragment must point at #/definitions/<name>")]
    InvalidReferenceForm { reference: String },

    /// A reference uses a form the collapse engine does not resolve
    /// (anything other than a same-document fragment).
    #[error("unsupported reference '{reference}': only same-document definition fragments are resolvable")]
    UnsupportedReferenceForm { reference: String },

    /// A reference names a definition that does not exist in the root
    /// schema's definitions table.
    #[error("definition '{name}' not found")]
    DefinitionNotFound { name: String },
}
