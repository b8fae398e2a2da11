//! draft4 - JSON Schema Draft 4 runtime core
//!
//! This crate provides the runtime underneath a schema-driven code
//! generator:
//! - a loss-preserving schema model with JSON round-trip
//! - same-document `$ref` collapse
//! - a recursive instance validator with numbered, located diagnostics
//! - equality/hash classification for generated data classes
//!
//! ## Quick Start
//!
//! ```rust
//! use draft4::{Schema, Validator};
//!
//! let schema = Schema::from_json(r#"{"type":"object","required":["name"]}"#).unwrap();
//! let mut validator = Validator::new(&schema).unwrap();
//! let messages = validator.validate(r#"{"name": "a"}"#).unwrap();
//! assert!(messages.is_empty());
//! ```

// Core error handling
pub mod error;

// Schema model, reader/writer, and reference collapse
pub mod schema;

// Typed instance tree with source spans
pub mod instance;

// Recursive validator and diagnostics
pub mod validator;

// Equality semantics published to the code generator
pub mod codegen;

pub use error::{SchemaError, SchemaResult};
pub use instance::{parse_instance, Instance, InstanceKind, Span};
pub use schema::{collapse, AdditionalProperties, Items, Schema, SimpleType, UriOrFragment};
pub use validator::{Diagnostic, DiagnosticKind, ValidationReport, Validator};
