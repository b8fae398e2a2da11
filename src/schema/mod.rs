//! The schema side of the toolkit: model, reader/writer, references, and
//! the collapse engine.

pub mod collapse;
pub mod model;
pub mod reader;
pub mod uri;
pub mod writer;

pub use collapse::collapse;
pub use model::{AdditionalProperties, Items, Schema, SimpleType};
pub use uri::UriOrFragment;
