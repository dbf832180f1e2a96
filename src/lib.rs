//! protoc-gen-spanner-queries library.
//!
//! Turns a protoc `CodeGeneratorRequest` into generated Spanner query-builder
//! source, one file per direct target. Provides:
//! - `registry`, `file`, `method`, `imports`, `package`: the resolution model
//! - `render`: deterministic output rendering
//! - `options`: service opt-in handling
//! - `generator`: the pipeline
//! - `runtime`: helper functions for running the plugin over stdin/stdout

pub mod error;
pub mod file;
pub mod generator;
pub mod imports;
pub mod method;
pub mod options;
pub mod package;
pub mod registry;
pub mod render;
pub mod runtime;

pub use error::{Error, Result};

pub mod prelude {
    pub use crate::generator::{generate, generate_from_bytes};
    pub use crate::runtime::*;
    pub use prost::Message;
}
