//! tinyspec-compiler
//!
//! This crate implements:
//!  1) A line tokenizer for the indentation-based shorthand,
//!  2) Parsers for the models and endpoints grammars,
//!  3) A reference resolver (undefined model names),
//!  4) Default-field injection and Swagger generation (`paths` and `definitions`),
//!  5) Header assembly into one document value, and the error type (`SpecError`).

pub mod error;
pub mod types;
pub mod utils;
pub mod tokenizer;
pub mod parser;
pub mod resolver;
pub mod document;
pub mod gen_swagger;
pub mod compiler;

pub use compiler::assemble_document;
pub use compiler::build_unit;
pub use compiler::compile;
pub use document::Document;
pub use error::SpecError;
pub use types::Options;
