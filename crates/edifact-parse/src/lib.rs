//! # edifact-parse
//!
//! Tokenizer for raw EDIFACT interchange text.
//!
//! Splits an interchange into segments, data elements and components
//! using the EDIFACT service characters (with UNA override), handling
//! the release character, and produces the flat [`edifact_msg::RawMsg`]
//! consumed by validation.

pub mod syntax;
pub mod tokenizer;

pub use syntax::Separators;
pub use tokenizer::tokenize;

use thiserror::Error;

/// Errors that can occur during tokenization
#[derive(Error, Debug)]
pub enum Error {
    #[error("Tokenize error at offset {offset}: {message}")]
    Tokenize { offset: usize, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
