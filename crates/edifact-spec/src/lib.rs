//! # edifact-spec
//!
//! In-memory model of the UN/EDIFACT standard specification.
//!
//! This crate provides the immutable catalog consulted during validation:
//! code lists, simple and composite data element specs with their lexical
//! representations, segment specs, and message specs (the ordered tree of
//! segment/group nodes that defines one message type's grammar). It also
//! contains the loader for EDMD message specification files.
//!
//! The catalog is built once at startup and never mutated; it may be shared
//! across any number of concurrent validation calls.

pub mod catalog;
pub mod codes;
pub mod dataelement;
pub mod loader;
pub mod message;
pub mod segment;

pub use catalog::SpecCatalog;
pub use codes::CodeList;
pub use dataelement::{
    ComponentSpec, CompositeDataElemSpec, DataElemSpec, Repr, ReprError, ReprType,
    SimpleDataElemSpec,
};
pub use loader::MessageSpecParser;
pub use message::{GroupSpecNode, MessageSpec, MsgSpecNode, SegSpecNode};
pub use segment::{SegDataElemSpec, SegSpec, SegSpecMap};

use thiserror::Error;

/// Errors that can occur when building or loading specifications
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid representation notation '{0}'")]
    InvalidRepr(String),

    #[error("Invalid message spec structure: {0}")]
    InvalidStructure(String),

    #[error("Spec file {file}: {message}")]
    SpecFile { file: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
