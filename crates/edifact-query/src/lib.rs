//! # edifact-query
//!
//! Read-only path lookup over validated nested messages.
//!
//! Paths address segments, group occurrences and composites:
//!
//! ```text
//! grp:Group_1[0]/seg:RFF[0]
//! seg:BGM[0]/cmp:C002[0]
//! ```
//!
//! At each level the children are filtered by kind and name, then the
//! 0-based index picks one occurrence.

pub mod navigator;
pub mod path;

pub use navigator::{Navigator, NestedPart};
pub use path::{PathStep, StepKind};

use thiserror::Error;

/// Errors that can occur during navigation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid path '{path}': {reason}")]
    Syntax { path: String, reason: String },

    #[error("Path not found: {path}")]
    PathNotFound { path: String },

    #[error("Index out of range in '{path}': {index} (found {count} matches)")]
    IndexOutOfRange {
        path: String,
        index: usize,
        count: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
