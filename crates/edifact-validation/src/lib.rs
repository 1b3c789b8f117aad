//! # edifact-validation
//!
//! Validation engine for raw EDIFACT messages.
//!
//! Two stages: per-segment validation checks one segment instance
//! against its segment spec (element arity, lexical representation,
//! code list membership); segment-sequence validation consumes the flat
//! segment list against a message spec's group/segment tree and builds
//! the nested message. Every error is terminal for the call; no partial
//! tree is ever returned.

pub mod error;
pub mod segment;
pub mod sequence;

pub use error::{SegError, SegSeqError, SegSeqErrorKind};
pub use segment::SegValidator;
pub use sequence::{SegSeqValidator, ValidationConfig};

use thiserror::Error;

/// Errors returned by sequence validation
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    SegSeq(#[from] SegSeqError),

    #[error("segment '{seg_id}' at position {pos}: {source}")]
    Segment {
        /// 0-based position in the raw segment list
        pos: usize,
        seg_id: String,
        #[source]
        source: SegError,
    },
}

impl Error {
    /// Sequence error kind, if this is a sequence error
    #[must_use]
    pub fn seg_seq_kind(&self) -> Option<SegSeqErrorKind> {
        match self {
            Error::SegSeq(e) => Some(e.kind),
            Error::Segment { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
