#![deny(rust_2018_idioms)]
#![warn(clippy::all)]

//! # edifact-msg
//!
//! Runtime message models.
//!
//! A raw message is the flat output of tokenization: an ordered list of
//! segments, each carrying positional data elements. A nested message is
//! the tree produced by successful validation, mirroring the message
//! spec's group nesting. Both are immutable once built.

pub mod nested;
pub mod raw;

pub use nested::{CompositeDataElem, DataElem, MsgPart, NestedMsg, Seg, SegGrp, SimpleDataElem};
pub use raw::{RawElem, RawMsg, RawSeg};
