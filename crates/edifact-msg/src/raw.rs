//! Flat raw message model
//!
//! The tokenizer emits these; validation consumes them. A raw data
//! element carries one scalar for a simple element and one scalar per
//! component for a composite; which is which is only known to the spec.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw data element: ordered component scalars (length 1 for simples)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawElem {
    pub values: Vec<String>,
}

impl RawElem {
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// A single-scalar element
    pub fn simple(value: impl Into<String>) -> Self {
        Self {
            values: vec![value.into()],
        }
    }
}

impl fmt::Display for RawElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.values.join(":"))
    }
}

/// A raw segment: three-letter id plus positional data elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSeg {
    pub id: String,
    pub elems: Vec<RawElem>,
}

impl RawSeg {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            elems: Vec::new(),
        }
    }

    pub fn with_elems(id: impl Into<String>, elems: Vec<RawElem>) -> Self {
        Self {
            id: id.into(),
            elems,
        }
    }

    pub fn add_elem(&mut self, elem: RawElem) {
        self.elems.push(elem);
    }
}

impl fmt::Display for RawSeg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        for elem in &self.elems {
            write!(f, "+{elem}")?;
        }
        Ok(())
    }
}

/// A complete raw message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMsg {
    /// Message type name (e.g. "AUTHOR"), as announced in UNH
    pub name: String,
    pub segs: Vec<RawSeg>,
}

impl RawMsg {
    pub fn new(name: impl Into<String>, segs: Vec<RawSeg>) -> Self {
        Self {
            name: name.into(),
            segs,
        }
    }
}

impl fmt::Display for RawMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RawMsg {}", self.name)?;
        for seg in &self.segs {
            writeln!(f, "  {seg}")?;
        }
        Ok(())
    }
}
