//! Nested message model
//!
//! The tree-shaped result of successful validation. Group nesting mirrors
//! the message spec; repeated groups appear as sibling `SegGrp` values
//! sharing one id. The tree owns all of its data; nothing borrows from
//! the raw message it was built from.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// A validated simple data element value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleDataElem {
    pub id: String,
    pub value: String,
}

impl SimpleDataElem {
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }
}

/// A validated composite data element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeDataElem {
    pub id: String,
    pub simples: Vec<SimpleDataElem>,
}

impl CompositeDataElem {
    pub fn new(id: impl Into<String>, simples: Vec<SimpleDataElem>) -> Self {
        Self {
            id: id.into(),
            simples,
        }
    }
}

/// A data element of a validated segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataElem {
    Simple(SimpleDataElem),
    Composite(CompositeDataElem),
}

impl DataElem {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            DataElem::Simple(s) => &s.id,
            DataElem::Composite(c) => &c.id,
        }
    }
}

/// A validated segment instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seg {
    pub id: String,
    pub data_elems: Vec<DataElem>,
}

impl Seg {
    pub fn new(id: impl Into<String>, data_elems: Vec<DataElem>) -> Self {
        Self {
            id: id.into(),
            data_elems,
        }
    }

    /// First composite with the given id
    #[must_use]
    pub fn composite(&self, id: &str) -> Option<&CompositeDataElem> {
        self.data_elems.iter().find_map(|e| match e {
            DataElem::Composite(c) if c.id == id => Some(c),
            _ => None,
        })
    }

    /// First simple element with the given id
    #[must_use]
    pub fn simple(&self, id: &str) -> Option<&SimpleDataElem> {
        self.data_elems.iter().find_map(|e| match e {
            DataElem::Simple(s) if s.id == id => Some(s),
            _ => None,
        })
    }
}

/// One occurrence of a segment group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegGrp {
    /// Group name from the message spec (e.g. "Group_4")
    pub id: String,
    pub parts: Vec<MsgPart>,
}

impl SegGrp {
    pub fn new(id: impl Into<String>, parts: Vec<MsgPart>) -> Self {
        Self {
            id: id.into(),
            parts,
        }
    }

    /// The segment that opened this group occurrence
    #[must_use]
    pub fn trigger_seg(&self) -> Option<&Seg> {
        match self.parts.first() {
            Some(MsgPart::Seg(seg)) => Some(seg),
            _ => None,
        }
    }
}

/// A part of a nested message: a segment or a group occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MsgPart {
    Seg(Seg),
    Grp(SegGrp),
}

impl MsgPart {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            MsgPart::Seg(seg) => &seg.id,
            MsgPart::Grp(grp) => &grp.id,
        }
    }
}

/// A validated message in tree form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedMsg {
    pub name: String,
    pub parts: Vec<MsgPart>,
}

impl NestedMsg {
    pub fn new(name: impl Into<String>, parts: Vec<MsgPart>) -> Self {
        Self {
            name: name.into(),
            parts,
        }
    }

    /// Depth-first sequence of segment ids.
    ///
    /// For a correctly validated message this equals the id sequence of
    /// the raw input: no segment is dropped or invented.
    #[must_use]
    pub fn seg_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        collect_seg_ids(&self.parts, &mut ids);
        ids
    }

    /// Count of segment instances in the whole tree
    #[must_use]
    pub fn seg_count(&self) -> usize {
        self.seg_ids().len()
    }

    /// Indented textual rendering for diagnostics
    #[must_use]
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "NestedMsg {}", self.name);
        dump_parts(&self.parts, 1, &mut out);
        out
    }
}

fn collect_seg_ids<'a>(parts: &'a [MsgPart], ids: &mut Vec<&'a str>) {
    for part in parts {
        match part {
            MsgPart::Seg(seg) => ids.push(&seg.id),
            MsgPart::Grp(grp) => collect_seg_ids(&grp.parts, ids),
        }
    }
}

fn dump_parts(parts: &[MsgPart], indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    for part in parts {
        match part {
            MsgPart::Seg(seg) => {
                let _ = writeln!(out, "{pad}Seg {}", seg.id);
            }
            MsgPart::Grp(grp) => {
                let _ = writeln!(out, "{pad}Grp {}", grp.id);
                dump_parts(&grp.parts, indent + 1, out);
            }
        }
    }
}
