//! Message specifications (EDMD)
//!
//! A message spec is the grammar of one message type: an ordered tree of
//! segment and segment-group nodes, each with a cardinality. A group is
//! always introduced by its first child segment, the *trigger*, which is
//! unique among the triggers at its nesting level.

use crate::segment::SegSpec;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A segment node of a message spec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegSpecNode {
    pub spec: Arc<SegSpec>,
    pub mandatory: bool,
    pub max_repeats: u32,
}

impl SegSpecNode {
    pub fn new(spec: Arc<SegSpec>, mandatory: bool, max_repeats: u32) -> Self {
        Self {
            spec,
            mandatory,
            max_repeats,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.spec.id
    }
}

/// A segment group node of a message spec
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSpecNode {
    /// Group name (e.g. "Group_4")
    pub name: String,
    pub mandatory: bool,
    pub max_repeats: u32,
    /// Child nodes; the first must be a segment node (the trigger)
    pub children: Vec<MsgSpecNode>,
}

impl GroupSpecNode {
    pub fn new(
        name: impl Into<String>,
        mandatory: bool,
        max_repeats: u32,
        children: Vec<MsgSpecNode>,
    ) -> Self {
        Self {
            name: name.into(),
            mandatory,
            max_repeats,
            children,
        }
    }

    /// Segment id that opens an occurrence of this group.
    ///
    /// `None` means the structural invariant is violated; callers treat
    /// that as an internal error rather than panicking.
    #[must_use]
    pub fn trigger_id(&self) -> Option<&str> {
        match self.children.first() {
            Some(MsgSpecNode::Seg(seg)) => Some(seg.id()),
            _ => None,
        }
    }
}

/// One node of a message spec tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MsgSpecNode {
    Seg(SegSpecNode),
    Group(GroupSpecNode),
}

impl MsgSpecNode {
    /// Segment id that an occurrence of this node starts with
    #[must_use]
    pub fn trigger_id(&self) -> Option<&str> {
        match self {
            MsgSpecNode::Seg(seg) => Some(seg.id()),
            MsgSpecNode::Group(grp) => grp.trigger_id(),
        }
    }

    #[must_use]
    pub fn mandatory(&self) -> bool {
        match self {
            MsgSpecNode::Seg(seg) => seg.mandatory,
            MsgSpecNode::Group(grp) => grp.mandatory,
        }
    }

    #[must_use]
    pub fn max_repeats(&self) -> u32 {
        match self {
            MsgSpecNode::Seg(seg) => seg.max_repeats,
            MsgSpecNode::Group(grp) => grp.max_repeats,
        }
    }
}

/// The grammar of one message type, with its release metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSpec {
    /// Message type id (e.g. "AUTHOR")
    pub id: String,
    pub name: String,
    pub version: String,
    pub release: String,
    pub contr_agency: String,
    pub revision: String,
    pub date: NaiveDate,
    pub source: String,
    pub top_level: Vec<MsgSpecNode>,
}

impl MessageSpec {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        release: impl Into<String>,
        contr_agency: impl Into<String>,
        revision: impl Into<String>,
        date: NaiveDate,
        source: impl Into<String>,
        top_level: Vec<MsgSpecNode>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: version.into(),
            release: release.into(),
            contr_agency: contr_agency.into(),
            revision: revision.into(),
            date,
            source: source.into(),
            top_level,
        }
    }

    /// Check the structural invariants: the first top-level node is a
    /// mandatory segment (UNH), and every group carries a segment trigger.
    pub fn validate_structure(&self) -> Result<()> {
        match self.top_level.first() {
            Some(MsgSpecNode::Seg(seg)) if seg.mandatory => {}
            Some(_) => {
                return Err(Error::InvalidStructure(format!(
                    "message {}: first top-level node must be a mandatory segment",
                    self.id
                )))
            }
            None => {
                return Err(Error::InvalidStructure(format!(
                    "message {}: no top-level nodes",
                    self.id
                )))
            }
        }
        check_groups(&self.id, &self.top_level)
    }

    /// Qualified id including version and release (e.g. "AUTHOR:D:14B")
    #[must_use]
    pub fn qualified_id(&self) -> String {
        format!("{}:{}:{}", self.id, self.version, self.release)
    }
}

fn check_groups(msg_id: &str, nodes: &[MsgSpecNode]) -> Result<()> {
    for node in nodes {
        if let MsgSpecNode::Group(grp) = node {
            if grp.trigger_id().is_none() {
                return Err(Error::InvalidStructure(format!(
                    "message {}: group {} has no segment trigger",
                    msg_id, grp.name
                )));
            }
            check_groups(msg_id, &grp.children)?;
        }
    }
    Ok(())
}
