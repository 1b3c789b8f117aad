//! Segment-sequence validation
//!
//! A recursive-descent matcher that consumes the flat segment list
//! against the message spec's node tree. At every position the next
//! segment's id selects the node to advance: a group is opened by its
//! trigger segment, and sibling nodes never share a trigger, so the
//! matcher never backtracks. The cursor index only moves forward.

use crate::error::{SegSeqError, SegSeqErrorKind};
use crate::segment::validate_seg;
use crate::{Error, Result};
use edifact_msg::{
    CompositeDataElem, DataElem, MsgPart, NestedMsg, RawMsg, RawSeg, Seg, SegGrp, SimpleDataElem,
};
use edifact_spec::{DataElemSpec, GroupSpecNode, MessageSpec, MsgSpecNode, SegSpec, SegSpecNode};
use std::sync::Arc;
use tracing::trace;

/// Configuration for sequence validation
#[derive(Debug, Clone, Copy)]
pub struct ValidationConfig {
    /// Run per-segment element validation on every matched segment.
    /// Disabled for structure-only checks against specs without element
    /// tables.
    pub validate_elements: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            validate_elements: true,
        }
    }
}

/// Forward-only cursor over the raw segment list
struct SegCursor<'m> {
    segs: &'m [RawSeg],
    pos: usize,
}

impl<'m> SegCursor<'m> {
    fn new(segs: &'m [RawSeg]) -> Self {
        Self { segs, pos: 0 }
    }

    fn peek(&self) -> Option<&'m RawSeg> {
        self.segs.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn pos(&self) -> usize {
        self.pos
    }
}

/// Validator matching raw messages against one message spec
pub struct SegSeqValidator {
    spec: Arc<MessageSpec>,
    config: ValidationConfig,
}

impl SegSeqValidator {
    pub fn new(spec: Arc<MessageSpec>) -> Self {
        Self {
            spec,
            config: ValidationConfig::default(),
        }
    }

    pub fn with_config(spec: Arc<MessageSpec>, config: ValidationConfig) -> Self {
        Self { spec, config }
    }

    /// Validate a raw message, producing its nested tree.
    ///
    /// Errors are terminal; no partial tree is returned.
    pub fn validate(&self, raw: &RawMsg) -> Result<NestedMsg> {
        if raw.segs.is_empty() {
            return Err(SegSeqError::new(
                SegSeqErrorKind::NoSegments,
                format!("message '{}' has no segments", raw.name),
            )
            .into());
        }
        if self.spec.top_level.is_empty() {
            return Err(SegSeqError::new(
                SegSeqErrorKind::NoSegmentSpecs,
                format!("message spec '{}' has no segment specs", self.spec.id),
            )
            .into());
        }

        let mut cursor = SegCursor::new(&raw.segs);
        let parts = self.match_nodes(&mut cursor, &self.spec.top_level, &self.spec.id, false)?;

        if let Some(seg) = cursor.peek() {
            return Err(SegSeqError::new(
                SegSeqErrorKind::UnexpectedSegment,
                format!(
                    "unexpected segment '{}' at position {}",
                    seg.id,
                    cursor.pos()
                ),
            )
            .into());
        }

        Ok(NestedMsg::new(raw.name.clone(), parts))
    }

    fn match_nodes(
        &self,
        cursor: &mut SegCursor<'_>,
        nodes: &[MsgSpecNode],
        path: &str,
        in_group: bool,
    ) -> Result<Vec<MsgPart>> {
        let mut parts = Vec::new();
        for (index, node) in nodes.iter().enumerate() {
            match node {
                MsgSpecNode::Seg(seg_node) => {
                    let is_trigger = in_group && index == 0;
                    self.match_seg_node(cursor, seg_node, path, is_trigger, &mut parts)?;
                }
                MsgSpecNode::Group(grp_node) => {
                    self.match_group_node(cursor, grp_node, path, &mut parts)?;
                }
            }
        }
        Ok(parts)
    }

    fn match_seg_node(
        &self,
        cursor: &mut SegCursor<'_>,
        node: &SegSpecNode,
        path: &str,
        is_trigger: bool,
        parts: &mut Vec<MsgPart>,
    ) -> Result<()> {
        let mut count: u32 = 0;
        loop {
            let Some(raw) = cursor.peek() else { break };
            if raw.id != node.id() {
                break;
            }
            // The next segment re-matches this node beyond its limit. A
            // group trigger hands control back to the enclosing group,
            // which may open a fresh occurrence; anywhere else this is a
            // repeat-count error, not an unexpected segment.
            if count == node.max_repeats {
                if is_trigger {
                    break;
                }
                return Err(SegSeqError::new(
                    SegSeqErrorKind::MaxSegRepeatCountExceeded,
                    format!(
                        "segment '{}' at {} exceeds max repeat count {}",
                        node.id(),
                        path,
                        node.max_repeats
                    ),
                )
                .into());
            }
            if self.config.validate_elements {
                validate_seg(raw, &node.spec).map_err(|source| Error::Segment {
                    pos: cursor.pos(),
                    seg_id: raw.id.clone(),
                    source,
                })?;
            }
            trace!(seg = %raw.id, pos = cursor.pos(), path, "matched segment");
            parts.push(MsgPart::Seg(build_seg(raw, &node.spec)));
            cursor.advance();
            count += 1;
        }

        if count == 0 && node.mandatory {
            return Err(SegSeqError::new(
                SegSeqErrorKind::MissingMandatorySegment,
                format!("missing mandatory segment '{}' at {}", node.id(), path),
            )
            .into());
        }
        Ok(())
    }

    fn match_group_node(
        &self,
        cursor: &mut SegCursor<'_>,
        node: &GroupSpecNode,
        path: &str,
        parts: &mut Vec<MsgPart>,
    ) -> Result<()> {
        let Some(trigger) = node.trigger_id() else {
            // Structural invariant of the spec tree; not reachable through
            // a spec that passed validate_structure.
            return Err(SegSeqError::new(
                SegSeqErrorKind::UnexpectedErr,
                format!("group '{}' at {} has no segment trigger", node.name, path),
            )
            .into());
        };
        let group_path = format!("{path}/{}", node.name);

        let mut count: u32 = 0;
        loop {
            let Some(raw) = cursor.peek() else { break };
            if raw.id != trigger {
                break;
            }
            if count == node.max_repeats {
                return Err(SegSeqError::new(
                    SegSeqErrorKind::MaxGroupRepeatCountExceeded,
                    format!(
                        "group '{}' at {} exceeds max repeat count {}",
                        node.name, path, node.max_repeats
                    ),
                )
                .into());
            }
            trace!(group = %node.name, pos = cursor.pos(), "opening group");
            let children = self.match_nodes(cursor, &node.children, &group_path, true)?;
            parts.push(MsgPart::Grp(SegGrp::new(node.name.clone(), children)));
            count += 1;
        }

        if count == 0 && node.mandatory {
            return Err(SegSeqError::new(
                SegSeqErrorKind::MissingGroup,
                format!("missing mandatory group '{}' at {}", node.name, path),
            )
            .into());
        }
        Ok(())
    }
}

/// Build the nested segment for a matched raw segment.
///
/// Element and component ids come from the spec slots; positions beyond
/// the spec (structure-only specs have none at all) get positional ids
/// so no raw data is dropped.
fn build_seg(raw: &RawSeg, spec: &SegSpec) -> Seg {
    let mut data_elems = Vec::with_capacity(raw.elems.len());
    for (i, elem) in raw.elems.iter().enumerate() {
        let data_elem = match spec.elems.get(i).map(|slot| &slot.elem) {
            Some(DataElemSpec::Simple(simple)) => DataElem::Simple(SimpleDataElem::new(
                simple.id.clone(),
                elem.values.first().cloned().unwrap_or_default(),
            )),
            Some(DataElemSpec::Composite(composite)) => {
                let simples = elem
                    .values
                    .iter()
                    .enumerate()
                    .map(|(j, value)| {
                        let id = composite
                            .components
                            .get(j)
                            .map_or_else(|| format!("c{}", j + 1), |c| c.spec.id.clone());
                        SimpleDataElem::new(id, value.clone())
                    })
                    .collect();
                DataElem::Composite(CompositeDataElem::new(composite.id.clone(), simples))
            }
            None if elem.values.len() == 1 => DataElem::Simple(SimpleDataElem::new(
                format!("e{}", i + 1),
                elem.values[0].clone(),
            )),
            None => DataElem::Composite(CompositeDataElem::new(
                format!("e{}", i + 1),
                elem.values
                    .iter()
                    .enumerate()
                    .map(|(j, value)| SimpleDataElem::new(format!("c{}", j + 1), value.clone()))
                    .collect(),
            )),
        };
        data_elems.push(data_elem);
    }
    Seg::new(raw.id.clone(), data_elems)
}
