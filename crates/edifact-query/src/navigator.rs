//! Navigation over nested messages

use crate::path::{parse_path, PathStep, StepKind};
use crate::{Error, Result};
use edifact_msg::{CompositeDataElem, DataElem, MsgPart, NestedMsg, Seg, SegGrp};

/// A part of a nested message addressed by a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestedPart<'a> {
    Seg(&'a Seg),
    Grp(&'a SegGrp),
    Composite(&'a CompositeDataElem),
}

impl NestedPart<'_> {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            NestedPart::Seg(seg) => &seg.id,
            NestedPart::Grp(grp) => &grp.id,
            NestedPart::Composite(cmp) => &cmp.id,
        }
    }
}

/// Read-only path lookup over a nested message
#[derive(Debug, Clone, Copy, Default)]
pub struct Navigator;

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolve a path expression against a message
    pub fn navigate<'a>(&self, path: &str, msg: &'a NestedMsg) -> Result<NestedPart<'a>> {
        let steps = parse_path(path)?;
        let mut steps = steps.into_iter();
        let first = steps.next().ok_or_else(|| Error::Syntax {
            path: path.to_string(),
            reason: "empty path".to_string(),
        })?;

        let mut current = select_from_parts(path, &msg.parts, &first)?;
        for step in steps {
            current = match current {
                NestedPart::Grp(grp) => select_from_parts(path, &grp.parts, &step)?,
                NestedPart::Seg(seg) => select_from_seg(path, seg, &step)?,
                NestedPart::Composite(_) => {
                    return Err(Error::PathNotFound {
                        path: path.to_string(),
                    })
                }
            };
        }
        Ok(current)
    }

    /// Navigate and require a segment
    pub fn get_seg<'a>(&self, path: &str, msg: &'a NestedMsg) -> Result<&'a Seg> {
        match self.navigate(path, msg)? {
            NestedPart::Seg(seg) => Ok(seg),
            _ => Err(Error::PathNotFound {
                path: path.to_string(),
            }),
        }
    }

    /// Navigate and require a group occurrence
    pub fn get_seg_grp<'a>(&self, path: &str, msg: &'a NestedMsg) -> Result<&'a SegGrp> {
        match self.navigate(path, msg)? {
            NestedPart::Grp(grp) => Ok(grp),
            _ => Err(Error::PathNotFound {
                path: path.to_string(),
            }),
        }
    }
}

fn select_from_parts<'a>(
    path: &str,
    parts: &'a [MsgPart],
    step: &PathStep,
) -> Result<NestedPart<'a>> {
    let matches: Vec<NestedPart<'a>> = match step.kind {
        StepKind::Seg => parts
            .iter()
            .filter_map(|p| match p {
                MsgPart::Seg(seg) if seg.id == step.name => Some(NestedPart::Seg(seg)),
                _ => None,
            })
            .collect(),
        StepKind::Grp => parts
            .iter()
            .filter_map(|p| match p {
                MsgPart::Grp(grp) if grp.id == step.name => Some(NestedPart::Grp(grp)),
                _ => None,
            })
            .collect(),
        StepKind::Cmp => Vec::new(),
    };
    pick(path, matches, step)
}

fn select_from_seg<'a>(path: &str, seg: &'a Seg, step: &PathStep) -> Result<NestedPart<'a>> {
    let matches: Vec<NestedPart<'a>> = match step.kind {
        StepKind::Cmp => seg
            .data_elems
            .iter()
            .filter_map(|e| match e {
                DataElem::Composite(cmp) if cmp.id == step.name => {
                    Some(NestedPart::Composite(cmp))
                }
                _ => None,
            })
            .collect(),
        StepKind::Seg | StepKind::Grp => Vec::new(),
    };
    pick(path, matches, step)
}

fn pick<'a>(path: &str, matches: Vec<NestedPart<'a>>, step: &PathStep) -> Result<NestedPart<'a>> {
    if matches.is_empty() {
        return Err(Error::PathNotFound {
            path: path.to_string(),
        });
    }
    let count = matches.len();
    matches
        .into_iter()
        .nth(step.index)
        .ok_or(Error::IndexOutOfRange {
            path: path.to_string(),
            index: step.index,
            count,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use edifact_msg::{CompositeDataElem, DataElem, SimpleDataElem};

    /// A nested message shaped like a minimal AUTHOR: UNH, BGM (with a
    /// C002 composite), two Group_4 occurrences, UNT.
    fn sample_msg() -> NestedMsg {
        let bgm = Seg::new(
            "BGM",
            vec![
                DataElem::Composite(CompositeDataElem::new(
                    "C002",
                    vec![SimpleDataElem::new("1001", "220")],
                )),
                DataElem::Simple(SimpleDataElem::new("1004", "PO123")),
            ],
        );
        let lin = |item: &str| {
            Seg::new(
                "LIN",
                vec![DataElem::Simple(SimpleDataElem::new("1082", item))],
            )
        };
        NestedMsg::new(
            "AUTHOR",
            vec![
                MsgPart::Seg(Seg::new("UNH", Vec::new())),
                MsgPart::Seg(bgm),
                MsgPart::Grp(SegGrp::new("Group_4", vec![MsgPart::Seg(lin("1"))])),
                MsgPart::Grp(SegGrp::new("Group_4", vec![MsgPart::Seg(lin("2"))])),
                MsgPart::Seg(Seg::new("UNT", Vec::new())),
            ],
        )
    }

    #[test]
    fn test_top_level_segment() {
        let msg = sample_msg();
        let part = Navigator::new().navigate("seg:BGM[0]", &msg).unwrap();
        assert_eq!(part.id(), "BGM");
    }

    #[test]
    fn test_segment_in_group() {
        let msg = sample_msg();
        let navigator = Navigator::new();

        let part = navigator
            .navigate("grp:Group_4[0]/seg:LIN[0]", &msg)
            .unwrap();
        let NestedPart::Seg(seg) = part else {
            panic!("expected segment");
        };
        assert_eq!(seg.simple("1082").map(|s| s.value.as_str()), Some("1"));

        let part = navigator
            .navigate("grp:Group_4[1]/seg:LIN[0]", &msg)
            .unwrap();
        let NestedPart::Seg(seg) = part else {
            panic!("expected segment");
        };
        assert_eq!(seg.simple("1082").map(|s| s.value.as_str()), Some("2"));
    }

    #[test]
    fn test_composite_in_segment() {
        let msg = sample_msg();
        let part = Navigator::new()
            .navigate("seg:BGM[0]/cmp:C002[0]", &msg)
            .unwrap();
        let NestedPart::Composite(cmp) = part else {
            panic!("expected composite");
        };
        assert_eq!(cmp.id, "C002");
        assert_eq!(cmp.simples[0].value, "220");
    }

    #[test]
    fn test_unknown_name_is_path_not_found() {
        let msg = sample_msg();
        let err = Navigator::new().navigate("seg:NAD[0]", &msg).unwrap_err();
        assert!(matches!(err, Error::PathNotFound { .. }));
    }

    #[test]
    fn test_wrong_kind_is_path_not_found() {
        let msg = sample_msg();
        let navigator = Navigator::new();
        assert!(matches!(
            navigator.navigate("grp:BGM[0]", &msg),
            Err(Error::PathNotFound { .. })
        ));
        assert!(matches!(
            navigator.navigate("seg:BGM[0]/seg:LIN[0]", &msg),
            Err(Error::PathNotFound { .. })
        ));
    }

    #[test]
    fn test_index_out_of_range() {
        let msg = sample_msg();
        let err = Navigator::new().navigate("seg:BGM[1]", &msg).unwrap_err();
        assert_eq!(
            err,
            Error::IndexOutOfRange {
                path: "seg:BGM[1]".to_string(),
                index: 1,
                count: 1
            }
        );
    }

    #[test]
    fn test_typed_getters() {
        let msg = sample_msg();
        let navigator = Navigator::new();

        let seg = navigator.get_seg("seg:BGM[0]", &msg).unwrap();
        assert_eq!(seg.id, "BGM");

        let grp = navigator.get_seg_grp("grp:Group_4[1]", &msg).unwrap();
        assert_eq!(grp.id, "Group_4");

        assert!(navigator.get_seg("grp:Group_4[0]", &msg).is_err());
        assert!(navigator.get_seg_grp("seg:BGM[0]", &msg).is_err());
    }

    #[test]
    fn test_navigated_segment_keeps_its_id() {
        // For any seg:X[k] that resolves, the result's id is X.
        let msg = sample_msg();
        let navigator = Navigator::new();
        for (path, id) in [
            ("seg:UNH[0]", "UNH"),
            ("seg:UNT[0]", "UNT"),
            ("grp:Group_4[0]", "Group_4"),
        ] {
            assert_eq!(navigator.navigate(path, &msg).unwrap().id(), id);
        }
    }
}
