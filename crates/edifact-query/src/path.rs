//! Path expression parsing
//!
//! Grammar: `path := step ('/' step)*`, `step := kind ':' name '[' index ']'`
//! with kinds `seg`, `grp` and `cmp`.

use crate::{Error, Result};

/// Kind of tree node a step addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Seg,
    Grp,
    Cmp,
}

impl StepKind {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "seg" => Some(StepKind::Seg),
            "grp" => Some(StepKind::Grp),
            "cmp" => Some(StepKind::Cmp),
            _ => None,
        }
    }
}

/// One parsed step of a path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    pub kind: StepKind,
    pub name: String,
    pub index: usize,
}

/// Parse a full path expression into its steps
pub fn parse_path(path: &str) -> Result<Vec<PathStep>> {
    if path.is_empty() {
        return Err(syntax_error(path, "empty path"));
    }
    path.split('/').map(|step| parse_step(path, step)).collect()
}

fn parse_step(path: &str, step: &str) -> Result<PathStep> {
    let (kind_str, rest) = step
        .split_once(':')
        .ok_or_else(|| syntax_error(path, format!("step '{step}' has no kind prefix")))?;
    let kind = StepKind::parse(kind_str)
        .ok_or_else(|| syntax_error(path, format!("unknown step kind '{kind_str}'")))?;

    let (name, index_part) = rest
        .split_once('[')
        .ok_or_else(|| syntax_error(path, format!("step '{step}' has no index")))?;
    if name.is_empty() {
        return Err(syntax_error(path, format!("step '{step}' has no name")));
    }
    let index_str = index_part
        .strip_suffix(']')
        .ok_or_else(|| syntax_error(path, format!("unclosed bracket in step '{step}'")))?;
    let index = index_str
        .parse()
        .map_err(|_| syntax_error(path, format!("invalid index '{index_str}'")))?;

    Ok(PathStep {
        kind,
        name: name.to_string(),
        index,
    })
}

fn syntax_error(path: &str, reason: impl Into<String>) -> Error {
    Error::Syntax {
        path: path.to_string(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_step() {
        let steps = parse_path("seg:BGM[0]").unwrap();
        assert_eq!(
            steps,
            [PathStep {
                kind: StepKind::Seg,
                name: "BGM".to_string(),
                index: 0
            }]
        );
    }

    #[test]
    fn test_multi_step() {
        let steps = parse_path("grp:Group_1[2]/seg:RFF[0]/cmp:C506[1]").unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].kind, StepKind::Grp);
        assert_eq!(steps[0].name, "Group_1");
        assert_eq!(steps[0].index, 2);
        assert_eq!(steps[1].kind, StepKind::Seg);
        assert_eq!(steps[2].kind, StepKind::Cmp);
        assert_eq!(steps[2].index, 1);
    }

    #[test]
    fn test_syntax_errors() {
        for bad in [
            "",
            "BGM[0]",
            "xyz:BGM[0]",
            "seg:BGM",
            "seg:[0]",
            "seg:BGM[0",
            "seg:BGM[x]",
        ] {
            assert!(
                matches!(parse_path(bad), Err(Error::Syntax { .. })),
                "expected syntax error for '{bad}'"
            );
        }
    }
}
