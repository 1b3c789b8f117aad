//! Validation error taxonomies

use edifact_spec::ReprError;
use std::fmt;
use thiserror::Error;

/// Closed set of segment-sequence error kinds.
///
/// The wire names are stable; programmatic checks match on the kind,
/// the message is human-oriented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegSeqErrorKind {
    NoSegments,
    NoSegmentSpecs,
    MissingMandatorySegment,
    MissingGroup,
    MaxSegRepeatCountExceeded,
    MaxGroupRepeatCountExceeded,
    UnexpectedSegment,
    /// Reserved for internal assertion failures
    UnexpectedErr,
}

impl SegSeqErrorKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SegSeqErrorKind::NoSegments => "no_segments",
            SegSeqErrorKind::NoSegmentSpecs => "no_segment_specs",
            SegSeqErrorKind::MissingMandatorySegment => "missing_mandatory_segment",
            SegSeqErrorKind::MissingGroup => "missing_group",
            SegSeqErrorKind::MaxSegRepeatCountExceeded => "max_seg_repeat_count_exceeded",
            SegSeqErrorKind::MaxGroupRepeatCountExceeded => "max_group_repeat_count_exceeded",
            SegSeqErrorKind::UnexpectedSegment => "unexpected_segment",
            SegSeqErrorKind::UnexpectedErr => "unexpected_err",
        }
    }
}

impl fmt::Display for SegSeqErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A segment-sequence validation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct SegSeqError {
    pub kind: SegSeqErrorKind,
    pub message: String,
}

impl SegSeqError {
    pub fn new(kind: SegSeqErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            kind.as_str().to_string()
        } else {
            message
        };
        Self { kind, message }
    }
}

/// A per-segment validation failure.
///
/// The first failing check wins; coordinates are 0-based slot and
/// component indices within the segment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegError {
    #[error("no spec for segment id '{0}'")]
    UnknownSegment(String),

    #[error("incorrect number of data elements: got {got}, expected {expected}")]
    ElementCount { expected: usize, got: usize },

    #[error("element '{elem_id}' at slot {slot}: missing mandatory value")]
    MissingMandatoryValue { elem_id: String, slot: usize },

    #[error("composite '{elem_id}' at slot {slot}: missing mandatory component '{component_id}' at position {component}")]
    MissingMandatoryComponent {
        elem_id: String,
        slot: usize,
        component_id: String,
        component: usize,
    },

    #[error("composite '{elem_id}' at slot {slot}: got {got} components, expected at most {expected}")]
    ComponentCount {
        elem_id: String,
        slot: usize,
        expected: usize,
        got: usize,
    },

    #[error("element '{elem_id}' at slot {slot}{}: {source}", component_suffix(.component))]
    Repr {
        elem_id: String,
        slot: usize,
        component: Option<usize>,
        #[source]
        source: ReprError,
    },

    #[error("element '{elem_id}' at slot {slot}{}: code '{value}' not found in list {list_id}", component_suffix(.component))]
    CodeNotFound {
        elem_id: String,
        slot: usize,
        component: Option<usize>,
        value: String,
        list_id: String,
    },
}

fn component_suffix(component: &Option<usize>) -> String {
    match component {
        Some(c) => format!(", component {c}"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_are_stable() {
        assert_eq!(SegSeqErrorKind::NoSegments.as_str(), "no_segments");
        assert_eq!(
            SegSeqErrorKind::MissingMandatorySegment.as_str(),
            "missing_mandatory_segment"
        );
        assert_eq!(
            SegSeqErrorKind::MaxGroupRepeatCountExceeded.as_str(),
            "max_group_repeat_count_exceeded"
        );
    }

    #[test]
    fn test_empty_message_falls_back_to_kind() {
        let err = SegSeqError::new(SegSeqErrorKind::NoSegments, "");
        assert_eq!(err.to_string(), "no_segments: no_segments");
    }

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = SegSeqError::new(
            SegSeqErrorKind::UnexpectedSegment,
            "unexpected segment 'DTM' at position 3",
        );
        assert_eq!(
            err.to_string(),
            "unexpected_segment: unexpected segment 'DTM' at position 3"
        );
    }

    #[test]
    fn test_seg_error_component_coordinates() {
        let err = SegError::CodeNotFound {
            elem_id: "C002".to_string(),
            slot: 0,
            component: Some(1),
            value: "XX".to_string(),
            list_id: "1001".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("slot 0"));
        assert!(text.contains("component 1"));
        assert!(text.contains("'XX'"));
    }
}
