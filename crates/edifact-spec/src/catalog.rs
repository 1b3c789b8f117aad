//! Spec catalog
//!
//! Read-only lookup of segment and message specs, built once at startup.
//! The flat-file parsers for the code list and data element files populate
//! it through the insert methods; validation only ever reads.

use crate::message::MessageSpec;
use crate::segment::{SegSpec, SegSpecMap};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Immutable catalog of all loaded specifications
#[derive(Debug, Clone, Default)]
pub struct SpecCatalog {
    seg_specs: SegSpecMap,
    msg_specs: HashMap<String, Arc<MessageSpec>>,
}

impl SpecCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_seg_spec(&mut self, spec: SegSpec) {
        self.seg_specs.insert(spec.id.clone(), Arc::new(spec));
    }

    pub fn insert_message_spec(&mut self, spec: MessageSpec) {
        self.msg_specs.insert(spec.id.clone(), Arc::new(spec));
    }

    /// Segment spec lookup by three-letter id
    #[must_use]
    pub fn seg_spec(&self, id: &str) -> Option<&Arc<SegSpec>> {
        self.seg_specs.get(id)
    }

    /// Message spec lookup by message type id
    #[must_use]
    pub fn message_spec(&self, id: &str) -> Option<&Arc<MessageSpec>> {
        self.msg_specs.get(id)
    }

    /// The full segment spec table, as consumed by standalone segment
    /// validation
    #[must_use]
    pub fn seg_specs(&self) -> &SegSpecMap {
        &self.seg_specs
    }

    pub fn log_counts(&self) {
        info!(
            segment_specs = self.seg_specs.len(),
            message_specs = self.msg_specs.len(),
            "spec catalog loaded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MessageSpec, MsgSpecNode, SegSpecNode};
    use chrono::NaiveDate;

    #[test]
    fn test_lookup() {
        let mut catalog = SpecCatalog::new();
        catalog.insert_seg_spec(SegSpec::bare("BGM", "Beginning of message"));

        let unh = Arc::new(SegSpec::bare("UNH", "Message header"));
        catalog.insert_message_spec(MessageSpec::new(
            "AUTHOR",
            "Authorization message",
            "D",
            "14B",
            "UN",
            "1",
            NaiveDate::from_ymd_opt(2014, 11, 17).expect("valid date"),
            "TBG12",
            vec![MsgSpecNode::Seg(SegSpecNode::new(unh, true, 1))],
        ));

        assert!(catalog.seg_spec("BGM").is_some());
        assert!(catalog.seg_spec("LIN").is_none());
        assert_eq!(
            catalog.message_spec("AUTHOR").map(|m| m.version.as_str()),
            Some("D")
        );
        assert!(catalog.message_spec("INVOIC").is_none());
    }
}
