//! Segment specifications (EDSD)

use crate::dataelement::DataElemSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// One positional data element slot of a segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegDataElemSpec {
    pub elem: DataElemSpec,
    pub mandatory: bool,
    pub max_repeats: u32,
}

impl SegDataElemSpec {
    pub fn new(elem: DataElemSpec, mandatory: bool) -> Self {
        Self {
            elem,
            mandatory,
            max_repeats: 1,
        }
    }

    #[must_use]
    pub fn with_max_repeats(mut self, max_repeats: u32) -> Self {
        self.max_repeats = max_repeats;
        self
    }
}

/// Spec of one segment type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegSpec {
    /// Three-letter segment id (e.g. "BGM")
    pub id: String,
    pub name: String,
    /// Positional data element slots
    pub elems: Vec<SegDataElemSpec>,
}

impl SegSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        elems: Vec<SegDataElemSpec>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            elems,
        }
    }

    /// A spec carrying only the tag, for structure-only validation where
    /// the element catalogs are unavailable
    pub fn bare(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, Vec::new())
    }
}

/// Lookup table of segment specs by id
pub type SegSpecMap = HashMap<String, Arc<SegSpec>>;
