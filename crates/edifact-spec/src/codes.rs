//! Code lists (UNCL)
//!
//! A code list enumerates the legal values of a coded simple data element.
//! Membership is the only operation validation needs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A code list with per-code descriptions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeList {
    /// Identifier of the owning simple data element (e.g. "1225")
    pub id: String,
    /// Description of the list as a whole
    pub description: String,
    codes: HashMap<String, String>,
}

impl CodeList {
    /// Create a new empty code list
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            codes: HashMap::new(),
        }
    }

    /// Create a list from (code, description) pairs
    pub fn with_codes(
        id: impl Into<String>,
        description: impl Into<String>,
        codes: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            codes: codes
                .into_iter()
                .map(|(c, d)| (c.into(), d.into()))
                .collect(),
        }
    }

    /// Add a code to the list
    pub fn add(&mut self, code: impl Into<String>, description: impl Into<String>) {
        self.codes.insert(code.into(), description.into());
    }

    /// Membership test used during validation
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains_key(code)
    }

    /// Description of a single code, if known
    #[must_use]
    pub fn description_of(&self, code: &str) -> Option<&str> {
        self.codes.get(code).map(String::as_str)
    }

    /// All codes, sorted
    #[must_use]
    pub fn codes(&self) -> Vec<&String> {
        let mut codes: Vec<_> = self.codes.keys().collect();
        codes.sort();
        codes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
