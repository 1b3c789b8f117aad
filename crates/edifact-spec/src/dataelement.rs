//! Data element specifications (EDED/EDCD)
//!
//! A data element is either *simple* (one scalar with a lexical
//! representation and an optional code list) or *composite* (an ordered
//! list of simple components, each mandatory or conditional).

use crate::codes::CodeList;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error as ThisError;

/// Character class of a representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReprType {
    /// `a` — alphabetic characters only
    Alpha,
    /// `n` — numeric: digits, optional leading sign, at most one decimal comma
    Numeric,
    /// `an` — any printable character
    AlphaNumeric,
}

impl ReprType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ReprType::Alpha => "a",
            ReprType::Numeric => "n",
            ReprType::AlphaNumeric => "an",
        }
    }
}

/// A failed representation check
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum ReprError {
    #[error("empty value")]
    Empty,

    #[error("value '{value}' does not match representation '{repr}'")]
    Charset { repr: String, value: String },

    #[error("value '{value}' has length {len}, expected exactly {expected} ({repr})")]
    FixedLength {
        repr: String,
        value: String,
        len: usize,
        expected: usize,
    },

    #[error("value '{value}' has length {len}, expected {min}..={max} ({repr})")]
    Length {
        repr: String,
        value: String,
        len: usize,
        min: usize,
        max: usize,
    },
}

/// Lexical representation of a simple data element value
///
/// Notation follows the standard: `a3` (exactly three letters), `an..35`
/// (up to 35 printable characters), `n..18`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repr {
    pub kind: ReprType,
    pub min_len: usize,
    pub max_len: usize,
    pub fixed: bool,
}

impl Repr {
    /// A variable-length representation (`an..35`)
    #[must_use]
    pub fn variable(kind: ReprType, max_len: usize) -> Self {
        Self {
            kind,
            min_len: 1,
            max_len,
            fixed: false,
        }
    }

    /// A fixed-length representation (`n3`)
    #[must_use]
    pub fn fixed(kind: ReprType, len: usize) -> Self {
        Self {
            kind,
            min_len: len,
            max_len: len,
            fixed: true,
        }
    }

    /// Validate a scalar against this representation.
    ///
    /// Empty values are rejected here; whether an empty slot is permitted
    /// at all is decided by the caller before invoking the check.
    pub fn validate(&self, value: &str) -> std::result::Result<(), ReprError> {
        if value.is_empty() {
            return Err(ReprError::Empty);
        }

        let len = match self.kind {
            ReprType::Alpha => {
                if !value.chars().all(char::is_alphabetic) {
                    return Err(self.charset_error(value));
                }
                value.chars().count()
            }
            ReprType::Numeric => self.validate_numeric(value)?,
            ReprType::AlphaNumeric => {
                if !value.chars().all(is_edifact_char) {
                    return Err(self.charset_error(value));
                }
                value.chars().count()
            }
        };

        if self.fixed {
            if len != self.max_len {
                return Err(ReprError::FixedLength {
                    repr: self.to_string(),
                    value: value.to_string(),
                    len,
                    expected: self.max_len,
                });
            }
        } else if len < self.min_len || len > self.max_len {
            return Err(ReprError::Length {
                repr: self.to_string(),
                value: value.to_string(),
                len,
                min: self.min_len,
                max: self.max_len,
            });
        }
        Ok(())
    }

    /// Numeric values allow an optional leading sign and a single decimal
    /// comma. Neither counts toward the length bounds; the returned length
    /// is the digit count.
    fn validate_numeric(&self, value: &str) -> std::result::Result<usize, ReprError> {
        let rest = value.strip_prefix(['-', '+']).unwrap_or(value);
        let mut digits = 0usize;
        let mut seen_comma = false;
        for c in rest.chars() {
            match c {
                '0'..='9' => digits += 1,
                ',' if !seen_comma => seen_comma = true,
                _ => return Err(self.charset_error(value)),
            }
        }
        if digits == 0 {
            return Err(self.charset_error(value));
        }
        Ok(digits)
    }

    fn charset_error(&self, value: &str) -> ReprError {
        ReprError::Charset {
            repr: self.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Repr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fixed {
            write!(f, "{}{}", self.kind.as_str(), self.max_len)
        } else {
            write!(f, "{}..{}", self.kind.as_str(), self.max_len)
        }
    }
}

impl FromStr for Repr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = if let Some(rest) = s.strip_prefix("an") {
            (ReprType::AlphaNumeric, rest)
        } else if let Some(rest) = s.strip_prefix('a') {
            (ReprType::Alpha, rest)
        } else if let Some(rest) = s.strip_prefix('n') {
            (ReprType::Numeric, rest)
        } else {
            return Err(Error::InvalidRepr(s.to_string()));
        };

        if let Some(len) = rest.strip_prefix("..") {
            let max_len = len
                .parse()
                .map_err(|_| Error::InvalidRepr(s.to_string()))?;
            Ok(Repr::variable(kind, max_len))
        } else {
            let len = rest
                .parse()
                .map_err(|_| Error::InvalidRepr(s.to_string()))?;
            Ok(Repr::fixed(kind, len))
        }
    }
}

/// The printable character set accepted for `an` values.
///
/// Covers level A and B service strings plus lowercase (level C and up
/// admit the full ISO 8859-1 printable range, which validation does not
/// need to distinguish).
fn is_edifact_char(c: char) -> bool {
    c == ' ' || c.is_ascii_graphic()
}

/// Spec of a simple data element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleDataElemSpec {
    /// Four-digit element id (e.g. "1004")
    pub id: String,
    pub name: String,
    pub repr: Repr,
    /// Legal values; `None` means any value matching `repr`
    pub codes: Option<Arc<CodeList>>,
}

impl SimpleDataElemSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>, repr: Repr) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            repr,
            codes: None,
        }
    }

    /// Attach a code list
    #[must_use]
    pub fn with_codes(mut self, codes: Arc<CodeList>) -> Self {
        self.codes = Some(codes);
        self
    }
}

/// One component position of a composite data element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub spec: Arc<SimpleDataElemSpec>,
    pub mandatory: bool,
}

/// Spec of a composite data element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositeDataElemSpec {
    /// Composite id (e.g. "C506")
    pub id: String,
    pub name: String,
    pub components: Vec<ComponentSpec>,
}

impl CompositeDataElemSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        components: Vec<ComponentSpec>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            components,
        }
    }
}

/// A data element spec is either simple or composite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DataElemSpec {
    Simple(Arc<SimpleDataElemSpec>),
    Composite(Arc<CompositeDataElemSpec>),
}

impl DataElemSpec {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            DataElemSpec::Simple(s) => &s.id,
            DataElemSpec::Composite(c) => &c.id,
        }
    }
}
