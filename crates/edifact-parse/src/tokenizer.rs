//! Interchange tokenizer
//!
//! One pass over the input text. The release character escapes the next
//! character; whitespace between segments (common in hand-edited files)
//! is ignored; everything else is split on the three separators.

use crate::syntax::{Separators, UNA_LEN};
use crate::{Error, Result};
use edifact_msg::{RawElem, RawMsg, RawSeg};

/// Tokenize raw interchange text into a flat message.
///
/// The message name is taken from the first component of UNH S009 when
/// present. An empty input yields an empty message; deciding whether
/// that is an error is the validator's job.
pub fn tokenize(input: &str) -> Result<RawMsg> {
    let (seps, body) = match Separators::from_una(input) {
        Some(seps) => {
            let body_start = input
                .char_indices()
                .nth(UNA_LEN)
                .map_or(input.len(), |(i, _)| i);
            (seps, &input[body_start..])
        }
        None => (Separators::default(), input),
    };
    let base = input.len() - body.len();

    let mut segs = Vec::new();
    let mut chars = body.char_indices().peekable();

    loop {
        while let Some((_, c)) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
            } else {
                break;
            }
        }
        let Some(&(seg_start, _)) = chars.peek() else {
            break;
        };

        let mut elems: Vec<Vec<String>> = Vec::new();
        let mut components: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut terminated = false;

        while let Some((i, c)) = chars.next() {
            if c == seps.release {
                match chars.next() {
                    Some((_, literal)) => current.push(literal),
                    None => {
                        return Err(Error::Tokenize {
                            offset: base + i,
                            message: "dangling release character".to_string(),
                        })
                    }
                }
            } else if c == seps.component {
                components.push(std::mem::take(&mut current));
            } else if c == seps.element {
                components.push(std::mem::take(&mut current));
                elems.push(std::mem::take(&mut components));
            } else if c == seps.segment {
                components.push(std::mem::take(&mut current));
                elems.push(std::mem::take(&mut components));
                terminated = true;
                break;
            } else {
                current.push(c);
            }
        }

        if !terminated {
            return Err(Error::Tokenize {
                offset: base + seg_start,
                message: "unterminated segment".to_string(),
            });
        }

        let tag = match elems.first() {
            Some(parts) if parts.len() == 1 && is_valid_tag(&parts[0]) => parts[0].clone(),
            _ => {
                return Err(Error::Tokenize {
                    offset: base + seg_start,
                    message: "expected three-letter segment tag".to_string(),
                })
            }
        };

        let raw_elems = elems.into_iter().skip(1).map(RawElem::new).collect();
        segs.push(RawSeg::with_elems(tag, raw_elems));
    }

    let name = message_name(&segs);
    Ok(RawMsg::new(name, segs))
}

fn is_valid_tag(tag: &str) -> bool {
    tag.len() == 3 && tag.chars().all(|c| c.is_ascii_uppercase())
}

/// Message type from UNH S009 (second element, first component)
fn message_name(segs: &[RawSeg]) -> String {
    segs.iter()
        .find(|s| s.id == "UNH")
        .and_then(|s| s.elems.get(1))
        .and_then(|e| e.values.first())
        .cloned()
        .unwrap_or_default()
}
