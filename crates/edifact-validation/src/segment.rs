//! Per-segment validation
//!
//! Checks one raw segment instance against its segment spec: element
//! arity, lexical representation of every scalar, and code list
//! membership where the simple spec carries one. The first failing
//! check is reported.

use crate::error::SegError;
use edifact_msg::{RawElem, RawSeg};
use edifact_spec::{
    ComponentSpec, DataElemSpec, SegSpec, SegSpecMap, SimpleDataElemSpec,
};

/// Validator for standalone segments, backed by the full segment spec
/// table
pub struct SegValidator {
    seg_specs: SegSpecMap,
}

impl SegValidator {
    pub fn new(seg_specs: SegSpecMap) -> Self {
        Self { seg_specs }
    }

    /// Validate a raw segment against the spec registered for its id
    pub fn validate(&self, seg: &RawSeg) -> Result<(), SegError> {
        let spec = self
            .seg_specs
            .get(&seg.id)
            .ok_or_else(|| SegError::UnknownSegment(seg.id.clone()))?;
        validate_seg(seg, spec)
    }
}

/// Validate a raw segment against a known spec.
///
/// Element count must equal the slot count; the tokenizer is responsible
/// for padding trailing empties or rejecting structurally short segments.
pub fn validate_seg(seg: &RawSeg, spec: &SegSpec) -> Result<(), SegError> {
    if seg.elems.len() != spec.elems.len() {
        return Err(SegError::ElementCount {
            expected: spec.elems.len(),
            got: seg.elems.len(),
        });
    }

    for (slot, (slot_spec, elem)) in spec.elems.iter().zip(&seg.elems).enumerate() {
        match &slot_spec.elem {
            DataElemSpec::Simple(simple) => {
                validate_simple_slot(simple, slot_spec.mandatory, elem, slot)?;
            }
            DataElemSpec::Composite(composite) => {
                if elem.values.len() > composite.components.len() {
                    return Err(SegError::ComponentCount {
                        elem_id: composite.id.clone(),
                        slot,
                        expected: composite.components.len(),
                        got: elem.values.len(),
                    });
                }
                for (position, component) in composite.components.iter().enumerate() {
                    validate_component(composite.id.as_str(), component, elem, slot, position)?;
                }
            }
        }
    }
    Ok(())
}

fn validate_simple_slot(
    simple: &SimpleDataElemSpec,
    mandatory: bool,
    elem: &RawElem,
    slot: usize,
) -> Result<(), SegError> {
    let value = elem.values.first().map(String::as_str).unwrap_or("");
    if value.is_empty() {
        if mandatory {
            return Err(SegError::MissingMandatoryValue {
                elem_id: simple.id.clone(),
                slot,
            });
        }
        return Ok(());
    }
    check_scalar(simple, value, slot, None)
}

fn validate_component(
    composite_id: &str,
    component: &ComponentSpec,
    elem: &RawElem,
    slot: usize,
    position: usize,
) -> Result<(), SegError> {
    let value = elem.values.get(position).map(String::as_str).unwrap_or("");
    if value.is_empty() {
        if component.mandatory {
            return Err(SegError::MissingMandatoryComponent {
                elem_id: composite_id.to_string(),
                slot,
                component_id: component.spec.id.clone(),
                component: position,
            });
        }
        return Ok(());
    }
    check_scalar(&component.spec, value, slot, Some(position))
}

fn check_scalar(
    simple: &SimpleDataElemSpec,
    value: &str,
    slot: usize,
    component: Option<usize>,
) -> Result<(), SegError> {
    simple
        .repr
        .validate(value)
        .map_err(|source| SegError::Repr {
            elem_id: simple.id.clone(),
            slot,
            component,
            source,
        })?;

    if let Some(codes) = &simple.codes {
        if !codes.contains(value) {
            return Err(SegError::CodeNotFound {
                elem_id: simple.id.clone(),
                slot,
                component,
                value: value.to_string(),
                list_id: codes.id.clone(),
            });
        }
    }
    Ok(())
}
