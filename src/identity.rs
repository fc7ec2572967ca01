//! Short content-derived identifiers for canonical serializations.

use crate::dom::{Document, ElementRef, canonicalize};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

const SEED: u32 = 5381;
const PREFIX: &str = "id-";
const MIN_DIGITS: usize = 6;
const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Selection key derived from a canonical serialization.
///
/// Equal serializations always produce equal identifiers. Distinct
/// serializations can collide; callers get whatever element matched first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// 32-bit multiply-by-33 / xor hash over UTF-16 code units
pub fn hash_serialization(serialization: &str) -> u32 {
    serialization
        .encode_utf16()
        .fold(SEED, |hash, unit| hash.wrapping_mul(33) ^ u32::from(unit))
}

/// Identifier of a canonical serialization: `id-` plus zero-padded base 36
pub fn identify(serialization: &str) -> ElementId {
    let mut value = hash_serialization(serialization);
    let mut digits = Vec::with_capacity(7);
    loop {
        digits.push(DIGITS[(value % 36) as usize]);
        value /= 36;
        if value == 0 {
            break;
        }
    }
    while digits.len() < MIN_DIGITS {
        digits.push(b'0');
    }
    digits.reverse();

    let mut id = String::with_capacity(PREFIX.len() + digits.len());
    id.push_str(PREFIX);
    id.extend(digits.into_iter().map(char::from));
    ElementId(id)
}

/// Identifier of a live element in its current position, `None` for stale handles
pub fn identify_element(doc: &Document, el: ElementRef) -> Option<ElementId> {
    if doc.tag_name(el).is_none() {
        return None;
    }
    Some(identify(&canonicalize(doc, el)))
}
