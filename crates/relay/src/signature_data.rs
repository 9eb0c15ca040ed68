//! Canonical Signature Builder
//!
//! Turns a property set and an ordering into the one string that gets signed.
//! Producer and verifier must derive byte-identical strings, so nothing here
//! may depend on map iteration order or on which fields the running code
//! understands.

use federa_domain::PropertyKey;
use std::collections::BTreeMap;

/// Separator between values in the canonical signature string.
///
/// Values are not escaped. A `;` inside a value makes different property
/// sets able to produce the same string; existing senders rely on the
/// unescaped form, so it stays.
pub const SIGNATURE_SEPARATOR: &str = ";";

/// Wire names of the two signature fields. They are never part of an order.
pub const AUTHOR_SIGNATURE: &str = "author_signature";
pub const PARENT_AUTHOR_SIGNATURE: &str = "parent_author_signature";

/// Source of the property ordering used for a signature.
///
/// An instance uses exactly one source: the order it was received in, or the
/// fixed legacy order of its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureOrder<'a> {
    /// Order as received on the wire, signature names stripped
    Wire(&'a [PropertyKey]),
    /// Fixed per-type order for instances that were never on the wire
    Legacy(&'static [&'static str]),
}

impl<'a> SignatureOrder<'a> {
    pub fn names(&self) -> Vec<&'a str> {
        match *self {
            SignatureOrder::Wire(keys) => keys.iter().map(PropertyKey::as_str).collect(),
            SignatureOrder::Legacy(names) => names.to_vec(),
        }
    }
}

pub fn is_signature_field(name: &str) -> bool {
    name == AUTHOR_SIGNATURE || name == PARENT_AUTHOR_SIGNATURE
}

/// Normalize a received field order.
///
/// Names the schema knows (`canonical` returns their canonical key) become
/// [`PropertyKey::Known`]; all others are kept verbatim as
/// [`PropertyKey::Unknown`]. Signature names are dropped.
pub fn normalize_order<I, S, F>(names: I, canonical: F) -> Vec<PropertyKey>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: Fn(&str) -> Option<&'static str>,
{
    names
        .into_iter()
        .filter(|name| !is_signature_field(name.as_ref()))
        .map(|name| {
            let name = name.as_ref();
            match canonical(name) {
                Some(known) => PropertyKey::Known(known),
                None => PropertyKey::Unknown(name.to_string()),
            }
        })
        .collect()
}

/// Build the canonical signature string.
///
/// `values` holds the wire strings of known properties and additional data;
/// names in the order without a value contribute an empty string.
pub fn build_signature_data(values: &BTreeMap<&str, String>, order: SignatureOrder<'_>) -> String {
    order
        .names()
        .into_iter()
        .map(|name| values.get(name).map(String::as_str).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(SIGNATURE_SEPARATOR)
}
