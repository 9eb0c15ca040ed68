//! Forward-Compatible Wire Codec Adapter
//!
//! Bridges relayables and the two wire forms handled by the transport
//! codecs: an element sequence (markup) and a structured JSON map with an
//! explicit ordering list. Fields this build does not know are carried
//! through untouched so that signatures from newer senders stay valid.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use federa_domain::PropertyKey;

use crate::error::{RelayError, Result};
use crate::signature_data::{normalize_order, AUTHOR_SIGNATURE, PARENT_AUTHOR_SIGNATURE};
use crate::signatures::SignaturePair;

/// Key of the entity type in the structured form
pub const JSON_ENTITY_TYPE: &str = "entity_type";
/// Key of the field map in the structured form
pub const JSON_ENTITY_DATA: &str = "entity_data";
/// Key of the ordering list in the structured form
pub const JSON_PROPERTY_ORDER: &str = "property_order";

/// One element of a markup document. `None` renders as an empty element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireElement {
    pub name: String,
    pub value: Option<String>,
}

/// Markup form of an entity: root name plus ordered elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkupDocument {
    pub root: String,
    pub elements: Vec<WireElement>,
}

impl MarkupDocument {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: Option<String>) {
        self.elements.push(WireElement {
            name: name.into(),
            value,
        });
    }

    /// Builder-style [`push`](Self::push).
    pub fn with_element(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, Some(value.into()));
        self
    }

    /// Value of the first element called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|element| element.name == name)
            .and_then(|element| element.value.as_deref())
    }

    pub fn element_names(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.name.as_str()).collect()
    }
}

/// Inbound fields sorted into what the schema knows and what it does not.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InboundFields {
    /// Non-empty raw values of known properties, by canonical name
    pub known: BTreeMap<&'static str, String>,
    /// Unknown fields, by their original name
    pub additional: BTreeMap<String, String>,
    pub author_signature: Option<String>,
    pub parent_author_signature: Option<String>,
    /// Normalized received order; `None` when the payload carried none
    pub order: Option<Vec<PropertyKey>>,
}

impl InboundFields {
    /// Sort raw `(name, value)` fields using `canonical` to recognize known
    /// names and aliases.
    ///
    /// Empty known values and signatures count as absent. Unknown values are
    /// kept verbatim, empty strings included.
    pub fn classify<I, F>(fields: I, order: Option<Vec<String>>, canonical: F) -> Self
    where
        I: IntoIterator<Item = (String, Option<String>)>,
        F: Fn(&str) -> Option<&'static str>,
    {
        let mut inbound = InboundFields {
            order: order.map(|names| normalize_order(names, &canonical)),
            ..Default::default()
        };

        for (name, value) in fields {
            let Some(value) = value else { continue };

            if name == AUTHOR_SIGNATURE {
                inbound.author_signature = non_empty(value);
            } else if name == PARENT_AUTHOR_SIGNATURE {
                inbound.parent_author_signature = non_empty(value);
            } else if let Some(known) = canonical(&name) {
                if let Some(value) = non_empty(value) {
                    inbound.known.insert(known, value);
                }
            } else {
                inbound.additional.insert(name, value);
            }
        }

        inbound
    }

    /// Raw value of a known property or, failing that, an unknown field.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.known
            .get(name)
            .or_else(|| self.additional.get(name))
            .map(String::as_str)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Split a markup document into raw fields and its element order.
pub fn markup_fields(
    document: &MarkupDocument,
    expected_root: &str,
) -> Result<(Vec<(String, Option<String>)>, Vec<String>)> {
    if document.root != expected_root {
        return Err(RelayError::Validation(format!(
            "unexpected root element '{}', expected '{expected_root}'",
            document.root
        )));
    }

    let fields = document
        .elements
        .iter()
        .map(|e| (e.name.clone(), e.value.clone()))
        .collect();
    let order = document.elements.iter().map(|e| e.name.clone()).collect();
    Ok((fields, order))
}

/// Split a structured payload into raw fields and its optional order.
pub fn json_fields(
    payload: &Value,
    expected_type: &str,
) -> Result<(Vec<(String, Option<String>)>, Option<Vec<String>>)> {
    let entity_type = payload
        .get(JSON_ENTITY_TYPE)
        .and_then(Value::as_str)
        .ok_or_else(|| RelayError::Validation(format!("missing {JSON_ENTITY_TYPE}")))?;
    if entity_type != expected_type {
        return Err(RelayError::Validation(format!(
            "unexpected entity type '{entity_type}', expected '{expected_type}'"
        )));
    }

    let data = payload
        .get(JSON_ENTITY_DATA)
        .and_then(Value::as_object)
        .ok_or_else(|| RelayError::Validation(format!("missing {JSON_ENTITY_DATA} object")))?;

    let mut fields = Vec::with_capacity(data.len());
    for (name, value) in data {
        fields.push((name.clone(), scalar_text(name, value)?));
    }

    let order = match payload.get(JSON_PROPERTY_ORDER) {
        None | Some(Value::Null) => None,
        Some(Value::Array(names)) => Some(
            names
                .iter()
                .map(|name| {
                    name.as_str().map(str::to_string).ok_or_else(|| {
                        RelayError::Validation(format!("{JSON_PROPERTY_ORDER} entries must be strings"))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
        ),
        Some(_) => {
            return Err(RelayError::Validation(format!(
                "{JSON_PROPERTY_ORDER} must be a list"
            )))
        }
    };

    Ok((fields, order))
}

fn scalar_text(name: &str, value: &Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        Value::Bool(_) | Value::Number(_) => Ok(Some(value.to_string())),
        Value::Array(_) | Value::Object(_) => Err(RelayError::Validation(format!(
            "field '{name}' is not a scalar"
        ))),
    }
}

/// Markup form: ordered fields, then both signatures.
pub fn render_markup(
    root: &str,
    order: &[&str],
    values: &BTreeMap<&str, String>,
    signatures: &SignaturePair,
) -> MarkupDocument {
    let mut document = MarkupDocument::new(root);
    for name in order {
        document.push(*name, values.get(name).cloned());
    }
    document.push(AUTHOR_SIGNATURE, non_empty(signatures.author_signature.clone()));
    document.push(
        PARENT_AUTHOR_SIGNATURE,
        non_empty(signatures.parent_author_signature.clone()),
    );
    document
}

/// Structured form: every value, nulls for ordered names without one, and
/// the ordering list.
pub fn render_json(
    entity_type: &str,
    order: &[&str],
    values: &BTreeMap<&str, String>,
    signatures: &SignaturePair,
) -> Value {
    let mut data = Map::new();
    for name in order {
        let value = values
            .get(name)
            .map_or(Value::Null, |v| Value::String(v.clone()));
        data.insert((*name).to_string(), value);
    }
    for (name, value) in values {
        data.entry((*name).to_string())
            .or_insert_with(|| Value::String(value.clone()));
    }
    data.insert(
        AUTHOR_SIGNATURE.to_string(),
        signature_value(&signatures.author_signature),
    );
    data.insert(
        PARENT_AUTHOR_SIGNATURE.to_string(),
        signature_value(&signatures.parent_author_signature),
    );

    json!({
        JSON_ENTITY_TYPE: entity_type,
        JSON_ENTITY_DATA: data,
        JSON_PROPERTY_ORDER: order,
    })
}

fn signature_value(signature: &str) -> Value {
    if signature.is_empty() {
        Value::Null
    } else {
        Value::String(signature.to_string())
    }
}
