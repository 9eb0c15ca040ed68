//! Typed Property Model
//!
//! Minimal schema layer used to declare the fields of federated entities:
//! each property has a name, a kind, an optional legacy wire alias and a
//! required flag. Values render to the exact strings that go on the wire and
//! into signature payloads.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{DomainError, Result};
use crate::guid::validate_guid;

/// Wire format for timestamps (UTC, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Known property values of an entity, keyed by canonical property name.
pub type PropertyMap = BTreeMap<&'static str, PropertyValue>;

/// Property type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Text,
    /// Text restricted to the guid alphabet
    Guid,
    Boolean,
    Timestamp,
}

impl PropertyKind {
    /// Parse a raw wire string into a typed value.
    pub fn parse(&self, name: &str, raw: &str) -> Result<PropertyValue> {
        match self {
            PropertyKind::Text => Ok(PropertyValue::Text(raw.to_string())),
            PropertyKind::Guid => {
                validate_guid(raw).map_err(|_| DomainError::invalid(name, "not a valid guid"))?;
                Ok(PropertyValue::Text(raw.to_string()))
            }
            PropertyKind::Boolean => parse_boolean(raw)
                .map(PropertyValue::Boolean)
                .ok_or_else(|| DomainError::invalid(name, format!("not a boolean: {raw}"))),
            PropertyKind::Timestamp => parse_timestamp(raw)
                .map(PropertyValue::Timestamp)
                .ok_or_else(|| DomainError::invalid(name, format!("not a timestamp: {raw}"))),
        }
    }
}

fn parse_boolean(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// A typed property value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Text(String),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
}

impl PropertyValue {
    /// String form used on the wire and in signature payloads.
    pub fn to_wire_string(&self) -> String {
        match self {
            PropertyValue::Text(text) => text.clone(),
            PropertyValue::Boolean(value) => value.to_string(),
            PropertyValue::Timestamp(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            PropertyValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire_string())
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(value: DateTime<Utc>) -> Self {
        PropertyValue::Timestamp(value)
    }
}

/// Declaration of a single entity property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertySpec {
    /// Canonical property name
    pub name: &'static str,
    pub kind: PropertyKind,
    /// Alternative element name accepted on the wire (older protocol versions)
    pub alias: Option<&'static str>,
    pub required: bool,
}

impl PropertySpec {
    pub const fn required(name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            kind,
            alias: None,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: PropertyKind) -> Self {
        Self {
            name,
            kind,
            alias: None,
            required: false,
        }
    }

    pub const fn with_alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Whether a wire field name refers to this property.
    pub fn matches(&self, wire_name: &str) -> bool {
        self.name == wire_name || self.alias == Some(wire_name)
    }
}

/// Find the property a wire field name refers to, by name or alias.
pub fn find_property<'a>(specs: &'a [PropertySpec], wire_name: &str) -> Option<&'a PropertySpec> {
    specs.iter().find(|spec| spec.matches(wire_name))
}

/// Key of a property in a signature order.
///
/// Names the running schema understands are normalized to their canonical
/// `&'static str`; anything else is kept exactly as received so that fields
/// from newer protocol versions keep their place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKey {
    Known(&'static str),
    Unknown(String),
}

impl PropertyKey {
    pub fn as_str(&self) -> &str {
        match self {
            PropertyKey::Known(name) => name,
            PropertyKey::Unknown(name) => name,
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PropertyKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
