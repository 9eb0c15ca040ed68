//! Concrete relayable types

mod comment;
mod like;
mod poll_participation;

pub use comment::Comment;
pub use like::Like;
pub use poll_participation::PollParticipation;

use federa_domain::{DomainError, PropertyMap, PropertyValue};

use crate::error::Result;

fn take(properties: &mut PropertyMap, name: &'static str) -> Result<PropertyValue> {
    properties
        .remove(name)
        .ok_or_else(|| DomainError::MissingProperty(name.to_string()).into())
}

fn wrong_kind(name: &'static str, expected: &str) -> crate::error::RelayError {
    DomainError::InvalidProperty {
        name: name.to_string(),
        reason: format!("expected {expected}"),
    }
    .into()
}

pub(crate) fn take_text(properties: &mut PropertyMap, name: &'static str) -> Result<String> {
    match take(properties, name)? {
        PropertyValue::Text(text) => Ok(text),
        _ => Err(wrong_kind(name, "text")),
    }
}

pub(crate) fn take_bool(properties: &mut PropertyMap, name: &'static str) -> Result<bool> {
    take(properties, name)?
        .as_bool()
        .ok_or_else(|| wrong_kind(name, "boolean"))
}
