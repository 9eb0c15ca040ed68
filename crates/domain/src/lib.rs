//! Domain module for Federa
//!
//! This crate contains pure domain logic with no I/O dependencies:
//! - Typed property values and property declarations
//! - Related entity (parent reference) model
//! - Guid and federation identity rules

pub mod error;
pub mod guid;
pub mod property;
pub mod related_entity;

pub use error::{DomainError, Result};
pub use guid::{generate_guid, validate_guid, validate_identity};
pub use property::{
    find_property, PropertyKey, PropertyKind, PropertyMap, PropertySpec, PropertyValue,
    TIMESTAMP_FORMAT,
};
pub use related_entity::RelatedEntity;
