//! Related Entity Domain Model
//!
//! Minimal projection of the object a relayable is attached to. Only the
//! fields needed to decide whose keys apply are carried.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::guid::{validate_guid, validate_identity};

/// Resolved reference to a parent object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedEntity {
    /// Entity type used for lookup (e.g. `Post`, `Poll`)
    pub entity_type: String,

    /// Guid of the referenced object
    pub guid: String,

    /// Author of the referenced object
    pub author: String,

    /// Whether the object was created on this pod. Decides whether a
    /// parent author signature is required on receipt.
    pub local: bool,
}

impl RelatedEntity {
    pub fn new(
        entity_type: impl Into<String>,
        guid: impl Into<String>,
        author: impl Into<String>,
        local: bool,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            guid: guid.into(),
            author: author.into(),
            local,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_guid(&self.guid)?;
        validate_identity(&self.author)
    }
}
