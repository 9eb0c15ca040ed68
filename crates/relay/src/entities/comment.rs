use chrono::{DateTime, SubsecRound, Utc};
use federa_domain::{PropertyKind, PropertyMap, PropertySpec, PropertyValue};
use std::fmt;

use super::take_text;
use crate::error::Result;
use crate::relayable::{Relayable, RelayableCore, RelayableType};

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    core: RelayableCore,
    text: String,
    created_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// New local comment, timestamped now (second precision).
    pub fn new(core: RelayableCore, text: impl Into<String>) -> Self {
        Self {
            core,
            text: text.into(),
            created_at: Some(Utc::now().trunc_subsecs(0)),
        }
    }

    pub fn with_created_at(mut self, created_at: Option<DateTime<Utc>>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl RelayableType for Comment {
    const ENTITY_TYPE: &'static str = "Comment";
    const WIRE_NAME: &'static str = "comment";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required("text", PropertyKind::Text),
        PropertySpec::optional("created_at", PropertyKind::Timestamp),
    ];
    const LEGACY_SIGNATURE_ORDER: &'static [&'static str] =
        &["guid", "parent_guid", "text", "author", "created_at"];
    const PARENT_TYPE: Option<&'static str> = Some("Post");

    fn core(&self) -> &RelayableCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RelayableCore {
        &mut self.core
    }

    fn properties(&self) -> PropertyMap {
        let mut properties = PropertyMap::new();
        properties.insert("text", PropertyValue::from(self.text.as_str()));
        if let Some(created_at) = self.created_at {
            properties.insert("created_at", created_at.into());
        }
        properties
    }

    fn from_properties(core: RelayableCore, mut properties: PropertyMap) -> Result<Self> {
        Ok(Self {
            core,
            text: take_text(&mut properties, "text")?,
            created_at: properties
                .remove("created_at")
                .and_then(|value| value.as_timestamp()),
        })
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entity_label())
    }
}
