use federa_domain::{PropertyKind, PropertyMap, PropertySpec};
use std::fmt;

use super::{take_bool, take_text};
use crate::error::Result;
use crate::relayable::{Relayable, RelayableCore, RelayableType};

/// A like or dislike. Unlike comments, likes name their parent type on the
/// wire, so they can target posts as well as comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Like {
    core: RelayableCore,
    positive: bool,
    parent_type: String,
}

impl Like {
    pub fn new(core: RelayableCore, positive: bool) -> Self {
        let parent_type = core.parent().entity_type.clone();
        Self {
            core,
            positive,
            parent_type,
        }
    }

    pub fn positive(&self) -> bool {
        self.positive
    }

    pub fn parent_type(&self) -> &str {
        &self.parent_type
    }
}

impl RelayableType for Like {
    const ENTITY_TYPE: &'static str = "Like";
    const WIRE_NAME: &'static str = "like";
    const PROPERTIES: &'static [PropertySpec] = &[
        PropertySpec::required("positive", PropertyKind::Boolean),
        PropertySpec::required("parent_type", PropertyKind::Text),
    ];
    const LEGACY_SIGNATURE_ORDER: &'static [&'static str] =
        &["positive", "guid", "parent_type", "parent_guid", "author"];
    const PARENT_TYPE: Option<&'static str> = None;

    fn core(&self) -> &RelayableCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RelayableCore {
        &mut self.core
    }

    fn properties(&self) -> PropertyMap {
        let mut properties = PropertyMap::new();
        properties.insert("positive", self.positive.into());
        properties.insert("parent_type", self.parent_type.as_str().into());
        properties
    }

    fn from_properties(core: RelayableCore, mut properties: PropertyMap) -> Result<Self> {
        Ok(Self {
            core,
            positive: take_bool(&mut properties, "positive")?,
            parent_type: take_text(&mut properties, "parent_type")?,
        })
    }
}

impl fmt::Display for Like {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entity_label())
    }
}
