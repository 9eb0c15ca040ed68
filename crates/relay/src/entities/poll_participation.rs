use federa_domain::{PropertyKind, PropertyMap, PropertySpec};
use std::fmt;

use super::take_text;
use crate::error::Result;
use crate::relayable::{Relayable, RelayableCore, RelayableType};

/// An answer to a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollParticipation {
    core: RelayableCore,
    poll_answer_guid: String,
}

impl PollParticipation {
    pub fn new(core: RelayableCore, poll_answer_guid: impl Into<String>) -> Self {
        Self {
            core,
            poll_answer_guid: poll_answer_guid.into(),
        }
    }

    pub fn poll_answer_guid(&self) -> &str {
        &self.poll_answer_guid
    }
}

impl RelayableType for PollParticipation {
    const ENTITY_TYPE: &'static str = "PollParticipation";
    const WIRE_NAME: &'static str = "poll_participation";
    const PROPERTIES: &'static [PropertySpec] =
        &[PropertySpec::required("poll_answer_guid", PropertyKind::Guid)];
    const LEGACY_SIGNATURE_ORDER: &'static [&'static str] =
        &["guid", "parent_guid", "author", "poll_answer_guid"];
    const PARENT_TYPE: Option<&'static str> = Some("Poll");

    fn core(&self) -> &RelayableCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RelayableCore {
        &mut self.core
    }

    fn properties(&self) -> PropertyMap {
        let mut properties = PropertyMap::new();
        properties.insert("poll_answer_guid", self.poll_answer_guid.as_str().into());
        properties
    }

    fn from_properties(core: RelayableCore, mut properties: PropertyMap) -> Result<Self> {
        Ok(Self {
            core,
            poll_answer_guid: take_text(&mut properties, "poll_answer_guid")?,
        })
    }
}

impl fmt::Display for PollParticipation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.entity_label())
    }
}
