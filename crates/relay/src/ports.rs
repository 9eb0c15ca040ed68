//! # Collaborator Ports
//!
//! Traits for the persistence and network collaborators the relayable layer
//! depends on. Key lookup lives in `federa_crypto::KeyProvider`.
//!
//! All calls are blocking from this layer's point of view. Hosts with an
//! async stack own timeouts and retries around [`RemoteFetcher`].

use federa_domain::RelatedEntity;
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Error from a remote fetch.
///
/// The relayable layer only logs these: the follow-up local lookup decides
/// whether resolution succeeded.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote pod does not serve this object publicly
    #[error("Entity not fetchable: {0}")]
    NotFetchable(String),
}

/// Local lookup of previously stored objects.
pub trait EntityStore: Send + Sync {
    /// Projection of the stored object of `entity_type` with `guid`, if any
    fn fetch_related_entity(&self, entity_type: &str, guid: &str) -> Option<RelatedEntity>;
}

/// Remote retrieval of public objects.
pub trait RemoteFetcher: Send + Sync {
    /// Fetch the public representation of `entity_type`/`guid` from the pod
    /// serving `author`, and store it locally when retrievable.
    fn fetch_public(&self, author: &str, entity_type: &str, guid: &str) -> Result<(), FetchError>;
}

/// Fetcher for pods that never reach out to other pods.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemoteFetch;

impl RemoteFetcher for NoRemoteFetch {
    fn fetch_public(&self, _author: &str, entity_type: &str, guid: &str) -> Result<(), FetchError> {
        Err(FetchError::NotFetchable(format!(
            "remote fetch disabled for {entity_type}:{guid}"
        )))
    }
}

/// In-memory entity store for development and testing.
///
/// Uses interior mutability so a shared store can be filled by a
/// [`RemoteFetcher`] while it is also being read.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    entities: RwLock<HashMap<(String, String), RelatedEntity>>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, entity: RelatedEntity) {
        let key = (entity.entity_type.clone(), entity.guid.clone());
        self.entities
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key, entity);
    }

    pub fn len(&self) -> usize {
        self.entities
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EntityStore for InMemoryEntityStore {
    fn fetch_related_entity(&self, entity_type: &str, guid: &str) -> Option<RelatedEntity> {
        self.entities
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&(entity_type.to_string(), guid.to_string()))
            .cloned()
    }
}
