//! Test utilities for relayable integration tests

use federa_crypto::{InMemoryKeyStore, KeyProvider, SigningKey, VerifyingKey};
use federa_domain::{PropertyKind, PropertyMap, PropertySpec, PropertyValue, RelatedEntity};
use federa_relay::{
    EntityStore, FederationContext, FetchError, InMemoryEntityStore, RelayError, RelayableCore,
    RelayableType, RemoteFetcher,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const ALICE: &str = "alice@pod-a.example";
pub const BOB: &str = "bob@pod-b.example";
pub const CAROL: &str = "carol@pod-c.example";

pub const POST_GUID: &str = "post0123456789abcdef";
pub const RELAYABLE_GUID: &str = "relayable0123456789a";

/// Install a test-friendly subscriber once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("federa_relay=debug")
        .with_test_writer()
        .try_init();
}

/// Deterministic signing key per identity
pub fn signing_key(identity: &str) -> SigningKey {
    let seed = match identity {
        ALICE => 1,
        BOB => 2,
        CAROL => 3,
        _ => 9,
    };
    SigningKey::from_bytes(&[seed; 32])
}

pub fn public_key(identity: &str) -> VerifyingKey {
    signing_key(identity).verifying_key()
}

/// Keyring holding the private keys of `local` and the public keys of `remote`.
pub fn keyring(local: &[&str], remote: &[&str]) -> InMemoryKeyStore {
    let mut keys = InMemoryKeyStore::new();
    for identity in local {
        keys.insert_signing_key(identity, signing_key(identity));
    }
    for identity in remote {
        keys.insert_public_key(identity, public_key(identity));
    }
    keys
}

/// Key provider that counts private key requests.
pub struct CountingKeyProvider {
    inner: InMemoryKeyStore,
    private_lookups: AtomicUsize,
}

impl CountingKeyProvider {
    pub fn new(inner: InMemoryKeyStore) -> Self {
        Self {
            inner,
            private_lookups: AtomicUsize::new(0),
        }
    }

    pub fn private_lookups(&self) -> usize {
        self.private_lookups.load(Ordering::Relaxed)
    }
}

impl KeyProvider for CountingKeyProvider {
    fn fetch_private_key(&self, identity: &str) -> Option<SigningKey> {
        self.private_lookups.fetch_add(1, Ordering::Relaxed);
        self.inner.fetch_private_key(identity)
    }

    fn fetch_public_key(&self, identity: &str) -> Option<VerifyingKey> {
        self.inner.fetch_public_key(identity)
    }
}

/// Remote fetch call as seen by [`RecordingFetcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub author: String,
    pub entity_type: String,
    pub guid: String,
}

/// Remote fetcher that records every call and, when it has the requested
/// object on offer, stores it locally like a real fetch would.
pub struct RecordingFetcher {
    store: Arc<InMemoryEntityStore>,
    remote: Mutex<HashMap<(String, String), RelatedEntity>>,
    calls: Mutex<Vec<FetchCall>>,
}

impl RecordingFetcher {
    pub fn new(store: Arc<InMemoryEntityStore>) -> Self {
        Self {
            store,
            remote: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make `entity` retrievable from its remote pod.
    pub fn offer(&self, entity: RelatedEntity) {
        self.remote
            .lock()
            .unwrap()
            .insert((entity.entity_type.clone(), entity.guid.clone()), entity);
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl RemoteFetcher for RecordingFetcher {
    fn fetch_public(&self, author: &str, entity_type: &str, guid: &str) -> Result<(), FetchError> {
        self.calls.lock().unwrap().push(FetchCall {
            author: author.to_string(),
            entity_type: entity_type.to_string(),
            guid: guid.to_string(),
        });

        let offered = self
            .remote
            .lock()
            .unwrap()
            .get(&(entity_type.to_string(), guid.to_string()))
            .cloned();
        match offered {
            Some(entity) => {
                self.store.insert(entity);
                Ok(())
            }
            None => Err(FetchError::NotFetchable(format!("{entity_type}:{guid}"))),
        }
    }
}

/// One pod: its context plus handles on the collaborators behind it.
pub struct TestPod {
    pub ctx: FederationContext,
    pub store: Arc<InMemoryEntityStore>,
    pub fetcher: Arc<RecordingFetcher>,
    pub keys: Arc<CountingKeyProvider>,
}

impl TestPod {
    pub fn new(keys: InMemoryKeyStore) -> Self {
        let store = Arc::new(InMemoryEntityStore::new());
        let fetcher = Arc::new(RecordingFetcher::new(store.clone()));
        let keys = Arc::new(CountingKeyProvider::new(keys));
        let ctx = FederationContext::new(keys.clone(), store.clone(), fetcher.clone());
        Self {
            ctx,
            store,
            fetcher,
            keys,
        }
    }

    /// Pod with `entity` already stored locally.
    pub fn with_entity(keys: InMemoryKeyStore, entity: RelatedEntity) -> Self {
        let pod = Self::new(keys);
        pod.store.insert(entity);
        pod
    }

    pub fn entity_store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }
}

/// Alice's post as seen from a pod; `local` only on Alice's pod.
pub fn alice_post(local: bool) -> RelatedEntity {
    RelatedEntity::new("Post", POST_GUID, ALICE, local)
}

/// Minimal relayable with one text property, parented to posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SomeRelayable {
    core: RelayableCore,
    property: String,
}

impl SomeRelayable {
    pub fn new(core: RelayableCore, property: impl Into<String>) -> Self {
        Self {
            core,
            property: property.into(),
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }
}

impl RelayableType for SomeRelayable {
    const ENTITY_TYPE: &'static str = "SomeRelayable";
    const WIRE_NAME: &'static str = "some_relayable";
    const PROPERTIES: &'static [PropertySpec] = &[PropertySpec::required("property", PropertyKind::Text)];
    const LEGACY_SIGNATURE_ORDER: &'static [&'static str] = &["guid", "author", "property", "parent_guid"];
    const PARENT_TYPE: Option<&'static str> = Some("Post");

    fn core(&self) -> &RelayableCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut RelayableCore {
        &mut self.core
    }

    fn properties(&self) -> PropertyMap {
        let mut properties = PropertyMap::new();
        properties.insert("property", PropertyValue::from(self.property.as_str()));
        properties
    }

    fn from_properties(core: RelayableCore, mut properties: PropertyMap) -> Result<Self, RelayError> {
        let property = properties
            .remove("property")
            .and_then(|value| value.as_text().map(str::to_string))
            .ok_or_else(|| RelayError::Validation("property".to_string()))?;
        Ok(Self { core, property })
    }
}

/// `SomeRelayable` by Bob on Alice's post.
pub fn some_relayable(parent: RelatedEntity, property: &str) -> SomeRelayable {
    let core = RelayableCore::new(RELAYABLE_GUID, BOB, parent).unwrap();
    SomeRelayable::new(core, property)
}
