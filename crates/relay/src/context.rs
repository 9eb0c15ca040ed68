//! Federation context
//!
//! Explicit bundle of the collaborators the relayable layer calls out to.
//! Built once at startup and passed to every parse/sign/verify call; it is
//! immutable afterwards, and several contexts may coexist in one process.

use federa_core::Config;
use federa_crypto::{InMemoryKeyStore, KeyProvider, SigningMetricsSnapshot};
use std::sync::Arc;

use crate::error::{RelayError, Result};
use crate::ports::{EntityStore, RemoteFetcher};
use crate::signatures::SignatureEngine;

#[derive(Clone)]
pub struct FederationContext {
    signatures: Arc<SignatureEngine>,
    entities: Arc<dyn EntityStore>,
    fetcher: Arc<dyn RemoteFetcher>,
}

impl FederationContext {
    pub fn new(
        keys: Arc<dyn KeyProvider>,
        entities: Arc<dyn EntityStore>,
        fetcher: Arc<dyn RemoteFetcher>,
    ) -> Self {
        Self {
            signatures: Arc::new(SignatureEngine::new(keys)),
            entities,
            fetcher,
        }
    }

    /// Build a context whose key provider is the configured keyring.
    pub fn from_config(
        config: &Config,
        entities: Arc<dyn EntityStore>,
        fetcher: Arc<dyn RemoteFetcher>,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| RelayError::Configuration(e.to_string()))?;

        let keys = InMemoryKeyStore::from_keyring(&config.keys)?;

        tracing::info!(
            pod = %config.federation.pod_host,
            keys = config.keys.len(),
            "Federation context initialized"
        );

        Ok(Self::new(Arc::new(keys), entities, fetcher))
    }

    pub fn signatures(&self) -> &SignatureEngine {
        &self.signatures
    }

    pub fn entity_store(&self) -> &dyn EntityStore {
        self.entities.as_ref()
    }

    pub fn remote_fetcher(&self) -> &dyn RemoteFetcher {
        self.fetcher.as_ref()
    }

    /// Signing and verification counters of this context.
    pub fn metrics(&self) -> SigningMetricsSnapshot {
        self.signatures.metrics()
    }
}
