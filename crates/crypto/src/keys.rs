//! Key management
//!
//! Provides the key lookup seam used by signature production and
//! verification, plus an in-memory keyring backend.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::{SigningKey, VerifyingKey};
use federa_core::KeyEntry;
use std::collections::HashMap;
use zeroize::Zeroize;

use crate::signing::{Result, SigningError};

/// Key lookup for pluggable backends.
///
/// `None` means the key is not held by this pod. For private keys that is an
/// expected outcome for every identity not hosted locally.
pub trait KeyProvider: Send + Sync {
    /// Signing key for `identity`, if held locally
    fn fetch_private_key(&self, identity: &str) -> Option<SigningKey>;

    /// Verification key for `identity`
    fn fetch_public_key(&self, identity: &str) -> Option<VerifyingKey>;
}

/// In-memory keyring for development, testing and small pods.
#[derive(Clone, Default)]
pub struct InMemoryKeyStore {
    signing_keys: HashMap<String, SigningKey>,
    public_keys: HashMap<String, VerifyingKey>,
}

impl InMemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a keyring from configured entries.
    pub fn from_keyring(entries: &[KeyEntry]) -> Result<Self> {
        let mut store = Self::new();

        for entry in entries {
            if let Some(private_key) = &entry.private_key {
                let signing_key = decode_signing_key(private_key)?;
                store.insert_signing_key(&entry.identity, signing_key);
            }
            if let Some(public_key) = &entry.public_key {
                let verifying_key = decode_public_key(public_key)?;
                store.insert_public_key(&entry.identity, verifying_key);
            }
        }

        tracing::debug!(entries = entries.len(), "Keyring loaded");
        Ok(store)
    }

    /// Generate a new Ed25519 keypair for an identity and return the
    /// base64 public key.
    pub fn generate_key(&mut self, identity: &str) -> String {
        use rand::RngCore;
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);

        let signing_key = SigningKey::from_bytes(&bytes);
        bytes.zeroize();

        let public_key = encode_public_key(&signing_key.verifying_key());
        self.insert_signing_key(identity, signing_key);
        public_key
    }

    /// Store a signing key. The matching public key is stored as well.
    pub fn insert_signing_key(&mut self, identity: &str, signing_key: SigningKey) {
        self.public_keys
            .insert(identity.to_string(), signing_key.verifying_key());
        self.signing_keys.insert(identity.to_string(), signing_key);
    }

    /// Store a public key for a remote identity.
    pub fn insert_public_key(&mut self, identity: &str, verifying_key: VerifyingKey) {
        self.public_keys.insert(identity.to_string(), verifying_key);
    }
}

impl KeyProvider for InMemoryKeyStore {
    fn fetch_private_key(&self, identity: &str) -> Option<SigningKey> {
        self.signing_keys.get(identity).cloned()
    }

    fn fetch_public_key(&self, identity: &str) -> Option<VerifyingKey> {
        self.public_keys.get(identity).copied()
    }
}

/// Encode a public key as base64.
pub fn encode_public_key(key: &VerifyingKey) -> String {
    BASE64.encode(key.as_bytes())
}

/// Decode a base64 public key.
pub fn decode_public_key(encoded: &str) -> Result<VerifyingKey> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| SigningError::InvalidKey(format!("Invalid public key base64: {}", e)))?;

    let bytes: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
        SigningError::InvalidKey(format!("Public key must be 32 bytes, got {}", bytes.len()))
    })?;

    VerifyingKey::from_bytes(&bytes)
        .map_err(|e| SigningError::InvalidKey(format!("Invalid Ed25519 public key: {}", e)))
}

/// Decode a base64 32 byte seed into a signing key.
///
/// # Security
/// The intermediate seed bytes are zeroized after use.
pub fn decode_signing_key(encoded: &str) -> Result<SigningKey> {
    let mut bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| SigningError::InvalidKey(format!("Invalid private key base64: {}", e)))?;

    if bytes.len() != 32 {
        let len = bytes.len();
        bytes.zeroize();
        return Err(SigningError::InvalidKey(format!(
            "Private key seed must be 32 bytes, got {}",
            len
        )));
    }

    let mut seed = [0u8; 32];
    seed.copy_from_slice(&bytes);
    let signing_key = SigningKey::from_bytes(&seed);

    seed.zeroize();
    bytes.zeroize();

    Ok(signing_key)
}

/// Stable short identifier of a public key, for log lines.
pub fn key_fingerprint(key: &VerifyingKey) -> String {
    let hash = blake3::hash(key.as_bytes());
    // First 16 bytes as hex string
    hex::encode(&hash.as_bytes()[..16])
}
