//! Cryptographic primitives for Federa relayables.
//!
//! This crate provides the asymmetric-key foundation of the relayable trust
//! layer: key lookup, payload signing and verification, and key encoding.
//!
//! # Core Capabilities
//!
//! - **Key Lookup**: [`KeyProvider`] seam with an in-memory keyring backend
//! - **Signatures**: Ed25519 over canonical signature strings, base64 on the wire
//! - **Fingerprints**: BLAKE3 key identifiers for log lines
//!
//! # Security Principles
//!
//! - Never roll custom cryptographic primitives
//! - Secrets must never be logged or hardcoded
//! - Seed bytes are zeroized after keys are decoded

pub mod keys;
pub mod signing;

pub use keys::{
    decode_public_key, decode_signing_key, encode_public_key, key_fingerprint, InMemoryKeyStore,
    KeyProvider,
};
pub use signing::{
    sign_payload, verify_payload, SigningError, SigningMetrics, SigningMetricsSnapshot,
    SIGNATURE_LENGTH,
};

pub use ed25519_dalek::{SigningKey, VerifyingKey};
