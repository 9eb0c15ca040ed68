//! Payload Signing
//!
//! Ed25519 signing and verification of canonical signature strings.
//!
//! # Security Model
//!
//! - Signatures cover the exact UTF-8 bytes of the canonical string
//! - Signatures travel as standard base64
//! - Ed25519 signing is deterministic: the same key and payload always
//!   produce the same signature

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Length of a raw Ed25519 signature in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Errors that can occur during signing operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SigningError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid signature format: {0}")]
    InvalidSignature(String),

    #[error("Signature verification failed")]
    VerificationFailed,
}

pub type Result<T> = std::result::Result<T, SigningError>;

/// Sign a payload and return the base64 encoded signature.
pub fn sign_payload(key: &SigningKey, payload: &str) -> String {
    let signature = key.sign(payload.as_bytes());
    BASE64.encode(signature.to_bytes())
}

/// Verify a base64 encoded signature over a payload.
pub fn verify_payload(key: &VerifyingKey, payload: &str, signature_b64: &str) -> Result<()> {
    let bytes = BASE64
        .decode(signature_b64.trim())
        .map_err(|e| SigningError::InvalidSignature(format!("Invalid base64: {}", e)))?;

    let bytes: [u8; SIGNATURE_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
        SigningError::InvalidSignature(format!(
            "Signature must be {} bytes, got {}",
            SIGNATURE_LENGTH,
            bytes.len()
        ))
    })?;

    let signature = Signature::from_bytes(&bytes);
    key.verify(payload.as_bytes(), &signature)
        .map_err(|_| SigningError::VerificationFailed)
}

/// Counters for observability.
#[derive(Debug, Default)]
pub struct SigningMetrics {
    signatures_created: AtomicU64,
    signatures_verified: AtomicU64,
    signatures_rejected: AtomicU64,
}

/// Point-in-time copy of [`SigningMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SigningMetricsSnapshot {
    pub signatures_created: u64,
    pub signatures_verified: u64,
    pub signatures_rejected: u64,
}

impl SigningMetrics {
    pub fn record_created(&self) {
        self.signatures_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_verified(&self) {
        self.signatures_verified.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.signatures_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SigningMetricsSnapshot {
        SigningMetricsSnapshot {
            signatures_created: self.signatures_created.load(Ordering::Relaxed),
            signatures_verified: self.signatures_verified.load(Ordering::Relaxed),
            signatures_rejected: self.signatures_rejected.load(Ordering::Relaxed),
        }
    }
}
