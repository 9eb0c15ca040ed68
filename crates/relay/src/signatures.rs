//! Dual-Signature Engine
//!
//! Produces and verifies the author signature and the parent author
//! signature of relayables over their canonical signature string.

use federa_crypto::{
    key_fingerprint, sign_payload, verify_payload, KeyProvider, SigningError, SigningMetrics,
    SigningMetricsSnapshot,
};
use std::sync::Arc;

use crate::error::{RelayError, Result};
use crate::signature_data::{AUTHOR_SIGNATURE, PARENT_AUTHOR_SIGNATURE};

/// Which of the two relayable signatures is being handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureKind {
    Author,
    ParentAuthor,
}

impl SignatureKind {
    /// Wire name of the signature field
    pub fn field_name(&self) -> &'static str {
        match self {
            SignatureKind::Author => AUTHOR_SIGNATURE,
            SignatureKind::ParentAuthor => PARENT_AUTHOR_SIGNATURE,
        }
    }
}

/// Signatures emitted with an outbound relayable.
///
/// `parent_author_signature` is empty when this pod does not hold the
/// parent author's key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePair {
    pub author_signature: String,
    pub parent_author_signature: String,
}

/// Signature engine bound to a key provider
pub struct SignatureEngine {
    keys: Arc<dyn KeyProvider>,
    metrics: SigningMetrics,
}

impl SignatureEngine {
    pub fn new(keys: Arc<dyn KeyProvider>) -> Self {
        Self {
            keys,
            metrics: SigningMetrics::default(),
        }
    }

    /// Sign `data` with the author's private key.
    ///
    /// A relayable is never sent without its author's signature, so a
    /// missing key is fatal.
    pub fn sign_as_author(&self, author: &str, data: &str, entity: &str) -> Result<String> {
        let key = self.keys.fetch_private_key(author).ok_or_else(|| {
            RelayError::AuthorPrivateKeyNotFound {
                author: author.to_string(),
                entity: entity.to_string(),
            }
        })?;

        let signature = sign_payload(&key, data);
        self.metrics.record_created();

        tracing::info!(
            event = "sign",
            status = "complete",
            signature = AUTHOR_SIGNATURE,
            author = %author,
            key = %key_fingerprint(&key.verifying_key()),
            obj = %entity,
            "Signed relayable"
        );

        Ok(signature)
    }

    /// Sign `data` with the parent author's private key if this pod holds it.
    ///
    /// Holding that key means this pod is the parent's home pod and must
    /// attest the relayable before fanning it out. `None` is the normal
    /// outcome everywhere else.
    pub fn sign_as_parent_author_if_available(
        &self,
        parent_author: &str,
        data: &str,
        entity: &str,
    ) -> Option<String> {
        let key = self.keys.fetch_private_key(parent_author)?;

        let signature = sign_payload(&key, data);
        self.metrics.record_created();

        tracing::info!(
            event = "sign",
            status = "complete",
            signature = PARENT_AUTHOR_SIGNATURE,
            author = %parent_author,
            key = %key_fingerprint(&key.verifying_key()),
            obj = %entity,
            "Signed relayable as parent author"
        );

        Some(signature)
    }

    /// Verify one signature of a relayable.
    ///
    /// The signer's public key is looked up first; a missing key is reported
    /// as [`RelayError::PublicKeyNotFound`] even when the signature itself is
    /// missing too.
    pub fn verify(
        &self,
        kind: SignatureKind,
        signer: &str,
        signature: Option<&str>,
        data: &str,
        entity: &str,
    ) -> Result<()> {
        let field = kind.field_name();

        let Some(public_key) = self.keys.fetch_public_key(signer) else {
            self.metrics.record_rejected();
            tracing::warn!(
                event = "verify",
                status = "failed",
                signature = field,
                person = %signer,
                obj = %entity,
                "Public key not found"
            );
            return Err(RelayError::PublicKeyNotFound {
                signature: field,
                person: signer.to_string(),
                entity: entity.to_string(),
            });
        };

        let Some(signature) = signature.filter(|s| !s.is_empty()) else {
            self.metrics.record_rejected();
            tracing::warn!(
                event = "verify",
                status = "failed",
                signature = field,
                obj = %entity,
                "Signature missing"
            );
            return Err(RelayError::SignatureVerificationFailed(format!(
                "no {field} for {entity}"
            )));
        };

        match verify_payload(&public_key, data, signature) {
            Ok(()) => {
                self.metrics.record_verified();
                tracing::debug!(
                    event = "verify",
                    status = "complete",
                    signature = field,
                    person = %signer,
                    obj = %entity
                );
                Ok(())
            }
            Err(err) => {
                self.metrics.record_rejected();
                tracing::warn!(
                    event = "verify",
                    status = "failed",
                    signature = field,
                    person = %signer,
                    obj = %entity,
                    error = %err,
                    "Signature verification failed"
                );
                let reason = match err {
                    SigningError::VerificationFailed => format!("wrong {field} for {entity}"),
                    other => format!("malformed {field} for {entity}: {other}"),
                };
                Err(RelayError::SignatureVerificationFailed(reason))
            }
        }
    }

    /// Gets a snapshot of current metrics.
    pub fn metrics(&self) -> SigningMetricsSnapshot {
        self.metrics.snapshot()
    }
}
