//! Relayable error types

use federa_crypto::SigningError;
use federa_domain::DomainError;
use thiserror::Error;

/// Errors raised while constructing, parsing, signing or verifying relayables.
///
/// Every variant is terminal for the operation in progress.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Required field missing or malformed, or the parent could not be resolved
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No public key known for a signer at verification time
    #[error("Public key not found: signature={signature} person={person} obj={entity}")]
    PublicKeyNotFound {
        signature: &'static str,
        person: String,
        entity: String,
    },

    /// Signature missing or not valid for the canonical signature string
    #[error("Signature verification failed: {0}")]
    SignatureVerificationFailed(String),

    /// The author's private key is not held here, so the relayable cannot be sent
    #[error("Author private key not found: author={author} obj={entity}")]
    AuthorPrivateKeyNotFound { author: String, entity: String },

    /// Collaborator setup failed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Structured payload could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<DomainError> for RelayError {
    fn from(err: DomainError) -> Self {
        RelayError::Validation(err.to_string())
    }
}

impl From<SigningError> for RelayError {
    fn from(err: SigningError) -> Self {
        RelayError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
