//! Relayable Trust Layer
//!
//! This crate implements the integrity layer for relayable federation
//! objects (comments, likes, poll participations):
//! - Canonical signature strings in wire order or per-type legacy order
//! - Author and parent author signatures, produced lazily and verified on receipt
//! - Forward-compatible wire handling that carries unknown fields through
//! - Parent resolution: local lookup, one remote fetch, local lookup again
//!
//! Collaborators (keys, local storage, remote fetch) are supplied through a
//! [`FederationContext`].

pub mod context;
pub mod entities;
pub mod error;
pub mod parent;
pub mod ports;
pub mod relayable;
pub mod signature_data;
pub mod signatures;
pub mod wire;

pub use context::FederationContext;
pub use entities::{Comment, Like, PollParticipation};
pub use error::{RelayError, Result};
pub use parent::resolve_parent;
pub use ports::{EntityStore, FetchError, InMemoryEntityStore, NoRemoteFetch, RemoteFetcher};
pub use relayable::{
    parse_json, parse_json_str, parse_markup, Relayable, RelayableCore, RelayableType,
    RELAYABLE_PROPERTIES,
};
pub use signature_data::{
    build_signature_data, normalize_order, SignatureOrder, AUTHOR_SIGNATURE,
    PARENT_AUTHOR_SIGNATURE, SIGNATURE_SEPARATOR,
};
pub use signatures::{SignatureEngine, SignatureKind, SignaturePair};
pub use wire::{InboundFields, MarkupDocument, WireElement};
