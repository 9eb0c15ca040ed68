//! Parent Resolution Protocol
//!
//! A relayable cannot be accepted without its parent: the parent decides
//! whose keys apply. Lookup is local first, then one remote fetch addressed
//! to the relayable's author, then local once more. There is no further
//! retry or backoff.

use federa_domain::RelatedEntity;

use crate::context::FederationContext;
use crate::error::{RelayError, Result};

/// Resolve the parent of a relayable authored by `author`.
pub fn resolve_parent(
    ctx: &FederationContext,
    author: &str,
    parent_type: &str,
    parent_guid: &str,
) -> Result<RelatedEntity> {
    if let Some(parent) = lookup_local(ctx, parent_type, parent_guid) {
        return Ok(parent);
    }

    tracing::info!(
        event = "fetch_parent",
        status = "remote",
        author = %author,
        parent_type = %parent_type,
        parent_guid = %parent_guid,
        "Parent not found locally, fetching from author's pod"
    );

    if let Err(err) = ctx
        .remote_fetcher()
        .fetch_public(author, parent_type, parent_guid)
    {
        tracing::warn!(
            event = "fetch_parent",
            status = "error",
            author = %author,
            parent_type = %parent_type,
            parent_guid = %parent_guid,
            error = %err,
            "Remote parent fetch failed"
        );
    }

    lookup_local(ctx, parent_type, parent_guid).ok_or_else(|| {
        RelayError::Validation(format!(
            "parent not found: {parent_type}:{parent_guid} (author={author})"
        ))
    })
}

fn lookup_local(ctx: &FederationContext, parent_type: &str, parent_guid: &str) -> Option<RelatedEntity> {
    let parent = ctx
        .entity_store()
        .fetch_related_entity(parent_type, parent_guid);

    tracing::debug!(
        event = "fetch_parent",
        status = if parent.is_some() { "found" } else { "missing" },
        parent_type = %parent_type,
        parent_guid = %parent_guid,
        local = parent.as_ref().map(|p| p.local),
        "Local parent lookup"
    );

    parent
}
