//! Guid and federation identity rules

use rand::RngCore;

use crate::error::{DomainError, Result};

/// Minimum guid length accepted from the wire.
pub const GUID_MIN_LENGTH: usize = 16;
/// Maximum guid length accepted from the wire.
pub const GUID_MAX_LENGTH: usize = 255;

/// Generate a fresh random guid (32 lowercase hex characters).
pub fn generate_guid() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Check a guid against the federation guid rules.
pub fn validate_guid(guid: &str) -> Result<()> {
    if guid.len() < GUID_MIN_LENGTH || guid.len() > GUID_MAX_LENGTH {
        return Err(DomainError::invalid(
            "guid",
            format!(
                "length {} outside {}..={}",
                guid.len(),
                GUID_MIN_LENGTH,
                GUID_MAX_LENGTH
            ),
        ));
    }

    if !guid.chars().all(is_guid_char) {
        return Err(DomainError::invalid("guid", format!("illegal character in {guid}")));
    }

    Ok(())
}

fn is_guid_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '@' | ':')
}

/// Check a federation identity of the form `user@pod-host[:port]`.
pub fn validate_identity(identity: &str) -> Result<()> {
    let (user, host) = identity
        .split_once('@')
        .ok_or_else(|| DomainError::invalid("author", format!("missing '@' in {identity}")))?;

    let user_ok = !user.is_empty()
        && user
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    let host_ok = !host.is_empty()
        && !host.starts_with('.')
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | ':'));

    if !user_ok || !host_ok || identity.len() > GUID_MAX_LENGTH {
        return Err(DomainError::invalid(
            "author",
            format!("not a federation identity: {identity}"),
        ));
    }

    Ok(())
}
