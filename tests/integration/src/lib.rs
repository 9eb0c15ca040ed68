//! Integration tests for the relayable trust layer
//!
//! This test suite validates:
//! - Canonical signature strings and the legacy/wire order split
//! - Dual signatures across home-pod and downstream-pod contexts
//! - Forward compatibility with fields from newer protocol versions
//! - Parent resolution through the remote fetch collaborator
//! - Concurrent verification against one shared context

pub mod test_utils;


#[cfg(test)]
mod forward_compat_tests;



#[cfg(test)]
mod signature_tests;
