//! Dual-signature integration tests
//!
//! Covers signature production rules (lazy, idempotent, parent author key
//! optional) and the verification rules that depend on `parent.local`.

use crate::test_utils::*;
use federa_crypto::sign_payload;
use federa_relay::{
    parse_markup, Relayable, RelayableCore, RelayableType, RelayError, AUTHOR_SIGNATURE,
    PARENT_AUTHOR_SIGNATURE,
};

#[test]
fn test_legacy_canonical_string_sign_and_verify() {
    init_tracing();
    let pod = TestPod::new(keyring(&[BOB], &[]));
    let mut relayable = some_relayable(alice_post(true), "hello");

    assert_eq!(
        relayable.signature_data(),
        format!("{RELAYABLE_GUID};{BOB};hello;{POST_GUID}")
    );

    let signatures = relayable.sign(&pod.ctx).unwrap();
    assert!(!signatures.author_signature.is_empty());
    assert!(relayable.verify_signatures(&pod.ctx).is_ok());
}

#[test]
fn test_verify_without_author_public_key() {
    let author_pod = TestPod::new(keyring(&[BOB], &[]));
    let other_pod = TestPod::new(keyring(&[], &[ALICE]));
    let mut relayable = some_relayable(alice_post(true), "hello");
    relayable.sign(&author_pod.ctx).unwrap();

    let err = relayable.verify_signatures(&other_pod.ctx).unwrap_err();
    assert!(matches!(
        err,
        RelayError::PublicKeyNotFound { signature: AUTHOR_SIGNATURE, ref person, .. } if person == BOB
    ));
}

#[test]
fn test_missing_author_private_key() {
    let pod = TestPod::new(keyring(&[ALICE], &[BOB]));
    let mut relayable = some_relayable(alice_post(true), "hello");

    let err = relayable.sign(&pod.ctx).unwrap_err();
    assert!(matches!(err, RelayError::AuthorPrivateKeyNotFound { ref author, .. } if author == BOB));
    assert!(relayable.core().author_signature().is_none());
}

#[test]
fn test_missing_parent_author_key_yields_empty_signature_and_retries() {
    let pod = TestPod::new(keyring(&[BOB], &[ALICE]));
    let mut relayable = some_relayable(alice_post(false), "hello");

    let first = relayable.sign(&pod.ctx).unwrap();
    assert!(first.parent_author_signature.is_empty());
    assert_eq!(pod.keys.private_lookups(), 2);

    let second = relayable.sign(&pod.ctx).unwrap();
    assert_eq!(second, first);
    // author signature reused, parent author key asked for again
    assert_eq!(pod.keys.private_lookups(), 3);
}

#[test]
fn test_serialization_is_idempotent_once_signed() {
    let pod = TestPod::new(keyring(&[ALICE, BOB], &[]));
    let mut relayable = some_relayable(alice_post(true), "hello");

    let first = relayable.to_markup(&pod.ctx).unwrap();
    let lookups = pod.keys.private_lookups();
    let second = relayable.to_markup(&pod.ctx).unwrap();

    assert_eq!(first, second);
    assert_eq!(pod.keys.private_lookups(), lookups);
    assert_eq!(pod.ctx.metrics().signatures_created, 2);
}

#[test]
fn test_local_parent_never_requires_parent_author_signature() {
    let author_pod = TestPod::new(keyring(&[BOB], &[ALICE]));
    let document = some_relayable(alice_post(false), "hello")
        .to_markup(&author_pod.ctx)
        .unwrap();
    assert_eq!(document.get(PARENT_AUTHOR_SIGNATURE), None);

    // Alice's pod does not even need Alice's public key here
    let home_pod = TestPod::with_entity(keyring(&[], &[BOB]), alice_post(true));
    let parsed = parse_markup::<SomeRelayable>(&home_pod.ctx, &document).unwrap();
    assert!(parsed.core().parent().local);
    assert!(parsed.core().parent_author_signature().is_none());
}

#[test]
fn test_local_parent_ignores_invalid_parent_author_signature() {
    let author_pod = TestPod::new(keyring(&[BOB], &[ALICE]));
    let document = some_relayable(alice_post(false), "hello")
        .to_markup(&author_pod.ctx)
        .unwrap()
        .with_element(PARENT_AUTHOR_SIGNATURE, "bm90IGEgc2lnbmF0dXJl");

    let home_pod = TestPod::with_entity(keyring(&[], &[ALICE, BOB]), alice_post(true));
    let parsed = parse_markup::<SomeRelayable>(&home_pod.ctx, &document).unwrap();
    assert!(parsed.core().parent().local);
    assert_eq!(home_pod.ctx.metrics().signatures_rejected, 0);
}

#[test]
fn test_preset_signatures_are_emitted_unchanged() {
    let pod = TestPod::new(keyring(&[ALICE, BOB], &[]));
    let core = RelayableCore::new(RELAYABLE_GUID, BOB, alice_post(true))
        .unwrap()
        .with_author_signature("preset-author")
        .with_parent_author_signature("preset-parent");
    let mut relayable = SomeRelayable::new(core, "hello");

    let signatures = relayable.sign(&pod.ctx).unwrap();
    assert_eq!(signatures.author_signature, "preset-author");
    assert_eq!(signatures.parent_author_signature, "preset-parent");

    let document = relayable.to_markup(&pod.ctx).unwrap();
    assert_eq!(document.get(AUTHOR_SIGNATURE), Some("preset-author"));
    assert_eq!(document.get(PARENT_AUTHOR_SIGNATURE), Some("preset-parent"));
    assert_eq!(pod.keys.private_lookups(), 0);
    assert_eq!(pod.ctx.metrics().signatures_created, 0);
}

#[test]
fn test_remote_parent_requires_parent_author_signature() {
    let author_pod = TestPod::new(keyring(&[BOB], &[ALICE]));
    let document = some_relayable(alice_post(false), "hello")
        .to_markup(&author_pod.ctx)
        .unwrap();

    let downstream = TestPod::with_entity(keyring(&[], &[ALICE, BOB]), alice_post(false));
    let err = parse_markup::<SomeRelayable>(&downstream.ctx, &document).unwrap_err();
    assert!(matches!(err, RelayError::SignatureVerificationFailed(_)));
}

#[test]
fn test_remote_parent_without_parent_author_public_key() {
    let home_pod = TestPod::new(keyring(&[ALICE, BOB], &[]));
    let document = some_relayable(alice_post(true), "hello")
        .to_markup(&home_pod.ctx)
        .unwrap();

    let downstream = TestPod::with_entity(keyring(&[], &[BOB]), alice_post(false));
    let err = parse_markup::<SomeRelayable>(&downstream.ctx, &document).unwrap_err();
    assert!(matches!(
        err,
        RelayError::PublicKeyNotFound { signature: PARENT_AUTHOR_SIGNATURE, ref person, .. } if person == ALICE
    ));
}

#[test]
fn test_remote_parent_with_forged_parent_author_signature() {
    let home_pod = TestPod::new(keyring(&[ALICE, BOB], &[]));
    let mut document = some_relayable(alice_post(true), "hello")
        .to_markup(&home_pod.ctx)
        .unwrap();

    let forged = sign_payload(&signing_key(ALICE), "something else");
    for element in &mut document.elements {
        if element.name == PARENT_AUTHOR_SIGNATURE {
            element.value = Some(forged.clone());
        }
    }

    let downstream = TestPod::with_entity(keyring(&[], &[ALICE, BOB]), alice_post(false));
    let err = parse_markup::<SomeRelayable>(&downstream.ctx, &document).unwrap_err();
    assert!(matches!(err, RelayError::SignatureVerificationFailed(_)));
    assert_eq!(downstream.ctx.metrics().signatures_rejected, 1);
}

#[test]
fn test_sender_valid_only_for_author_and_parent_author() {
    let relayable = some_relayable(alice_post(false), "hello");

    assert!(relayable.sender_valid(BOB));
    assert!(relayable.sender_valid(ALICE));
    assert!(!relayable.sender_valid(CAROL));
    assert!(!relayable.sender_valid(""));
}
