//! Forward compatibility tests
//!
//! A newer sender may add fields this build does not know. They must keep
//! their place in the signature order and survive re-serialization, or
//! relaying would break the sender's signature.

use crate::test_utils::*;
use federa_crypto::sign_payload;
use federa_domain::PropertyKey;
use federa_relay::{
    parse_json, parse_markup, MarkupDocument, Relayable, RelayableType, AUTHOR_SIGNATURE,
    PARENT_AUTHOR_SIGNATURE,
};
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeMap;

/// Markup as a newer pod would send it: `new_property` between
/// `parent_guid` and `property`, signed by Bob over the received order.
fn newer_sender_markup(property: &str, new_name: &str, new_value: &str) -> MarkupDocument {
    let data = [BOB, RELAYABLE_GUID, POST_GUID, new_value, property].join(";");
    MarkupDocument::new("some_relayable")
        .with_element("author", BOB)
        .with_element("guid", RELAYABLE_GUID)
        .with_element("parent_guid", POST_GUID)
        .with_element(new_name, new_value)
        .with_element("property", property)
        .with_element(AUTHOR_SIGNATURE, sign_payload(&signing_key(BOB), &data))
}

#[test]
fn test_unknown_field_is_kept_in_place() {
    init_tracing();
    let home_pod = TestPod::with_entity(keyring(&[ALICE], &[BOB]), alice_post(true));

    let parsed: SomeRelayable =
        parse_markup(&home_pod.ctx, &newer_sender_markup("hello", "new_property", "news")).unwrap();

    let expected: BTreeMap<String, String> =
        [("new_property".to_string(), "news".to_string())].into();
    assert_eq!(parsed.core().additional_data(), &expected);
    assert_eq!(
        parsed.core().wire_order().unwrap(),
        &[
            PropertyKey::Known("author"),
            PropertyKey::Known("guid"),
            PropertyKey::Known("parent_guid"),
            PropertyKey::Unknown("new_property".to_string()),
            PropertyKey::Known("property"),
        ]
    );
    assert_eq!(parsed.property(), "hello");
}

#[test]
fn test_unknown_field_survives_relay() {
    let home_pod = TestPod::with_entity(keyring(&[ALICE], &[BOB]), alice_post(true));
    let downstream = TestPod::with_entity(keyring(&[], &[ALICE, BOB]), alice_post(false));

    let mut received: SomeRelayable =
        parse_markup(&home_pod.ctx, &newer_sender_markup("hello", "new_property", "news")).unwrap();
    let relayed = received.to_markup(&home_pod.ctx).unwrap();

    assert_eq!(
        relayed.element_names(),
        vec![
            "author",
            "guid",
            "parent_guid",
            "new_property",
            "property",
            AUTHOR_SIGNATURE,
            PARENT_AUTHOR_SIGNATURE
        ]
    );
    assert_eq!(relayed.get("new_property"), Some("news"));

    let delivered: SomeRelayable = parse_markup(&downstream.ctx, &relayed).unwrap();
    assert_eq!(delivered.signature_data(), received.signature_data());
}

#[test]
fn test_legacy_author_alias_is_accepted() {
    let home_pod = TestPod::with_entity(keyring(&[], &[BOB]), alice_post(true));
    let data = [RELAYABLE_GUID, BOB, "hello", POST_GUID].join(";");
    let document = MarkupDocument::new("some_relayable")
        .with_element("guid", RELAYABLE_GUID)
        .with_element("diaspora_handle", BOB)
        .with_element("property", "hello")
        .with_element("parent_guid", POST_GUID)
        .with_element(AUTHOR_SIGNATURE, sign_payload(&signing_key(BOB), &data));

    let parsed: SomeRelayable = parse_markup(&home_pod.ctx, &document).unwrap();
    assert_eq!(parsed.core().author(), BOB);
    assert_eq!(parsed.core().wire_order().unwrap()[1], PropertyKey::Known("author"));
    assert!(parsed.core().additional_data().is_empty());
}

#[test]
fn test_json_unknown_scalars_are_kept_as_text() {
    let home_pod = TestPod::with_entity(keyring(&[], &[BOB]), alice_post(true));
    let data = [RELAYABLE_GUID, BOB, "hello", POST_GUID, "42"].join(";");
    let payload = json!({
        "entity_type": "some_relayable",
        "entity_data": {
            "guid": RELAYABLE_GUID,
            "author": BOB,
            "property": "hello",
            "parent_guid": POST_GUID,
            "votes": 42,
            "author_signature": sign_payload(&signing_key(BOB), &data),
            "parent_author_signature": null
        },
        "property_order": ["guid", "author", "property", "parent_guid", "votes"]
    });

    let parsed: SomeRelayable = parse_json(&home_pod.ctx, &payload).unwrap();
    assert_eq!(parsed.core().additional_data().get("votes").map(String::as_str), Some("42"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_canonical_string_stable_across_relay(
        property in "[A-Za-z0-9 ;:.]{1,40}",
        new_name in "[a-z]{3,12}_x",
        new_value in "[A-Za-z0-9 ;]{0,24}",
    ) {
        let home_pod = TestPod::with_entity(keyring(&[ALICE], &[BOB]), alice_post(true));
        let downstream = TestPod::with_entity(keyring(&[], &[ALICE, BOB]), alice_post(false));

        let inbound = newer_sender_markup(&property, &new_name, &new_value);
        let mut received: SomeRelayable = parse_markup(&home_pod.ctx, &inbound).unwrap();
        let relayed = received.to_markup(&home_pod.ctx).unwrap();
        let delivered: SomeRelayable = parse_markup(&downstream.ctx, &relayed).unwrap();

        prop_assert_eq!(delivered.signature_data(), received.signature_data());
        prop_assert_eq!(delivered.core().additional_data(), received.core().additional_data());
        prop_assert_eq!(
            delivered.core().author_signature(),
            inbound.get(AUTHOR_SIGNATURE)
        );
    }
}
