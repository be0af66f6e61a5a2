mod common;

use common::proptest_prelude::proptest_prelude_config;
use givetrack_backend::{issue, verify, verify_at, Claims, TokenError};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use proptest::prelude::*;
use serde_json::{json, Value};
use time::OffsetDateTime;

fn claims(value: Value) -> Claims {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

#[test]
fn test_login_scenario_with_wrong_secret() {
    let c = claims(json!({"user_id": 42, "role": "donor", "exp": 1999999999}));
    let token = issue(&c, b"s3cret");

    assert_eq!(token.split('.').count(), 3);
    assert_eq!(verify(&token, b"s3cret").unwrap(), c);
    assert_eq!(verify(&token, b"wrong"), Err(TokenError::InvalidSignature));
}

#[test]
fn test_jsonwebtoken_accepts_our_tokens() {
    let exp = now() + 3600;
    let c = claims(json!({"user_id": 9, "role": "ngo", "exp": exp}));
    let token = issue(&c, b"shared-secret");

    let decoded = decode::<Value>(
        &token,
        &DecodingKey::from_secret(b"shared-secret"),
        &Validation::new(Algorithm::HS256),
    )
    .unwrap();
    assert_eq!(decoded.header.alg, Algorithm::HS256);
    assert_eq!(decoded.claims, Value::Object(c));
}

#[test]
fn test_we_accept_jsonwebtoken_tokens() {
    let exp = now() + 3600;
    let body = json!({"user_id": 3, "role": "admin", "exp": exp});
    let token = encode(
        &Header::new(Algorithm::HS256),
        &body,
        &EncodingKey::from_secret(b"shared-secret"),
    )
    .unwrap();

    let decoded = verify(&token, b"shared-secret").unwrap();
    assert_eq!(Value::Object(decoded), body);
    assert_eq!(
        verify(&token, b"other-secret"),
        Err(TokenError::InvalidSignature)
    );
}

#[test]
fn test_jsonwebtoken_expired_token_is_rejected() {
    let body = json!({"user_id": 3, "exp": 1_000});
    let token = encode(
        &Header::new(Algorithm::HS256),
        &body,
        &EncodingKey::from_secret(b"k"),
    )
    .unwrap();

    assert_eq!(verify(&token, b"k"), Err(TokenError::TokenExpired));
}

fn claim_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        "[a-zA-Z0-9 _@.-]{0,24}".prop_map(Value::from),
        Just(Value::Null),
    ]
}

fn claims_strategy() -> impl Strategy<Value = Claims> {
    prop::collection::vec(("[a-z_]{1,12}", claim_value()), 0..8).prop_map(|pairs| {
        pairs
            .into_iter()
            .filter(|(k, _)| k != "exp")
            .collect::<Claims>()
    })
}

proptest! {
    #![proptest_config(proptest_prelude_config())]

    #[test]
    fn prop_roundtrip_preserves_claims_and_order(
        c in claims_strategy(),
        secret in prop::collection::vec(any::<u8>(), 1..64),
    ) {
        let token = issue(&c, &secret);
        let decoded = verify_at(&token, &secret, 0).unwrap();
        prop_assert_eq!(
            decoded.keys().collect::<Vec<_>>(),
            c.keys().collect::<Vec<_>>()
        );
        prop_assert_eq!(decoded, c);
    }

    #[test]
    fn prop_issue_is_deterministic(c in claims_strategy()) {
        prop_assert_eq!(issue(&c, b"k"), issue(&c, b"k"));
    }

    #[test]
    fn prop_single_byte_tamper_is_detected(
        c in claims_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        let token = issue(&c, b"k");
        let bytes = token.as_bytes();
        let i = pick.index(bytes.len());
        prop_assume!(bytes[i] != b'.');

        let mut tampered = bytes.to_vec();
        tampered[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();

        prop_assert_ne!(&tampered, &token);
        prop_assert!(verify_at(&tampered, b"k", 0).is_err());
    }

    #[test]
    fn prop_expiry_boundary(exp in 0i64..4_000_000_000, delta in 1i64..1_000_000) {
        let mut c = Claims::new();
        c.insert("user_id".into(), json!(1));
        c.insert("exp".into(), json!(exp));
        let token = issue(&c, b"k");

        prop_assert!(verify_at(&token, b"k", exp).is_ok());
        prop_assert!(verify_at(&token, b"k", exp - delta).is_ok());
        prop_assert_eq!(verify_at(&token, b"k", exp + delta), Err(TokenError::TokenExpired));
    }

    #[test]
    fn prop_arbitrary_input_never_panics(input in "[A-Za-z0-9_.=-]{0,80}") {
        let _ = verify_at(&input, b"k", 0);
    }
}
