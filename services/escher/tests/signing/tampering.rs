use super::{init_signing_test, plain_request};
use escher_core::time::DateTime;
use escher_core::{ErrorKind, SigningRequest};
use escher_signer::{compute_signature, verify_signature, Config};
use http::HeaderValue;

const PLAIN_SIGNATURE: &str = "e1c6d6c9e3177042263d8d763b49c40598d9b813499277e2e94a76b2205d640a";

fn verify(cfg: &Config, req: &SigningRequest, time: DateTime) -> bool {
    verify_signature(cfg, req, &["host", "date"], time, PLAIN_SIGNATURE).unwrap()
}

#[test]
fn test_untouched_request_verifies() {
    let (cfg, time) = init_signing_test();
    assert!(verify(&cfg, &plain_request(time), time));
}

#[test]
fn test_altered_header_value_fails() {
    let (cfg, time) = init_signing_test();
    let mut req = plain_request(time);
    req.headers
        .set("host", HeaderValue::from_static("example.con"))
        .unwrap();

    assert!(!verify(&cfg, &req, time));
}

#[test]
fn test_altered_path_fails() {
    let (cfg, time) = init_signing_test();
    let mut req = plain_request(time);
    req.path = "/a".to_string();

    assert!(!verify(&cfg, &req, time));
}

#[test]
fn test_altered_timestamp_fails() {
    let (cfg, time) = init_signing_test();
    let req = plain_request(time);
    let later = time + chrono::TimeDelta::try_seconds(1).expect("in bounds");

    assert!(!verify(&cfg, &req, later));

    let mut req = plain_request(time);
    req.headers
        .set("date", HeaderValue::from_static("20230101T000001Z"))
        .unwrap();
    assert!(!verify(&cfg, &req, time));
}

#[test]
fn test_altered_body_fails() {
    let (cfg, time) = init_signing_test();
    let req = plain_request(time).with_body("x");

    assert!(!verify(&cfg, &req, time));
}

#[test]
fn test_truncated_signature_fails() {
    let (cfg, time) = init_signing_test();
    let req = plain_request(time);

    let ok = verify_signature(&cfg, &req, &["host", "date"], time, &PLAIN_SIGNATURE[..63]).unwrap();
    assert!(!ok);
}

#[test]
fn test_missing_signed_header_is_an_error() {
    let (cfg, time) = init_signing_test();
    let req = plain_request(time);

    let err = compute_signature(&cfg, &req, &["host", "date", "content-type"], time).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingHeader);

    let err = verify_signature(&cfg, &req, &["host", "x-escher-date"], time, PLAIN_SIGNATURE)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingHeader);
}
