use super::{init_signing_test, plain_request};
use escher_core::hash::HashAlgorithm;
use escher_core::{HeaderSource, SigningRequest};
use escher_signer::{compute_signature, AuthHeader, RequestSigner};
use http::{Method, Request};
use log::debug;
use pretty_assertions::assert_eq;

const PLAIN_SIGNATURE: &str = "e1c6d6c9e3177042263d8d763b49c40598d9b813499277e2e94a76b2205d640a";

#[test]
fn test_plain_request_signature() {
    let (cfg, time) = init_signing_test();
    let req = plain_request(time);

    let signature = compute_signature(&cfg, &req, &["host", "date"], time).unwrap();
    debug!("signature: {signature}");
    assert_eq!(signature, PLAIN_SIGNATURE);

    // Repeated runs give the same output.
    for _ in 0..3 {
        assert_eq!(
            compute_signature(&cfg, &req, &["host", "date"], time).unwrap(),
            PLAIN_SIGNATURE
        );
    }
}

#[test]
fn test_signed_header_order_does_not_matter() {
    let (cfg, time) = init_signing_test();
    let req = plain_request(time);

    let signature = compute_signature(&cfg, &req, &["Date", "HOST"], time).unwrap();
    assert_eq!(signature, PLAIN_SIGNATURE);
}

#[test]
fn test_unsigned_headers_are_ignored() {
    let (cfg, time) = init_signing_test();
    let mut req = plain_request(time);
    req.add_default_headers([("X-Forwarded-For", "10.0.0.1".parse().unwrap())])
        .unwrap();

    let signature = compute_signature(&cfg, &req, &["host", "date"], time).unwrap();
    assert_eq!(signature, PLAIN_SIGNATURE);
}

#[test]
fn test_header_map_source_matches_pairs() {
    let (cfg, time) = init_signing_test();
    let mut headers = http::HeaderMap::new();
    headers.insert("host", "example.com".parse().unwrap());
    headers.insert("date", "20230101T000000Z".parse().unwrap());
    let req = SigningRequest::new(Method::GET, "/").with_headers(headers);

    let signature = compute_signature(&cfg, &req, &["host", "date"], time).unwrap();
    assert_eq!(signature, PLAIN_SIGNATURE);
}

#[test]
fn test_plain_request_signature_sha512() {
    let (cfg, time) = init_signing_test();
    let cfg = cfg.with_hash_algorithm(HashAlgorithm::Sha512);
    let req = plain_request(time);

    let signature = compute_signature(&cfg, &req, &["host", "date"], time).unwrap();
    assert_eq!(
        signature,
        "fc5c837937cd4aedf0a0cc2dbef6411474625e736aa3dc00457c727d7b28ebf3938f11a89aa2206325b2bdbb68c098fe78a37c0505cb39d08c7309ffff73833a"
    );
}

#[test]
fn test_sign_post_request() {
    let (cfg, time) = init_signing_test();
    let signer = RequestSigner::new(cfg).unwrap().with_time(time);

    let mut req = SigningRequest::new(Method::POST, "/api/v1/items")
        .with_headers(
            HeaderSource::from_pairs([
                ("Host", "example.com"),
                ("Content-Type", "application/json"),
            ])
            .unwrap(),
        )
        .with_body(r#"{"name":"item"}"#);
    req.query_push("b", "x y");
    req.query_push("a", "1");

    let auth = signer.sign(&mut req, &["Content-Type"]).unwrap();
    assert_eq!(
        auth,
        "ESR-HMAC-SHA256 Credential=access_key/20230101/us-east-1/service/req, SignedHeaders=content-type;host;x-escher-date, Signature=aba7eafe732fe0f5467561c3f3101f445181ea7328086aef8b48c3b1fbedaff1"
    );
}

#[test]
fn test_sign_http_request() {
    let (cfg, time) = init_signing_test();
    let signer = RequestSigner::new(cfg).unwrap().with_time(time);

    let mut req = Request::new(r#"{"name":"item"}"#);
    *req.method_mut() = Method::POST;
    *req.uri_mut() = "http://example.com/api/v1/items?b=x%20y&a=1"
        .parse()
        .expect("url must be valid");
    req.headers_mut()
        .insert("content-type", "application/json".parse().unwrap());

    let (mut parts, body) = req.into_parts();
    signer
        .sign_parts(&mut parts, body, &["content-type"])
        .expect("sign request must succeed");
    let req = Request::from_parts(parts, body);
    debug!("signed request: {req:?}");

    let auth = AuthHeader::parse(req.headers()["x-escher-auth"].to_str().unwrap()).unwrap();
    assert_eq!(
        auth.signature,
        "aba7eafe732fe0f5467561c3f3101f445181ea7328086aef8b48c3b1fbedaff1"
    );
    assert_eq!(req.headers()["x-escher-date"], "20230101T000000Z");
}
