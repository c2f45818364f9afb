mod standard;
mod tampering;

use chrono::TimeZone;
use chrono::Utc;
use escher_core::time::{format_iso8601, DateTime};
use escher_core::{HeaderSource, SigningRequest};
use escher_signer::Config;
use http::Method;

/// Initialize test environment
pub fn init_signing_test() -> (Config, DateTime) {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = Config::new()
        .with_algorithm_prefix("ESR")
        .with_access_key_id("access_key")
        .with_secret("secret")
        .with_credential_scope("us-east-1/service/req");
    let time = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();

    (config, time)
}

/// The request signed with `host` and `date` headers only.
pub fn plain_request(time: DateTime) -> SigningRequest {
    SigningRequest::new(Method::GET, "/").with_headers(
        HeaderSource::from_pairs([("host", "example.com".to_string()), ("date", format_iso8601(time))])
            .expect("headers must be valid"),
    )
}
