use anyhow::Result;
use escher_core::{HeaderSource, OsEnv, SigningRequest};
use escher_signer::{Config, RequestSigner, RequestVerifier};
use http::Method;

fn main() -> Result<()> {
    // Initialize logging for debugging
    let _ = env_logger::builder().is_test(true).try_init();

    // ESCHER_* env vars only fill what the config leaves unset.
    let config = Config::new()
        .with_credential_scope("eu/suite/ems_request")
        .from_env(&OsEnv)?;
    let config = if config.access_key_id.is_none() {
        println!("No escher credentials found, using demo credentials for example");
        config
            .with_access_key_id("demo_key")
            .with_secret("demo_secret")
    } else {
        config
    };

    let signer = RequestSigner::new(config.clone())?;
    let mut req = SigningRequest::new(Method::POST, "/api/items")
        .with_headers(HeaderSource::from_pairs([
            ("Host", "example.com"),
            ("Content-Type", "application/json"),
        ])?)
        .with_body(r#"{"name":"item"}"#);
    let auth = signer.sign(&mut req, &["content-type"])?;
    println!("{}: {auth}", config.auth_header_name());

    let keys = vec![(
        config.access_key_id.clone().unwrap_or_default(),
        config.secret.clone().unwrap_or_default(),
    )];
    let verification = RequestVerifier::new(config)?.verify(&req, &keys)?;
    println!("verification: {verification:?}");

    Ok(())
}
