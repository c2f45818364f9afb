//! Escher signer and verifier.
//!
//! Requests are signed AWS Signature V4 style: a canonical request is hashed
//! into a string to sign, which is HMAC'd under a key derived from the secret,
//! the date and the credential scope.
//!
//! ## Example
//!
//! ```
//! use escher_core::{HeaderSource, SigningRequest};
//! use escher_signer::{Config, RequestSigner, RequestVerifier};
//! use http::Method;
//!
//! let config = Config::new()
//!     .with_access_key_id("access_key")
//!     .with_secret("secret")
//!     .with_credential_scope("eu/suite/ems_request");
//!
//! let signer = RequestSigner::new(config.clone())?;
//! let mut req = SigningRequest::new(Method::GET, "/")
//!     .with_headers(HeaderSource::from_pairs([("Host", "example.com")])?);
//! signer.sign(&mut req, &[] as &[&str])?;
//!
//! let keys = vec![("access_key", "secret")];
//! let verification = RequestVerifier::new(config)?.verify(&req, &keys)?;
//! assert!(verification.is_valid());
//! # Ok::<(), escher_core::Error>(())
//! ```

mod authorization;
pub use authorization::AuthHeader;

mod config;
pub use config::Config;

pub mod canonical;

mod sign_request;
pub use sign_request::{
    calculate_signature, compute_signature, generate_signing_key, string_to_sign, RequestSigner,
};

mod verify;
pub use verify::{verify_signature, KeyStore, RequestVerifier, Verification};

pub mod constants;
