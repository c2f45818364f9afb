use std::collections::HashMap;

use escher_core::time::{format_date, now, parse_http_date, parse_iso8601, DateTime};
use escher_core::utils::constant_time_eq;
use escher_core::{Error, Result, SigningRequest};
use http::header::HOST;
use log::debug;

use crate::sign_request::{compute_signature, is_http_date_header};
use crate::{AuthHeader, Config};

/// KeyStore looks up the secret of an access key id.
pub trait KeyStore {
    /// Return the secret for `access_key_id`, or `None` if it's unknown.
    fn secret(&self, access_key_id: &str) -> Option<String>;
}

impl KeyStore for HashMap<String, String> {
    fn secret(&self, access_key_id: &str) -> Option<String> {
        self.get(access_key_id).cloned()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> KeyStore for [(K, V)] {
    fn secret(&self, access_key_id: &str) -> Option<String> {
        self.iter()
            .find(|(k, _)| k.as_ref() == access_key_id)
            .map(|(_, v)| v.as_ref().to_string())
    }
}

impl<K: AsRef<str>, V: AsRef<str>> KeyStore for Vec<(K, V)> {
    fn secret(&self, access_key_id: &str) -> Option<String> {
        self.as_slice().secret(access_key_id)
    }
}

/// The outcome of verifying a well-formed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The signature matches; carries the access key id that signed.
    Valid {
        /// Access key id taken from the authorization header.
        access_key_id: String,
    },
    /// The signature doesn't match.
    Invalid,
}

impl Verification {
    /// Whether the signature matched.
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid { .. })
    }
}

/// Recompute the signature of `req` and compare it with `signature`.
///
/// Returns `Ok(false)` on mismatch; malformed input is still an error.
pub fn verify_signature<S: AsRef<str>>(
    cfg: &Config,
    req: &SigningRequest,
    signed_headers: &[S],
    time: DateTime,
    signature: &str,
) -> Result<bool> {
    let expected = compute_signature(cfg, req, signed_headers, time)?;
    Ok(constant_time_eq(expected, signature))
}

/// RequestVerifier checks inbound requests signed by [`crate::RequestSigner`].
#[derive(Debug, Clone)]
pub struct RequestVerifier {
    config: Config,

    time: Option<DateTime>,
}

impl RequestVerifier {
    /// Create a new verifier.
    ///
    /// The config's secret is not used; secrets come from the [`KeyStore`].
    pub fn new(config: Config) -> Result<Self> {
        config.scope_components()?;
        Ok(Self { config, time: None })
    }

    /// Specify the verifying time.
    ///
    /// # Note
    ///
    /// We should always take current time to verify requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Verify `req` against the secrets in `keys`.
    pub fn verify(&self, req: &SigningRequest, keys: &(impl KeyStore + ?Sized)) -> Result<Verification> {
        let cfg = &self.config;
        let now = self.time.unwrap_or_else(now);

        let date_header = cfg.date_header_name();

        let auth = AuthHeader::parse(req.header_get(&cfg.auth_header_name())?)?;
        let date = req.header_get(&date_header)?;
        let request_time = if is_http_date_header(&date_header) {
            parse_http_date(date)?
        } else {
            parse_iso8601(date)?
        };

        if auth.algorithm_prefix != cfg.algorithm_prefix {
            return Err(reject(format!(
                "invalid algorithm prefix {:?}, expected {:?}",
                auth.algorithm_prefix, cfg.algorithm_prefix
            )));
        }
        if Some(auth.credential_scope.as_str()) != cfg.credential_scope.as_deref() {
            return Err(reject("invalid credential scope"));
        }
        if auth.short_date != format_date(request_time) {
            return Err(reject(
                "the credential date does not match with the request date",
            ));
        }
        let skew = (now - request_time).abs().to_std().map_err(|e| {
            Error::unexpected("failed to compute clock skew").with_source(e)
        })?;
        if skew > cfg.clock_skew {
            return Err(reject(
                "the request date is not within the accepted time range",
            ));
        }

        let date_header = date_header.trim().to_lowercase();
        if !auth.signed_headers.iter().any(|v| v == HOST.as_str()) {
            return Err(reject("the host header is not signed"));
        }
        if !auth.signed_headers.iter().any(|v| *v == date_header) {
            return Err(reject("the date header is not signed"));
        }

        let secret = keys
            .secret(&auth.access_key_id)
            .ok_or_else(|| reject("invalid escher key"))?;

        let key_cfg = Config {
            secret: Some(secret),
            hash_algorithm: auth.hash_algorithm,
            ..cfg.clone()
        };
        if verify_signature(
            &key_cfg,
            req,
            &auth.signed_headers,
            request_time,
            &auth.signature,
        )? {
            Ok(Verification::Valid {
                access_key_id: auth.access_key_id,
            })
        } else {
            debug!("signature of {} does not match", auth.access_key_id);
            Ok(Verification::Invalid)
        }
    }
}

fn reject(message: impl Into<String>) -> Error {
    let message = message.into();
    debug!("request rejected: {message}");
    Error::request_invalid(message)
}
