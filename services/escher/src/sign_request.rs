use std::fmt::Write;

use bytes::Bytes;
use escher_core::hash::HashAlgorithm;
use escher_core::time::{format_date, format_http_date, format_iso8601, now, DateTime};
use escher_core::{Error, Result, SigningRequest};
use http::header::{HeaderName, HOST};
use http::request::Parts;
use http::HeaderValue;
use log::debug;

use crate::canonical::{canonical_request_string, signed_header_names};
use crate::{AuthHeader, Config};

/// RequestSigner that implements escher signing.
///
/// The signer only reads its [`Config`], so one signer can serve many
/// requests concurrently.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    config: Config,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer, failing if the config can't be used for signing.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        if config.access_key_id.as_deref().map_or(true, str::is_empty) {
            return Err(Error::config_invalid("access key id is missing"));
        }

        Ok(Self { config, time: None })
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// The config of this signer.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sign the request in place and return the authorization header value.
    ///
    /// The date header is added when missing. `host` and the date header are
    /// always signed in addition to `headers_to_sign`; `host` must be present.
    pub fn sign<S: AsRef<str>>(
        &self,
        req: &mut SigningRequest,
        headers_to_sign: &[S],
    ) -> Result<String> {
        let now = self.time.unwrap_or_else(now);
        let cfg = &self.config;
        let date_header = cfg.date_header_name();

        let date_value = if is_http_date_header(&date_header) {
            format_http_date(now)
        } else {
            format_iso8601(now)
        };
        let date_value = HeaderValue::try_from(date_value).map_err(|e| {
            Error::unexpected("failed to create date header").with_source(e)
        })?;
        req.add_default_headers([(date_header.as_str(), date_value)])?;

        let mut names: Vec<&str> = headers_to_sign.iter().map(|v| v.as_ref()).collect();
        names.push(HOST.as_str());
        names.push(&date_header);
        let signed_headers = signed_header_names(&names);

        let signature = compute_signature(cfg, req, &signed_headers, now)?;

        let auth = AuthHeader {
            algorithm_prefix: cfg.algorithm_prefix.clone(),
            hash_algorithm: cfg.hash_algorithm,
            access_key_id: cfg.access_key_id.clone().unwrap_or_default(),
            short_date: format_date(now),
            credential_scope: cfg.credential_scope.clone().unwrap_or_default(),
            signed_headers,
            signature,
        }
        .to_string();

        let mut value = HeaderValue::try_from(auth.as_str()).map_err(|e| {
            Error::unexpected("failed to create authorization header").with_source(e)
        })?;
        value.set_sensitive(true);
        req.headers.set(&cfg.auth_header_name(), value)?;

        Ok(auth)
    }

    /// Sign http::request::Parts.
    ///
    /// The uri authority is used as `host` when the request has none. The
    /// date and authorization headers are written back into `parts`.
    pub fn sign_parts<S: AsRef<str>>(
        &self,
        parts: &mut Parts,
        body: impl Into<Bytes>,
        headers_to_sign: &[S],
    ) -> Result<()> {
        let mut signed_req = SigningRequest::build(parts, body)?;
        let auth = self.sign(&mut signed_req, headers_to_sign)?;
        signed_req.apply_headers(parts)?;

        let name = HeaderName::from_bytes(self.config.auth_header_name().as_bytes()).map_err(|e| {
            Error::config_invalid("auth header name is invalid").with_source(e)
        })?;
        let mut value = HeaderValue::try_from(auth).map_err(|e| {
            Error::unexpected("failed to create authorization header").with_source(e)
        })?;
        value.set_sensitive(true);
        parts.headers.insert(name, value);

        Ok(())
    }
}

/// Whether the date header is the plain HTTP `date` header.
///
/// It carries an HTTP date instead of the long date.
pub(crate) fn is_http_date_header(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(http::header::DATE.as_str())
}

/// Run the full pipeline and return the hex signature of `req`.
pub fn compute_signature<S: AsRef<str>>(
    cfg: &Config,
    req: &SigningRequest,
    signed_headers: &[S],
    time: DateTime,
) -> Result<String> {
    let signing_key = generate_signing_key(cfg, time)?;

    let creq = canonical_request_string(req, signed_headers, cfg.hash_algorithm)?;
    let credential_scope = cfg
        .credential_scope
        .as_deref()
        .ok_or_else(|| Error::config_invalid("credential scope is missing"))?;
    let string_to_sign = string_to_sign(
        &creq,
        time,
        credential_scope,
        &cfg.algorithm_prefix,
        cfg.hash_algorithm,
    )?;

    calculate_signature(&string_to_sign, &signing_key, cfg.hash_algorithm)
}

/// Build the string to sign.
///
/// ```text
/// ESR-HMAC-SHA256
/// 20110909T233600Z
/// 20110909/eu/suite/ems_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(
    canonical_request: &str,
    time: DateTime,
    credential_scope: &str,
    algorithm_prefix: &str,
    algo: HashAlgorithm,
) -> Result<String> {
    // Scope: "20220313/<credential_scope>"
    let scope = format!("{}/{}", format_date(time), credential_scope);
    debug!("calculated scope: {scope}");

    let mut f = String::new();
    writeln!(f, "{algorithm_prefix}-HMAC-{algo}")?;
    writeln!(f, "{}", format_iso8601(time))?;
    writeln!(f, "{scope}")?;
    write!(f, "{}", algo.hex_digest(canonical_request.as_bytes()))?;

    debug!("calculated string to sign: {f}");
    Ok(f)
}

/// Derive the signing key for the date of `time`.
///
/// `prefix + secret` seeds an HMAC chain over the short date and then every
/// credential scope component. Intermediate keys stay raw bytes.
pub fn generate_signing_key(cfg: &Config, time: DateTime) -> Result<Vec<u8>> {
    // Both checks happen before any HMAC is computed.
    let secret = cfg.secret()?;
    let components = cfg.scope_components()?;

    let algo = cfg.hash_algorithm;
    let seed = format!("{}{}", cfg.algorithm_prefix, secret);
    let mut key = algo.hmac(seed.as_bytes(), format_date(time).as_bytes())?;
    for component in components {
        key = algo.hmac(&key, component.as_bytes())?;
    }

    Ok(key)
}

/// HMAC the string to sign under the signing key, hex encoded.
pub fn calculate_signature(
    string_to_sign: &str,
    signing_key: &[u8],
    algo: HashAlgorithm,
) -> Result<String> {
    algo.hex_hmac(signing_key, string_to_sign.as_bytes())
}
