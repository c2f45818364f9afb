use std::fmt::{Debug, Formatter};
use std::time::Duration;

use escher_core::hash::HashAlgorithm;
use escher_core::utils::Redact;
use escher_core::{Env, Error, Result};
use serde::{Deserialize, Deserializer};

use super::constants::*;

/// Config carries all the configuration for escher signing and verifying.
///
/// A config is shared read-only by every signing operation; build it once and
/// don't mutate it afterwards.
#[derive(Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Prefix of the algorithm identifier and of the signing key seed.
    ///
    /// Default to `ESR`.
    #[serde(alias = "algoPrefix")]
    pub algorithm_prefix: String,
    /// Vendor key the default header names are built from.
    ///
    /// Default to `Escher`.
    pub vendor_key: String,
    /// Hash algorithm used for digests and HMAC.
    ///
    /// Default to `SHA256`.
    #[serde(alias = "hashAlgo", deserialize_with = "deserialize_hash_algorithm")]
    pub hash_algorithm: HashAlgorithm,
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ESCHER_ACCESS_KEY_ID`]
    pub access_key_id: Option<String>,
    /// `secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ESCHER_SECRET`]
    #[serde(alias = "apiSecret")]
    pub secret: Option<String>,
    /// Slash delimited credential scope like `eu/suite/ems_request`.
    ///
    /// `credential_scope` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`ESCHER_CREDENTIAL_SCOPE`]
    pub credential_scope: Option<String>,
    /// Header carrying the authorization value.
    ///
    /// Default to `X-<vendor_key>-Auth`.
    pub auth_header_name: Option<String>,
    /// Header carrying the request date.
    ///
    /// Default to `X-<vendor_key>-Date`.
    pub date_header_name: Option<String>,
    /// Accepted distance between the request date and the verifier's clock.
    ///
    /// Default to 300 seconds. Deserialized from seconds.
    #[serde(deserialize_with = "deserialize_seconds")]
    pub clock_skew: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            algorithm_prefix: DEFAULT_ALGORITHM_PREFIX.to_string(),
            vendor_key: DEFAULT_VENDOR_KEY.to_string(),
            hash_algorithm: HashAlgorithm::default(),
            access_key_id: None,
            secret: None,
            credential_scope: None,
            auth_header_name: None,
            date_header_name: None,
            clock_skew: DEFAULT_CLOCK_SKEW,
        }
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("algorithm_prefix", &self.algorithm_prefix)
            .field("vendor_key", &self.vendor_key)
            .field("hash_algorithm", &self.hash_algorithm)
            .field("access_key_id", &self.access_key_id)
            .field("secret", &Redact::from(&self.secret))
            .field("credential_scope", &self.credential_scope)
            .field("auth_header_name", &self.auth_header_name())
            .field("date_header_name", &self.date_header_name())
            .field("clock_skew", &self.clock_skew)
            .finish()
    }
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set algorithm_prefix
    pub fn with_algorithm_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.algorithm_prefix = prefix.into();
        self
    }

    /// Set vendor_key
    pub fn with_vendor_key(mut self, vendor_key: impl Into<String>) -> Self {
        self.vendor_key = vendor_key.into();
        self
    }

    /// Set hash_algorithm
    pub fn with_hash_algorithm(mut self, algo: HashAlgorithm) -> Self {
        self.hash_algorithm = algo;
        self
    }

    /// Set access_key_id
    pub fn with_access_key_id(mut self, access_key_id: impl Into<String>) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self
    }

    /// Set secret
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Set credential_scope
    pub fn with_credential_scope(mut self, scope: impl Into<String>) -> Self {
        self.credential_scope = Some(scope.into());
        self
    }

    /// Set auth_header_name
    pub fn with_auth_header_name(mut self, name: impl Into<String>) -> Self {
        self.auth_header_name = Some(name.into());
        self
    }

    /// Set date_header_name
    pub fn with_date_header_name(mut self, name: impl Into<String>) -> Self {
        self.date_header_name = Some(name.into());
        self
    }

    /// Set clock_skew
    pub fn with_clock_skew(mut self, clock_skew: Duration) -> Self {
        self.clock_skew = clock_skew;
        self
    }

    /// Load config from env.
    ///
    /// Values set explicitly are kept.
    pub fn from_env(mut self, env: &impl Env) -> Result<Self> {
        if let Some(v) = env.var(ESCHER_ACCESS_KEY_ID) {
            self.access_key_id.get_or_insert(v);
        }
        if let Some(v) = env.var(ESCHER_SECRET) {
            self.secret.get_or_insert(v);
        }
        if let Some(v) = env.var(ESCHER_CREDENTIAL_SCOPE) {
            self.credential_scope.get_or_insert(v);
        }
        if let Some(v) = env.var(ESCHER_ALGORITHM_PREFIX) {
            if self.algorithm_prefix == DEFAULT_ALGORITHM_PREFIX {
                self.algorithm_prefix = v;
            }
        }
        if let Some(v) = env.var(ESCHER_HASH_ALGORITHM) {
            if self.hash_algorithm == HashAlgorithm::default() {
                self.hash_algorithm = v.parse()?;
            }
        }

        Ok(self)
    }

    /// Check the config can be used for signing.
    pub fn validate(&self) -> Result<()> {
        self.secret()?;
        self.scope_components()?;
        Ok(())
    }

    /// Algorithm identifier like `ESR-HMAC-SHA256`.
    pub fn algorithm(&self) -> String {
        format!("{}-HMAC-{}", self.algorithm_prefix, self.hash_algorithm)
    }

    /// Name of the authorization header, `X-<vendor_key>-Auth` unless set.
    pub fn auth_header_name(&self) -> String {
        match &self.auth_header_name {
            Some(v) => v.clone(),
            None => format!("X-{}-Auth", self.vendor_key),
        }
    }

    /// Name of the date header, `X-<vendor_key>-Date` unless set.
    pub fn date_header_name(&self) -> String {
        match &self.date_header_name {
            Some(v) => v.clone(),
            None => format!("X-{}-Date", self.vendor_key),
        }
    }

    /// The secret, failing if it's absent or empty.
    pub fn secret(&self) -> Result<&str> {
        match self.secret.as_deref() {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(Error::config_invalid("secret is missing")),
        }
    }

    /// The credential scope split by `/`.
    ///
    /// Fails if the scope is absent or has an empty component.
    pub fn scope_components(&self) -> Result<Vec<&str>> {
        let scope = self
            .credential_scope
            .as_deref()
            .ok_or_else(|| Error::config_invalid("credential scope is missing"))?;

        let components: Vec<&str> = scope.split('/').collect();
        if components.iter().any(|v| v.is_empty()) {
            return Err(Error::config_invalid(format!(
                "credential scope {scope:?} is malformed"
            )));
        }

        Ok(components)
    }
}

fn deserialize_hash_algorithm<'de, D>(deserializer: D) -> std::result::Result<HashAlgorithm, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}

fn deserialize_seconds<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Duration::from_secs(u64::deserialize(deserializer)?))
}
