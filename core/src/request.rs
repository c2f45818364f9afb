use bytes::Bytes;
use http::header::HeaderName;
use http::request::Parts;
use http::HeaderValue;
use http::Method;

use crate::header::normalize;
use crate::header::HeaderSource;
use crate::header::NormalizedHeaders;
use crate::Result;

/// Signing context for request.
///
/// Holds everything that takes part in a signature. Building one from
/// [`http::request::Parts`] copies the values, so the original request is
/// never modified by canonicalization.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP path, already percent-encoded the way it is sent on the wire.
    pub path: String,
    /// HTTP query parameters, decoded. Duplicated keys are allowed.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    pub headers: HeaderSource,
    /// HTTP body.
    pub body: Bytes,
}

impl Default for SigningRequest {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "/".to_string(),
            query: Vec::new(),
            headers: HeaderSource::default(),
            body: Bytes::new(),
        }
    }
}

impl SigningRequest {
    /// Create a new signing request for `method` and `path`.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set the headers.
    pub fn with_headers(mut self, headers: impl Into<HeaderSource>) -> Self {
        self.headers = headers.into();
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Push a new query pair into query list.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Build a signing request from http::request::Parts.
    ///
    /// Path and query are taken from the uri; a uri without path signs as `/`.
    /// When the request has no `host` header, the uri authority is added as one.
    pub fn build(parts: &Parts, body: impl Into<Bytes>) -> Result<Self> {
        let path = match parts.uri.path() {
            "" => "/".to_string(),
            v => v.to_string(),
        };
        let query = parts
            .uri
            .query()
            .map(|v| {
                form_urlencoded::parse(v.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default();

        let mut headers = HeaderSource::Map(parts.headers.clone());
        if let Some(authority) = parts.uri.authority() {
            let host = HeaderValue::from_str(authority.as_str()).map_err(|e| {
                crate::Error::header_value_invalid(http::header::HOST.as_str())
                    .with_source(anyhow::Error::from(e))
            })?;
            headers.add_defaults([(http::header::HOST.as_str(), host)])?;
        }

        Ok(SigningRequest {
            method: parts.method.clone(),
            path,
            query,
            headers,
            body: body.into(),
        })
    }

    /// Get header value by name, compared case-insensitively.
    ///
    /// Fails with `MissingHeader` if the header is absent.
    pub fn header_get(&self, name: &str) -> Result<&str> {
        self.headers.get(name)
    }

    /// Append default headers whose names are not present in the request.
    pub fn add_default_headers<'a>(
        &mut self,
        defaults: impl IntoIterator<Item = (&'a str, HeaderValue)>,
    ) -> Result<()> {
        self.headers.add_defaults(defaults)
    }

    /// Normalize the request headers.
    pub fn normalized_headers(&self) -> Result<NormalizedHeaders> {
        normalize(&self.headers)
    }

    /// Copy the headers of this request into http::request::Parts.
    ///
    /// Headers already present in `parts` are kept; only missing names are
    /// inserted.
    pub fn apply_headers(&self, parts: &mut Parts) -> Result<()> {
        for (name, value) in self.headers.iter() {
            let key = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|e| {
                crate::Error::header_value_invalid(name).with_source(anyhow::Error::from(e))
            })?;
            if !parts.headers.contains_key(&key) {
                parts.headers.insert(key, value.clone());
            }
        }

        Ok(())
    }
}
