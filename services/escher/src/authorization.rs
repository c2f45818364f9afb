use std::fmt;
use std::str::FromStr;

use escher_core::hash::HashAlgorithm;
use escher_core::{Error, Result};

/// The value of the authorization header.
///
/// ```text
/// ESR-HMAC-SHA256 Credential=<access_key_id>/<short_date>/<scope>, SignedHeaders=<a;b>, Signature=<hex>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeader {
    /// Algorithm prefix like `ESR`.
    pub algorithm_prefix: String,
    /// Hash algorithm named in the algorithm identifier.
    pub hash_algorithm: HashAlgorithm,
    /// Access key id of the signer.
    pub access_key_id: String,
    /// Short date (`YYYYMMDD`) the signing key was derived for.
    pub short_date: String,
    /// Credential scope without the date.
    pub credential_scope: String,
    /// Signed header names, lower-cased, in the order they were listed.
    pub signed_headers: Vec<String>,
    /// Lower-case hex signature.
    pub signature: String,
}

impl AuthHeader {
    /// Parse an authorization header value.
    ///
    /// Every deviation from the expected layout fails with `InvalidRequest`.
    pub fn parse(s: &str) -> Result<Self> {
        let malformed = || Error::request_invalid(format!("could not parse auth header: {s:?}"));

        let (algorithm, rest) = s.trim().split_once(' ').ok_or_else(malformed)?;
        let (algorithm_prefix, hash) = algorithm.split_once("-HMAC-").ok_or_else(malformed)?;
        if algorithm_prefix.is_empty() {
            return Err(malformed());
        }
        let hash_algorithm = HashAlgorithm::from_str(hash).map_err(|_| {
            Error::request_invalid("only SHA256 and SHA512 hash algorithms are allowed")
        })?;

        let mut parts = rest.split(',').map(str::trim);
        let credential = parts
            .next()
            .and_then(|v| v.strip_prefix("Credential="))
            .ok_or_else(malformed)?;
        let signed_headers = parts
            .next()
            .and_then(|v| v.strip_prefix("SignedHeaders="))
            .ok_or_else(malformed)?;
        let signature = parts
            .next()
            .and_then(|v| v.strip_prefix("Signature="))
            .ok_or_else(malformed)?;
        if parts.next().is_some() {
            return Err(malformed());
        }

        let mut credential = credential.splitn(3, '/');
        let (Some(access_key_id), Some(short_date), Some(credential_scope)) =
            (credential.next(), credential.next(), credential.next())
        else {
            return Err(malformed());
        };
        if access_key_id.is_empty()
            || short_date.len() != 8
            || !short_date.bytes().all(|b| b.is_ascii_digit())
            || credential_scope.is_empty()
        {
            return Err(malformed());
        }

        let signed_headers: Vec<String> = signed_headers
            .split(';')
            .map(|v| v.trim().to_lowercase())
            .collect();
        if signed_headers.iter().any(|v| v.is_empty()) {
            return Err(malformed());
        }

        if signature.is_empty()
            || !signature
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(malformed());
        }

        Ok(AuthHeader {
            algorithm_prefix: algorithm_prefix.to_string(),
            hash_algorithm,
            access_key_id: access_key_id.to_string(),
            short_date: short_date.to_string(),
            credential_scope: credential_scope.to_string(),
            signed_headers,
            signature: signature.to_string(),
        })
    }
}

impl fmt::Display for AuthHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-HMAC-{} Credential={}/{}/{}, SignedHeaders={}, Signature={}",
            self.algorithm_prefix,
            self.hash_algorithm,
            self.access_key_id,
            self.short_date,
            self.credential_scope,
            self.signed_headers.join(";"),
            self.signature
        )
    }
}

impl FromStr for AuthHeader {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AuthHeader::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use escher_core::ErrorKind;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    const VALUE: &str = "ESR-HMAC-SHA256 Credential=AKIDEXAMPLE/20110909/us-east-1/host/aws4_request, SignedHeaders=date;host, Signature=b27ccfbfa7df52a200ff74193ca6e32d4b48b8856fab7ebf1c595d0670a7e470";

    #[test]
    fn test_parse() {
        let v = AuthHeader::parse(VALUE).unwrap();

        assert_eq!(
            v,
            AuthHeader {
                algorithm_prefix: "ESR".to_string(),
                hash_algorithm: HashAlgorithm::Sha256,
                access_key_id: "AKIDEXAMPLE".to_string(),
                short_date: "20110909".to_string(),
                credential_scope: "us-east-1/host/aws4_request".to_string(),
                signed_headers: vec!["date".to_string(), "host".to_string()],
                signature: "b27ccfbfa7df52a200ff74193ca6e32d4b48b8856fab7ebf1c595d0670a7e470"
                    .to_string(),
            }
        );
        assert_eq!(v.to_string(), VALUE);
    }

    #[test]
    fn test_parse_without_spaces_after_commas() {
        let v = AuthHeader::parse(
            "EMS-HMAC-SHA512 Credential=key/20110909/eu/suite/ems_request,SignedHeaders=host,Signature=abc123",
        )
        .unwrap();

        assert_eq!(v.algorithm_prefix, "EMS");
        assert_eq!(v.hash_algorithm, HashAlgorithm::Sha512);
        assert_eq!(v.credential_scope, "eu/suite/ems_request");
    }

    #[test]
    fn test_parse_lowercases_signed_headers() {
        let v = AuthHeader::parse(
            "ESR-HMAC-SHA256 Credential=key/20110909/eu/suite/ems_request, SignedHeaders=Host;X-Escher-Date, Signature=abc123",
        )
        .unwrap();

        assert_eq!(v.signed_headers, vec!["host", "x-escher-date"]);
    }

    #[test_case(""; "empty")]
    #[test_case("ESR-HMAC-SHA256"; "algorithm only")]
    #[test_case("ESR-SHA256 Credential=a/20110909/s, SignedHeaders=host, Signature=ab"; "missing hmac")]
    #[test_case("ESR-HMAC-SHA256 Credential=a/2011/s, SignedHeaders=host, Signature=ab"; "short date")]
    #[test_case("ESR-HMAC-SHA256 Credential=a/20110909, SignedHeaders=host, Signature=ab"; "missing scope")]
    #[test_case("ESR-HMAC-SHA256 Credential=a/20110909/s, SignedHeaders=, Signature=ab"; "empty signed headers")]
    #[test_case("ESR-HMAC-SHA256 Credential=a/20110909/s, SignedHeaders=host, Signature=XYZ"; "not hex")]
    #[test_case("ESR-HMAC-SHA256 Credential=a/20110909/s, Signature=ab, SignedHeaders=host"; "wrong order")]
    #[test_case("ESR-HMAC-SHA256 Credential=a/20110909/s, SignedHeaders=host, Signature=ab, Extra=1"; "extra part")]
    #[test_case("ESR-HMAC-MD5 Credential=a/20110909/s, SignedHeaders=host, Signature=ab"; "unknown hash")]
    fn test_parse_invalid(input: &str) {
        let err = AuthHeader::parse(input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }
}
