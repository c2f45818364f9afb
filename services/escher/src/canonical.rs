//! Canonical request building.
//!
//! ```text
//! METHOD
//! CANONICAL_PATH
//! CANONICAL_QUERY
//! name:value
//! ...
//!
//! SIGNED_HEADER_NAMES
//! BODY_HASH
//! ```

use std::fmt::Write;

use escher_core::hash::HashAlgorithm;
use escher_core::{Error, NormalizedHeaders, Result, SigningRequest};
use log::debug;
use percent_encoding::utf8_percent_encode;

use crate::constants::QUERY_ENCODE_SET;

/// Build the canonical request string.
///
/// `signed_headers` lists the headers that take part in the signature; every
/// one of them must exist in the request. The path is used as is, callers
/// must send it already percent-encoded.
pub fn canonical_request_string<S: AsRef<str>>(
    req: &SigningRequest,
    signed_headers: &[S],
    algo: HashAlgorithm,
) -> Result<String> {
    let names = signed_header_names(signed_headers);
    let headers = req.normalized_headers()?;

    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    writeln!(f, "{}", req.method)?;
    writeln!(f, "{}", req.path)?;
    writeln!(f, "{}", canonical_query_string(&req.query))?;
    f.push_str(&canonical_headers(&headers, &names)?);
    writeln!(f)?;
    writeln!(f, "{}", names.join(";"))?;
    write!(f, "{}", algo.hex_digest(&req.body))?;

    debug!("calculated canonical request: {f}");
    Ok(f)
}

/// Lower-case, sort and dedup signed header names.
pub fn signed_header_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut names: Vec<String> = names
        .iter()
        .map(|v| v.as_ref().trim().to_lowercase())
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}

/// Percent-encode every query pair, sort them and join as `k=v&k=v`.
///
/// Pairs are sorted by encoded key, then by encoded value. Empty values
/// render as `k=`.
pub fn canonical_query_string(query: &[(String, String)]) -> String {
    let mut pairs: Vec<(String, String)> = query
        .iter()
        .map(|(k, v)| {
            (
                utf8_percent_encode(k, &QUERY_ENCODE_SET).to_string(),
                utf8_percent_encode(v, &QUERY_ENCODE_SET).to_string(),
            )
        })
        .collect();
    pairs.sort();

    let mut s = String::with_capacity(16);
    for (idx, (k, v)) in pairs.into_iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }

        s.push_str(&k);
        s.push('=');
        s.push_str(&v);
    }

    s
}

/// Render `name:value\n` for every signed header in sorted order.
///
/// `names` must already be lower-cased and sorted.
pub fn canonical_headers(headers: &NormalizedHeaders, names: &[String]) -> Result<String> {
    let mut s = String::with_capacity(names.len() * 32);

    for name in names {
        let value = headers
            .get(name)
            .ok_or_else(|| Error::missing_header(name))?;
        writeln!(s, "{name}:{value}")?;
    }

    Ok(s)
}
