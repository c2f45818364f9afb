//! Header normalization.
//!
//! Requests carry their headers either as an ordered list of `(name, value)`
//! pairs or as an [`http::HeaderMap`]. Both can hold the same name more than
//! once. [`normalize`] folds either form into [`NormalizedHeaders`]: names
//! lower-cased and trimmed, values trimmed with whitespace runs collapsed
//! outside double quotes, duplicate names merged with `,` in arrival order,
//! keys sorted.

use std::collections::btree_map;
use std::collections::BTreeMap;

use http::header::HeaderName;
use http::HeaderMap;
use http::HeaderValue;

use crate::Error;
use crate::Result;

/// The header collection of a request.
#[derive(Debug, Clone)]
pub enum HeaderSource {
    /// Ordered `(name, value)` pairs, names kept as sent.
    Pairs(Vec<(String, HeaderValue)>),
    /// A header map; repeated names are appended values.
    Map(HeaderMap),
}

impl Default for HeaderSource {
    fn default() -> Self {
        HeaderSource::Pairs(Vec::new())
    }
}

impl From<Vec<(String, HeaderValue)>> for HeaderSource {
    fn from(v: Vec<(String, HeaderValue)>) -> Self {
        HeaderSource::Pairs(v)
    }
}

impl From<HeaderMap> for HeaderSource {
    fn from(v: HeaderMap) -> Self {
        HeaderSource::Map(v)
    }
}

impl HeaderSource {
    /// Build a pairs source from anything that yields `(name, value)`.
    ///
    /// Values may be strings or numbers; numbers are rendered as decimal text.
    /// A value that can't become a header value fails with `InvalidHeaderValue`.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: TryInto<HeaderValue>,
    {
        let mut headers = Vec::new();
        for (k, v) in pairs {
            let k = k.into();
            let v = v
                .try_into()
                .map_err(|_| Error::header_value_invalid(&k))?;
            headers.push((k, v));
        }

        Ok(HeaderSource::Pairs(headers))
    }

    /// Iterate every entry in arrival order, duplicates included.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (&str, &HeaderValue)> + '_> {
        match self {
            HeaderSource::Pairs(pairs) => Box::new(pairs.iter().map(|(k, v)| (k.as_str(), v))),
            HeaderSource::Map(map) => Box::new(map.iter().map(|(k, v)| (k.as_str(), v))),
        }
    }

    /// Whether a header with `name` exists, compared case-insensitively.
    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim();
        self.iter()
            .any(|(k, _)| k.trim().eq_ignore_ascii_case(name))
    }

    /// Look up the first value of `name`, compared case-insensitively.
    ///
    /// Fails with `MissingHeader` if absent and `InvalidHeaderValue` if the
    /// value is not valid UTF-8.
    pub fn get(&self, name: &str) -> Result<&str> {
        let target = name.trim();
        let (k, v) = self
            .iter()
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(target))
            .ok_or_else(|| Error::missing_header(target))?;

        value_str(k, v)
    }

    /// Append every default header whose name is not present yet.
    ///
    /// Headers that already exist are left untouched.
    pub fn add_defaults<'a>(
        &mut self,
        defaults: impl IntoIterator<Item = (&'a str, HeaderValue)>,
    ) -> Result<()> {
        for (name, value) in defaults {
            if self.contains(name) {
                continue;
            }

            match self {
                HeaderSource::Pairs(pairs) => pairs.push((name.to_string(), value)),
                HeaderSource::Map(map) => {
                    let key = HeaderName::from_bytes(name.trim().as_bytes()).map_err(|e| {
                        Error::header_value_invalid(name).with_source(anyhow::Error::from(e))
                    })?;
                    map.append(key, value);
                }
            }
        }

        Ok(())
    }

    /// Replace every header named `name` with a single `value`.
    pub fn set(&mut self, name: &str, value: HeaderValue) -> Result<()> {
        let target = name.trim();
        match self {
            HeaderSource::Pairs(pairs) => {
                pairs.retain(|(k, _)| !k.trim().eq_ignore_ascii_case(target));
                pairs.push((target.to_string(), value));
            }
            HeaderSource::Map(map) => {
                let key = HeaderName::from_bytes(target.as_bytes()).map_err(|e| {
                    Error::header_value_invalid(name).with_source(anyhow::Error::from(e))
                })?;
                map.insert(key, value);
            }
        }

        Ok(())
    }
}

/// Headers after normalization, sorted by lower-cased name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedHeaders(BTreeMap<String, String>);

impl NormalizedHeaders {
    /// Get the merged value of a lower-cased header name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Iterate headers in lexicographic order of their names.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no headers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a NormalizedHeaders {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Normalize a header collection.
///
/// The input is only read; a new value is built.
pub fn normalize(headers: &HeaderSource) -> Result<NormalizedHeaders> {
    let mut result: BTreeMap<String, String> = BTreeMap::new();

    for (name, value) in headers.iter() {
        let value = value_str(name, value)?;

        let key = name.trim().to_lowercase();
        let value = normalize_value(value);
        match result.entry(key) {
            btree_map::Entry::Occupied(mut ent) => {
                let v = ent.get_mut();
                v.push(',');
                v.push_str(&value);
            }
            btree_map::Entry::Vacant(ent) => {
                ent.insert(value);
            }
        }
    }

    Ok(NormalizedHeaders(result))
}

/// Header values are hashed as UTF-8 text, so anything beyond visible ASCII
/// is accepted as long as it decodes.
fn value_str<'a>(name: &str, value: &'a HeaderValue) -> Result<&'a str> {
    std::str::from_utf8(value.as_bytes())
        .map_err(|e| Error::header_value_invalid(name).with_source(anyhow::Error::from(e)))
}

/// Normalize a single header value.
///
/// The value is trimmed, then split on `"`: segments outside quotes (even
/// positions) have each whitespace run collapsed into one space, segments
/// inside quotes are kept verbatim.
pub fn normalize_value(value: &str) -> String {
    let mut s = String::with_capacity(value.len());

    for (idx, piece) in value.trim().split('"').enumerate() {
        if idx != 0 {
            s.push('"');
        }

        if idx % 2 == 1 {
            s.push_str(piece);
            continue;
        }

        let mut in_space = false;
        for c in piece.chars() {
            if c.is_whitespace() {
                if !in_space {
                    s.push(' ');
                }
                in_space = true;
            } else {
                s.push(c);
                in_space = false;
            }
        }
    }

    s
}
