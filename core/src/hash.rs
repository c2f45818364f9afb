// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Hash related utils.

use std::fmt;
use std::str::FromStr;

use crate::Error;
use hmac::Hmac;
use hmac::Mac;
use sha2::Digest;
use sha2::Sha256;
use sha2::Sha512;

/// Hash algorithm used for payload digests and HMAC chaining.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA-256, the default.
    #[default]
    Sha256,
    /// SHA-512.
    Sha512,
}

impl HashAlgorithm {
    /// Upper-case name used inside the algorithm identifier, e.g. `SHA256`.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA256",
            HashAlgorithm::Sha512 => "SHA512",
        }
    }

    /// Hex encoded digest of `content`.
    ///
    /// An empty `content` yields the well-known empty-string digest.
    pub fn hex_digest(&self, content: &[u8]) -> String {
        match self {
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(content).as_slice()),
            HashAlgorithm::Sha512 => hex::encode(Sha512::digest(content).as_slice()),
        }
    }

    /// Raw HMAC of `content` under `key`.
    pub fn hmac(&self, key: &[u8], content: &[u8]) -> crate::Result<Vec<u8>> {
        let bs = match self {
            HashAlgorithm::Sha256 => {
                let mut h = Hmac::<Sha256>::new_from_slice(key)?;
                h.update(content);
                h.finalize().into_bytes().to_vec()
            }
            HashAlgorithm::Sha512 => {
                let mut h = Hmac::<Sha512>::new_from_slice(key)?;
                h.update(content);
                h.finalize().into_bytes().to_vec()
            }
        };

        Ok(bs)
    }

    /// Hex encoded HMAC of `content` under `key`.
    ///
    /// Use this function instead of `hex::encode(hmac(key, content))` can
    /// reduce extra copy.
    pub fn hex_hmac(&self, key: &[u8], content: &[u8]) -> crate::Result<String> {
        let s = match self {
            HashAlgorithm::Sha256 => {
                let mut h = Hmac::<Sha256>::new_from_slice(key)?;
                h.update(content);
                hex::encode(h.finalize().into_bytes())
            }
            HashAlgorithm::Sha512 => {
                let mut h = Hmac::<Sha512>::new_from_slice(key)?;
                h.update(content);
                hex::encode(h.finalize().into_bytes())
            }
        };

        Ok(s)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SHA256" => Ok(HashAlgorithm::Sha256),
            "SHA512" => Ok(HashAlgorithm::Sha512),
            _ => Err(Error::config_invalid(format!(
                "unsupported hash algorithm: {s}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(HashAlgorithm::Sha256, "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"; "sha256")]
    #[test_case(HashAlgorithm::Sha512, "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e"; "sha512")]
    fn test_empty_digest(algo: HashAlgorithm, expected: &str) {
        assert_eq!(algo.hex_digest(b""), expected);
    }

    #[test]
    fn test_hex_hmac_matches_raw_hmac() {
        for algo in [HashAlgorithm::Sha256, HashAlgorithm::Sha512] {
            let raw = algo.hmac(b"key", b"content").expect("hmac must succeed");
            let hexed = algo.hex_hmac(b"key", b"content").expect("hmac must succeed");
            assert_eq!(hex::encode(raw), hexed);
        }
    }

    #[test]
    fn test_hmac_sha256_known_vector() {
        // RFC 4231 test case 2
        let v = HashAlgorithm::Sha256
            .hex_hmac(b"Jefe", b"what do ya want for nothing?")
            .expect("hmac must succeed");
        assert_eq!(
            v,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test_case("SHA256", HashAlgorithm::Sha256; "upper 256")]
    #[test_case("sha512", HashAlgorithm::Sha512; "lower 512")]
    fn test_parse_hash_algorithm(input: &str, expected: HashAlgorithm) {
        assert_eq!(input.parse::<HashAlgorithm>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_hash_algorithm() {
        let err = "MD5".parse::<HashAlgorithm>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
    }
}
