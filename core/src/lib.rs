//! Core components for signing and verifying HTTP requests.
//!
//! This crate provides the service-agnostic building blocks used by
//! `escher-signer`: everything that has to be byte-exact between a signer and
//! a verifier but doesn't depend on a specific scheme.
//!
//! ## Overview
//!
//! - [`SigningRequest`]: the request that takes part in a signature (method,
//!   path, query, headers, body).
//! - [`HeaderSource`] and [`header::normalize`]: headers as pairs or as a map,
//!   folded into sorted, merged [`NormalizedHeaders`].
//! - [`hash::HashAlgorithm`]: digests and HMAC over SHA256 or SHA512.
//! - [`time`]: the long date (`20220313T072004Z`), short date (`20220313`)
//!   and HTTP date formats.
//! - [`utils::constant_time_eq`]: signature comparison without timing leaks.
//!
//! ## Example
//!
//! ```
//! use escher_core::header::normalize;
//! use escher_core::HeaderSource;
//!
//! let headers = HeaderSource::from_pairs([("X-A", "1"), ("x-a", "2")])?;
//! let normalized = normalize(&headers)?;
//! assert_eq!(normalized.get("x-a"), Some("1,2"));
//! # Ok::<(), escher_core::Error>(())
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod header;
pub mod time;
pub mod utils;

mod env;
pub use env::Env;
pub use env::OsEnv;
pub use env::StaticEnv;

mod error;
pub use error::{Error, ErrorKind, Result};

pub use header::{HeaderSource, NormalizedHeaders};
mod request;
pub use request::SigningRequest;
