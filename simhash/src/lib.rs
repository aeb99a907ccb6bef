//! Token-level [simhash](https://dl.acm.org/doi/10.1145/509907.509965) fingerprints
//! in 128 dimensions.
//!
//! A document is split on whitespace, every token is hashed into 128 bits, and the
//! per-position votes of all tokens decide the bits of the document's fingerprint.
//! Documents sharing most of their tokens end up with fingerprints that are close in
//! the Hamming space.
#![deny(missing_docs)]

pub mod digest;
pub mod fingerprint;
pub mod simhash;

pub use digest::TokenDigest;
pub use fingerprint::Fingerprint;
pub use simhash::SimHasher;

/// Generates the 128-bit XXH3 digest of a token.
///
/// # Examples
///
/// ```
/// use simhash::hash_token;
///
/// assert_eq!(hash_token("hello", 7), hash_token("hello", 7));
/// assert_ne!(hash_token("hello", 7), hash_token("hello", 8));
/// ```
#[inline(always)]
pub fn hash_token(token: &str, seed: u64) -> u128 {
    TokenDigest::Xxh3.hash(token, seed)
}
