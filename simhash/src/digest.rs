//! 128-bit token digests.
use std::fmt;
use std::str::FromStr;

use md5::{Digest, Md5};
use xxhash_rust::xxh3::xxh3_128_with_seed;

/// Hash function turning a token into 128 bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TokenDigest {
    /// XXH3-128 keyed by the hasher's seed.
    #[default]
    Xxh3,
    /// MD5 of the UTF-8 bytes, read as a big-endian integer. The seed is ignored.
    Md5,
}

impl TokenDigest {
    /// Generates the digest of `token`.
    ///
    /// # Examples
    ///
    /// ```
    /// use simhash::TokenDigest;
    ///
    /// assert_eq!(
    ///     TokenDigest::Md5.hash("hello", 0),
    ///     0x5d41402abc4b2a76b9719d911017c592
    /// );
    /// assert_ne!(TokenDigest::Xxh3.hash("hello", 7), TokenDigest::Xxh3.hash("hello", 8));
    /// ```
    #[inline(always)]
    pub fn hash(self, token: &str, seed: u64) -> u128 {
        match self {
            Self::Xxh3 => xxh3_128_with_seed(token.as_bytes(), seed),
            Self::Md5 => {
                let mut bytes = [0u8; 16];
                bytes.copy_from_slice(&Md5::digest(token.as_bytes()));
                u128::from_be_bytes(bytes)
            }
        }
    }
}

impl FromStr for TokenDigest {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xxh3" => Ok(Self::Xxh3),
            "md5" => Ok(Self::Md5),
            _ => Err("Could not parse a digest value"),
        }
    }
}

impl fmt::Display for TokenDigest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Xxh3 => write!(f, "xxh3"),
            Self::Md5 => write!(f, "md5"),
        }
    }
}
