//! Simhash over whitespace-delimited tokens.
use crate::digest::TokenDigest;
use crate::fingerprint::Fingerprint;

const DIM: usize = Fingerprint::DIM;

/// [Simhash](https://dl.acm.org/doi/10.1145/509907.509965) over 128-bit token digests.
///
/// Every token votes `+1` on the positions where its digest has a one and `-1`
/// elsewhere; the fingerprint has a one wherever the total is not negative.
/// A document without tokens therefore has the all-ones fingerprint.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimHasher {
    seed: u64,
    digest: TokenDigest,
}

impl SimHasher {
    /// Creates an instance whose token digests are keyed by `seed`.
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            digest: TokenDigest::Xxh3,
        }
    }

    /// Sets the hash function of tokens.
    pub const fn with_digest(mut self, digest: TokenDigest) -> Self {
        self.digest = digest;
        self
    }

    /// Gets the seed of token digests.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Gets the hash function of tokens.
    pub const fn digest(&self) -> TokenDigest {
        self.digest
    }

    /// Produces the fingerprint of a text tokenized on whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use simhash::SimHasher;
    ///
    /// let hasher = SimHasher::new(42);
    /// let x = hasher.fingerprint("the quick brown fox");
    /// let y = hasher.fingerprint("fox brown quick the");
    /// assert_eq!(x, y);
    /// assert_eq!(hasher.fingerprint("").value(), u128::MAX);
    /// ```
    pub fn fingerprint<S>(&self, text: S) -> Fingerprint
    where
        S: AsRef<str>,
    {
        self.fingerprint_tokens(text.as_ref().split_whitespace())
    }

    /// Produces the fingerprint of pre-tokenized input.
    pub fn fingerprint_tokens<I, T>(&self, tokens: I) -> Fingerprint
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut weights = [0i64; DIM];
        for h in tokens
            .into_iter()
            .map(|t| self.digest.hash(t.as_ref(), self.seed))
        {
            for (j, w) in weights.iter_mut().enumerate() {
                if (h >> (DIM - 1 - j)) & 1 == 1 {
                    *w += 1;
                } else {
                    *w -= 1;
                }
            }
        }
        Fingerprint::from_u128(
            weights
                .iter()
                .fold(0u128, |acc, &w| if w >= 0 { (acc << 1) | 1 } else { acc << 1 }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_token;

    #[test]
    fn test_deterministic() {
        let hasher = SimHasher::new(42);
        let text = "near duplicate documents share most of their tokens";
        assert_eq!(hasher.fingerprint(text), hasher.fingerprint(text));
        assert_eq!(
            hasher.fingerprint(text),
            SimHasher::new(42).fingerprint(text)
        );
    }

    #[test]
    fn test_empty_is_all_ones() {
        let hasher = SimHasher::new(42);
        assert_eq!(hasher.fingerprint("").value(), u128::MAX);
        assert_eq!(hasher.fingerprint(" \t\n ").value(), u128::MAX);
        assert_eq!(
            hasher.fingerprint_tokens(Vec::<&str>::new()).value(),
            u128::MAX
        );
    }

    #[test]
    fn test_single_token() {
        let hasher = SimHasher::new(7);
        assert_eq!(hasher.fingerprint("abc").value(), hash_token("abc", 7));
        // Repeating a token only scales the votes.
        assert_eq!(hasher.fingerprint("abc abc abc").value(), hash_token("abc", 7));
    }

    #[test]
    fn test_two_tokens_tie_to_ones() {
        let hasher = SimHasher::new(7);
        let expected = hash_token("abc", 7) | hash_token("xyz", 7);
        assert_eq!(hasher.fingerprint("abc xyz").value(), expected);
    }

    #[test]
    fn test_token_order_and_whitespace() {
        let hasher = SimHasher::default();
        let x = hasher.fingerprint("a b c d");
        assert_eq!(x, hasher.fingerprint("d c b a"));
        assert_eq!(x, hasher.fingerprint("  a\tb \n c    d "));
        assert_eq!(x, hasher.fingerprint_tokens(["b", "a", "d", "c"]));
    }

    #[test]
    fn test_seed() {
        let text = "hello world";
        assert_ne!(
            SimHasher::new(1).fingerprint(text),
            SimHasher::new(2).fingerprint(text)
        );
    }

    #[test]
    fn test_md5_fingerprints() {
        // Reference values of the MD5-based simhash over the same tokens.
        let hasher = SimHasher::new(1).with_digest(TokenDigest::Md5);
        assert_eq!(
            hasher.fingerprint("hello world").to_string(),
            "7d79703fbc7f2bf6ff7b9f93f2f7f5f7"
        );
        assert_eq!(
            hasher.fingerprint("the quick brown fox").to_string(),
            "2ff57cfadf8b66effdc76fa2fdcedb1f"
        );
        assert_eq!(
            hasher.fingerprint("hello world"),
            SimHasher::new(2)
                .with_digest(TokenDigest::Md5)
                .fingerprint("hello world")
        );
        assert_eq!(hasher.fingerprint("").value(), u128::MAX);
    }

    #[test]
    fn test_similar_texts_are_close() {
        let hasher = SimHasher::new(42);
        let base: Vec<String> = (0..200).map(|i| format!("w{i}")).collect();
        let mut edited = base.clone();
        edited[0] = "changed".to_string();
        let other: Vec<String> = (0..200).map(|i| format!("z{i}")).collect();

        let x = hasher.fingerprint_tokens(&base);
        let y = hasher.fingerprint_tokens(&edited);
        let z = hasher.fingerprint_tokens(&other);
        assert!(x.hamming_distance(y) < x.hamming_distance(z));
    }
}
