//! Threshold queries over the fingerprints of a document collection.
use std::sync::atomic::{AtomicUsize, Ordering};

use hamming_bands::{BandingIndex, CandidateRelation};
use rand_xoshiro::rand_core::{RngCore, SeedableRng};
use rayon::prelude::*;
use simhash::{Fingerprint, SimHasher};

use crate::config::{SearchConfig, Strategy, DEFAULT_SEED};
use crate::errors::{NearDupError, Result};

const PROGRESS_STEP: usize = 10000;

enum Backend {
    Exhaustive,
    Indexed {
        relation: CandidateRelation,
        fallback: bool,
    },
}

/// Searcher of near-duplicate documents in the Hamming space of 128-bit simhash fingerprints.
///
/// A searcher is used in two phases: documents are converted into fingerprints once
/// with [`Self::build_fingerprints()`] (or its parallel variant), and then any number of
/// read-only queries can be issued, also from multiple threads.
///
/// # Examples
///
/// ```
/// use near_dup::config::{SearchConfig, Strategy};
/// use near_dup::DuplicateSearcher;
///
/// let documents = vec!["a b c", "a b c", "x y z"];
///
/// let searcher = DuplicateSearcher::new(SearchConfig::new().with_strategy(Strategy::Indexed))
///     .unwrap()
///     .build_fingerprints(documents.iter());
///
/// assert_eq!(searcher.count(0, 0).unwrap(), 1);
/// assert_eq!(searcher.count(2, -1).unwrap(), 0);
/// assert!(searcher.count(3, 0).is_err());
/// ```
pub struct DuplicateSearcher {
    config: SearchConfig,
    hasher: SimHasher,
    banding: Option<BandingIndex<u128>>,
    shows_progress: bool,
    fingerprints: Vec<Fingerprint>,
    backend: Backend,
    num_degenerate: usize,
}

impl DuplicateSearcher {
    /// Creates an instance.
    ///
    /// # Errors
    ///
    /// An error is returned if the bands in `config` do not partition 128 bits.
    pub fn new(config: SearchConfig) -> Result<Self> {
        let banding = BandingIndex::<u128>::new(config.num_bands(), config.band_width())?;
        let seed = config.seed().unwrap_or(DEFAULT_SEED);
        let mut seeder = rand_xoshiro::SplitMix64::seed_from_u64(seed);
        let hasher = SimHasher::new(seeder.next_u64()).with_digest(config.digest());
        let (banding, backend) = match config.strategy() {
            Strategy::Exhaustive => (None, Backend::Exhaustive),
            Strategy::Indexed => (
                Some(banding),
                Backend::Indexed {
                    relation: CandidateRelation::default(),
                    fallback: config.falls_back(),
                },
            ),
        };
        Ok(Self {
            config,
            hasher,
            banding,
            shows_progress: false,
            fingerprints: vec![],
            backend,
            num_degenerate: 0,
        })
    }

    /// Logs the progress?
    pub fn shows_progress(mut self, yes: bool) -> Self {
        self.shows_progress = yes;
        self.banding = self.banding.map(|b| b.shows_progress(yes));
        self
    }

    /// Converts input documents into fingerprints and, for the indexed strategy,
    /// builds the candidate relation. The index of a document is its id.
    ///
    /// A document without tokens is not an error; it gets the all-ones fingerprint.
    pub fn build_fingerprints<I, D>(mut self, documents: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: AsRef<str>,
    {
        let mut results = vec![];
        for (i, doc) in documents.into_iter().enumerate() {
            if self.shows_progress && (i + 1) % PROGRESS_STEP == 0 {
                tracing::info!("Processed {} documents...", i + 1);
            }
            results.push(self.fingerprint_document(i, doc.as_ref()));
        }
        self.finish_build(results, false);
        self
    }

    /// Does the same as [`Self::build_fingerprints()`], in parallel.
    pub fn build_fingerprints_in_parallel<I, D>(mut self, documents: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: AsRef<str> + Send,
    {
        let documents: Vec<D> = documents.into_iter().collect();
        let processed = AtomicUsize::new(0);
        let mut results = Vec::with_capacity(documents.len());
        documents
            .into_par_iter()
            .enumerate()
            .map(|(i, doc)| {
                let cnt = processed.fetch_add(1, Ordering::Relaxed) + 1;
                if self.shows_progress && cnt % PROGRESS_STEP == 0 {
                    tracing::info!("Processed {cnt} documents...");
                }
                self.fingerprint_document(i, doc.as_ref())
            })
            .collect_into_vec(&mut results);
        self.finish_build(results, true);
        self
    }

    /// Counts the other documents whose fingerprints are within Hamming distance
    /// `max_distance` of document `doc_id`.
    ///
    /// A negative `max_distance` always yields 0. With the indexed strategy, only
    /// documents sharing a band with `doc_id` are examined, so the count never exceeds
    /// the exhaustive one.
    ///
    /// # Errors
    ///
    /// [`NearDupError::Range`] is returned if `doc_id` is not a document id.
    pub fn count(&self, doc_id: usize, max_distance: i64) -> Result<usize> {
        if doc_id >= self.len() {
            return Err(NearDupError::range(
                i64::try_from(doc_id).unwrap_or(i64::MAX),
                self.len(),
            ));
        }
        if max_distance < 0 {
            return Ok(0);
        }
        let radius = max_distance.min(Fingerprint::DIM as i64) as u32;
        let count = match &self.backend {
            Backend::Exhaustive => self.count_within(doc_id, radius, 0..self.len()),
            Backend::Indexed { relation, fallback } => {
                let candidates = relation.candidates(doc_id);
                if candidates.is_empty() && *fallback {
                    self.count_within(doc_id, radius, 0..self.len())
                } else {
                    self.count_within(doc_id, radius, candidates.iter().copied())
                }
            }
        };
        Ok(count)
    }

    /// Answers `(doc_id, max_distance)` queries in parallel, returning counts in the
    /// order of the queries.
    ///
    /// # Errors
    ///
    /// [`NearDupError::Range`] is returned for the first query whose document id is
    /// out of range; no count is produced in that case.
    pub fn count_all(&self, queries: &[(usize, i64)]) -> Result<Vec<usize>> {
        if let Some(&(doc_id, _)) = queries.iter().find(|&&(doc_id, _)| doc_id >= self.len()) {
            return Err(NearDupError::range(
                i64::try_from(doc_id).unwrap_or(i64::MAX),
                self.len(),
            ));
        }
        queries
            .par_iter()
            .map(|&(doc_id, max_distance)| self.count(doc_id, max_distance))
            .collect()
    }

    /// Finds all pairs of documents within Hamming distance `max_distance`, returning
    /// triplets of the left-side id, the right-side id, and their distance in
    /// ascending order of ids.
    pub fn similar_pairs(&self, max_distance: i64) -> Vec<(usize, usize, u32)> {
        if max_distance < 0 {
            return vec![];
        }
        let radius = max_distance.min(Fingerprint::DIM as i64) as u32;
        let n = self.len();
        let mut matched: Vec<_> = (0..n)
            .into_par_iter()
            .flat_map_iter(|i| {
                let x = self.fingerprints[i];
                let others: Vec<usize> = match &self.backend {
                    Backend::Exhaustive => (i + 1..n).collect(),
                    Backend::Indexed { relation, fallback } => {
                        let candidates = relation.candidates(i);
                        if candidates.is_empty() && *fallback {
                            (0..n).filter(|&j| j != i).collect()
                        } else {
                            candidates.iter().copied().filter(|&j| j > i).collect()
                        }
                    }
                };
                others.into_iter().filter_map(move |j| {
                    let dist = x.hamming_distance(self.fingerprints[j]);
                    (dist <= radius).then(|| (i.min(j), i.max(j), dist))
                })
            })
            .collect();
        matched.sort_unstable();
        matched.dedup();
        if self.shows_progress {
            tracing::info!(
                "[DuplicateSearcher::similar_pairs] #matched={}",
                matched.len()
            );
        }
        matched
    }

    /// Gets the fingerprint of document `doc_id`.
    pub fn fingerprint(&self, doc_id: usize) -> Option<Fingerprint> {
        self.fingerprints.get(doc_id).copied()
    }

    /// Gets the fingerprints of all documents.
    pub fn fingerprints(&self) -> &[Fingerprint] {
        &self.fingerprints
    }

    /// Gets the candidates of document `doc_id`, or `None` for the exhaustive strategy.
    pub fn candidates(&self, doc_id: usize) -> Option<&[usize]> {
        match &self.backend {
            Backend::Exhaustive => None,
            Backend::Indexed { relation, .. } => Some(relation.candidates(doc_id)),
        }
    }

    /// Gets the number of documents without tokens.
    pub const fn num_degenerate(&self) -> usize {
        self.num_degenerate
    }

    /// Gets the number of input documents.
    pub fn len(&self) -> usize {
        self.fingerprints.len()
    }

    /// Checks if the database is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets the memory usage in bytes.
    pub fn memory_in_bytes(&self) -> usize {
        let relation = match &self.backend {
            Backend::Exhaustive => 0,
            Backend::Indexed { relation, .. } => relation.memory_in_bytes(),
        };
        self.fingerprints.len() * std::mem::size_of::<Fingerprint>() + relation
    }

    /// Gets the configuration.
    pub const fn config(&self) -> SearchConfig {
        self.config
    }

    fn fingerprint_document(&self, doc_id: usize, doc: &str) -> (Fingerprint, bool) {
        let degenerate = doc.split_whitespace().next().is_none();
        if degenerate {
            tracing::debug!("Document {doc_id} has no tokens; its fingerprint is all ones.");
        }
        (self.hasher.fingerprint(doc), degenerate)
    }

    fn finish_build(&mut self, results: Vec<(Fingerprint, bool)>, in_parallel: bool) {
        self.num_degenerate = results.iter().filter(|&&(_, d)| d).count();
        self.fingerprints = results.into_iter().map(|(fp, _)| fp).collect();
        if self.num_degenerate != 0 {
            tracing::warn!(
                "{} documents have no tokens and share the all-ones fingerprint.",
                self.num_degenerate
            );
        }
        if let (Some(banding), Backend::Indexed { relation, .. }) =
            (&self.banding, &mut self.backend)
        {
            let sketches: Vec<u128> = self.fingerprints.iter().map(|fp| fp.value()).collect();
            *relation = if in_parallel {
                banding.build_in_parallel(&sketches)
            } else {
                banding.build(&sketches)
            };
        }
        if self.shows_progress {
            tracing::info!(
                "Produced {} fingerprints with the {} strategy, consuming {} bytes",
                self.len(),
                self.config.strategy(),
                self.memory_in_bytes()
            );
        }
    }

    fn count_within<I>(&self, doc_id: usize, radius: u32, candidates: I) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        let x = self.fingerprints[doc_id];
        candidates
            .into_iter()
            .filter(|&j| j != doc_id && x.hamming_distance(self.fingerprints[j]) <= radius)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn searcher(config: SearchConfig, documents: &[&str]) -> DuplicateSearcher {
        DuplicateSearcher::new(config)
            .unwrap()
            .build_fingerprints(documents.iter())
    }

    fn exhaustive(documents: &[&str]) -> DuplicateSearcher {
        searcher(SearchConfig::new(), documents)
    }

    fn indexed(documents: &[&str]) -> DuplicateSearcher {
        searcher(SearchConfig::new().with_strategy(Strategy::Indexed), documents)
    }

    fn example_documents() -> Vec<String> {
        // Documents drawn from a small vocabulary so that some pairs are close.
        let mut state = 42u64;
        let mut documents = vec![];
        for _ in 0..60 {
            let mut words = vec![];
            for _ in 0..12 {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                words.push(format!("w{}", (state >> 33) % 16));
            }
            documents.push(words.join(" "));
        }
        documents.push(documents[0].clone());
        documents.push(String::new());
        documents.push(" ".to_string());
        documents
    }

    #[test]
    fn test_identical_pair() {
        let documents = ["hello world", "hello world"];
        assert_eq!(exhaustive(&documents).count(0, 0).unwrap(), 1);
        assert_eq!(indexed(&documents).count(0, 0).unwrap(), 1);
    }

    #[test]
    fn test_exact_duplicate_among_others() {
        let documents = ["a b c", "a b c", "x y z"];
        let e = exhaustive(&documents);
        let i = indexed(&documents);
        assert_eq!(e.count(0, 0).unwrap(), 1);
        assert_eq!(i.count(0, 0).unwrap(), 1);
        assert_eq!(i.candidates(0), Some(&[1][..]));
        assert_eq!(e.candidates(0), None);
    }

    #[test]
    fn test_empty_documents() {
        let documents = ["", "some text here", "   "];
        for s in [exhaustive(&documents), indexed(&documents)] {
            assert_eq!(s.fingerprint(0).unwrap().value(), u128::MAX);
            assert_eq!(s.fingerprint(2).unwrap().value(), u128::MAX);
            assert_eq!(s.num_degenerate(), 2);
            assert_eq!(s.count(0, 0).unwrap(), 1);
            assert_eq!(s.count(2, 0).unwrap(), 1);
        }
    }

    #[test]
    fn test_negative_distance() {
        let documents = ["a", "a", "a"];
        assert_eq!(exhaustive(&documents).count(0, -1).unwrap(), 0);
        assert_eq!(indexed(&documents).count(1, -1).unwrap(), 0);
        assert_eq!(exhaustive(&documents).count(1, i64::MIN).unwrap(), 0);
        assert!(exhaustive(&documents).similar_pairs(-1).is_empty());
    }

    #[test]
    fn test_saturation() {
        let documents = example_documents();
        let documents: Vec<&str> = documents.iter().map(String::as_str).collect();
        let s = exhaustive(&documents);
        for doc_id in 0..s.len() {
            assert_eq!(s.count(doc_id, 128).unwrap(), s.len() - 1);
            assert_eq!(s.count(doc_id, i64::MAX).unwrap(), s.len() - 1);
        }
    }

    #[test]
    fn test_out_of_range() {
        let documents = ["a", "b"];
        for s in [exhaustive(&documents), indexed(&documents)] {
            match s.count(2, 0) {
                Err(NearDupError::Range(e)) => {
                    assert_eq!(e.doc_id(), 2);
                    assert_eq!(e.num_docs(), 2);
                }
                _ => panic!("expected a range error"),
            }
            assert!(s.count_all(&[(0, 0), (5, 1)]).is_err());
        }
        let empty = exhaustive(&[]);
        assert!(empty.is_empty());
        assert!(empty.count(0, 0).is_err());
    }

    #[test]
    fn test_invalid_bands() {
        let config = SearchConfig::new()
            .with_strategy(Strategy::Indexed)
            .with_bands(8, 8);
        match DuplicateSearcher::new(config) {
            Err(NearDupError::Layout(e)) => {
                assert_eq!(e.num_bands(), 8);
                assert_eq!(e.band_width(), 8);
                assert_eq!(e.dim(), 128);
            }
            Err(e) => panic!("expected a layout error, got {e}"),
            Ok(_) => panic!("expected a layout error"),
        }
    }

    #[test]
    fn test_indexed_is_sound() {
        let documents = example_documents();
        let documents: Vec<&str> = documents.iter().map(String::as_str).collect();
        let e = exhaustive(&documents);
        for (num_bands, band_width) in [(8, 16), (4, 32), (16, 8), (2, 64)] {
            for fallback in [false, true] {
                let config = SearchConfig::new()
                    .with_strategy(Strategy::Indexed)
                    .with_bands(num_bands, band_width)
                    .with_fallback_to_exhaustive(fallback);
                let i = searcher(config, &documents);
                for doc_id in 0..documents.len() {
                    // Identical fingerprints share every band.
                    assert_eq!(i.count(doc_id, 0).unwrap(), e.count(doc_id, 0).unwrap());
                    for max_distance in (0..=128).step_by(8) {
                        assert!(
                            i.count(doc_id, max_distance).unwrap()
                                <= e.count(doc_id, max_distance).unwrap()
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_one_bit_bands_recall_everything() {
        let documents = example_documents();
        let documents: Vec<&str> = documents.iter().map(String::as_str).collect();
        let e = exhaustive(&documents);
        let config = SearchConfig::new().with_strategy(Strategy::Indexed).with_bands(128, 1);
        let i = searcher(config, &documents);
        for doc_id in 0..documents.len() {
            for max_distance in [0, 10, 30, 60, 128] {
                assert_eq!(
                    i.count(doc_id, max_distance).unwrap(),
                    e.count(doc_id, max_distance).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_fallback() {
        // With a single 128-bit band, only identical fingerprints are candidates.
        let documents = ["alpha beta", "alpha gamma"];
        let config = SearchConfig::new().with_strategy(Strategy::Indexed).with_bands(1, 128);
        let i = searcher(config, &documents);
        assert_eq!(i.candidates(0), Some(&[][..]));
        assert_eq!(i.count(0, 128).unwrap(), 0);
        assert!(i.similar_pairs(128).is_empty());

        let i = searcher(config.with_fallback_to_exhaustive(true), &documents);
        assert_eq!(i.count(0, 128).unwrap(), 1);
        assert_eq!(i.similar_pairs(128).len(), 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let documents = example_documents();
        for config in [
            SearchConfig::new(),
            SearchConfig::new().with_strategy(Strategy::Indexed),
        ] {
            let s = DuplicateSearcher::new(config)
                .unwrap()
                .build_fingerprints(documents.iter());
            let p = DuplicateSearcher::new(config)
                .unwrap()
                .build_fingerprints_in_parallel(documents.iter());
            assert_eq!(s.fingerprints(), p.fingerprints());
            assert_eq!(s.num_degenerate(), p.num_degenerate());
            for doc_id in 0..s.len() {
                assert_eq!(s.candidates(doc_id), p.candidates(doc_id));
            }
        }
    }

    #[test]
    fn test_count_all() {
        let documents = example_documents();
        let s = DuplicateSearcher::new(SearchConfig::new().with_strategy(Strategy::Indexed))
            .unwrap()
            .build_fingerprints_in_parallel(documents.iter());
        let queries: Vec<(usize, i64)> = (0..s.len())
            .map(|i| (i, (i % 40) as i64 - 1))
            .collect();
        let expected: Vec<usize> = queries
            .iter()
            .map(|&(i, d)| s.count(i, d).unwrap())
            .collect();
        assert_eq!(s.count_all(&queries).unwrap(), expected);
    }

    #[test]
    fn test_similar_pairs_agree_with_counts() {
        let documents = example_documents();
        let documents: Vec<&str> = documents.iter().map(String::as_str).collect();
        for s in [exhaustive(&documents), indexed(&documents)] {
            for max_distance in [0, 16, 32, 128] {
                let pairs = s.similar_pairs(max_distance);
                for &(i, j, dist) in &pairs {
                    assert!(i < j);
                    assert!(dist <= max_distance as u32);
                    let x = s.fingerprint(i).unwrap();
                    let y = s.fingerprint(j).unwrap();
                    assert_eq!(dist, x.hamming_distance(y));
                }
                let total: usize = (0..s.len())
                    .map(|i| s.count(i, max_distance).unwrap())
                    .sum();
                assert_eq!(total, pairs.len() * 2);
            }
        }
    }

    #[test]
    fn test_seed() {
        let documents = ["hello world"];
        let x = searcher(SearchConfig::new().with_seed(Some(1)), &documents);
        let y = searcher(SearchConfig::new().with_seed(Some(1)), &documents);
        let z = searcher(SearchConfig::new().with_seed(Some(2)), &documents);
        assert_eq!(x.fingerprint(0), y.fingerprint(0));
        assert_ne!(x.fingerprint(0), z.fingerprint(0));
    }

    #[test]
    fn test_md5_reproduces_reference_counts() {
        let documents = [
            "hello world",
            "hello big world",
            "the quick brown fox",
            "hello world",
            "the quick brown dog",
        ];
        let config = SearchConfig::new().with_digest(simhash::TokenDigest::Md5);
        let s = searcher(config, &documents);
        let fps = s.fingerprints();
        assert_eq!(fps[0].to_string(), "7d79703fbc7f2bf6ff7b9f93f2f7f5f7");
        assert_eq!(fps[0].hamming_distance(fps[1]), 28);
        assert_eq!(fps[2].hamming_distance(fps[4]), 15);
        let queries = [(0, 0), (1, 10), (1, 27), (1, 28), (2, 30), (4, 40), (2, 128)];
        assert_eq!(s.count_all(&queries).unwrap(), vec![1, 0, 0, 2, 1, 1, 4]);

        // The seed does not key MD5 digests.
        let t = searcher(config.with_seed(Some(99)), &documents);
        assert_eq!(s.fingerprints(), t.fingerprints());
    }
}
