//! Banding index over binary sketches.
use std::marker::PhantomData;

use hashbrown::HashMap;
use rayon::prelude::*;

use crate::errors::{HammingBandsError, Result};
use crate::relation::CandidateRelation;
use crate::sketch::Sketch;

/// Banding index cutting every sketch into `num_bands` bands of `band_width` bits.
///
/// Band `0` holds the most significant bits. Two sketches become candidates of each
/// other if they agree on every bit of at least one band. Within a crowded bucket the
/// number of candidate pairs grows quadratically; wider bands produce fewer and
/// tighter candidates.
///
/// # Examples
///
/// ```
/// use hamming_bands::BandingIndex;
///
/// let index = BandingIndex::<u16>::new(4, 4).unwrap();
/// let sketches = [0x1234u16, 0x1fff, 0xf23f, 0x0000];
/// let relation = index.build(&sketches);
/// assert_eq!(relation.candidates(0), &[1, 2]);
/// assert_eq!(relation.candidates(3), &[] as &[usize]);
/// ```
#[derive(Clone, Debug)]
pub struct BandingIndex<S> {
    num_bands: usize,
    band_width: usize,
    shows_progress: bool,
    _phantom: PhantomData<S>,
}

impl<S> BandingIndex<S>
where
    S: Sketch,
{
    /// Creates an instance, requiring `num_bands * band_width` to equal `S::dim()`
    /// so that the bands partition every bit exactly.
    pub fn new(num_bands: usize, band_width: usize) -> Result<Self> {
        if num_bands.checked_mul(band_width) != Some(S::dim()) {
            return Err(HammingBandsError::layout(num_bands, band_width, S::dim()));
        }
        Ok(Self {
            num_bands,
            band_width,
            shows_progress: false,
            _phantom: PhantomData,
        })
    }

    /// Logs the progress?
    pub const fn shows_progress(mut self, yes: bool) -> Self {
        self.shows_progress = yes;
        self
    }

    /// Gets the number of bands.
    pub const fn num_bands(&self) -> usize {
        self.num_bands
    }

    /// Gets the number of bits per band.
    pub const fn band_width(&self) -> usize {
        self.band_width
    }

    /// Extracts the value of band `band` in the low bits.
    #[inline(always)]
    pub fn band_value(&self, sketch: S, band: usize) -> S {
        debug_assert!(band < self.num_bands);
        let start = S::dim() - (band + 1) * self.band_width;
        (sketch & S::mask(start..start + self.band_width)) >> start
    }

    /// Builds the candidate relation of `sketches`, where the index of a sketch is its id.
    pub fn build(&self, sketches: &[S]) -> CandidateRelation {
        let edge_lists = (0..self.num_bands).map(|band| {
            let edges = self.band_edges(sketches, band);
            if self.shows_progress {
                tracing::info!(
                    "[BandingIndex::build] Processed {}/{}...",
                    band + 1,
                    self.num_bands
                );
            }
            edges
        });
        let relation = CandidateRelation::from_edges(sketches.len(), edge_lists);
        self.log_summary(&relation);
        relation
    }

    /// Builds the same relation as [`Self::build()`], computing bands in parallel.
    pub fn build_in_parallel(&self, sketches: &[S]) -> CandidateRelation {
        let edge_lists: Vec<_> = (0..self.num_bands)
            .into_par_iter()
            .map(|band| self.band_edges(sketches, band))
            .collect();
        let relation = CandidateRelation::from_edges(sketches.len(), edge_lists);
        self.log_summary(&relation);
        relation
    }

    fn band_edges(&self, sketches: &[S], band: usize) -> Vec<(usize, usize)> {
        let mut buckets: HashMap<S, Vec<usize>> = HashMap::new();
        for (id, &sketch) in sketches.iter().enumerate() {
            buckets
                .entry(self.band_value(sketch, band))
                .or_default()
                .push(id);
        }
        let mut edges = vec![];
        for members in buckets.values().filter(|m| m.len() > 1) {
            for (k, &i) in members.iter().enumerate() {
                for &j in &members[k + 1..] {
                    edges.push((i, j));
                }
            }
        }
        tracing::debug!(
            "[BandingIndex::band_edges] band={band}, #buckets={}, #edges={}",
            buckets.len(),
            edges.len()
        );
        edges
    }

    fn log_summary(&self, relation: &CandidateRelation) {
        if self.shows_progress {
            tracing::info!(
                "[BandingIndex::build] #sketches={}, #bands={}, #candidate-pairs={}",
                relation.num_sketches(),
                self.num_bands,
                relation.num_edges()
            );
        }
    }
}
