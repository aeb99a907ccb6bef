//! Configuration of [`DuplicateSearcher`](crate::DuplicateSearcher).
use std::fmt;
use std::str::FromStr;

use simhash::TokenDigest;

/// Default number of bands in the indexed strategy.
pub const DEFAULT_NUM_BANDS: usize = 8;
/// Default number of bits per band in the indexed strategy.
pub const DEFAULT_BAND_WIDTH: usize = 16;
/// Default seed value used when no seed is given.
pub const DEFAULT_SEED: u64 = 0x5eed;

/// Retrieval strategy of candidates for a query document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Compares against every other document.
    #[default]
    Exhaustive,
    /// Compares only against documents sharing at least one band.
    Indexed,
}

impl FromStr for Strategy {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exhaustive" => Ok(Self::Exhaustive),
            "indexed" => Ok(Self::Indexed),
            _ => Err("Could not parse a strategy value"),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Exhaustive => write!(f, "exhaustive"),
            Self::Indexed => write!(f, "indexed"),
        }
    }
}

/// Configuration of a searcher.
///
/// The layout of bands is validated when a searcher is created.
///
/// # Examples
///
/// ```
/// use near_dup::config::{SearchConfig, Strategy};
///
/// let config = SearchConfig::new()
///     .with_strategy(Strategy::Indexed)
///     .with_bands(16, 8)
///     .with_fallback_to_exhaustive(true)
///     .with_seed(Some(42));
/// assert_eq!(config.strategy(), Strategy::Indexed);
/// assert_eq!(config.num_bands(), 16);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    strategy: Strategy,
    num_bands: usize,
    band_width: usize,
    fallback_to_exhaustive: bool,
    seed: Option<u64>,
    digest: TokenDigest,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            num_bands: DEFAULT_NUM_BANDS,
            band_width: DEFAULT_BAND_WIDTH,
            fallback_to_exhaustive: false,
            seed: None,
            digest: TokenDigest::default(),
        }
    }
}

impl SearchConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the retrieval strategy.
    pub const fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the number of bands and the bits per band of the indexed strategy.
    /// Their product must be 128.
    pub const fn with_bands(mut self, num_bands: usize, band_width: usize) -> Self {
        self.num_bands = num_bands;
        self.band_width = band_width;
        self
    }

    /// Checks every document when the index yields no candidates for a query document?
    /// Only meaningful for [`Strategy::Indexed`].
    pub const fn with_fallback_to_exhaustive(mut self, yes: bool) -> Self {
        self.fallback_to_exhaustive = yes;
        self
    }

    /// Sets the seed value for token hashing. If `None`, [`DEFAULT_SEED`] is used.
    pub const fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the hash function of tokens.
    /// [`TokenDigest::Md5`] reproduces MD5-based simhash fingerprints and ignores the seed.
    pub const fn with_digest(mut self, digest: TokenDigest) -> Self {
        self.digest = digest;
        self
    }

    /// Gets the retrieval strategy.
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Gets the number of bands.
    pub const fn num_bands(&self) -> usize {
        self.num_bands
    }

    /// Gets the bits per band.
    pub const fn band_width(&self) -> usize {
        self.band_width
    }

    /// Gets if the fallback to the exhaustive strategy is enabled.
    pub const fn falls_back(&self) -> bool {
        self.fallback_to_exhaustive
    }

    /// Gets the seed value.
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Gets the hash function of tokens.
    pub const fn digest(&self) -> TokenDigest {
        self.digest
    }
}
