//! Error definitions.
use std::error::Error;
use std::{fmt, result};

/// A specialized Result type for this library.
pub type Result<T, E = HammingBandsError> = result::Result<T, E>;

/// Errors in this library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HammingBandsError {
    /// Contains [`LayoutError`].
    Layout(LayoutError),
}

impl fmt::Display for HammingBandsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Layout(e) => e.fmt(f),
        }
    }
}

impl Error for HammingBandsError {}

impl HammingBandsError {
    pub(crate) const fn layout(num_bands: usize, band_width: usize, dim: usize) -> Self {
        Self::Layout(LayoutError {
            num_bands,
            band_width,
            dim,
        })
    }
}

/// Error used when bands do not partition the bits of a sketch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutError {
    num_bands: usize,
    band_width: usize,
    dim: usize,
}

impl LayoutError {
    /// Gets the requested number of bands.
    pub const fn num_bands(&self) -> usize {
        self.num_bands
    }

    /// Gets the requested bits per band.
    pub const fn band_width(&self) -> usize {
        self.band_width
    }

    /// Gets the number of bits of the sketch type.
    pub const fn dim(&self) -> usize {
        self.dim
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "LayoutError: {} bands of {} bits do not partition {} bits",
            self.num_bands, self.band_width, self.dim
        )
    }
}
