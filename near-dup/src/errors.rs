//! Error definitions.
use std::error::Error;
use std::{fmt, result};

use hamming_bands::errors::{HammingBandsError, LayoutError};

/// A specialized Result type for this library.
pub type Result<T, E = NearDupError> = result::Result<T, E>;

/// Errors in this library.
#[derive(Debug)]
pub enum NearDupError {
    /// Contains [`LayoutError`] of the configured bands.
    Layout(LayoutError),
    /// Contains [`FormatError`].
    Format(FormatError),
    /// Contains [`RangeError`].
    Range(RangeError),
}

impl fmt::Display for NearDupError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Layout(e) => e.fmt(f),
            Self::Format(e) => e.fmt(f),
            Self::Range(e) => e.fmt(f),
        }
    }
}

impl Error for NearDupError {}

impl NearDupError {
    pub(crate) fn format<S: Into<String>>(line: usize, msg: S) -> Self {
        Self::Format(FormatError {
            line,
            msg: msg.into(),
        })
    }

    pub(crate) const fn range(doc_id: i64, num_docs: usize) -> Self {
        Self::Range(RangeError { doc_id, num_docs })
    }
}

impl From<HammingBandsError> for NearDupError {
    fn from(e: HammingBandsError) -> Self {
        match e {
            HammingBandsError::Layout(e) => Self::Layout(e),
        }
    }
}

/// Error used when an input feed has malformed counts or query lines.
#[derive(Debug)]
pub struct FormatError {
    line: usize,
    msg: String,
}

impl FormatError {
    /// Gets the 1-based line number where the problem was detected.
    pub const fn line(&self) -> usize {
        self.line
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FormatError: line {}: {}", self.line, self.msg)
    }
}

/// Error used when a query refers to a document that does not exist.
#[derive(Debug)]
pub struct RangeError {
    doc_id: i64,
    num_docs: usize,
}

impl RangeError {
    /// Gets the requested document id.
    pub const fn doc_id(&self) -> i64 {
        self.doc_id
    }

    /// Gets the number of documents.
    pub const fn num_docs(&self) -> usize {
        self.num_docs
    }
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "RangeError: document {} is out of range [0, {})",
            self.doc_id, self.num_docs
        )
    }
}
