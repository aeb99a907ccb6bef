//! Threshold near-duplicate queries over 128-bit simhash fingerprints.
//!
//! Documents are reduced to [`simhash`] fingerprints once, and every query counts the
//! other documents within a Hamming distance of a given document. Candidates are either
//! all the other documents ([`Strategy::Exhaustive`]) or only those sharing a band of
//! bits with the query document ([`Strategy::Indexed`]); both verify candidates with the
//! exact distance, so the indexed strategy can miss matches but never invents them.
#![deny(missing_docs)]

pub mod config;
pub mod errors;
pub mod feed;
pub mod searcher;

pub use config::{SearchConfig, Strategy};
pub use searcher::DuplicateSearcher;
pub use simhash::{Fingerprint, TokenDigest};
