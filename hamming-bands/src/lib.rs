//! This library provides a banding index on binary sketches in the Hamming space.
//!
//! Each sketch is cut into equal-width contiguous bands, and two sketches become
//! *candidates* of each other if they agree on all bits of at least one band.
//! The resulting [`CandidateRelation`] narrows an otherwise exhaustive similarity
//! search to pairs that are likely to be close, at the cost of possibly missing
//! close pairs that share no complete band.
#![deny(missing_docs)]

pub mod banding;
pub mod errors;
pub mod relation;
pub mod sketch;

pub use banding::BandingIndex;
pub use relation::CandidateRelation;
pub use sketch::Sketch;
