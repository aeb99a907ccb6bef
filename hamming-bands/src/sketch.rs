//! Traits of binary short sketches of primitive integer types.
use std::hash::Hash;
use std::ops::Range;

use num_traits::int::PrimInt;
use num_traits::{FromPrimitive, ToPrimitive, Unsigned};

/// Trait of a binary short sketch from a primitive unsigned integer type.
pub trait Sketch:
    Default + PrimInt + Unsigned + FromPrimitive + ToPrimitive + Hash + Send + Sync
{
    /// Gets the number of dimensions.
    fn dim() -> usize;
    /// Gets the Hamming distance to the other sketch.
    fn hamdist(self, rhs: Self) -> usize;
    /// Produces a sketch for masking a given bit-position range,
    /// where position `0` is the least significant bit.
    fn mask(rng: Range<usize>) -> Self;
}

macro_rules! impl_sketch {
    ($($t:ty),*) => {
        $(
            impl Sketch for $t {
                #[inline(always)]
                fn dim() -> usize {
                    <$t>::BITS as usize
                }
                #[inline(always)]
                fn hamdist(self, rhs: Self) -> usize {
                    (self ^ rhs).count_ones() as usize
                }
                #[inline(always)]
                fn mask(rng: Range<usize>) -> Self {
                    debug_assert!(rng.end <= Self::dim());
                    if rng.len() == Self::dim() {
                        Self::MAX
                    } else {
                        ((1 << rng.len()) - 1) << rng.start
                    }
                }
            }
        )*
    };
}

impl_sketch!(u8, u16, u32, u64, u128);
