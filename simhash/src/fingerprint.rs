//! Fixed-width binary fingerprints.
use std::fmt;

/// A 128-bit simhash fingerprint.
///
/// Bit position `0` is the most significant bit of [`Fingerprint::value()`],
/// i.e., the first character of [`Fingerprint::bits()`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u128);

impl Fingerprint {
    /// Number of dimensions.
    pub const DIM: usize = 128;

    /// Wraps a raw 128-bit value.
    pub const fn from_u128(value: u128) -> Self {
        Self(value)
    }

    /// Gets the raw 128-bit value.
    pub const fn value(self) -> u128 {
        self.0
    }

    /// Gets the bit at `pos`, counted from the most significant end.
    pub fn bit(self, pos: usize) -> bool {
        debug_assert!(pos < Self::DIM);
        (self.0 >> (Self::DIM - 1 - pos)) & 1 == 1
    }

    /// Gets the Hamming distance to the other fingerprint.
    ///
    /// # Examples
    ///
    /// ```
    /// use simhash::Fingerprint;
    ///
    /// let x = Fingerprint::from_u128(0b1011);
    /// let y = Fingerprint::from_u128(0b0110);
    /// assert_eq!(x.hamming_distance(y), 3);
    /// ```
    #[inline(always)]
    pub const fn hamming_distance(self, other: Self) -> u32 {
        (self.0 ^ other.0).count_ones()
    }

    /// Renders the fingerprint as 128 characters of `0` and `1`.
    pub fn bits(self) -> String {
        format!("{:0128b}", self.0)
    }
}

impl From<u128> for Fingerprint {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<Fingerprint> for u128 {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}

/// Prints 32 lower-case hex digits.
impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl fmt::LowerHex for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::Binary for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}
