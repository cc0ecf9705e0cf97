//! State fingerprints
//!
//! The behavior graph never holds full states, only their 64-bit fingerprints.
//! Computing fingerprints is the job of the state layer; this module only
//! defines the key type and the split used by the on-disk record format.

use std::fmt;

/// A 64-bit fingerprint identifying an explored state
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    /// Upper 32 bits, reinterpreted as a signed int for the record format.
    #[inline]
    pub fn high(self) -> i32 {
        (self.0 >> 32) as u32 as i32
    }

    /// Lower 32 bits, reinterpreted as a signed int for the record format.
    #[inline]
    pub fn low(self) -> i32 {
        (self.0 & 0xFFFF_FFFF) as u32 as i32
    }

    /// Rebuild a fingerprint from the two halves written by [`high`](Self::high)
    /// and [`low`](Self::low).
    #[inline]
    pub fn from_halves(high: i32, low: i32) -> Self {
        Fingerprint(((high as u32 as u64) << 32) | (low as u32 as u64))
    }

    /// The fingerprint as a signed 64-bit value, the way TLC prints it.
    #[inline]
    pub fn as_signed(self) -> i64 {
        self.0 as i64
    }
}

impl From<u64> for Fingerprint {
    fn from(fp: u64) -> Self {
        Fingerprint(fp)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FP({:016x})", self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
