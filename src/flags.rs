//! # Interpolation Warning Flags
//!
//! Bits accumulated while tidying and interpolating a profile. They are
//! independent and OR-combined across stages, and a bit once set is never
//! cleared within a call.
//!
//! | bit | meaning |
//! |-----|---------|
//! | 1   | degenerate (equal-pressure) levels dropped |
//! | 2   | pressure was decreasing and has been reversed |
//! | 4   | the variable had missing values |
//! | 8   | pressure was non-monotonic and has been sorted |
//! | 16  | insufficient data to interpolate |
//! | 32  | pressure had missing values |
//! | 64  | extrapolation beyond the measured range was prevented |
//! | 128 | interpolated levels masked for lack of a close measurement |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WarningFlags(u32);

impl WarningFlags {
    pub const NONE: WarningFlags = WarningFlags(0);
    pub const DEGENERATE_DROPPED: WarningFlags = WarningFlags(1);
    pub const PRESSURE_REVERSED: WarningFlags = WarningFlags(2);
    pub const VARIABLE_NAN: WarningFlags = WarningFlags(4);
    pub const PRESSURE_SORTED: WarningFlags = WarningFlags(8);
    pub const INSUFFICIENT_DATA: WarningFlags = WarningFlags(16);
    pub const PRESSURE_NAN: WarningFlags = WarningFlags(32);
    pub const EXTRAPOLATION_PREVENTED: WarningFlags = WarningFlags(64);
    pub const FAR_NEIGHBOR_MASKED: WarningFlags = WarningFlags(128);

    /// Wrap raw bits, e.g. a profile's ingest flag.
    pub const fn from_bits(bits: u32) -> Self {
        WarningFlags(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if every bit of `other` is set in `self`.
    pub const fn contains(self, other: WarningFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for WarningFlags {
    type Output = WarningFlags;

    fn bitor(self, rhs: WarningFlags) -> WarningFlags {
        WarningFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for WarningFlags {
    fn bitor_assign(&mut self, rhs: WarningFlags) {
        self.0 |= rhs.0;
    }
}

impl From<WarningFlags> for u32 {
    fn from(flags: WarningFlags) -> u32 {
        flags.0
    }
}

impl fmt::Display for WarningFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_combine_independently() {
        let mut flags = WarningFlags::from_bits(0);
        flags |= WarningFlags::DEGENERATE_DROPPED;
        flags |= WarningFlags::EXTRAPOLATION_PREVENTED;
        flags |= WarningFlags::DEGENERATE_DROPPED;

        assert_eq!(flags.bits(), 65);
        assert!(flags.contains(WarningFlags::EXTRAPOLATION_PREVENTED));
        assert!(!flags.contains(WarningFlags::PRESSURE_SORTED));
        assert_eq!(
            WarningFlags::PRESSURE_SORTED | WarningFlags::VARIABLE_NAN,
            WarningFlags::VARIABLE_NAN | WarningFlags::PRESSURE_SORTED
        );
    }
}
