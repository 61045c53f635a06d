//! # Profile Tidying
//!
//! PCHIP needs a strictly increasing pressure axis and a defined value at every
//! level. Real float data often has neither: missing values, repeated
//! pressures, reversed casts and the odd out-of-order level all show up.
//! [`tidy_profile`] cleans a (pressure, variable) pair and records what it had
//! to do in [`WarningFlags`].

use crate::flags::WarningFlags;

/// A (pressure, variable) pair with no NaN entries and strictly increasing
/// pressure.
#[derive(Clone, Debug, PartialEq)]
pub struct Tidied {
    pub pressure: Vec<f64>,
    pub values: Vec<f64>,
    pub flag: WarningFlags,
}

impl Tidied {
    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }
}

/// Normalize a raw (pressure, variable) pair.
///
/// Each pass, in order:
/// 1. drop levels where the variable is NaN (bit 4)
/// 2. drop levels where pressure is NaN (bit 32)
/// 3. drop both members of every adjacent equal-pressure pair (bit 1)
/// 4. strictly increasing: done
/// 5. strictly decreasing: reverse both sequences (bit 2), done
/// 6. otherwise stable-sort by pressure (bit 8) and run another pass
///
/// A sorted sequence comes out of step 3 strictly increasing, so the loop ends
/// after at most two passes. Empty output is possible and must be handled by
/// the caller.
///
/// # Example
/// ```
/// use argo_profile_lib::flags::WarningFlags;
/// use argo_profile_lib::tidy::tidy_profile;
///
/// let tidied = tidy_profile(&[6.0, 5.0, 4.0, 3.0], &[2.0, 5.0, 3.0, 4.0], WarningFlags::NONE);
/// assert_eq!(tidied.pressure, vec![3.0, 4.0, 5.0, 6.0]);
/// assert_eq!(tidied.values, vec![4.0, 3.0, 5.0, 2.0]);
/// assert_eq!(tidied.flag, WarningFlags::PRESSURE_REVERSED);
/// ```
pub fn tidy_profile(pressure: &[f64], variable: &[f64], flag: WarningFlags) -> Tidied {
    let mut flag = flag;
    let mut levels: Vec<(f64, f64)> = pressure.iter().copied().zip(variable.iter().copied()).collect();

    loop {
        let before = levels.len();
        levels.retain(|(_, v)| !v.is_nan());
        if levels.len() != before {
            flag |= WarningFlags::VARIABLE_NAN;
        }

        let before = levels.len();
        levels.retain(|(p, _)| !p.is_nan());
        if levels.len() != before {
            flag |= WarningFlags::PRESSURE_NAN;
        }

        if drop_degenerate(&mut levels) {
            flag |= WarningFlags::DEGENERATE_DROPPED;
        }

        if levels.windows(2).all(|w| w[0].0 < w[1].0) {
            break;
        }

        if levels.windows(2).all(|w| w[0].0 > w[1].0) {
            levels.reverse();
            flag |= WarningFlags::PRESSURE_REVERSED;
            break;
        }

        levels.sort_by(|a, b| a.0.total_cmp(&b.0));
        flag |= WarningFlags::PRESSURE_SORTED;
    }

    let (pressure, values) = levels.into_iter().unzip();
    Tidied {
        pressure,
        values,
        flag,
    }
}

/// Remove both members of each adjacent pair with equal pressure.
/// Returns true if anything was dropped.
fn drop_degenerate(levels: &mut Vec<(f64, f64)>) -> bool {
    let mut mask = vec![false; levels.len()];
    for i in 1..levels.len() {
        if levels[i - 1].0 == levels[i].0 {
            mask[i - 1] = true;
            mask[i] = true;
        }
    }

    if !mask.contains(&true) {
        return false;
    }

    let mut keep = mask.iter().map(|masked| !masked);
    levels.retain(|_| keep.next().unwrap_or(true));
    true
}
