//! # Interpolation onto Target Levels
//!
//! Evaluates a tidied profile at arbitrary pressures with PCHIP. Two guards
//! keep the output honest:
//! - **No extrapolation**: targets outside the measured range are NaN (bit 64)
//! - **Far-neighbor masking**: targets without a measurement close enough on
//!   both sides are NaN (bit 128), see [`mask_far_interps`]
//!
//! Profiles too sparse to fit come back all-NaN with bit 16.

use crate::bracket::{pad_bracket, Bracket};
use crate::error::ProfileError;
use crate::flags::WarningFlags;
use crate::pchip::Pchip;
use crate::tidy::tidy_profile;
use crate::{Profile, Variable};

/// Points of padding kept on each side of the ROI by default.
pub const DEFAULT_INDEX_BUFFER: usize = 5;

/// Restricts the interpolation input to the neighborhood of the targets.
///
/// The input keeps `buffer` dbar beyond `[min(levels), max(levels)]` on each
/// side, and at least `places` measured points in each margin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Padding {
    pub buffer: f64,
    pub places: usize,
}

impl Padding {
    pub fn new(buffer: f64) -> Self {
        Padding {
            buffer,
            places: DEFAULT_INDEX_BUFFER,
        }
    }

    pub fn with_places(mut self, places: usize) -> Self {
        self.places = places;
        self
    }
}

/// Values at the requested levels plus the accumulated warning bits.
#[derive(Clone, Debug)]
pub struct Interpolated {
    pub values: Vec<f64>,
    pub flag: WarningFlags,
}

impl Interpolated {
    fn missing(count: usize, flag: WarningFlags) -> Self {
        Interpolated {
            values: vec![f64::NAN; count],
            flag: flag | WarningFlags::INSUFFICIENT_DATA,
        }
    }
}

/// Interpolate `variable` of `profile` onto `levels` with PCHIP.
///
/// With `padding = None` the whole tidied profile is used; otherwise only the
/// padded bracket around the targets (see [`crate::bracket::pad_bracket`]).
/// Warning bits start from the profile's own `flag`.
///
/// # Errors
/// [`ProfileError::MissingVariable`] if the profile does not carry `variable`.
///
/// # Example
/// ```
/// use argo_profile_lib::interpolate::interpolate_to_levels;
/// use argo_profile_lib::{Profile, Variable};
///
/// let profile = Profile::new(1, "001", 100.0, 2.0, 1.0).with_levels(
///     vec![1.0, 2.0, 3.0, 4.0, 5.0],
///     vec![10.0, 20.0, 30.0, 40.0, 50.0],
///     vec![35.0, 34.0, 33.0, 32.0, 31.0],
/// );
///
/// let out = interpolate_to_levels(&profile, Variable::Temperature, &[2.0, 4.0, 6.0], None).unwrap();
/// assert!((out.values[0] - 20.0).abs() < 1e-9);
/// assert!(out.values[2].is_nan());
/// assert_eq!(out.flag.bits(), 64);
/// ```
pub fn interpolate_to_levels(
    profile: &Profile,
    variable: Variable,
    levels: &[f64],
    padding: Option<Padding>,
) -> Result<Interpolated, ProfileError> {
    let series = profile
        .levels(variable)
        .ok_or_else(|| ProfileError::MissingVariable {
            profile: profile.id(),
            variable,
        })?;

    let tidied = tidy_profile(&profile.pressure, series, WarningFlags::from_bits(profile.flag));
    let mut flag = tidied.flag;

    // some truly pathological profiles have nothing left at this point
    if tidied.is_empty() {
        return Ok(Interpolated::missing(levels.len(), flag));
    }

    let whole = Bracket {
        low: 0,
        high: tidied.pressure.len() - 1,
    };
    let bracket = match (padding, target_extent(levels)) {
        (Some(padding), Some((low_roi, high_roi))) => {
            pad_bracket(&tidied.pressure, low_roi, high_roi, padding.buffer, padding.places)
                .unwrap_or(whole)
        }
        _ => whole,
    };

    let pressure = bracket.slice(&tidied.pressure);
    let Some(fit) = Pchip::new(pressure, bracket.slice(&tidied.values)) else {
        return Ok(Interpolated::missing(levels.len(), flag));
    };

    let values: Vec<f64> = levels.iter().map(|&level| fit.evaluate(level)).collect();

    let (first, last) = (tidied.pressure[0], tidied.pressure[tidied.pressure.len() - 1]);
    if levels.iter().any(|&level| level < first || level > last) {
        flag |= WarningFlags::EXTRAPOLATION_PREVENTED;
    }

    let (values, masked) = mask_far_interps(pressure, levels, &values);
    flag |= masked;

    Ok(Interpolated { values, flag })
}

/// `(min, max)` of the finite target levels.
fn target_extent(levels: &[f64]) -> Option<(f64, f64)> {
    levels
        .iter()
        .copied()
        .filter(|level| level.is_finite())
        .fold(None, |extent, level| match extent {
            None => Some((level, level)),
            Some((low, high)) => Some((low.min(level), high.max(level))),
        })
}

/// How far (dbar) a measurement may sit from a target level at this depth.
fn neighbor_radius(level: f64) -> f64 {
    if level < 50.0 {
        50.0
    } else if level < 150.0 {
        150.0
    } else {
        500.0
    }
}

/// Mask interpolated values that lack a close measurement on either side.
///
/// For each target, the nearest measured pressure at or below it and the
/// nearest strictly above it (clamped to the ends of `measured_pressures`)
/// must both lie within the depth-banded radius: 50 dbar for levels shallower
/// than 50 dbar, 150 dbar for levels shallower than 150 dbar, 500 dbar below
/// that. Otherwise the value becomes NaN and bit 128 is returned. Rejecting targets outside the measured range is
/// not this function's job.
pub fn mask_far_interps(
    measured_pressures: &[f64],
    interp_levels: &[f64],
    interp_values: &[f64],
) -> (Vec<f64>, WarningFlags) {
    let mut flag = WarningFlags::NONE;
    let mut values = interp_values.to_vec();

    for (value, &level) in values.iter_mut().zip(interp_levels) {
        let radius = neighbor_radius(level);

        let close = match measured_pressures.len() {
            0 => false,
            n => {
                let at_or_below = measured_pressures.partition_point(|&p| p <= level);
                let below = measured_pressures[at_or_below.saturating_sub(1)];
                let above = measured_pressures[at_or_below.min(n - 1)];
                (below - level).abs() <= radius && (above - level).abs() <= radius
            }
        };

        if !close {
            *value = f64::NAN;
            flag = WarningFlags::FAR_NEIGHBOR_MASKED;
        }
    }

    (values, flag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn linear_profile() -> Profile {
        Profile::new(1, "001", 100.0, 2.0, 1.0).with_levels(
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![10.0, 20.0, 30.0, 40.0, 50.0],
            vec![35.0, 34.0, 33.0, 32.0, 31.0],
        )
    }

    fn degenerate_profile() -> Profile {
        Profile::new(1, "002", 100.0, 2.0, 1.0).with_levels(
            vec![1.0, 1.0, 3.0, 4.0, 5.0],
            vec![10.0, 20.0, 30.0, 40.0, 50.0],
            vec![35.0, 34.0, 33.0, 32.0, 31.0],
        )
    }

    fn assert_levels(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            if e.is_nan() {
                assert!(a.is_nan(), "expected NaN, got {a}");
            } else {
                assert_abs_diff_eq!(*a, *e, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_basic_interp() {
        let out = interpolate_to_levels(&linear_profile(), Variable::Temperature, &[1.5, 2.5, 3.5, 4.5], None).unwrap();
        assert_levels(&out.values, &[15.0, 25.0, 35.0, 45.0]);
        assert!(out.flag.is_empty());
    }

    #[test]
    fn test_dont_run_off_end_of_insitu_data() {
        let out = interpolate_to_levels(&linear_profile(), Variable::Temperature, &[2.0, 4.0, 6.0], None).unwrap();
        assert_levels(&out.values, &[20.0, 40.0, f64::NAN]);
        assert_eq!(out.flag, WarningFlags::EXTRAPOLATION_PREVENTED);
    }

    #[test]
    fn test_dont_run_off_start_of_insitu_data() {
        let out = interpolate_to_levels(&linear_profile(), Variable::Temperature, &[0.9999, 2.0, 4.0], None).unwrap();
        assert_levels(&out.values, &[f64::NAN, 20.0, 40.0]);
    }

    #[test]
    fn test_degenerate_profile() {
        let out = interpolate_to_levels(&degenerate_profile(), Variable::Temperature, &[2.0, 4.0, 6.0], None).unwrap();
        assert_levels(&out.values, &[f64::NAN, 40.0, f64::NAN]);
        assert_eq!(out.flag.bits(), 65);
    }

    #[test]
    fn test_insufficient_data() {
        let single = Profile::new(1, "003", 0.0, 0.0, 0.0).with_levels(vec![10.0], vec![4.0], vec![35.0]);
        let out = interpolate_to_levels(&single, Variable::Temperature, &[10.0, 20.0], None).unwrap();
        assert_levels(&out.values, &[f64::NAN, f64::NAN]);
        assert!(out.flag.contains(WarningFlags::INSUFFICIENT_DATA));

        let empty = Profile::new(1, "004", 0.0, 0.0, 0.0).with_levels(vec![5.0, 5.0], vec![1.0, 2.0], vec![35.0, 35.0]);
        let out = interpolate_to_levels(&empty, Variable::Temperature, &[5.0], None).unwrap();
        assert!(out.values[0].is_nan());
        assert_eq!(out.flag.bits(), 1 | 16);
    }

    #[test]
    fn test_profile_flag_is_inherited() {
        let mut profile = linear_profile();
        profile.flag = 512;
        let out = interpolate_to_levels(&profile, Variable::Salinity, &[2.0], None).unwrap();
        assert_eq!(out.flag.bits(), 512);
        assert_abs_diff_eq!(out.values[0], 34.0, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_variable_is_an_error() {
        let err = interpolate_to_levels(&linear_profile(), Variable::PotentialDensity, &[2.0], None).unwrap_err();
        assert_eq!(
            err,
            ProfileError::MissingVariable {
                profile: "1_001".into(),
                variable: Variable::PotentialDensity
            }
        );
    }

    #[test]
    fn test_padding_keeps_neighborhood_only() {
        let pressure: Vec<f64> = (0..=100).map(|p| p as f64).collect();
        let temperature: Vec<f64> = pressure.iter().map(|p| 20.0 - 0.1 * p).collect();
        let profile = Profile::new(2, "010", 0.0, 0.0, 0.0).with_levels(pressure.clone(), temperature, pressure);

        let levels = [40.5, 41.5];
        let whole = interpolate_to_levels(&profile, Variable::Temperature, &levels, None).unwrap();
        let padded =
            interpolate_to_levels(&profile, Variable::Temperature, &levels, Some(Padding::new(2.0).with_places(3)))
                .unwrap();

        assert_levels(&padded.values, &whole.values);
        assert_levels(&padded.values, &[15.95, 15.85]);
        assert!(padded.flag.is_empty());
    }

    #[test]
    fn test_extrapolation_is_judged_against_whole_profile() {
        let pressure: Vec<f64> = (0..=100).map(|p| p as f64).collect();
        let temperature: Vec<f64> = pressure.iter().map(|p| 20.0 - 0.1 * p).collect();
        let profile =
            Profile::new(2, "012", 0.0, 0.0, 0.0).with_levels(pressure.clone(), temperature.clone(), pressure.clone());

        // a fit on the padded sub-range alone has nothing to say about 60 dbar
        let bracket = pad_bracket(&pressure, 40.5, 41.5, 0.0, 0).unwrap();
        assert_eq!(bracket, Bracket { low: 40, high: 42 });
        let fit = Pchip::new(bracket.slice(&pressure), bracket.slice(&temperature)).unwrap();
        assert!(fit.evaluate(60.0).is_nan());

        // targets inside the tidied profile never raise bit 64, however tight the padding
        let tight = Padding::new(0.0).with_places(0);
        let out = interpolate_to_levels(&profile, Variable::Temperature, &[40.5, 41.5, 60.0], Some(tight)).unwrap();
        assert_levels(&out.values, &[15.95, 15.85, 14.0]);
        assert!(out.flag.is_empty());

        // one target past the bottom: NaN there, bit 64 set
        let out = interpolate_to_levels(&profile, Variable::Temperature, &[40.5, 100.5], Some(tight)).unwrap();
        assert_abs_diff_eq!(out.values[0], 15.95, epsilon = 1e-9);
        assert!(out.values[1].is_nan());
        assert_eq!(out.flag, WarningFlags::EXTRAPOLATION_PREVENTED);
    }

    #[test]
    fn test_sparse_profile_is_masked() {
        let profile = Profile::new(3, "011", 0.0, 0.0, 0.0).with_levels(
            vec![10.0, 20.0, 900.0],
            vec![15.0, 14.0, 4.0],
            vec![35.0, 35.0, 35.0],
        );
        let out = interpolate_to_levels(&profile, Variable::Temperature, &[15.0, 300.0], None).unwrap();
        assert!(!out.values[0].is_nan());
        assert!(out.values[1].is_nan());
        assert_eq!(out.flag, WarningFlags::FAR_NEIGHBOR_MASKED);
    }

    #[test]
    fn test_mask_far_interps() {
        let insitu = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 15.0];
        let levels = [4.5, 25.0, 1000.0];
        let (values, flag) = mask_far_interps(&insitu, &levels, &[0.0, 1.0, 2.0]);

        assert_levels(&values, &[0.0, 1.0, f64::NAN]);
        assert_eq!(flag, WarningFlags::FAR_NEIGHBOR_MASKED);
    }

    #[test]
    fn test_mask_radius_grows_with_depth() {
        // 60 dbar from a measurement: too far at 40 dbar, close enough at 100
        let (values, flag) = mask_far_interps(&[0.0, 100.0, 160.0], &[40.0, 100.0], &[1.0, 2.0]);
        assert_levels(&values, &[f64::NAN, 2.0]);
        assert_eq!(flag, WarningFlags::FAR_NEIGHBOR_MASKED);

        // below 150 dbar, neighbors 200 dbar away still count as close
        let (values, flag) = mask_far_interps(&[200.0, 600.0], &[400.0], &[3.0]);
        assert_levels(&values, &[3.0]);
        assert!(flag.is_empty());
    }

    #[test]
    fn test_mask_far_interps_leaves_close_levels() {
        let (values, flag) = mask_far_interps(&[100.0, 200.0], &[120.0, 180.0], &[1.0, 2.0]);
        assert_levels(&values, &[1.0, 2.0]);
        assert!(flag.is_empty());
    }
}
