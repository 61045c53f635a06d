//! # Trapezoidal Integration
//!
//! Integration here always runs over a comb the caller built with
//! [`integration_comb`], so both bounds must be exact levels of the pressure
//! axis. A bound that is not on the axis is a contract violation and returns
//! [`ProfileError::BoundNotFound`].

use crate::error::ProfileError;
use crate::Roi;

/// Decimal places kept on comb levels.
const COMB_DECIMALS: i32 = 6;

/// Trapezoidal integral of `variable` over `pressure` from `low_roi` to
/// `high_roi`, both of which must appear in `pressure`.
///
/// NaN anywhere inside the range propagates to the result.
///
/// # Example
/// ```
/// use argo_profile_lib::integrate::integrate_roi;
///
/// let pressure = [0.0, 2.0, 4.0, 6.0];
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(integrate_roi(&pressure, &values, 0.0, 4.0).unwrap(), 8.0);
/// assert!(integrate_roi(&pressure, &values, 1.0, 4.0).is_err());
/// ```
pub fn integrate_roi(
    pressure: &[f64],
    variable: &[f64],
    low_roi: f64,
    high_roi: f64,
) -> Result<f64, ProfileError> {
    let low = position(pressure, low_roi)?;
    let high = position(pressure, high_roi)?;

    if high <= low {
        return Ok(0.0);
    }

    let integral = pressure[low..=high]
        .windows(2)
        .zip(variable[low..=high].windows(2))
        .map(|(p, v)| 0.5 * (p[1] - p[0]) * (v[0] + v[1]))
        .sum();

    Ok(integral)
}

/// [`integrate_roi`] over `roi`.
pub fn integrate_region(roi: Roi, pressure: &[f64], variable: &[f64]) -> Result<f64, ProfileError> {
    integrate_roi(pressure, variable, roi.low, roi.high)
}

fn position(pressure: &[f64], bound: f64) -> Result<usize, ProfileError> {
    pressure
        .iter()
        .position(|&p| p == bound)
        .ok_or(ProfileError::BoundNotFound { bound })
}

/// Ascending levels from `region.low` to `region.high` inclusive, `spacing`
/// apart, rounded to six decimals so accumulated float drift cannot move a
/// level off the grid.
///
/// The last level is `region.high` whenever the region is a whole number of
/// steps long. An inverted region or a non-positive spacing yields an empty comb.
pub fn integration_comb(region: Roi, spacing: f64) -> Vec<f64> {
    if spacing.is_nan() || spacing <= 0.0 || region.high.is_nan() || region.high < region.low {
        return Vec::new();
    }

    // tolerate a step count of 49.999999 meaning 50
    let steps = ((region.high - region.low) / spacing + 1e-9).floor() as usize;
    (0..=steps)
        .map(|i| round_to(region.low + i as f64 * spacing, COMB_DECIMALS))
        .collect()
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
