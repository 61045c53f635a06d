//! # Threshold Search
//!
//! Finds the shallowest pressure at which an interpolated variable first
//! rises through a target value, by repeatedly combing a shrinking pressure
//! range. Used to locate the mixed-layer depth.

use crate::error::ProfileError;
use crate::interpolate::interpolate_to_levels;
use crate::{Profile, Variable};

/// Absolute tolerance on the variable at the returned pressure.
pub const SEARCH_TOLERANCE: f64 = 0.0001;

/// Refinement rounds before giving up.
pub const MAX_SEARCH_ROUNDS: usize = 100;

/// Each refinement splits the bracketing pair into this many steps.
const REFINE_STEPS: f64 = 10.0;

/// Pressure at which `variable` first crosses `target` going down the profile.
///
/// The search range `[init_min, init_max]` is clamped to the measured pressure
/// extent and combed at `init_step`. The first adjacent pair with
/// `value[i] <= target < value[i + 1]` becomes the next range, split into ten
/// steps, until the lower value is within [`SEARCH_TOLERANCE`] of `target`.
///
/// Returns `Ok(None)` when no comb pair brackets the target, when the range
/// collapses without converging, or after [`MAX_SEARCH_ROUNDS`] rounds.
///
/// # Errors
/// [`ProfileError::MissingVariable`] if the profile does not carry `variable`.
///
/// # Example
/// ```
/// use argo_profile_lib::search::pchip_search;
/// use argo_profile_lib::{Profile, Variable};
///
/// let profile = Profile::new(1, "001", 100.0, 2.0, 1.0).with_levels(
///     vec![1.0, 2.0, 3.0, 4.0, 5.0],
///     vec![10.0, 20.0, 30.0, 40.0, 50.0],
///     vec![35.0, 34.0, 33.0, 32.0, 31.0],
/// );
///
/// let found = pchip_search(20.35, 1.0, 4.0, 1.0, &profile, Variable::Temperature).unwrap();
/// assert!((found.unwrap() - 2.035).abs() < 1e-4);
/// ```
pub fn pchip_search(
    target: f64,
    init_min: f64,
    init_max: f64,
    init_step: f64,
    profile: &Profile,
    variable: Variable,
) -> Result<Option<f64>, ProfileError> {
    let Some((measured_min, measured_max)) = finite_extent(&profile.pressure) else {
        return Ok(None);
    };

    let mut range_min = init_min.max(measured_min);
    let mut range_max = init_max.min(measured_max);
    let mut comb = arange(range_min, range_max + init_step, init_step);

    let mut guess = None;
    let mut rounds = 0;

    while !converged(guess, target) && rounds < MAX_SEARCH_ROUNDS && range_max > range_min {
        let values = interpolate_to_levels(profile, variable, &comb, None)?.values;

        let Some(lower) = values
            .windows(2)
            .position(|pair| pair[0] <= target && pair[1] > target)
        else {
            return Ok(None);
        };

        guess = Some((comb[lower], values[lower]));
        range_min = comb[lower];
        range_max = comb[lower + 1];
        if range_max == range_min {
            break;
        }

        let step = (range_max - range_min) / REFINE_STEPS;
        comb = arange(range_min, range_max + step, step);
        rounds += 1;
    }

    Ok(guess
        .filter(|_| converged(guess, target))
        .map(|(pressure, _)| pressure))
}

fn converged(guess: Option<(f64, f64)>, target: f64) -> bool {
    guess.is_some_and(|(_, value)| (value - target).abs() < SEARCH_TOLERANCE)
}

fn finite_extent(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |extent, v| match extent {
            None => Some((v, v)),
            Some((low, high)) => Some((low.min(v), high.max(v))),
        })
}

/// Half-open `[start, stop)` at `step`, with `ceil((stop - start) / step)` points.
fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let count = ((stop - start) / step).ceil();
    if !count.is_finite() || count <= 0.0 {
        return Vec::new();
    }
    (0..count as usize).map(|i| start + i as f64 * step).collect()
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

    #[test]
    fn test_pchip_search_basic() {
        let found = pchip_search(20.35, 1.0, 4.0, 1.0, &linear_profile(), Variable::Temperature).unwrap();
        assert_abs_diff_eq!(found.unwrap(), 2.035, epsilon = 1e-4);
    }

    #[test]
    fn test_cope_with_too_big_range() {
        let found = pchip_search(20.35, -10.0, 10.0, 1.0, &linear_profile(), Variable::Temperature).unwrap();
        assert_abs_diff_eq!(found.unwrap(), 2.035, epsilon = 1e-4);
    }

    #[test]
    fn test_target_out_of_range() {
        let found = pchip_search(500.0, -10.0, 10.0, 1.0, &linear_profile(), Variable::Temperature).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_ill_considered_search_region() {
        let found = pchip_search(20.35, 3.0, 5.0, 1.0, &linear_profile(), Variable::Temperature).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_target_on_a_level() {
        let found = pchip_search(30.0, 1.0, 5.0, 1.0, &linear_profile(), Variable::Temperature).unwrap();
        assert_eq!(found, Some(3.0));
    }

    #[test]
    fn test_collapsed_range_gives_up() {
        // clamped to a single measured pressure, nothing to comb
        let found = pchip_search(40.0, 4.0, 4.0, 1.0, &linear_profile(), Variable::Temperature).unwrap();
        assert_eq!(found, None);

        let found = pchip_search(50.0, 5.0, 20.0, 1.0, &linear_profile(), Variable::Temperature).unwrap();
        assert_eq!(found, None);
    }

    #[test]
    fn test_no_levels() {
        let empty = Profile::new(1, "001", 0.0, 0.0, 0.0);
        assert_eq!(pchip_search(1.0, 0.0, 10.0, 1.0, &empty, Variable::Temperature).unwrap(), None);
    }

    #[test]
    fn test_arange_matches_half_open_grid() {
        assert_eq!(arange(1.0, 5.0, 1.0), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(arange(0.0, 1.0, 0.25), vec![0.0, 0.25, 0.5, 0.75]);
        assert!(arange(3.0, 3.0, 1.0).is_empty());
    }
}
