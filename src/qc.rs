//! Profile and level filtering by quality code.
//!
//! Ingest flag bits checked here:
//! - 4: startup cycle (cycle 0)
//! - 16: pressure steps back up by more than 2.4 dbar somewhere
//!
//! Bits 1, 2, 8, 32 and 64 come from archive metadata and arrive on the
//! profile's own `flag`.

use tracing::debug;

use crate::config::QcConfig;
use crate::Profile;

/// Ingest flag bit for a float's startup cycle.
pub const STARTUP_CYCLE: u32 = 4;

/// Ingest flag bit for measured pressures out of order.
pub const PRESSURE_OUT_OF_ORDER: u32 = 16;

/// Largest pressure reversal (dbar) between adjacent levels that is tolerated.
const MAX_PRESSURE_REVERSAL: f64 = 2.4;

/// The profile's ingest flag with the checks computable from its own record
/// OR-ed in. Nonzero means the whole profile should be rejected.
pub fn ingest_flag(profile: &Profile) -> u32 {
    let mut flag = profile.flag;

    let cycle = profile.cycle.trim_end_matches('D');
    if cycle.parse::<u32>().is_ok_and(|number| number == 0) {
        flag |= STARTUP_CYCLE;
    }

    if profile
        .pressure
        .windows(2)
        .any(|pair| pair[0] - pair[1] > MAX_PRESSURE_REVERSAL)
    {
        flag |= PRESSURE_OUT_OF_ORDER;
    }

    flag
}

/// Keep the levels whose pressure, temperature and salinity codes are all
/// acceptable and whose pressure is strictly below `qc.max_pressure`.
///
/// Levels without a pressure or temperature value, and levels at negative
/// pressure, are dropped whatever their codes.
///
/// Every index-aligned sequence is filtered, derived variables included.
/// Unset codes are never acceptable. Header fields and `flag` are kept.
pub fn filter_levels(profile: &Profile, qc: &QcConfig) -> Profile {
    let accepted = |codes: &[Option<u8>], i: usize, set: &[u8]| {
        codes.get(i).copied().flatten().is_some_and(|code| set.contains(&code))
    };
    let measured = |i: usize| {
        let pressure = profile.pressure[i];
        let temperature = profile.temperature.get(i).copied().unwrap_or(f64::NAN);
        !pressure.is_nan() && !temperature.is_nan() && pressure >= 0.0
    };

    let keep: Vec<usize> = (0..profile.pressure.len())
        .filter(|&i| {
            measured(i)
                && accepted(&profile.pressure_qc, i, &qc.pressure)
                && accepted(&profile.temperature_qc, i, &qc.temperature)
                && accepted(&profile.salinity_qc, i, &qc.salinity)
                && qc.max_pressure.map_or(true, |limit| profile.pressure[i] < limit)
        })
        .collect();

    if keep.len() < profile.pressure.len() {
        debug!(
            profile = %profile.id(),
            kept = keep.len(),
            dropped = profile.pressure.len() - keep.len(),
            "filtered levels"
        );
    }

    Profile {
        pressure: pick(&profile.pressure, &keep),
        pressure_qc: pick(&profile.pressure_qc, &keep),
        temperature: pick(&profile.temperature, &keep),
        temperature_qc: pick(&profile.temperature_qc, &keep),
        salinity: pick(&profile.salinity, &keep),
        salinity_qc: pick(&profile.salinity_qc, &keep),
        potential_density: profile.potential_density.as_deref().map(|v| pick(v, &keep)),
        absolute_salinity: profile.absolute_salinity.as_deref().map(|v| pick(v, &keep)),
        conservative_temperature: profile.conservative_temperature.as_deref().map(|v| pick(v, &keep)),
        ..profile.clone()
    }
}

fn pick<T: Copy>(values: &[T], keep: &[usize]) -> Vec<T> {
    keep.iter().filter_map(|&i| values.get(i).copied()).collect()
}

/// Element-wise maximum of QC code lists, truncated to the shortest list.
/// Unset codes rank below every set code.
pub fn merge_qc(lists: &[Vec<Option<u8>>]) -> Vec<Option<u8>> {
    let Some(width) = lists.iter().map(Vec::len).min() else {
        return Vec::new();
    };
    (0..width)
        .map(|i| lists.iter().map(|list| list[i]).max().flatten())
        .collect()
}
