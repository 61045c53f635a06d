//! # Derived Quantities
//!
//! Scalar metrics computed from one profile by composing interpolation,
//! integration and the threshold search. Both estimators answer `None` when
//! the profile cannot support an estimate.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{debug, warn};

use crate::config::DerivedConfig;
use crate::error::ProfileError;
use crate::integrate::{integrate_roi, integration_comb};
use crate::interpolate::interpolate_to_levels;
use crate::search::pchip_search;
use crate::teos10::specvol_anom_standard;
use crate::{Profile, Roi, Variable};

/// Depth (dbar) of the near-surface density reference.
pub const MLD_REFERENCE_PRESSURE: f64 = 10.0;

/// Density excess (kg/m³) over the reference that marks the mixed-layer base.
pub const MLD_DENSITY_THRESHOLD: f64 = 0.03;

/// Default comb spacing (dbar) for dynamic height integration.
pub const DHA_SPACING: f64 = 0.2;

/// Pa per dbar.
const PASCALS_PER_DBAR: f64 = 1.0e4;

/// Mixed-layer depth: the shallowest pressure where potential density exceeds
/// its value at 10 dbar by 0.03 kg/m³, searched over [0, 1000] dbar.
///
/// # Errors
/// [`ProfileError::MissingVariable`] without a `potential_density` variable
/// (see [`Profile::with_potential_density`]).
pub fn mld_estimator(profile: &Profile) -> Result<Option<f64>, ProfileError> {
    let reference = interpolate_to_levels(
        profile,
        Variable::PotentialDensity,
        &[MLD_REFERENCE_PRESSURE],
        None,
    )?
    .values[0];

    if reference.is_nan() {
        debug!(profile = %profile.id(), "no potential density at the reference depth");
        return Ok(None);
    }

    pchip_search(
        reference + MLD_DENSITY_THRESHOLD,
        0.0,
        1000.0,
        1.0,
        profile,
        Variable::PotentialDensity,
    )
}

/// Dynamic height anomaly (m²/s²) at `pressure_range.low` relative to
/// `pressure_range.high`, on a 0.2 dbar comb.
///
/// # Errors
/// [`ProfileError::MissingVariable`] without absolute salinity or
/// conservative temperature.
pub fn dha(profile: &Profile, pressure_range: Roi) -> Result<Option<f64>, ProfileError> {
    dha_with_spacing(profile, pressure_range, DHA_SPACING)
}

/// [`dha`] with an explicit comb spacing.
///
/// Absolute salinity and conservative temperature are interpolated over the
/// whole profile onto the comb, converted to TEOS-10 specific volume anomaly
/// (relative to SA = 35.16504 g/kg, CT = 0 °C) and integrated from the top of the comb down to `pressure_range.high`. Any NaN
/// on the comb (extrapolation, masking, sparse data) means no estimate.
pub fn dha_with_spacing(profile: &Profile, pressure_range: Roi, spacing: f64) -> Result<Option<f64>, ProfileError> {
    let comb = integration_comb(pressure_range, spacing);
    let Some(&top) = comb.first() else {
        warn!(profile = %profile.id(), ?pressure_range, spacing, "DHA failed: empty integration comb");
        return Ok(None);
    };

    let salinity = interpolate_to_levels(profile, Variable::AbsoluteSalinity, &comb, None)?.values;
    let temperature = interpolate_to_levels(profile, Variable::ConservativeTemperature, &comb, None)?.values;

    let anomaly: Vec<f64> = comb
        .iter()
        .zip(salinity.iter().zip(&temperature))
        .map(|(&p, (&sa, &ct))| specvol_anom_standard(sa, ct, p))
        .collect();

    let height = match integrate_roi(&comb, &anomaly, top, pressure_range.high) {
        Ok(integral) => integral * PASCALS_PER_DBAR,
        // comb does not land on the reference pressure
        Err(ProfileError::BoundNotFound { .. }) => f64::NAN,
        Err(e) => return Err(e),
    };

    if height.is_nan() {
        warn!(
            float = profile.float,
            cycle = %profile.cycle,
            longitude = profile.longitude,
            latitude = profile.latitude,
            juld = profile.juld,
            ?pressure_range,
            "DHA failed"
        );
        return Ok(None);
    }

    Ok(Some(height))
}

/// One row of the derived-quantity table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetrics {
    pub float: i64,
    pub cycle: String,
    pub juld: f64,
    /// Calendar time of `juld`
    pub date: Option<NaiveDateTime>,
    /// Degrees east on [20, 380)
    pub longitude: f64,
    pub latitude: f64,
    /// Mixed-layer depth, dbar
    pub mld: Option<f64>,
    /// Dynamic height anomaly, m²/s²
    pub dha: Option<f64>,
}

/// Mixed-layer depth and dynamic height anomaly for one profile.
///
/// Potential density is computed from temperature and salinity when the
/// profile does not carry it. Dynamic height needs absolute salinity and
/// conservative temperature and is `None` without them.
pub fn profile_metrics(profile: &Profile, settings: &DerivedConfig) -> Result<ProfileMetrics, ProfileError> {
    let profile = match profile.potential_density {
        Some(_) => Cow::Borrowed(profile),
        None => Cow::Owned(profile.clone().with_potential_density()),
    };

    let mld = mld_estimator(&profile)?;

    let [top, reference] = settings.dha_range;
    let dha = if profile.absolute_salinity.is_some() && profile.conservative_temperature.is_some() {
        dha_with_spacing(&profile, Roi::new(top, reference), settings.dha_spacing)?
    } else {
        debug!(profile = %profile.id(), "no absolute salinity or conservative temperature, skipping DHA");
        None
    };

    Ok(ProfileMetrics {
        float: profile.float,
        cycle: profile.cycle.clone(),
        juld: profile.juld,
        date: crate::time::datenum_to_datetime(profile.juld),
        longitude: crate::time::remap_longitude(profile.longitude),
        latitude: profile.latitude,
        mld,
        dha,
    })
}
