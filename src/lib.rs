//! # Argo Profile Core Library
//!
//! This library holds the record types and numeric engine used to turn raw
//! Argo float soundings into deduplicated, gridded profiles ready for
//! downstream products such as mixed-layer depth and dynamic height anomaly.
//!
//! ## Design Philosophy
//!
//! ### Pure Numerics
//! - **No hidden state**: every algorithm takes its inputs and configuration
//!   explicitly and returns fresh vectors, so profiles and bins can be
//!   processed on any thread
//! - **Expected failures are data**: sparse or broken profiles come back as NaN
//!   levels plus [`flags::WarningFlags`] bits, never as panics
//! - **Contract violations are errors**: asking for a variable a profile does
//!   not carry, or integrating over a bound that is not on the pressure axis,
//!   returns [`error::ProfileError`]
//!
//! ### Data Flow
//! 1. **Filter**: drop levels whose quality codes are not acceptable ([`qc`])
//! 2. **Downsample**: bin profiles in space and time and keep one per bin ([`select`])
//! 3. **Tidy**: clean each (pressure, variable) pair ([`tidy`])
//! 4. **Interpolate**: PCHIP onto target levels with masking ([`interpolate`])
//! 5. **Derive**: mixed-layer depth and dynamic height anomaly ([`derived`])
//!
//! ## Core Types
//! - [`Profile`]: one float cycle with index-aligned level sequences
//! - [`Variable`]: the named level sequences a profile can carry
//! - [`RejectRecord`]: a profile dropped from the table, with the reason

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod bracket;
pub mod config;
pub mod derived;
pub mod eos;
pub mod error;
pub mod flags;
pub mod integrate;
pub mod interpolate;
pub mod pchip;
pub mod qc;
pub mod search;
pub mod select;
pub mod store;
pub mod teos10;
pub mod tidy;
pub mod time;

/// Per-level variables a [`Profile`] may carry.
///
/// Temperature and salinity always come from ingest. The remaining variables
/// are derived upstream (or by [`Profile::with_potential_density`]) and are
/// optional on the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    Temperature,
    Salinity,
    PotentialDensity,
    AbsoluteSalinity,
    ConservativeTemperature,
}

impl Variable {
    /// Column name used in persisted tables.
    pub fn name(self) -> &'static str {
        match self {
            Variable::Temperature => "temperature",
            Variable::Salinity => "salinity",
            Variable::PotentialDensity => "potential_density",
            Variable::AbsoluteSalinity => "absolute_salinity",
            Variable::ConservativeTemperature => "conservative_temperature",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One float-cycle observation.
///
/// `pressure`, `temperature`, `salinity` and their `*_qc` companions are
/// index-aligned: position `i` in each describes the same physical level.
/// Missing measurements are stored as NaN and persisted as JSON `null`.
/// Quality codes are `None` when unset.
///
/// `flag` holds ingest-time bits and is the starting value for the warning
/// bits accumulated by [`interpolate::interpolate_to_levels`].
///
/// # Example
/// ```
/// use argo_profile_lib::{Profile, Variable};
///
/// let profile = Profile::new(4902911, "012", 739_000.25, -30.0, 45.0)
///     .with_levels(vec![5.0, 10.0, 20.0], vec![18.0, 17.5, 15.0], vec![35.1, 35.1, 35.2]);
///
/// assert_eq!(profile.id(), "4902911_012");
/// assert_eq!(profile.levels(Variable::Temperature).unwrap().len(), 3);
/// assert!(profile.levels(Variable::PotentialDensity).is_none());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Profile {
    /// WMO platform number
    pub float: i64,
    /// Zero-padded cycle number, suffixed with `D` for descending profiles
    pub cycle: String,
    /// Serial day number (see [`time::datetime_to_datenum`])
    pub juld: f64,
    /// Degrees east
    pub longitude: f64,
    /// Degrees north
    pub latitude: f64,
    /// Pressure in dbar
    #[serde(with = "nan_levels")]
    pub pressure: Vec<f64>,
    #[serde(default)]
    pub pressure_qc: Vec<Option<u8>>,
    #[serde(with = "nan_levels")]
    pub temperature: Vec<f64>,
    #[serde(default)]
    pub temperature_qc: Vec<Option<u8>>,
    #[serde(with = "nan_levels")]
    pub salinity: Vec<f64>,
    #[serde(default)]
    pub salinity_qc: Vec<Option<u8>>,
    /// Potential density referenced to 0 dbar, kg/m³
    #[serde(
        default,
        with = "nan_levels::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub potential_density: Option<Vec<f64>>,
    #[serde(
        default,
        with = "nan_levels::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub absolute_salinity: Option<Vec<f64>>,
    #[serde(
        default,
        with = "nan_levels::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub conservative_temperature: Option<Vec<f64>>,
    /// Ingest-time bit flag
    #[serde(default)]
    pub flag: u32,
}

impl Profile {
    /// Create a profile header with no levels.
    pub fn new(float: i64, cycle: impl Into<String>, juld: f64, longitude: f64, latitude: f64) -> Self {
        Profile {
            float,
            cycle: cycle.into(),
            juld,
            longitude,
            latitude,
            pressure: Vec::new(),
            pressure_qc: Vec::new(),
            temperature: Vec::new(),
            temperature_qc: Vec::new(),
            salinity: Vec::new(),
            salinity_qc: Vec::new(),
            potential_density: None,
            absolute_salinity: None,
            conservative_temperature: None,
            flag: 0,
        }
    }

    /// Replace the measured levels. Quality codes are reset to unset.
    pub fn with_levels(mut self, pressure: Vec<f64>, temperature: Vec<f64>, salinity: Vec<f64>) -> Self {
        self.pressure_qc = vec![None; pressure.len()];
        self.temperature_qc = vec![None; temperature.len()];
        self.salinity_qc = vec![None; salinity.len()];
        self.pressure = pressure;
        self.temperature = temperature;
        self.salinity = salinity;
        self
    }

    /// Attach a level sequence for `variable`, replacing any existing one.
    pub fn with_variable(mut self, variable: Variable, values: Vec<f64>) -> Self {
        match variable {
            Variable::Temperature => self.temperature = values,
            Variable::Salinity => self.salinity = values,
            Variable::PotentialDensity => self.potential_density = Some(values),
            Variable::AbsoluteSalinity => self.absolute_salinity = Some(values),
            Variable::ConservativeTemperature => self.conservative_temperature = Some(values),
        }
        self
    }

    /// Level sequence for `variable`, or `None` if this profile does not carry it.
    pub fn levels(&self, variable: Variable) -> Option<&[f64]> {
        match variable {
            Variable::Temperature => Some(&self.temperature),
            Variable::Salinity => Some(&self.salinity),
            Variable::PotentialDensity => self.potential_density.as_deref(),
            Variable::AbsoluteSalinity => self.absolute_salinity.as_deref(),
            Variable::ConservativeTemperature => self.conservative_temperature.as_deref(),
        }
    }

    /// `<float>_<cycle>`, the identifier written into downsampling rejects.
    pub fn id(&self) -> String {
        format!("{}_{}", self.float, self.cycle)
    }

    /// Deepest recorded pressure, taken as the last level.
    pub fn bottom(&self) -> Option<f64> {
        self.pressure.last().copied()
    }
}

/// Closed pressure interval `[low, high]` scoping interpolation or integration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Roi {
    pub low: f64,
    pub high: f64,
}

impl Roi {
    pub fn new(low: f64, high: f64) -> Self {
        Roi { low, high }
    }
}

/// Why a profile was left out of the accepted table.
///
/// Persisted untagged: an integer for ingest bit flags, a string for the
/// `<float>_<cycle>` of the profile that won the bin instead, `null` when the
/// profile could not be binned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RejectReason {
    /// Ingest-time bit flag: 1 position QC, 2 time QC, 4 startup cycle,
    /// 8 bad APEX float, 16 pressure out of order, 32 realtime data,
    /// 64 delayed mode only
    Qc(u32),
    /// Dropped in favor of this profile id during downsampling
    SupersededBy(String),
    /// No finite position or timestamp to bin on; persisted as `null`
    Unbinned,
}

/// A rejected profile, reduced to its header and the reason it was dropped.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RejectRecord {
    pub float: i64,
    pub cycle: String,
    pub longitude: f64,
    pub latitude: f64,
    pub juld: f64,
    pub flag: RejectReason,
}

impl RejectRecord {
    pub fn new(profile: &Profile, flag: RejectReason) -> Self {
        RejectRecord {
            float: profile.float,
            cycle: profile.cycle.clone(),
            longitude: profile.longitude,
            latitude: profile.latitude,
            juld: profile.juld,
            flag,
        }
    }
}

/// JSON has no NaN: missing levels travel as `null`.
mod nan_levels {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|v| if v.is_nan() { None } else { Some(*v) }))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let raw = Vec::<Option<f64>>::deserialize(deserializer)?;
        Ok(raw.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }

    pub mod optional {
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(values: &Option<Vec<f64>>, serializer: S) -> Result<S::Ok, S::Error> {
            match values {
                Some(values) => super::serialize(values, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error> {
            let raw = Option::<Vec<Option<f64>>>::deserialize(deserializer)?;
            Ok(raw.map(|levels| levels.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect()))
        }
    }
}
