//! Calendar helpers for profile timestamps and positions.
//!
//! Profile `juld` values are MATLAB-style serial day numbers: day 1 is
//! 0000-01-01 on the proleptic Gregorian calendar, and the fractional part is
//! the time of day.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

/// Serial day number of 0001-01-01 minus its chrono day count.
const DATENUM_OFFSET: i64 = 366;

/// Julian day at midnight starting 0001-12-31, i.e. chrono day count zero.
const JULIAN_OFFSET: f64 = 1_721_424.5;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Serial day number of `dt`.
pub fn datetime_to_datenum(dt: NaiveDateTime) -> f64 {
    let days = i64::from(dt.date().num_days_from_ce()) + DATENUM_OFFSET;
    let seconds = f64::from(dt.time().num_seconds_from_midnight()) + f64::from(dt.time().nanosecond()) * 1e-9;
    days as f64 + seconds / SECONDS_PER_DAY
}

/// Inverse of [`datetime_to_datenum`], to the nearest microsecond.
///
/// `None` for non-finite input or dates chrono cannot represent.
pub fn datenum_to_datetime(datenum: f64) -> Option<NaiveDateTime> {
    if !datenum.is_finite() {
        return None;
    }
    let whole = datenum.floor();
    let days = i32::try_from(whole as i64 - DATENUM_OFFSET).ok()?;
    let date = NaiveDate::from_num_days_from_ce_opt(days)?;
    let micros = ((datenum - whole) * SECONDS_PER_DAY * 1e6).round() as i64;
    date.and_hms_opt(0, 0, 0)?.checked_add_signed(Duration::microseconds(micros))
}

/// Julian day of the given calendar date, plus `hours` past midnight.
///
/// `None` for an invalid date.
pub fn julian_day(year: i32, month: u32, day: u32, hours: Option<f64>) -> Option<f64> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let midnight = f64::from(date.num_days_from_ce()) + JULIAN_OFFSET;
    Some(midnight + hours.map_or(0.0, |h| h / 24.0))
}

/// Map a longitude onto `[20, 380)`, keeping the Pacific contiguous.
pub fn remap_longitude(longitude: f64) -> f64 {
    let shifted = (longitude - 20.0).rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if shifted >= 360.0 {
        20.0
    } else {
        shifted + 20.0
    }
}
