//! # Profile Table Persistence
//!
//! Profile tables, rejects and metrics are stored as JSON arrays, one object
//! per row. Missing level values travel as `null` (see [`crate::Profile`]).
//!
//! Rejects always land beside the table they were split from:
//! `out/selected.json` pairs with `out/selected_rejects.json`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::{Profile, RejectRecord};

/// Errors reading or writing a table.
#[derive(Error, Debug)]
pub enum StoreError {
    /// File could not be read or written
    #[error("table IO: {0}")]
    Io(#[from] io::Error),

    /// File contents are not a valid table
    #[error("table format: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read a profile table.
pub fn load_profiles<P: AsRef<Path>>(path: P) -> Result<Vec<Profile>, StoreError> {
    load_rows(path.as_ref())
}

/// Write a profile table, replacing any existing file.
pub fn save_profiles<P: AsRef<Path>>(path: P, profiles: &[Profile]) -> Result<(), StoreError> {
    save_rows(path.as_ref(), profiles)
}

/// Read a rejects table.
pub fn load_rejects<P: AsRef<Path>>(path: P) -> Result<Vec<RejectRecord>, StoreError> {
    load_rows(path.as_ref())
}

/// Write `rejects` beside `output` (see [`rejects_path`]) and return where.
pub fn save_rejects<P: AsRef<Path>>(output: P, rejects: &[RejectRecord]) -> Result<PathBuf, StoreError> {
    let path = rejects_path(output.as_ref());
    save_rows(&path, rejects)?;
    Ok(path)
}

/// `<dir>/<stem>_rejects.json` for an output table at `<dir>/<stem>.<ext>`.
pub fn rejects_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{stem}_rejects.json"))
}

/// Read any JSON array of rows.
pub fn load_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let data = fs::read(path)?;
    let rows: Vec<T> = serde_json::from_slice(&data)?;
    debug!(path = %path.display(), rows = rows.len(), "loaded table");
    Ok(rows)
}

/// Write any rows as a JSON array.
pub fn save_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), StoreError> {
    let data = serde_json::to_vec(rows)?;
    fs::write(path, data)?;
    debug!(path = %path.display(), rows = rows.len(), "saved table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RejectReason;

    #[test]
    fn test_profile_table_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.json");

        let mut profile = Profile::new(4902911, "012D", 739_000.25, -30.0, 45.0)
            .with_levels(vec![5.0, 10.0], vec![18.0, f64::NAN], vec![35.1, 35.2])
            .with_potential_density();
        profile.pressure_qc = vec![Some(1), None];
        profile.flag = 8;

        save_profiles(&path, &[profile.clone()]).unwrap();
        let loaded = load_profiles(&path).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id(), "4902911_012D");
        assert_eq!(loaded[0].pressure, profile.pressure);
        assert_eq!(loaded[0].pressure_qc, vec![Some(1), None]);
        assert!(loaded[0].temperature[1].is_nan());
        assert!(loaded[0].potential_density.as_ref().unwrap()[1].is_nan());
        assert_eq!(loaded[0].flag, 8);
    }

    #[test]
    fn test_rejects_land_beside_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("selected.json");

        let header = Profile::new(1, "001", 10.0, 20.0, 30.0);
        let written = save_rejects(&output, &[RejectRecord::new(&header, RejectReason::SupersededBy("2_001".into()))])
            .unwrap();

        assert_eq!(written, dir.path().join("selected_rejects.json"));
        let loaded = load_rejects(&written).unwrap();
        assert_eq!(loaded[0].flag, RejectReason::SupersededBy("2_001".into()));
    }

    #[test]
    fn test_rejects_path() {
        assert_eq!(rejects_path(Path::new("out/table.json")), PathBuf::from("out/table_rejects.json"));
        assert_eq!(rejects_path(Path::new("table")), PathBuf::from("table_rejects.json"));
    }

    #[test]
    fn test_missing_and_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_profiles(dir.path().join("absent.json")), Err(StoreError::Io(_))));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, b"{ not json").unwrap();
        assert!(matches!(load_profiles(&broken), Err(StoreError::Json(_))));
    }
}
