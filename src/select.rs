//! # Profile Selection
//!
//! Deduplicates a profile table by keeping one profile per spatio-temporal bin.
//! Within a bin the winner is the best-resolved profile over the depth range all
//! members share, unless a nearly-as-good profile reaches deeper.
//!
//! Bins are formed up front from read-only coordinates, so each group is
//! reduced independently on the rayon pool.

use rayon::prelude::*;
use std::borrow::Borrow;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::BinConfig;
use crate::{Profile, RejectReason, RejectRecord};

/// A profile may trail the best resolution by this factor and still win by depth.
pub const RESOLUTION_TOLERANCE: f64 = 1.15;

/// Floored `(longitude, latitude, day)` bin indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BinKey {
    pub lon_bin: i64,
    pub lat_bin: i64,
    pub day_bin: i64,
}

/// Bin of `profile`, or `None` when a coordinate or the timestamp is not finite.
pub fn bin_key(profile: &Profile, bins: &BinConfig) -> Option<BinKey> {
    let lon = (profile.longitude / bins.spatial_degrees).floor();
    let lat = (profile.latitude / bins.spatial_degrees).floor();
    let day = (profile.juld / bins.temporal_days).floor();

    if !(lon.is_finite() && lat.is_finite() && day.is_finite()) {
        return None;
    }

    Some(BinKey {
        lon_bin: lon as i64,
        lat_bin: lat as i64,
        day_bin: day as i64,
    })
}

/// Index of the profile to keep from a bin.
///
/// Resolution is the number of levels at or above the shallowest bottom in
/// the group, divided by that depth. The highest resolution (first on ties)
/// is preferred; then, walking the group in order, any profile within
/// [`RESOLUTION_TOLERANCE`] of the best resolution that reaches at least as
/// deep as the current choice replaces it. Profiles without levels only win
/// when no member has any.
///
/// Returns `None` for an empty group.
///
/// # Example
/// ```
/// use argo_profile_lib::select::choose_profile;
/// use argo_profile_lib::Profile;
///
/// let coarse = Profile::new(1, "001", 0.0, 0.0, 0.0)
///     .with_levels(vec![2.0, 4.0, 6.0, 8.0, 10.0], vec![0.0; 5], vec![0.0; 5]);
/// let fine = Profile::new(2, "001", 0.0, 0.0, 0.0)
///     .with_levels((1..=10).map(f64::from).collect(), vec![0.0; 10], vec![0.0; 10]);
///
/// assert_eq!(choose_profile(&[coarse, fine]), Some(1));
/// ```
pub fn choose_profile<P: Borrow<Profile>>(group: &[P]) -> Option<usize> {
    if group.is_empty() {
        return None;
    }

    let bottoms: Vec<Option<f64>> = group.iter().map(|p| p.borrow().bottom()).collect();
    let Some(shallowest) = bottoms.iter().flatten().copied().reduce(f64::min) else {
        return Some(0);
    };

    let resolution: Vec<f64> = group
        .iter()
        .map(|p| {
            let pressure = &p.borrow().pressure;
            if pressure.is_empty() {
                0.0
            } else {
                pressure.partition_point(|&level| level <= shallowest) as f64 / shallowest
            }
        })
        .collect();
    let depth = |i: usize| bottoms[i].unwrap_or(f64::NEG_INFINITY);

    let mut highest = 0;
    for (i, &res) in resolution.iter().enumerate() {
        if res > resolution[highest] {
            highest = i;
        }
    }

    let mut preferred = highest;
    for (i, &res) in resolution.iter().enumerate() {
        if res * RESOLUTION_TOLERANCE >= resolution[highest] && depth(i) >= depth(preferred) {
            preferred = i;
        }
    }

    Some(preferred)
}

/// Result of [`downsample`].
#[derive(Debug, Default)]
pub struct Downsampled {
    /// One profile per bin, in order of each bin's first appearance
    pub selected: Vec<Profile>,
    /// Every other profile, in input order
    pub rejects: Vec<RejectRecord>,
}

/// Group `profiles` by [`bin_key`] and keep the [`choose_profile`] winner of
/// each bin.
///
/// Losers are rejected with the winner's `<float>_<cycle>`. Profiles that
/// cannot be binned are rejected with [`RejectReason::Unbinned`].
pub fn downsample(profiles: Vec<Profile>, bins: &BinConfig) -> Downsampled {
    let mut slot: HashMap<BinKey, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut membership: Vec<Option<usize>> = Vec::with_capacity(profiles.len());

    for (i, profile) in profiles.iter().enumerate() {
        let Some(key) = bin_key(profile, bins) else {
            debug!(profile = %profile.id(), "profile cannot be binned");
            membership.push(None);
            continue;
        };
        let g = *slot.entry(key).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[g].push(i);
        membership.push(Some(g));
    }

    let winners: Vec<usize> = groups
        .par_iter()
        .map(|members| {
            let group: Vec<&Profile> = members.iter().map(|&i| &profiles[i]).collect();
            // groups are never empty
            members[choose_profile(&group).unwrap_or(0)]
        })
        .collect();

    let rejects: Vec<RejectRecord> = profiles
        .iter()
        .zip(&membership)
        .enumerate()
        .filter_map(|(i, (profile, group))| match group {
            Some(g) if winners[*g] == i => None,
            Some(g) => Some(RejectRecord::new(
                profile,
                RejectReason::SupersededBy(profiles[winners[*g]].id()),
            )),
            None => Some(RejectRecord::new(profile, RejectReason::Unbinned)),
        })
        .collect();

    let mut pool: Vec<Option<Profile>> = profiles.into_iter().map(Some).collect();
    let selected: Vec<Profile> = winners.iter().filter_map(|&i| pool[i].take()).collect();

    info!(
        bins = groups.len(),
        selected = selected.len(),
        rejected = rejects.len(),
        "downsampled profile table"
    );

    Downsampled { selected, rejects }
}
