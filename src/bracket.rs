//! # Bracket Search
//!
//! Binary-search helpers that find the span of an ascending sequence covering
//! a region of interest, optionally widened by a physical buffer and a minimum
//! number of points.

/// Index span `[low, high]` into an ascending sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bracket {
    pub low: usize,
    pub high: usize,
}

impl Bracket {
    /// Number of elements covered, both ends included.
    pub fn count(&self) -> usize {
        self.high + 1 - self.low
    }

    /// Slice of `seq` covered by this bracket.
    pub fn slice<'a, T>(&self, seq: &'a [T]) -> &'a [T] {
        &seq[self.low..=self.high]
    }
}

/// Index of the last element strictly below `low_roi` and of the first element
/// strictly above `high_roi`.
///
/// Elements equal to a bound count as inside the ROI. A bound at or beyond the
/// end of the sequence clamps to that end. Returns `None` for an empty sequence.
///
/// # Example
/// ```
/// use argo_profile_lib::bracket::{find_bracket, Bracket};
///
/// let levels = [1.2, 3.3, 4.0, 5.1, 8.8, 10.0];
/// assert_eq!(find_bracket(&levels, 2.0, 6.0), Some(Bracket { low: 0, high: 4 }));
/// assert_eq!(find_bracket(&levels, 2.0, 11.0), Some(Bracket { low: 0, high: 5 }));
/// ```
pub fn find_bracket(seq: &[f64], low_roi: f64, high_roi: f64) -> Option<Bracket> {
    let (first, last) = (*seq.first()?, *seq.last()?);

    let low = if low_roi <= first {
        0
    } else {
        // seq[0] < low_roi, so at least one element sits below the bound
        seq.partition_point(|&x| x < low_roi) - 1
    };

    let high = if high_roi >= last {
        seq.len() - 1
    } else {
        seq.partition_point(|&x| x <= high_roi)
    };

    Some(Bracket { low, high })
}

/// Bracket around `[low_roi, high_roi]` widened by `buffer` on each side, with
/// at least `places` points of padding per side.
///
/// Each side is decided on its own: the buffer-expanded index is kept when it
/// already reaches `places` points beyond the tight bracket, otherwise that
/// side is pushed out to `places` points, stopping at the sequence boundary.
/// The tight bracket already contributes one point to each wing.
pub fn pad_bracket(
    seq: &[f64],
    low_roi: f64,
    high_roi: f64,
    buffer: f64,
    places: usize,
) -> Option<Bracket> {
    let tight = find_bracket(seq, low_roi, high_roi)?;
    let buffered = find_bracket(seq, low_roi - buffer, high_roi + buffer)?;
    let wing = places as isize - 1;
    let last = seq.len() as isize - 1;

    let mut low = buffered.low;
    if (tight.low as isize - buffered.low as isize) < wing {
        low = (tight.low as isize - wing).max(0) as usize;
    }

    let mut high = buffered.high;
    if (buffered.high as isize - tight.high as isize) < wing {
        high = (tight.high as isize + wing).min(last) as usize;
    }

    Some(Bracket { low, high })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LEVELS: [f64; 6] = [1.2, 3.3, 4.0, 5.1, 8.8, 10.0];

    fn bracket(low: usize, high: usize) -> Option<Bracket> {
        Some(Bracket { low, high })
    }

    #[test]
    fn test_find_bracket() {
        assert_eq!(find_bracket(&LEVELS, 2.0, 6.0), bracket(0, 4));
        // ROI runs off the low end
        assert_eq!(find_bracket(&LEVELS, 1.0, 6.0), bracket(0, 4));
        // ROI runs off the high end
        assert_eq!(find_bracket(&LEVELS, 2.0, 11.0), bracket(0, 5));
        assert_eq!(find_bracket(&[], 2.0, 11.0), None);
    }

    #[test]
    fn test_find_bracket_bounds_on_levels_are_inside() {
        assert_eq!(find_bracket(&LEVELS, 3.3, 5.1), bracket(0, 4));
        assert_eq!(find_bracket(&LEVELS, 4.0, 4.0), bracket(1, 3));
    }

    #[test]
    fn test_pad_bracket() {
        assert_eq!(pad_bracket(&LEVELS, 3.5, 4.5, 1.0, 0), bracket(0, 4));
        assert_eq!(pad_bracket(&LEVELS, 3.5, 4.5, 0.1, 0), bracket(1, 3));
        // the wing always holds one point already
        assert_eq!(pad_bracket(&LEVELS, 3.5, 4.5, 0.1, 1), bracket(1, 3));
        assert_eq!(pad_bracket(&LEVELS, 3.5, 4.5, 0.1, 2), bracket(0, 4));
        // pushed out until the list boundary
        assert_eq!(pad_bracket(&LEVELS, 3.5, 4.5, 0.1, 3), bracket(0, 5));
        assert_eq!(pad_bracket(&LEVELS, 1.0, 11.0, 0.0, 0), bracket(0, 5));
        assert_eq!(pad_bracket(&LEVELS, 3.5, 4.5, 10.0, 0), bracket(0, 5));
        assert_eq!(pad_bracket(&LEVELS, 3.5, 4.5, 0.0, 10), bracket(0, 5));
    }

    fn ascending() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(0.1f64..50.0, 1..40).prop_map(|steps| {
            steps
                .iter()
                .scan(0.0, |acc, step| {
                    *acc += step;
                    Some(*acc)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn bracket_covers_roi(seq in ascending(), a in 0.0f64..1.0, b in 0.0f64..1.0) {
            let span = seq[seq.len() - 1] - seq[0];
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let low_roi = seq[0] + lo * span;
            let high_roi = seq[0] + hi * span;

            let found = find_bracket(&seq, low_roi, high_roi).unwrap();
            prop_assert!(found.low <= found.high);
            prop_assert!(found.high < seq.len());
            for (i, x) in seq.iter().enumerate() {
                if *x >= low_roi && *x <= high_roi {
                    prop_assert!(found.low <= i && i <= found.high);
                }
            }
        }

        #[test]
        fn bracket_clamps_outside_roi(seq in ascending(), pad in 0.0f64..10.0) {
            let found = find_bracket(&seq, seq[0] - pad, seq[seq.len() - 1] + pad).unwrap();
            prop_assert_eq!(found, Bracket { low: 0, high: seq.len() - 1 });
        }

        #[test]
        fn padding_only_widens(
            seq in ascending(),
            a in 0.0f64..1.0,
            width in 0.0f64..0.5,
            buffer in 0.0f64..20.0,
            extra_buffer in 0.0f64..20.0,
            places in 0usize..8,
            extra_places in 0usize..8,
        ) {
            let span = seq[seq.len() - 1] - seq[0];
            let low_roi = seq[0] + a * span;
            let high_roi = low_roi + width * span;

            let tight = find_bracket(&seq, low_roi, high_roi).unwrap();
            let padded = pad_bracket(&seq, low_roi, high_roi, buffer, places).unwrap();
            let wider = pad_bracket(&seq, low_roi, high_roi, buffer + extra_buffer, places + extra_places).unwrap();

            prop_assert!(padded.low <= tight.low && padded.high >= tight.high);
            prop_assert!(wider.low <= padded.low && wider.high >= padded.high);
            prop_assert!(wider.high < seq.len());
        }
    }
}
