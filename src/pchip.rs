//! Piecewise cubic Hermite interpolating polynomial (PCHIP).
//!
//! Slopes follow Fritsch & Carlson: a weighted harmonic mean of neighboring
//! secants at interior knots, zero at local extrema, and a shape-preserving
//! three-point formula at the ends. The interpolant never overshoots the data
//! and keeps monotone stretches monotone. Two-point input degenerates to a
//! straight line.

/// A fitted interpolant over strictly increasing knots.
#[derive(Clone, Debug)]
pub struct Pchip {
    x: Vec<f64>,
    y: Vec<f64>,
    slopes: Vec<f64>,
}

impl Pchip {
    /// Fit knots `x` (strictly increasing) to values `y`.
    ///
    /// Returns `None` with fewer than two knots or mismatched lengths.
    pub fn new(x: &[f64], y: &[f64]) -> Option<Self> {
        if x.len() < 2 || x.len() != y.len() {
            return None;
        }

        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let m: Vec<f64> = y
            .windows(2)
            .zip(&h)
            .map(|(w, h)| (w[1] - w[0]) / h)
            .collect();

        let n = x.len();
        let mut slopes = vec![0.0; n];

        if n == 2 {
            slopes[0] = m[0];
            slopes[1] = m[0];
        } else {
            for k in 1..n - 1 {
                let (m0, m1) = (m[k - 1], m[k]);
                if sign(m0) != sign(m1) || m0 == 0.0 || m1 == 0.0 {
                    continue;
                }
                let w1 = 2.0 * h[k] + h[k - 1];
                let w2 = h[k] + 2.0 * h[k - 1];
                slopes[k] = (w1 + w2) / (w1 / m0 + w2 / m1);
            }
            slopes[0] = edge_slope(h[0], h[1], m[0], m[1]);
            slopes[n - 1] = edge_slope(h[n - 2], h[n - 3], m[n - 2], m[n - 3]);
        }

        Some(Pchip {
            x: x.to_vec(),
            y: y.to_vec(),
            slopes,
        })
    }

    /// Knot range `(first, last)`.
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// Value at `at`; NaN outside the knot range (no extrapolation).
    pub fn evaluate(&self, at: f64) -> f64 {
        let (first, last) = self.domain();
        if at.is_nan() || at < first || at > last {
            return f64::NAN;
        }

        let k = self
            .x
            .partition_point(|&xi| xi <= at)
            .saturating_sub(1)
            .min(self.x.len() - 2);

        let h = self.x[k + 1] - self.x[k];
        let s = (at - self.x[k]) / h;
        let s2 = s * s;
        let s3 = s2 * s;

        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;

        h00 * self.y[k] + h10 * h * self.slopes[k] + h01 * self.y[k + 1] + h11 * h * self.slopes[k + 1]
    }
}

/// One-sided three-point slope at an end knot, limited to keep the shape.
fn edge_slope(h0: f64, h1: f64, m0: f64, m1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
    if sign(d) != sign(m0) {
        0.0
    } else if sign(m0) != sign(m1) && d.abs() > 3.0 * m0.abs() {
        3.0 * m0
    } else {
        d
    }
}

/// Sign with zero mapped to zero.
fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}
