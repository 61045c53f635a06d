//! Equation of State for seawater (UNESCO EOS-80).
//!
//! Density and potential temperature/density from practical salinity and
//! in-situ temperature, used to fill potential density for the mixed-layer
//! estimator. Dynamic height works on absolute salinity and conservative
//! temperature instead (see [`crate::teos10`]).
//!
//! # References
//!
//! - UNESCO (1981): Tenth report of the joint panel on oceanographic tables and standards.
//! - Fofonoff & Millard (1983): Algorithms for computation of fundamental
//!   properties of seawater. UNESCO technical papers in marine science 44.
//!
//! # Units
//!
//! - Temperature: °C
//! - Salinity: PSU
//! - Pressure: dbar (converted to bar internally where EOS-80 expects it)
//! - Density: kg/m³

use crate::{Profile, Variable};

/// Reference salinity of the lapse-rate fit.
const STANDARD_SALINITY: f64 = 35.0;

/// Density at zero pressure.
fn density_surface(salinity: f64, temperature: f64) -> f64 {
    let t = temperature;
    let s = salinity;

    // Pure water density (Bigg formula)
    let rho_w = 999.842594 + 6.793952e-2 * t - 9.095290e-3 * t.powi(2)
        + 1.001685e-4 * t.powi(3)
        - 1.120083e-6 * t.powi(4)
        + 6.536336e-9 * t.powi(5);

    let a = 8.24493e-1 - 4.0899e-3 * t + 7.6438e-5 * t.powi(2) - 8.2467e-7 * t.powi(3)
        + 5.3875e-9 * t.powi(4);
    let b = -5.72466e-3 + 1.0227e-4 * t - 1.6546e-6 * t.powi(2);
    let c = 4.8314e-4;

    rho_w + a * s + b * s.powf(1.5) + c * s.powi(2)
}

/// Secant bulk modulus K(S, T, p) in bar, with `pressure_bar` in bar.
fn secant_bulk_modulus(salinity: f64, temperature: f64, pressure_bar: f64) -> f64 {
    let t = temperature;
    let s = salinity;
    let p = pressure_bar;

    let kw = 19652.21 + 148.4206 * t - 2.327105 * t.powi(2) + 1.360477e-2 * t.powi(3)
        - 5.155288e-5 * t.powi(4);

    let k0 = kw
        + s * (54.6746 - 0.603459 * t + 1.09987e-2 * t.powi(2) - 6.1670e-5 * t.powi(3))
        + s.powf(1.5) * (7.944e-2 + 1.6483e-2 * t - 5.3009e-4 * t.powi(2));

    let aw = 3.239908 + 1.43713e-3 * t + 1.16092e-4 * t.powi(2) - 5.77905e-7 * t.powi(3);
    let a = aw + s * (2.2838e-3 - 1.0981e-5 * t - 1.6078e-6 * t.powi(2)) + s.powf(1.5) * 1.91075e-4;

    let bw = 8.50935e-5 - 6.12293e-6 * t + 5.2787e-8 * t.powi(2);
    let b = bw + s * (-9.9348e-7 + 2.0816e-8 * t + 9.1697e-10 * t.powi(2));

    k0 + p * (a + b * p)
}

/// In-situ density ρ(S, T, p).
pub fn density(salinity: f64, temperature: f64, pressure: f64) -> f64 {
    let rho_0 = density_surface(salinity, temperature);
    if pressure == 0.0 {
        return rho_0;
    }
    let p_bar = pressure / 10.0;
    rho_0 / (1.0 - p_bar / secant_bulk_modulus(salinity, temperature, p_bar))
}

/// Adiabatic lapse rate Γ(S, T, p), °C/dbar.
fn adiabatic_lapse_rate(salinity: f64, temperature: f64, pressure: f64) -> f64 {
    let t = temperature;
    let p = pressure;
    let ds = salinity - STANDARD_SALINITY;

    3.5803e-5 + 8.5258e-6 * t - 6.836e-8 * t.powi(2) + 6.6228e-10 * t.powi(3)
        + (1.8932e-6 - 4.2393e-8 * t) * ds
        + (1.8741e-8 - 6.7795e-10 * t + 8.733e-12 * t.powi(2) - 5.4481e-14 * t.powi(3)
            + (-1.1351e-10 + 2.7759e-12 * t) * ds)
            * p
        + (-4.6206e-13 + 1.8676e-14 * t - 2.1687e-16 * t.powi(2)) * p.powi(2)
}

/// Potential temperature θ of a parcel at `pressure` brought adiabatically to
/// `reference_pressure` (fourth-order Runge-Kutta, Fofonoff 1977).
pub fn potential_temperature(salinity: f64, temperature: f64, pressure: f64, reference_pressure: f64) -> f64 {
    let s = salinity;
    let h = reference_pressure - pressure;
    let mut p = pressure;
    let mut t = temperature;

    let mut xk = h * adiabatic_lapse_rate(s, t, p);
    t += 0.5 * xk;
    let mut q = xk;
    p += 0.5 * h;

    xk = h * adiabatic_lapse_rate(s, t, p);
    t += 0.292_893_22 * (xk - q);
    q = 0.585_786_44 * xk + 0.121_320_344 * q;

    xk = h * adiabatic_lapse_rate(s, t, p);
    t += 1.707_106_781 * (xk - q);
    q = 3.414_213_562 * xk - 4.121_320_344 * q;
    p += 0.5 * h;

    xk = h * adiabatic_lapse_rate(s, t, p);
    t + (xk - 2.0 * q) / 6.0
}

/// Potential density referenced to the surface, kg/m³.
pub fn potential_density(salinity: f64, temperature: f64, pressure: f64) -> f64 {
    let theta = potential_temperature(salinity, temperature, pressure, 0.0);
    density(salinity, theta, 0.0)
}

impl Profile {
    /// Fill `potential_density` from the measured levels. NaN temperature or
    /// salinity gives a NaN level.
    pub fn with_potential_density(self) -> Self {
        let sigma = self
            .pressure
            .iter()
            .zip(&self.temperature)
            .zip(&self.salinity)
            .map(|((&p, &t), &s)| potential_density(s, t, p))
            .collect();
        self.with_variable(Variable::PotentialDensity, sigma)
    }
}
