//! TEOS-10 specific volume (75-term polynomial, Roquet et al. 2015).
//!
//! Inputs are absolute salinity SA (g/kg), conservative temperature CT (°C)
//! and sea pressure p (dbar). Dynamic height is integrated from the specific
//! volume anomaly relative to the standard ocean (SA = 35.16504 g/kg, CT = 0).
//!
//! # References
//!
//! - IOC, SCOR and IAPSO (2010): The international thermodynamic equation of
//!   seawater 2010. Manual and Guides 56, UNESCO.
//! - Roquet, Madec, McDougall & Barker (2015): Accurate polynomial expressions
//!   for the density and specific volume of seawater using the TEOS-10
//!   standard. Ocean Modelling 90, 29-43.

/// Standard Ocean Reference Salinity, g/kg.
pub const SSO: f64 = 35.16504;

/// Salinity scale: 1 / (40 * uPS).
const SFAC: f64 = 0.024_882_667_558_461_5;

/// 24 g/kg offset, scaled by `SFAC`.
const OFFSET: f64 = 5.971_840_214_030_754e-1;

const V000: f64 = 1.0769995862e-3;
const V001: f64 = -6.0799143809e-5;
const V002: f64 = 9.9856169219e-6;
const V003: f64 = -1.1309361437e-6;
const V004: f64 = 1.0531153080e-7;
const V005: f64 = -1.2647261286e-8;
const V006: f64 = 1.9613503930e-9;
const V010: f64 = -3.1038981976e-4;
const V011: f64 = 2.4262468747e-5;
const V012: f64 = -5.8484432984e-7;
const V013: f64 = 3.6310188515e-7;
const V014: f64 = -1.1147125423e-7;
const V020: f64 = 6.6928067038e-4;
const V021: f64 = -3.4792460974e-5;
const V022: f64 = -4.8122251597e-6;
const V023: f64 = 1.6746303780e-8;
const V030: f64 = -8.5047933937e-4;
const V031: f64 = 3.7470777305e-5;
const V032: f64 = 4.9263106998e-6;
const V040: f64 = 5.8086069943e-4;
const V041: f64 = -1.7322218612e-5;
const V042: f64 = -1.7811974727e-6;
const V050: f64 = -2.1092370507e-4;
const V051: f64 = 3.0927427253e-6;
const V060: f64 = 3.1932457305e-5;
const V100: f64 = -1.5649734675e-5;
const V101: f64 = 1.8505765429e-5;
const V102: f64 = -1.1736386731e-6;
const V103: f64 = -3.6527006553e-7;
const V104: f64 = 3.1454099902e-7;
const V110: f64 = 3.5009599764e-5;
const V111: f64 = -9.5677088156e-6;
const V112: f64 = -5.5699154557e-6;
const V113: f64 = -2.7295696237e-7;
const V120: f64 = -4.3592678561e-5;
const V121: f64 = 1.1100834765e-5;
const V122: f64 = 5.4620748834e-6;
const V130: f64 = 3.4532461828e-5;
const V131: f64 = -9.8447117844e-6;
const V132: f64 = -1.3544185627e-6;
const V140: f64 = -1.1959409788e-5;
const V141: f64 = 2.5909225260e-6;
const V150: f64 = 1.3864594581e-6;
const V200: f64 = 2.7762106484e-5;
const V201: f64 = -1.1716606853e-5;
const V202: f64 = 2.1305028740e-6;
const V203: f64 = 2.8695905159e-7;
const V210: f64 = -3.7435842344e-5;
const V211: f64 = -2.3678308361e-7;
const V212: f64 = 3.9137387080e-7;
const V220: f64 = 3.5907822760e-5;
const V221: f64 = 2.9283346295e-6;
const V222: f64 = -6.5731104067e-7;
const V230: f64 = -1.8698584187e-5;
const V231: f64 = -4.8826139200e-7;
const V240: f64 = 3.8595339244e-6;
const V300: f64 = -1.6521159259e-5;
const V301: f64 = 7.9279656173e-6;
const V302: f64 = -4.6132540037e-7;
const V310: f64 = 2.4141479483e-5;
const V311: f64 = -3.4558773655e-6;
const V312: f64 = 7.7618888092e-9;
const V320: f64 = -1.4353633048e-5;
const V321: f64 = 3.1655306078e-7;
const V330: f64 = 2.2863324556e-6;
const V400: f64 = 6.9111322702e-6;
const V401: f64 = -3.4102187482e-6;
const V402: f64 = -6.3352916514e-8;
const V410: f64 = -8.7595873154e-6;
const V411: f64 = 1.2956717783e-6;
const V420: f64 = 4.3703680598e-6;
const V500: f64 = -8.0539615540e-7;
const V501: f64 = 5.0736766814e-7;
const V510: f64 = -3.3052758900e-7;
const V600: f64 = 2.0543094268e-7;

/// Specific volume v(SA, CT, p), m³/kg.
pub fn specvol(sa: f64, ct: f64, p: f64) -> f64 {
    let xs = (SFAC * sa + OFFSET).sqrt();
    let ys = ct * 0.025;
    let z = p * 1e-4;

    let surface = V000
        + xs * (V010 + xs * (V020 + xs * (V030 + xs * (V040 + xs * (V050 + V060 * xs)))))
        + ys * (V100
            + xs * (V110 + xs * (V120 + xs * (V130 + xs * (V140 + V150 * xs))))
            + ys * (V200
                + xs * (V210 + xs * (V220 + xs * (V230 + V240 * xs)))
                + ys * (V300
                    + xs * (V310 + xs * (V320 + V330 * xs))
                    + ys * (V400 + xs * (V410 + V420 * xs) + ys * (V500 + V510 * xs + V600 * ys)))));

    let linear = V001
        + xs * (V011 + xs * (V021 + xs * (V031 + xs * (V041 + V051 * xs))))
        + ys * (V101
            + xs * (V111 + xs * (V121 + xs * (V131 + V141 * xs)))
            + ys * (V201
                + xs * (V211 + xs * (V221 + V231 * xs))
                + ys * (V301 + xs * (V311 + V321 * xs) + ys * (V401 + V411 * xs + V501 * ys))));

    let quadratic = V002
        + xs * (V012 + xs * (V022 + xs * (V032 + V042 * xs)))
        + ys * (V102
            + xs * (V112 + xs * (V122 + V132 * xs))
            + ys * (V202 + xs * (V212 + V222 * xs) + ys * (V302 + V312 * xs + V402 * ys)));

    let cubic = V003 + xs * (V013 + V023 * xs) + ys * (V103 + V113 * xs + V203 * ys);
    let quartic = V004 + V014 * xs + V104 * ys;

    surface + z * (linear + z * (quadratic + z * (cubic + z * (quartic + z * (V005 + V006 * z)))))
}

/// In-situ density ρ(SA, CT, p), kg/m³.
pub fn rho(sa: f64, ct: f64, p: f64) -> f64 {
    1.0 / specvol(sa, ct, p)
}

/// Specific volume anomaly relative to the standard ocean (SSO, 0 °C) at the
/// same pressure, m³/kg.
pub fn specvol_anom_standard(sa: f64, ct: f64, p: f64) -> f64 {
    specvol(sa, ct, p) - specvol(SSO, 0.0, p)
}
