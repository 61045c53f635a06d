//! Caller-contract errors raised by the numeric engine.
//!
//! Sparse or noisy data is not an error here; it comes back as NaN levels with
//! warning bits, or as `None` from the estimators.

use crate::Variable;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// An integration bound is not one of the pressure levels.
    #[error("integration bound {bound} is not a level of the pressure axis")]
    BoundNotFound { bound: f64 },

    /// The profile does not carry the requested variable.
    #[error("profile {profile} has no {variable} levels")]
    MissingVariable { profile: String, variable: Variable },
}
