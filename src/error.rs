use crate::fit::DegenerateInputError;
use crate::math::conic::DegenerateConicError;
use thiserror::Error;

/// Failure of [crate::fit_ellipse_params] and friends. Stage errors pass through
/// unchanged so callers can match on the stage that rejected the input.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    DegenerateInput(#[from] DegenerateInputError),

    #[error(transparent)]
    DegenerateConic(#[from] DegenerateConicError),

    #[error("Unknown error: {0}")]
    Unknown(#[from] anyhow::Error),
}
