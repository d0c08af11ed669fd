//! Direct least-squares conic fit (Fitzgibbon et al., 1999).

use std::cmp::Ordering;

use itertools::Itertools;
use nalgebra as na;
use thiserror::Error;

use crate::math::eigen::{dominant_eigenpair, EigenError, RankProfile};
use crate::math::scatter::{constraint_matrix, design_matrix, scatter_matrix, Normalization};
use crate::math::ConicCoefficients;
use crate::options::FitOptions;

/// Six coefficients need six distinct points.
pub const MIN_POINTS: usize = 6;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DegenerateInputError {
    #[error("Coordinate sequences differ in length: {xs} x-values, {ys} y-values")]
    LengthMismatch { xs: usize, ys: usize },

    #[error("Need at least {needed} distinct points, got {got}")]
    TooFewPoints { needed: usize, got: usize },

    #[error("Point {index} has a non-finite coordinate")]
    NonFinite { index: usize },

    #[error("Scatter matrix has a {nullity}-dimensional null space")]
    RankDeficient { nullity: usize },

    #[error("Scatter matrix is not invertible")]
    Singular,

    #[error(transparent)]
    Eigen(#[from] EigenError),
}

/// Borrowed, validated sample coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PointSet<'a, F> {
    xs: &'a [F],
    ys: &'a [F],
}

impl<'a, F: na::RealField + Copy> PointSet<'a, F> {
    pub fn new(xs: &'a [F], ys: &'a [F]) -> Result<Self, DegenerateInputError> {
        if xs.len() != ys.len() {
            return Err(DegenerateInputError::LengthMismatch {
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        if let Some(index) = xs
            .iter()
            .zip(ys)
            .position(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(DegenerateInputError::NonFinite { index });
        }

        let points = Self { xs, ys };
        let distinct = points.distinct_count();
        if distinct < MIN_POINTS {
            return Err(DegenerateInputError::TooFewPoints {
                needed: MIN_POINTS,
                got: distinct,
            });
        }
        Ok(points)
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, F)> + 'a {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    fn distinct_count(&self) -> usize {
        self.iter()
            .sorted_by(|p, q| p.partial_cmp(q).unwrap_or(Ordering::Equal))
            .dedup()
            .count()
    }
}

/// Fits the conic `a x² + b xy + c y² + d x + f y + g = 0` with default options.
pub fn fit_conic<F: na::RealField + Copy>(
    xs: &[F],
    ys: &[F],
) -> Result<ConicCoefficients<F>, DegenerateInputError> {
    fit_conic_with(xs, ys, &FitOptions::default())
}

/// Fits a conic by solving the eigenproblem of `S⁻¹C` and keeping the eigenvector of the
/// eigenvalue with the largest modulus.
///
/// When the points lie exactly on one conic the scatter matrix `S` has a one-dimensional
/// null space and that eigenvalue is unbounded; the null vector of `S` is returned
/// instead. A larger null space means the data cannot pin down a conic.
///
/// The result is not checked to be an ellipse, see [ConicCoefficients::is_ellipse].
pub fn fit_conic_with<F: na::RealField + Copy>(
    xs: &[F],
    ys: &[F],
    options: &FitOptions,
) -> Result<ConicCoefficients<F>, DegenerateInputError> {
    let points = PointSet::new(xs, ys)?;

    let normalization = if options.normalize {
        Normalization::from_points(&points)
    } else {
        Normalization::identity()
    };

    let design = design_matrix(&points, &normalization);
    let scatter = scatter_matrix(&design);

    let profile = RankProfile::new(&scatter, na::convert(options.rank_tolerance));
    tracing::trace!(
        nullity = profile.nullity(),
        relative_gap = ?profile.relative_gap(),
        "scatter matrix rank"
    );

    let vector = match profile.nullity() {
        0 => {
            let scatter_inv = scatter
                .try_inverse()
                .ok_or(DegenerateInputError::Singular)?;
            let system = scatter_inv * constraint_matrix::<F>();
            let pair = dominant_eigenpair(&system, na::convert(options.complex_tolerance))?;
            tracing::debug!(
                index = pair.index,
                eigenvalue = ?pair.value,
                "selected dominant eigenpair"
            );
            pair.vector
        }
        1 => {
            tracing::debug!("points lie on a single conic, using the scatter null vector");
            profile.null_vector()
        }
        nullity => {
            tracing::warn!(nullity, points = points.len(), "rank deficient scatter matrix");
            return Err(DegenerateInputError::RankDeficient { nullity });
        }
    };

    let coefficients = ConicCoefficients::from_vector(&normalization.denormalize(&vector));
    Ok(coefficients.canonical())
}
