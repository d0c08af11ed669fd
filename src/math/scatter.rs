//! Design, scatter and constraint matrices of the direct least-squares fit.

use nalgebra as na;

use crate::fit::PointSet;

/// Design matrix with one `[x², xy, y², x, y, 1]` row per point.
pub type DesignMatrix<F> = na::OMatrix<F, na::Dyn, na::U6>;

/// Similarity transform `x' = s (x - mx)`, `y' = s (y - my)` applied before fitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization<F> {
    pub mean_x: F,
    pub mean_y: F,
    pub scale: F,
}

impl<F: na::RealField + Copy> Normalization<F> {
    pub fn identity() -> Self {
        Self {
            mean_x: F::zero(),
            mean_y: F::zero(),
            scale: F::one(),
        }
    }

    /// Centroid shift and a scale that brings the mean distance to the centroid to √2.
    pub fn from_points(points: &PointSet<'_, F>) -> Self {
        let n: F = na::convert(points.len() as f64);
        let (sum_x, sum_y) = points
            .iter()
            .fold((F::zero(), F::zero()), |(sx, sy), (x, y)| (sx + x, sy + y));
        let mean_x = sum_x / n;
        let mean_y = sum_y / n;

        let mean_dist = points
            .iter()
            .map(|(x, y)| ((x - mean_x).powi(2) + (y - mean_y).powi(2)).sqrt())
            .fold(F::zero(), |acc, d| acc + d)
            / n;

        let scale = if mean_dist > F::default_epsilon() {
            na::convert::<f64, F>(std::f64::consts::SQRT_2) / mean_dist
        } else {
            F::one()
        };

        Self {
            mean_x,
            mean_y,
            scale,
        }
    }

    pub fn apply(&self, x: F, y: F) -> (F, F) {
        ((x - self.mean_x) * self.scale, (y - self.mean_y) * self.scale)
    }

    /// Maps conic coefficients fitted in the normalized frame back to the input frame by
    /// substituting the transform into the conic equation.
    pub fn denormalize(&self, v: &na::Vector6<F>) -> na::Vector6<F> {
        let two: F = na::convert(2.0);
        let (mx, my, s) = (self.mean_x, self.mean_y, self.scale);
        let s2 = s * s;
        let [a_, b_, c_, d_, e_, f_] = [v[0], v[1], v[2], v[3], v[4], v[5]];

        let a = a_ * s2;
        let b = b_ * s2;
        let c = c_ * s2;
        let d = -two * a_ * s2 * mx - b_ * s2 * my + d_ * s;
        let e = -b_ * s2 * mx - two * c_ * s2 * my + e_ * s;
        let f = a_ * s2 * mx * mx + b_ * s2 * mx * my + c_ * s2 * my * my
            - d_ * s * mx
            - e_ * s * my
            + f_;

        na::Vector6::new(a, b, c, d, e, f)
    }
}

pub fn design_matrix<F: na::RealField + Copy>(
    points: &PointSet<'_, F>,
    normalization: &Normalization<F>,
) -> DesignMatrix<F> {
    let mut d = DesignMatrix::<F>::zeros(points.len());
    for (i, (px, py)) in points.iter().enumerate() {
        let (x, y) = normalization.apply(px, py);
        d[(i, 0)] = x * x;
        d[(i, 1)] = x * y;
        d[(i, 2)] = y * y;
        d[(i, 3)] = x;
        d[(i, 4)] = y;
        d[(i, 5)] = F::one();
    }
    d
}

/// `S = Dᵀ D`
pub fn scatter_matrix<F: na::RealField + Copy>(design: &DesignMatrix<F>) -> na::Matrix6<F> {
    design.tr_mul(design)
}

/// Encodes the quadratic constraint `4ac − b² = 1` as `aᵀ C a`.
pub fn constraint_matrix<F: na::RealField + Copy>() -> na::Matrix6<F> {
    let two: F = na::convert(2.0);
    let mut c = na::Matrix6::zeros();
    c[(0, 2)] = two;
    c[(2, 0)] = two;
    c[(1, 1)] = -F::one();
    c
}
