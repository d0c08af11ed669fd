use nalgebra as na;
use thiserror::Error;

use crate::geom::ellipse::EllipseParameters;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DegenerateConicError {
    #[error("Conic has no unique center, b'^2 - ac = {0}")]
    NoCenter(f64),

    #[error("Axis length denominator vanishes, got {0}")]
    ZeroDenominator(f64),

    #[error("Axis length radicand is negative or not finite, got {0}")]
    NegativeRadicand(f64),
}

/// Coefficients of the implicit conic `a x² + b xy + c y² + d x + f y + g = 0`.
///
/// Only defined up to a non-zero scale factor: `k * coeffs` describes the same curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicCoefficients<F: na::RealField + Copy> {
    pub a: F,
    pub b: F,
    pub c: F,
    pub d: F,
    pub f: F,
    pub g: F,
}

/// The coefficients with the mixed and linear terms halved, i.e. the entries of the
/// symmetric conic matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfCoefficients<F> {
    pub a: F,
    /// `b / 2`
    pub b: F,
    pub c: F,
    /// `d / 2`
    pub d: F,
    /// `f / 2`
    pub f: F,
    pub g: F,
}

impl<F: na::RealField + Copy> ConicCoefficients<F> {
    pub fn new(a: F, b: F, c: F, d: F, f: F, g: F) -> Self {
        Self { a, b, c, d, f, g }
    }

    pub fn from_vector(v: &na::Vector6<F>) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4], v[5])
    }

    pub fn to_vector(&self) -> na::Vector6<F> {
        na::Vector6::new(self.a, self.b, self.c, self.d, self.f, self.g)
    }

    pub fn half(&self) -> HalfCoefficients<F> {
        let two: F = na::convert(2.0);
        HalfCoefficients {
            a: self.a,
            b: self.b / two,
            c: self.c,
            d: self.d / two,
            f: self.f / two,
            g: self.g,
        }
    }

    /// `b² − 4ac`, negative for ellipses.
    pub fn discriminant(&self) -> F {
        let four: F = na::convert(4.0);
        self.b * self.b - four * self.a * self.c
    }

    pub fn is_ellipse(&self) -> bool {
        self.discriminant() < F::zero()
    }

    /// Algebraic residual of the point `(x, y)`.
    pub fn evaluate(&self, x: F, y: F) -> F {
        self.a * x * x + self.b * x * y + self.c * y * y + self.d * x + self.f * y + self.g
    }

    /// Symmetric 3x3 matrix representation [1].
    ///
    /// [1] https://en.wikipedia.org/wiki/Matrix_representation_of_conic_sections
    pub fn to_matrix(&self) -> na::Matrix3<F> {
        let h = self.half();
        na::Matrix3::from_rows(&[
            [h.a, h.b, h.d].into(),
            [h.b, h.c, h.f].into(),
            [h.d, h.f, h.g].into(),
        ])
    }

    /// Conic of the ellipse, pairing the semi-axes with `angle` as [EllipseParameters::principal_axes] does.
    pub fn from_parameters(params: &EllipseParameters<F>) -> Self {
        let two: F = na::convert(2.0);
        let (x, y) = params.center();
        let (r1, r2) = params.principal_axes();
        let theta = params.angle();

        let sin_theta = theta.sin();
        let cos_theta = theta.cos();
        let r1_pow2 = r1.powi(2);
        let r2_pow2 = r2.powi(2);

        let a = r1_pow2 * sin_theta.powi(2) + r2_pow2 * cos_theta.powi(2);
        let b = two * (r2_pow2 - r1_pow2) * cos_theta * sin_theta;
        let c = r1_pow2 * cos_theta.powi(2) + r2_pow2 * sin_theta.powi(2);
        let d = -two * a * x - b * y;
        let f = -b * x - two * c * y;
        let g = a * x.powi(2) + b * x * y + c * y.powi(2) - r1_pow2 * r2_pow2;

        Self::new(a, b, c, d, f, g)
    }

    /// Unit norm with `a + c >= 0`. Leaves the all-zero vector untouched.
    pub fn canonical(&self) -> Self {
        let v = self.to_vector();
        let norm = v.norm();
        if norm == F::zero() {
            return *self;
        }
        let v = v / norm;
        if v[0] + v[2] < F::zero() {
            Self::from_vector(&-v)
        } else {
            Self::from_vector(&v)
        }
    }
}
