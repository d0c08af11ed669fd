//! Closed-form center, rotation and semi-axes of a conic.
//!
//! All three work on the half coefficients `b' = b/2`, `d' = d/2`, `f' = f/2`. Center and
//! axes do not depend on the scale or sign of the coefficients. Negating the coefficients
//! swaps the `a > c` and `a < c` branches, which moves the angle by π/2.

use nalgebra as na;

use crate::math::conic::{ConicCoefficients, DegenerateConicError, HalfCoefficients};
use crate::options::FitOptions;

/// Sign configuration of `b'` and `a − c` that selects the rotation and axis branches.
///
/// Comparisons are made against `epsilon * max(|a|, |b'|, |c|)` so that noise around
/// `b' = 0` or `a = c` does not flip branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// `b' ≈ 0`, `a > c`
    AlignedAGreater,
    /// `b' ≈ 0`, `a ≤ c`. Includes the circle.
    AlignedALessEq,
    /// `b' ≠ 0`, `a > c`
    TiltedAGreater,
    /// `b' ≠ 0`, `a < c`
    TiltedALess,
    /// `b' ≠ 0`, `a ≈ c`: the axes sit on the diagonals.
    TiltedAEqual,
}

impl Orientation {
    pub fn classify<F: na::RealField + Copy>(coeffs: &ConicCoefficients<F>, epsilon: F) -> Self {
        let HalfCoefficients { a, b, c, .. } = coeffs.half();
        let tolerance = epsilon * a.abs().max(b.abs()).max(c.abs());
        let diff = a - c;

        let tilted = b.abs() > tolerance;
        let a_greater = diff > tolerance;
        let a_less = diff < -tolerance;

        match (tilted, a_greater, a_less) {
            (false, true, _) => Self::AlignedAGreater,
            (false, false, _) => Self::AlignedALessEq,
            (true, true, _) => Self::TiltedAGreater,
            (true, false, true) => Self::TiltedALess,
            (true, false, false) => Self::TiltedAEqual,
        }
    }

    /// Whether the `a ≤ c` branch of the formulas applies.
    pub fn is_a_less_eq(&self) -> bool {
        !matches!(self, Self::AlignedAGreater | Self::TiltedAGreater)
    }
}

pub fn center<F: na::RealField + Copy>(
    coeffs: &ConicCoefficients<F>,
) -> Result<(F, F), DegenerateConicError> {
    center_with(coeffs, &FitOptions::default())
}

pub fn rotation_angle<F: na::RealField + Copy>(coeffs: &ConicCoefficients<F>) -> F {
    rotation_angle_with(coeffs, &FitOptions::default())
}

pub fn axis_lengths<F: na::RealField + Copy>(
    coeffs: &ConicCoefficients<F>,
) -> Result<(F, F), DegenerateConicError> {
    axis_lengths_with(coeffs, &FitOptions::default())
}

/// `x0 = (c·d' − b'·f') / (b'² − ac)`, `y0 = (a·f' − b'·d') / (b'² − ac)`.
pub fn center_with<F: na::RealField + Copy>(
    coeffs: &ConicCoefficients<F>,
    options: &FitOptions,
) -> Result<(F, F), DegenerateConicError> {
    let HalfCoefficients { a, b, c, d, f, .. } = coeffs.half();
    let epsilon: F = na::convert(options.epsilon);

    let num = b * b - a * c;
    if num.abs() <= epsilon * (a * a + b * b + c * c) {
        tracing::debug!(num = ?num, "conic has no unique center");
        return Err(DegenerateConicError::NoCenter(num.to_subset_unchecked()));
    }

    Ok(((c * d - b * f) / num, (a * f - b * d) / num))
}

/// Angle in radians between the x-axis and one of the principal axes.
///
/// On the `a > c` branch the first semi-axis of [axis_lengths_with] lies along this angle,
/// on the `a ≤ c` branch it lies across it.
///
/// On the diagonal (`a ≈ c`, `b' ≠ 0`) `atan(2b'/(a−c))` is taken at its limit from the
/// `a < c` side, giving `π/2 − sign(b')·π/4`.
pub fn rotation_angle_with<F: na::RealField + Copy>(
    coeffs: &ConicCoefficients<F>,
    options: &FitOptions,
) -> F {
    let HalfCoefficients { a, b, c, .. } = coeffs.half();
    let two: F = na::convert(2.0);

    let orientation = Orientation::classify(coeffs, na::convert(options.epsilon));
    tracing::trace!(?orientation, "rotation branch");

    match orientation {
        Orientation::AlignedAGreater => F::zero(),
        Orientation::AlignedALessEq => F::frac_pi_2(),
        Orientation::TiltedAGreater => (two * b / (a - c)).atan() / two,
        Orientation::TiltedALess => F::frac_pi_2() + (two * b / (a - c)).atan() / two,
        Orientation::TiltedAEqual => F::frac_pi_2() - b.signum() * F::frac_pi_4(),
    }
}

/// Semi-axis lengths `(√(up/down1), √(up/down2))` with
///
/// * `up = 2(a·f'² + c·d'² + g·b'² − 2b'·d'·f' − a·c·g)`
/// * `down1 = (b'² − ac)·[(c − a)·√(1 + 4b'²/(a − c)²) − (c + a)]`
/// * `down2 = (b'² − ac)·[(a − c)·√(1 + 4b'²/(a − c)²) − (c + a)]`
///
/// `(c − a)·√(1 + 4b'²/(a − c)²)` is evaluated as `±√((a − c)² + 4b'²)`, positive on the
/// `a ≤ c` branch. This equals the expanded term whenever `a ≠ c` and stays finite on
/// the diagonal, where it yields the circle limit.
pub fn axis_lengths_with<F: na::RealField + Copy>(
    coeffs: &ConicCoefficients<F>,
    options: &FitOptions,
) -> Result<(F, F), DegenerateConicError> {
    let HalfCoefficients { a, b, c, d, f, g } = coeffs.half();
    let two: F = na::convert(2.0);
    let four: F = na::convert(4.0);
    let epsilon: F = na::convert(options.epsilon);

    let orientation = Orientation::classify(coeffs, epsilon);

    let up = two * (a * f * f + c * d * d + g * b * b - two * b * d * f - a * c * g);

    let root = ((a - c) * (a - c) + four * b * b).sqrt();
    let signed_root = if orientation.is_a_less_eq() {
        root
    } else {
        -root
    };

    let quadratic = b * b - a * c;
    if quadratic.abs() <= epsilon * (a * a + b * b + c * c) {
        tracing::debug!(quadratic = ?quadratic, "conic is parabolic");
        return Err(DegenerateConicError::ZeroDenominator(
            quadratic.to_subset_unchecked(),
        ));
    }

    let scale = a.abs().max(b.abs()).max(c.abs());
    let tolerance = epsilon * scale;
    let r1 = semi_axis(up, quadratic, signed_root - (c + a), tolerance)?;
    let r2 = semi_axis(up, quadratic, -signed_root - (c + a), tolerance)?;
    Ok((r1, r2))
}

/// `√(up / (quadratic · bracket))`, rejecting a bracket within `tolerance` of zero.
fn semi_axis<F: na::RealField + Copy>(
    up: F,
    quadratic: F,
    bracket: F,
    tolerance: F,
) -> Result<F, DegenerateConicError> {
    if bracket.abs() <= tolerance {
        tracing::debug!(bracket = ?bracket, "vanishing axis denominator");
        return Err(DegenerateConicError::ZeroDenominator(
            (quadratic * bracket).to_subset_unchecked(),
        ));
    }

    let radicand = up / (quadratic * bracket);
    if !radicand.is_finite() || radicand < F::zero() {
        tracing::debug!(radicand = ?radicand, "axis radicand out of domain");
        return Err(DegenerateConicError::NegativeRadicand(
            radicand.to_subset_unchecked(),
        ));
    }

    Ok(radicand.sqrt())
}
