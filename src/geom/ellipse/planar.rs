use nalgebra as na;

use super::extract::{self, Orientation};
use crate::math::conic::{ConicCoefficients, DegenerateConicError};
use crate::options::FitOptions;
use crate::utils::sampling::sample_ellipse_points;

/// Geometric description of a fitted ellipse.
///
/// `angle` is one of the principal directions and `axes` are in the order the extraction
/// formulas produce them, so neither major-then-minor nor along-then-across is
/// guaranteed (see [super::rotation_angle_with]). Use [EllipseParameters::principal_axes]
/// for the along/across pairing and [EllipseParameters::semi_major] /
/// [EllipseParameters::semi_minor] when only the sizes matter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseParameters<F: na::RealField + Copy> {
    /// Center coordinates
    center: (F, F),
    /// Rotation in radians
    angle: F,
    /// Semi-axis lengths
    axes: (F, F),
    /// `axes.0` lies across `angle` instead of along it
    across: bool,
}

/// Outline samples are capped at this count.
pub const MAX_OUTLINE_POINTS: usize = 1 << 16;

impl<F: na::RealField + Copy> EllipseParameters<F> {
    /// Ellipse with semi-axis `axes.0` along `angle` and `axes.1` across it.
    pub fn new(center: (F, F), angle: F, axes: (F, F)) -> Self {
        Self {
            center,
            angle,
            axes,
            across: false,
        }
    }

    /// Center, angle and axes of a fitted conic, in that order of evaluation.
    pub fn from_coefficients_with(
        coeffs: &ConicCoefficients<F>,
        options: &FitOptions,
    ) -> Result<Self, DegenerateConicError> {
        let center = extract::center_with(coeffs, options)?;
        let angle = extract::rotation_angle_with(coeffs, options);
        let axes = extract::axis_lengths_with(coeffs, options)?;
        let across = Orientation::classify(coeffs, na::convert(options.epsilon)).is_a_less_eq();
        Ok(Self {
            center,
            angle,
            axes,
            across,
        })
    }

    pub fn center(&self) -> (F, F) {
        self.center
    }

    pub fn angle(&self) -> F {
        self.angle
    }

    pub fn axes(&self) -> (F, F) {
        self.axes
    }

    /// Semi-axes as `(along angle, across angle)`.
    pub fn principal_axes(&self) -> (F, F) {
        if self.across {
            (self.axes.1, self.axes.0)
        } else {
            self.axes
        }
    }

    pub fn semi_major(&self) -> F {
        self.axes.0.max(self.axes.1)
    }

    pub fn semi_minor(&self) -> F {
        self.axes.0.min(self.axes.1)
    }

    /// Points on the outline for `t` in `[0, 2π)` with the given parameter step, at most
    /// [MAX_OUTLINE_POINTS] of them.
    pub fn sample_outline(&self, step: F) -> Vec<na::Point2<F>> {
        let count = if step > F::zero() {
            let n: f64 = (F::two_pi() / step).ceil().to_subset_unchecked();
            if n.is_finite() {
                n.min(MAX_OUTLINE_POINTS as f64) as usize
            } else {
                MAX_OUTLINE_POINTS
            }
        } else {
            0
        };
        sample_ellipse_points(self, count)
    }
}

impl<F: na::RealField + Copy> TryFrom<&ConicCoefficients<F>> for EllipseParameters<F> {
    type Error = DegenerateConicError;

    fn try_from(coeffs: &ConicCoefficients<F>) -> Result<Self, Self::Error> {
        Self::from_coefficients_with(coeffs, &FitOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_semi_axes_ordering() {
        let e = EllipseParameters::new((0.0, 0.0), 0.0, (1.0, 3.0));
        assert_eq!(e.semi_major(), 3.0);
        assert_eq!(e.semi_minor(), 1.0);
    }

    #[test]
    fn test_outline_length_matches_step() {
        let e = EllipseParameters::new((0.0, 0.0), 0.0, (2.0, 1.0));
        // ceil(2π / 0.01) samples
        assert_eq!(e.sample_outline(0.01).len(), 629);
        assert!(e.sample_outline(0.0).is_empty());
        assert!(e.sample_outline(f64::NAN).is_empty());
    }

    #[test]
    fn test_outline_length_is_capped() {
        let e = EllipseParameters::new((0.0, 0.0), 0.0, (2.0, 1.0));
        assert_eq!(e.sample_outline(1e-300).len(), MAX_OUTLINE_POINTS);
        assert_eq!(e.sample_outline(f64::MIN_POSITIVE).len(), MAX_OUTLINE_POINTS);
    }

    #[test]
    fn test_outline_lies_on_conic() {
        // wide and tall, aligned and tilted: covers both axis pairings
        let cases = [
            ((0.0, 0.0), 0.0, (2.0, 1.0)),
            ((0.0, 0.0), 0.0, (1.0, 2.0)),
            ((3.0, -1.0), 0.4, (5.0, 2.0)),
            ((-2.0, 2.0), 2.0, (1.5, 4.0)),
            ((1.0, 1.0), PI / 4.0, (3.0, 1.0)),
        ];
        for &(center, angle, axes) in &cases {
            let conic = ConicCoefficients::from_parameters(&EllipseParameters::new(
                center, angle, axes,
            ))
            .canonical();
            let fitted = EllipseParameters::try_from(&conic).unwrap();

            let worst = fitted
                .sample_outline(0.05)
                .iter()
                .map(|p| conic.evaluate(p.x, p.y).abs())
                .fold(0.0, f64::max);
            assert!(worst < 1e-9, "{center:?} {angle} {axes:?}: residual {worst}");
        }
    }

    #[test]
    fn test_principal_axes_follow_angle() {
        // x²/4 + y² = 1 lands on the a ≤ c branch: angle π/2, first axis across it
        let conic = ConicCoefficients::from_parameters(&EllipseParameters::new(
            (0.0, 0.0),
            0.0,
            (2.0, 1.0),
        ));
        let fitted = EllipseParameters::try_from(&conic).unwrap();
        assert_relative_eq!(fitted.angle(), PI / 2.0);
        let (along, across) = fitted.principal_axes();
        assert_relative_eq!(along, 1.0, epsilon = 1e-10);
        assert_relative_eq!(across, 2.0, epsilon = 1e-10);

        let explicit = EllipseParameters::new((0.0, 0.0), 0.3, (2.0, 1.0));
        assert_eq!(explicit.principal_axes(), explicit.axes());
    }

    #[test]
    fn test_round_trip_through_conic() {
        let e = EllipseParameters::new((2.0, 3.0), PI / 6.0, (3.0, 1.0));
        let conic = ConicCoefficients::from_parameters(&e);
        let back = EllipseParameters::try_from(&conic).unwrap();

        let (x, y) = back.center();
        assert_relative_eq!(x, 2.0, epsilon = 1e-10);
        assert_relative_eq!(y, 3.0, epsilon = 1e-10);
        assert_relative_eq!(back.semi_major(), 3.0, epsilon = 1e-10);
        assert_relative_eq!(back.semi_minor(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_degenerate_conic_is_rejected() {
        // y = x², no center
        let parabola = ConicCoefficients::new(1.0, 0.0, 0.0, 0.0, -1.0, 0.0);
        assert!(matches!(
            EllipseParameters::try_from(&parabola),
            Err(DegenerateConicError::NoCenter(_))
        ));
    }
}
