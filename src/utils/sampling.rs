use nalgebra as na;

use crate::geom::ellipse::EllipseParameters;

/// Evenly spaced points along an ellipse, starting at the end of the semi-axis along `angle`.
pub fn sample_ellipse_points<F: na::RealField + Copy>(
    ellipse: &EllipseParameters<F>,
    num_points: usize,
) -> Vec<na::Point2<F>> {
    let (cx, cy) = ellipse.center();
    let (r1, r2) = ellipse.principal_axes();
    let cos_phi = ellipse.angle().cos();
    let sin_phi = ellipse.angle().sin();

    let step = F::two_pi() / na::convert(num_points.max(1) as f64);

    (0..num_points)
        .map(|i| {
            let t = step * na::convert(i as f64);
            let (sin_t, cos_t) = t.sin_cos();
            na::Point2::new(
                cx + r1 * cos_t * cos_phi - r2 * sin_t * sin_phi,
                cy + r1 * cos_t * sin_phi + r2 * sin_t * cos_phi,
            )
        })
        .collect()
}
