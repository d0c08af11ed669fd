use ellipsefit::utils::sampling::sample_ellipse_points;
use ellipsefit::{axis_lengths, center, fit_conic, rotation_angle, EllipseParameters};

fn main() -> Result<(), ellipsefit::Error> {
    let truth = EllipseParameters::new((4.0, -1.0), 0.5, (3.0, 1.25));
    let (xs, ys): (Vec<f64>, Vec<f64>) = sample_ellipse_points(&truth, 40)
        .iter()
        .map(|p| (p.x, p.y))
        .unzip();

    let coeffs = fit_conic(&xs, &ys)?;
    println!("coefficients: {:?}", coeffs.to_vector().as_slice());

    println!("center: {:?}", center(&coeffs)?);
    println!("angle: {}", rotation_angle(&coeffs));
    println!("axes: {:?}", axis_lengths(&coeffs)?);

    Ok(())
}
