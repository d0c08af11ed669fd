use anyhow::Result;
use ellipsefit::utils::sampling::sample_ellipse_points;
use ellipsefit::{
    fit_and_render, BackgroundImage, DiagnosticRenderer, DiagnosticScene, EllipseParameters,
    FitOptions, RenderError, RenderOptions,
};
use rerun as rr;
use tracing_subscriber::EnvFilter;

/// Logs fits to a rerun viewer.
struct RerunRenderer {
    rec: rr::RecordingStream,
    frame: usize,
}

fn backend(err: rr::RecordingStreamError) -> RenderError {
    RenderError::Backend(err.into())
}

/// Flip to top-down rows and quantize to 8 bit.
fn to_luma(image: &BackgroundImage) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(image.len());
    for row in (0..image.nrows()).rev() {
        for col in 0..image.ncols() {
            pixels.push((image[(row, col)].clamp(0.0, 1.0) * 255.0) as u8);
        }
    }
    pixels
}

impl DiagnosticRenderer<f64> for RerunRenderer {
    fn render(&mut self, scene: &DiagnosticScene<'_, f64>) -> Result<(), RenderError> {
        let background = scene.require_background()?;
        let base_path = format!("fit_{}", self.frame);
        self.frame += 1;

        if let Some(image) = background {
            self.rec
                .log(
                    format!("{}/background", base_path),
                    &rr::Image::from_elements(
                        &to_luma(image),
                        [image.ncols() as u32, image.nrows() as u32],
                        rr::ColorModel::L,
                    ),
                )
                .map_err(backend)?;
        }

        // Image rows run top-down, the fit runs bottom-up.
        let height = background.map_or(0.0, |image| image.nrows() as f32);
        let flip = |x: f64, y: f64| [x as f32, height - y as f32];

        self.rec
            .log(
                format!("{}/points", base_path),
                &rr::Points2D::new(scene.xs.iter().zip(scene.ys).map(|(&x, &y)| flip(x, y)))
                    .with_colors([rr::Color::from_rgb(255, 0, 0)])
                    .with_radii([0.5]),
            )
            .map_err(backend)?;

        let outline: Vec<[f32; 2]> = scene.outline().iter().map(|p| flip(p.x, p.y)).collect();
        let (cx, cy) = scene.params.center();
        let (r1, r2) = scene.params.principal_axes();
        self.rec
            .log(
                format!("{}/ellipse", base_path),
                &rr::LineStrips2D::new([outline])
                    .with_colors([rr::Color::from_rgb(0, 255, 0)])
                    .with_labels([format!(
                        "center ({cx:.2}, {cy:.2}) angle {:.3} axes along/across ({r1:.2}, {r2:.2})",
                        scene.params.angle()
                    )]),
            )
            .map_err(backend)?;

        Ok(())
    }
}

/// Smooth blob centered on the ellipse so there is something to draw on.
fn synthetic_background(truth: &EllipseParameters<f64>, width: usize, height: usize) -> BackgroundImage {
    let (cx, cy) = truth.center();
    let r = truth.semi_major();
    BackgroundImage::from_fn(height, width, |row, col| {
        let dx = col as f64 - cx;
        let dy = row as f64 - cy;
        (-(dx * dx + dy * dy) / (2.0 * r * r)).exp() as f32
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let rec = rr::RecordingStreamBuilder::new("ellipse_fit").spawn()?;
    let mut renderer = RerunRenderer { rec, frame: 0 };

    let truths = [
        EllipseParameters::new((64.0, 48.0), 0.3, (30.0, 12.0)),
        EllipseParameters::new((50.0, 50.0), 1.2, (10.0, 25.0)),
        EllipseParameters::new((70.0, 40.0), 0.0, (20.0, 20.0)),
    ];

    for (i, truth) in truths.iter().enumerate() {
        let (mut xs, mut ys): (Vec<f64>, Vec<f64>) = sample_ellipse_points(truth, 60)
            .iter()
            .map(|p| (p.x, p.y))
            .unzip();
        for (k, (x, y)) in xs.iter_mut().zip(ys.iter_mut()).enumerate() {
            let t = (k + i) as f64;
            *x += 0.3 * (3.7 * t).sin();
            *y += 0.3 * (2.3 * t).cos();
        }

        let background = synthetic_background(truth, 128, 96);
        let fit = fit_and_render(
            &xs,
            &ys,
            &FitOptions::default(),
            &mut renderer,
            Some(&background),
            &RenderOptions::default(),
        )?;

        println!(
            "fit {i}: center {:?} angle {} axes {:?}",
            fit.params.center(),
            fit.params.angle(),
            fit.params.axes()
        );
        fit.render?;
    }

    Ok(())
}
