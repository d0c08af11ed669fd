//! One-call fit: coordinates to conic to ellipse parameters, optionally rendered.

use nalgebra as na;

use crate::fit::fit_conic_with;
use crate::geom::ellipse::EllipseParameters;
use crate::options::FitOptions;
use crate::render::{BackgroundImage, DiagnosticRenderer, DiagnosticScene, RenderError, RenderOptions};

/// A fit result together with the outcome of drawing it.
#[derive(Debug)]
pub struct RenderedFit<F: na::RealField + Copy> {
    pub params: EllipseParameters<F>,
    pub render: Result<(), RenderError>,
}

pub fn fit_ellipse_params<F: na::RealField + Copy>(
    xs: &[F],
    ys: &[F],
) -> Result<EllipseParameters<F>, crate::Error> {
    fit_ellipse_params_with(xs, ys, &FitOptions::default())
}

/// Fits a conic and extracts its center, rotation angle and semi-axes.
pub fn fit_ellipse_params_with<F: na::RealField + Copy>(
    xs: &[F],
    ys: &[F],
    options: &FitOptions,
) -> Result<EllipseParameters<F>, crate::Error> {
    let coeffs = fit_conic_with(xs, ys, options)?;
    let params = EllipseParameters::from_coefficients_with(&coeffs, options)?;
    tracing::debug!(
        center = ?params.center(),
        angle = ?params.angle(),
        axes = ?params.axes(),
        "fitted ellipse"
    );
    Ok(params)
}

/// Fits as [fit_ellipse_params_with] and hands the result to `renderer`.
///
/// Fitting errors are returned as `Err`. A rendering failure is kept in
/// [RenderedFit::render] next to the parameters.
pub fn fit_and_render<F, R>(
    xs: &[F],
    ys: &[F],
    options: &FitOptions,
    renderer: &mut R,
    background: Option<&BackgroundImage>,
    render_options: &RenderOptions,
) -> Result<RenderedFit<F>, crate::Error>
where
    F: na::RealField + Copy,
    R: DiagnosticRenderer<F> + ?Sized,
{
    let params = fit_ellipse_params_with(xs, ys, options)?;

    let scene = DiagnosticScene {
        params: &params,
        xs,
        ys,
        background,
        options: render_options,
    };
    let render = renderer.render(&scene);
    if let Err(err) = &render {
        tracing::warn!(%err, "diagnostic rendering failed");
    }

    Ok(RenderedFit { params, render })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::fit_conic;
    use crate::utils::sampling::sample_ellipse_points;
    use crate::{DegenerateConicError, DegenerateInputError, Error};
    use anyhow::anyhow;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Recorder {
        calls: usize,
        outline_len: usize,
        points: usize,
    }

    impl DiagnosticRenderer<f64> for Recorder {
        fn render(&mut self, scene: &DiagnosticScene<'_, f64>) -> Result<(), RenderError> {
            self.calls += 1;
            scene.require_background()?;
            self.outline_len = scene.outline().len();
            self.points = scene.xs.len();
            Ok(())
        }
    }

    struct Broken;

    impl DiagnosticRenderer<f64> for Broken {
        fn render(&mut self, _scene: &DiagnosticScene<'_, f64>) -> Result<(), RenderError> {
            Err(RenderError::Backend(anyhow!("display unavailable")))
        }
    }

    fn ellipse_points() -> (Vec<f64>, Vec<f64>) {
        let truth = EllipseParameters::new((4.0, 2.0), 0.4, (3.0, 1.5));
        sample_ellipse_points(&truth, 30)
            .iter()
            .map(|p| (p.x, p.y))
            .unzip()
    }

    #[test]
    fn test_fit_ellipse_params() {
        let (xs, ys) = ellipse_points();
        let params = fit_ellipse_params(&xs, &ys).unwrap();

        let (x, y) = params.center();
        assert_relative_eq!(x, 4.0, epsilon = 1e-8);
        assert_relative_eq!(y, 2.0, epsilon = 1e-8);
        assert_relative_eq!(params.semi_major(), 3.0, epsilon = 1e-8);
        assert_relative_eq!(params.semi_minor(), 1.5, epsilon = 1e-8);
    }

    #[test]
    fn test_input_errors_propagate() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let ys = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        assert!(matches!(
            fit_ellipse_params(&xs, &ys),
            Err(Error::DegenerateInput(DegenerateInputError::RankDeficient { .. }))
        ));
    }

    #[test]
    fn test_conic_errors_propagate() {
        let xs: Vec<f64> = (-3..=3).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| x * x).collect();
        assert!(matches!(
            fit_ellipse_params(&xs, &ys),
            Err(Error::DegenerateConic(DegenerateConicError::NoCenter(_)))
        ));
    }

    #[test]
    fn test_render_with_background() {
        let (xs, ys) = ellipse_points();
        let image = BackgroundImage::zeros(8, 8);
        let mut recorder = Recorder::default();

        let fit = fit_and_render(
            &xs,
            &ys,
            &FitOptions::default(),
            &mut recorder,
            Some(&image),
            &RenderOptions::default(),
        )
        .unwrap();

        assert!(fit.render.is_ok());
        assert_eq!(recorder.calls, 1);
        assert_eq!(recorder.outline_len, 629);
        assert_eq!(recorder.points, 30);
    }

    #[test]
    fn test_rendered_outline_matches_fit() {
        let truth = EllipseParameters::new((0.0, 0.0), 0.0, (2.0, 1.0));
        let (xs, ys): (Vec<f64>, Vec<f64>) = sample_ellipse_points(&truth, 40)
            .iter()
            .map(|p| (p.x, p.y))
            .unzip();
        let conic = fit_conic(&xs, &ys).unwrap();

        let mut recorder = Recorder::default();
        let image = BackgroundImage::zeros(4, 4);
        let options = RenderOptions::default();
        let fit = fit_and_render(
            &xs,
            &ys,
            &FitOptions::default(),
            &mut recorder,
            Some(&image),
            &options,
        )
        .unwrap();

        let scene = DiagnosticScene {
            params: &fit.params,
            xs: &xs,
            ys: &ys,
            background: Some(&image),
            options: &options,
        };
        let outline = scene.outline();
        // angle is π/2 here, so the outline starts on the minor axis
        assert_relative_eq!(outline[0].x, 0.0, epsilon = 1e-8);
        assert_relative_eq!(outline[0].y.abs(), 1.0, epsilon = 1e-8);
        for p in &outline {
            assert!(conic.evaluate(p.x, p.y).abs() < 1e-8);
        }
    }

    #[test]
    fn test_missing_background_keeps_params() {
        let (xs, ys) = ellipse_points();
        let mut recorder = Recorder::default();

        let fit = fit_and_render(
            &xs,
            &ys,
            &FitOptions::default(),
            &mut recorder,
            None,
            &RenderOptions::default(),
        )
        .unwrap();

        assert!(matches!(fit.render, Err(RenderError::MissingBackground)));
        assert_eq!(fit.params, fit_ellipse_params(&xs, &ys).unwrap());
    }

    #[test]
    fn test_backend_failure_keeps_params() {
        let (xs, ys) = ellipse_points();
        let fit = fit_and_render(
            &xs,
            &ys,
            &FitOptions::default(),
            &mut Broken,
            None,
            &RenderOptions::default(),
        )
        .unwrap();

        assert!(matches!(fit.render, Err(RenderError::Backend(_))));
        assert_relative_eq!(fit.params.semi_major(), 3.0, epsilon = 1e-8);
    }

    #[test]
    fn test_renderer_not_called_on_fit_failure() {
        let mut recorder = Recorder::default();
        let result = fit_and_render(
            &[0.0, 1.0, 2.0],
            &[0.0, 1.0, 2.0],
            &FitOptions::default(),
            &mut recorder,
            None,
            &RenderOptions::default(),
        );
        assert!(result.is_err());
        assert_eq!(recorder.calls, 0);
    }
}
