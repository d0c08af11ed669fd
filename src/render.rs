//! Interface for drawing a fit result. No drawing backend lives in this crate.

use nalgebra as na;
use thiserror::Error;

use crate::geom::ellipse::EllipseParameters;

/// Intensity grid drawn behind the points, row-major with row 0 at the bottom.
pub type BackgroundImage = na::DMatrix<f32>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Need to supply an image for plotting")]
    MissingBackground,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Figure size in inches
    pub figsize: (f32, f32),
    /// Parameter step of the sampled outline in radians
    pub outline_step: f64,
    /// Fail with [RenderError::MissingBackground] when no image is given
    pub require_background: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            figsize: (6.0, 6.0),
            outline_step: 0.01,
            require_background: true,
        }
    }
}

/// Everything a renderer gets to see of one fit.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticScene<'a, F: na::RealField + Copy> {
    pub params: &'a EllipseParameters<F>,
    pub xs: &'a [F],
    pub ys: &'a [F],
    pub background: Option<&'a BackgroundImage>,
    pub options: &'a RenderOptions,
}

impl<'a, F: na::RealField + Copy> DiagnosticScene<'a, F> {
    /// The fitted curve sampled with [RenderOptions::outline_step].
    pub fn outline(&self) -> Vec<na::Point2<F>> {
        self.params
            .sample_outline(na::convert(self.options.outline_step))
    }

    /// The background image, or [RenderError::MissingBackground] if the options require
    /// one and none was supplied.
    pub fn require_background(&self) -> Result<Option<&'a BackgroundImage>, RenderError> {
        match (self.background, self.options.require_background) {
            (None, true) => Err(RenderError::MissingBackground),
            (background, _) => Ok(background),
        }
    }
}

pub trait DiagnosticRenderer<F: na::RealField + Copy> {
    fn render(&mut self, scene: &DiagnosticScene<'_, F>) -> Result<(), RenderError>;
}
