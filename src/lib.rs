pub mod fit;
pub mod geom;
pub mod math;
mod error;
pub mod options;
pub mod pipeline;
pub mod render;
pub mod utils;

pub use error::Error;
pub use fit::{fit_conic, fit_conic_with, DegenerateInputError, PointSet};
pub use geom::ellipse::{
    axis_lengths, axis_lengths_with, center, center_with, rotation_angle, rotation_angle_with,
    EllipseParameters, Orientation,
};
pub use math::conic::{ConicCoefficients, DegenerateConicError};
pub use options::FitOptions;
pub use pipeline::{fit_and_render, fit_ellipse_params, fit_ellipse_params_with, RenderedFit};
pub use render::{BackgroundImage, DiagnosticRenderer, DiagnosticScene, RenderError, RenderOptions};
