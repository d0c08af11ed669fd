pub mod extract;
pub mod planar;

pub use extract::{
    axis_lengths, axis_lengths_with, center, center_with, rotation_angle, rotation_angle_with,
    Orientation,
};
pub use planar::EllipseParameters;
