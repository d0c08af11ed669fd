pub mod conic;
pub mod eigen;
pub mod scatter;

pub use conic::{ConicCoefficients, DegenerateConicError, HalfCoefficients};
pub use eigen::{dominant_eigenpair, EigenError, Eigenpair, RankProfile};
pub use scatter::{constraint_matrix, design_matrix, scatter_matrix, DesignMatrix, Normalization};
