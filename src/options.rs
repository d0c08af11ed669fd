/// Numerical knobs of the fit and of the parameter extraction.
///
/// All tolerances are relative to the magnitude of the quantities they are compared with.
/// The defaults suit `f64`; `f32` callers should loosen `rank_tolerance` and `epsilon`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Shift to the centroid and rescale before building the scatter matrix.
    pub normalize: bool,
    /// Scatter eigenvalues below `rank_tolerance * λ_max` are treated as zero.
    pub rank_tolerance: f64,
    /// Largest accepted `|Im λ| / |λ|` for the selected eigenvalue.
    pub complex_tolerance: f64,
    /// Zero test for `b'`, `a − c` and the extraction denominators.
    pub epsilon: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            rank_tolerance: 1e-12,
            complex_tolerance: 1e-9,
            epsilon: 1e-9,
        }
    }
}

impl FitOptions {
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_rank_tolerance(mut self, rank_tolerance: f64) -> Self {
        self.rank_tolerance = rank_tolerance;
        self
    }

    pub fn with_complex_tolerance(mut self, complex_tolerance: f64) -> Self {
        self.complex_tolerance = complex_tolerance;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }
}
