//! Eigen-analysis of the 6x6 scatter system.

use nalgebra as na;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EigenError {
    #[error("Dominant eigenvalue is complex: {re} + {im}i")]
    ComplexEigenvalue { re: f64, im: f64 },

    #[error("Schur decomposition did not converge")]
    NoConvergence,

    #[error("Could not recover an eigenvector")]
    NoEigenvector,
}

/// A real eigenvalue with its unit eigenvector.
#[derive(Debug, Clone, PartialEq)]
pub struct Eigenpair<F: na::RealField + Copy> {
    pub index: usize,
    pub value: F,
    pub vector: na::Vector6<F>,
}

/// Null-space summary of a symmetric positive semi-definite matrix.
#[derive(Debug, Clone)]
pub struct RankProfile<F: na::RealField + Copy> {
    nullity: usize,
    smallest: F,
    largest: F,
    null_vector: na::Vector6<F>,
}

impl<F: na::RealField + Copy> RankProfile<F> {
    /// Eigenvalues with magnitude at most `tolerance * λ_max` count as null.
    pub fn new(matrix: &na::Matrix6<F>, tolerance: F) -> Self {
        let eigen = matrix.clone_owned().symmetric_eigen();

        let mut smallest_idx = 0;
        for i in 1..6 {
            if eigen.eigenvalues[i] < eigen.eigenvalues[smallest_idx] {
                smallest_idx = i;
            }
        }
        let largest = eigen
            .eigenvalues
            .iter()
            .fold(F::zero(), |acc, &l| acc.max(l.abs()));

        let threshold = tolerance * largest;
        let nullity = if largest > F::zero() {
            eigen
                .eigenvalues
                .iter()
                .filter(|l| l.abs() <= threshold)
                .count()
        } else {
            6
        };

        Self {
            nullity,
            smallest: eigen.eigenvalues[smallest_idx],
            largest,
            null_vector: eigen.eigenvectors.column(smallest_idx).into_owned(),
        }
    }

    pub fn nullity(&self) -> usize {
        self.nullity
    }

    /// Smallest eigenvalue relative to the largest.
    pub fn relative_gap(&self) -> F {
        if self.largest > F::zero() {
            self.smallest / self.largest
        } else {
            F::zero()
        }
    }

    /// Eigenvector of the smallest eigenvalue.
    pub fn null_vector(&self) -> na::Vector6<F> {
        self.null_vector
    }
}

fn modulus<F: na::RealField + Copy>(z: &na::Complex<F>) -> F {
    (z.re * z.re + z.im * z.im).sqrt()
}

/// Eigenpair of `system` whose eigenvalue has the largest modulus.
///
/// Ties go to the lowest index of the Schur ordering. The eigenvalue must be real up to
/// `complex_tolerance * |λ|`; its eigenvector is the right singular vector of
/// `system − λI` with the smallest singular value.
pub fn dominant_eigenpair<F: na::RealField + Copy>(
    system: &na::Matrix6<F>,
    complex_tolerance: F,
) -> Result<Eigenpair<F>, EigenError> {
    let schur = na::linalg::Schur::try_new(system.clone_owned(), F::default_epsilon(), 1_000)
        .ok_or(EigenError::NoConvergence)?;
    let eigenvalues = schur.complex_eigenvalues();

    let mut index = 0;
    let mut best = modulus(&eigenvalues[0]);
    for (i, z) in eigenvalues.iter().enumerate().skip(1) {
        let m = modulus(z);
        if m > best {
            index = i;
            best = m;
        }
    }

    let lambda = eigenvalues[index];
    if lambda.im.abs() > complex_tolerance * best {
        return Err(EigenError::ComplexEigenvalue {
            re: lambda.re.to_subset_unchecked(),
            im: lambda.im.to_subset_unchecked(),
        });
    }
    let value = lambda.re;

    let shifted = system - na::Matrix6::identity() * value;
    let svd = shifted.svd(false, true);
    let v_t = svd.v_t.ok_or(EigenError::NoEigenvector)?;

    let mut smallest = 0;
    for i in 1..6 {
        if svd.singular_values[i] < svd.singular_values[smallest] {
            smallest = i;
        }
    }
    let vector = v_t.row(smallest).transpose();
    if vector.iter().any(|x| !x.is_finite()) {
        return Err(EigenError::NoEigenvector);
    }

    Ok(Eigenpair {
        index,
        value,
        vector,
    })
}
