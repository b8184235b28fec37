//! Adapters for the sparse solvers.
//!
//! `nalgebra`/`nalgebra-sparse` is the matrix vocabulary of the crate.
//! Factorizations are delegated to `faer`, the symmetric eigen solve to `lanczos`.

use crate::{
  error::{Error, Result},
  sparse::SparseMatrix,
};

use faer::solvers::SpSolver;
use lanczos::Hermitian;

pub type Vector = na::DVector<f64>;
pub type Matrix = na::DMatrix<f64>;
pub type CsrMatrix = nas::CsrMatrix<f64>;
pub type CscMatrix = nas::CscMatrix<f64>;

type SparseMatrixFaer = faer::sparse::SparseColMat<usize, f64>;

pub fn nalgebra2faer(m: CscMatrix) -> SparseMatrixFaer {
  let nrows = m.nrows();
  let ncols = m.ncols();
  let (col_ptrs, row_indices, values) = m.disassemble();

  let symbolic =
    faer::sparse::SymbolicSparseColMat::new_checked(nrows, ncols, col_ptrs, None, row_indices);
  faer::sparse::SparseColMat::new(symbolic, values)
}

/// Returns $A + epsilon I$.
pub fn regularize(a: &CsrMatrix, epsilon: f64) -> CsrMatrix {
  assert_eq!(a.nrows(), a.ncols());
  a + &(epsilon * &CsrMatrix::identity(a.nrows()))
}

pub struct FaerLu {
  raw: faer::sparse::linalg::solvers::Lu<usize, f64>,
}
impl FaerLu {
  pub fn new(a: CscMatrix) -> Result<Self> {
    let raw = nalgebra2faer(a).sp_lu().map_err(|_| Error::Lu)?;
    Ok(Self { raw })
  }

  pub fn solve(&self, b: &Vector) -> Vector {
    let b = faer::col::from_slice(b.as_slice());
    Vector::from_vec(self.raw.solve(b).as_slice().to_vec())
  }
}

pub struct FaerCholesky {
  raw: faer::sparse::linalg::solvers::Cholesky<usize, f64>,
}
impl FaerCholesky {
  pub fn new(a: CscMatrix) -> Result<Self> {
    let raw = nalgebra2faer(a)
      .sp_cholesky(faer::Side::Upper)
      .map_err(|_| Error::Cholesky)?;
    Ok(Self { raw })
  }

  pub fn solve(&self, b: &Vector) -> Vector {
    let b = faer::col::from_slice(b.as_slice());
    Vector::from_vec(self.raw.solve(b).as_slice().to_vec())
  }
}

/// Smallest eigenpair of the generalized problem $A u = lambda M u$
/// with a diagonal positive mass matrix $M$.
///
/// The problem is symmetrized into $M^(-1/2) A M^(-1/2) w = lambda w$
/// and handed to Lanczos. The returned eigenvector is $u = M^(-1/2) w$.
pub fn smallest_generalized_eigenpair(
  operator: &SparseMatrix,
  mass: &SparseMatrix,
  iterations: usize,
) -> Result<(f64, Vector)> {
  let n = operator.nrows();
  assert_eq!(mass.nrows(), n);

  let mass_diagonal = mass.clone().try_into_diagonal().ok_or(Error::NotDiagonal)?;
  let mass_diagonal_inv_sqrt = mass_diagonal.map(|m| m.sqrt().recip());
  if mass_diagonal_inv_sqrt.iter().any(|m| !m.is_finite()) {
    return Err(Error::NotDiagonal);
  }

  let system_matrix = operator
    .mul_left_by_diagonal(&mass_diagonal_inv_sqrt)
    .mul_right_by_diagonal(&mass_diagonal_inv_sqrt)
    .to_nalgebra_csc();

  // A full Krylov space of size `n` breaks down in the last step.
  let iterations = iterations.min(n.saturating_sub(1)).max(1);
  tracing::debug!("running {iterations} Lanczos iterations on a {n}x{n} system");
  let eigen = system_matrix.eigsh(iterations, lanczos::Order::Smallest);

  let imin = eigen
    .eigenvalues
    .iter()
    .enumerate()
    .filter(|(_, v)| v.is_finite())
    .min_by(|(_, a), (_, b)| a.total_cmp(b))
    .map(|(i, _)| i)
    .ok_or(Error::Eigen)?;
  let eigenvalue = eigen.eigenvalues[imin];
  let eigenvector = eigen
    .eigenvectors
    .column(imin)
    .component_mul(&mass_diagonal_inv_sqrt);
  if eigenvector.iter().any(|v| !v.is_finite()) {
    return Err(Error::Eigen);
  }
  Ok((eigenvalue, eigenvector))
}
