//! Triplet based sparse matrix used during operator assembly.
//!
//! Assembly only ever pushes entries, so a plain triplet list is enough.
//! Duplicates are allowed and get summed when converting into one of the
//! compressed `nalgebra-sparse` formats.

use crate::linalg::{CscMatrix, CsrMatrix, Vector};

#[derive(Default, Debug, Clone)]
pub struct SparseMatrix {
  nrows: usize,
  ncols: usize,
  triplets: Vec<(usize, usize, f64)>,
}

impl SparseMatrix {
  pub fn zeros(nrows: usize, ncols: usize) -> Self {
    Self::new(nrows, ncols, Vec::new())
  }
  pub fn new(nrows: usize, ncols: usize, triplets: Vec<(usize, usize, f64)>) -> Self {
    Self {
      nrows,
      ncols,
      triplets,
    }
  }
  pub fn from_diagonal(diagonal: &Vector) -> Self {
    let n = diagonal.len();
    let triplets = diagonal
      .iter()
      .enumerate()
      .filter(|(_, &v)| v != 0.0)
      .map(|(i, &v)| (i, i, v))
      .collect();
    Self::new(n, n, triplets)
  }

  pub fn nrows(&self) -> usize {
    self.nrows
  }
  pub fn ncols(&self) -> usize {
    self.ncols
  }
  pub fn triplets(&self) -> &[(usize, usize, f64)] {
    &self.triplets
  }
  pub fn ntriplets(&self) -> usize {
    self.triplets.len()
  }

  pub fn into_parts(self) -> (usize, usize, Vec<(usize, usize, f64)>) {
    (self.nrows, self.ncols, self.triplets)
  }

  pub fn push(&mut self, r: usize, c: usize, v: f64) {
    assert!(r < self.nrows() && c < self.ncols());
    if v != 0.0 {
      self.triplets.push((r, c, v));
    }
  }

  /// Adds `value` to every diagonal entry.
  pub fn shift_diagonal(&mut self, value: f64) {
    for i in 0..self.nrows.min(self.ncols) {
      self.push(i, i, value);
    }
  }

  pub fn transpose(&self) -> SparseMatrix {
    let triplets = self.triplets.iter().map(|&(r, c, v)| (c, r, v)).collect();
    Self::new(self.ncols, self.nrows, triplets)
  }

  /// Computes $D A$ for a diagonal $D$.
  pub fn mul_left_by_diagonal(&self, diagonal: &Vector) -> Self {
    assert_eq!(diagonal.len(), self.nrows);
    let triplets = self
      .triplets
      .iter()
      .map(|&(r, c, v)| (r, c, v * diagonal[r]))
      .collect();
    Self::new(self.nrows, self.ncols, triplets)
  }

  /// Computes $A D$ for a diagonal $D$.
  pub fn mul_right_by_diagonal(&self, diagonal: &Vector) -> Self {
    assert_eq!(diagonal.len(), self.ncols);
    let triplets = self
      .triplets
      .iter()
      .map(|&(r, c, v)| (r, c, v * diagonal[c]))
      .collect();
    Self::new(self.nrows, self.ncols, triplets)
  }

  /// Returns `None` if matrix is not diagonal.
  pub fn try_into_diagonal(self) -> Option<Vector> {
    let mut diagonal = Vector::zeros(self.nrows.max(self.ncols));
    for (r, c, v) in self.triplets {
      if r == c {
        diagonal[r] += v;
      } else {
        return None;
      }
    }
    Some(diagonal)
  }

  pub fn to_nalgebra_coo(&self) -> nas::CooMatrix<f64> {
    let mut coo = nas::CooMatrix::new(self.nrows, self.ncols);
    for &(r, c, v) in &self.triplets {
      coo.push(r, c, v);
    }
    coo
  }

  pub fn to_nalgebra_csr(&self) -> CsrMatrix {
    (&self.to_nalgebra_coo()).into()
  }

  pub fn to_nalgebra_csc(&self) -> CscMatrix {
    (&self.to_nalgebra_coo()).into()
  }

  pub fn to_nalgebra_dense(&self) -> na::DMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }
}

impl From<&SparseMatrix> for CsrMatrix {
  fn from(value: &SparseMatrix) -> Self {
    value.to_nalgebra_csr()
  }
}
impl From<&SparseMatrix> for CscMatrix {
  fn from(value: &SparseMatrix) -> Self {
    value.to_nalgebra_csc()
  }
}

#[cfg(test)]
mod test {
  use super::SparseMatrix;

  #[test]
  fn duplicates_are_summed() {
    let mut mat = SparseMatrix::zeros(2, 3);
    mat.push(0, 1, 1.0);
    mat.push(0, 1, 2.0);
    mat.push(1, 2, 0.0);
    mat.push(1, 0, -1.0);
    assert_eq!(mat.ntriplets(), 3);

    let dense = mat.to_nalgebra_dense();
    assert_eq!(dense[(0, 1)], 3.0);
    assert_eq!(dense[(1, 0)], -1.0);
    assert_eq!(dense[(1, 2)], 0.0);

    let dense_t = mat.transpose().to_nalgebra_dense();
    assert_eq!(dense_t, dense.transpose());
  }

  #[test]
  fn diagonal_scaling() {
    let mut mat = SparseMatrix::zeros(2, 2);
    mat.push(0, 0, 1.0);
    mat.push(0, 1, 2.0);
    mat.push(1, 1, 3.0);
    let diag = na::dvector![2.0, -1.0];

    let left = mat.mul_left_by_diagonal(&diag).to_nalgebra_dense();
    assert_eq!(left, na::dmatrix![2.0, 4.0; 0.0, -3.0]);
    let right = mat.mul_right_by_diagonal(&diag).to_nalgebra_dense();
    assert_eq!(right, na::dmatrix![2.0, -2.0; 0.0, -3.0]);

    assert!(mat.clone().try_into_diagonal().is_none());
    let mut diagonal = SparseMatrix::from_diagonal(&diag);
    diagonal.shift_diagonal(1.0);
    assert_eq!(diagonal.try_into_diagonal(), Some(na::dvector![3.0, 0.0]));
  }
}
