//! Discrete exterior calculus operators on a closed triangle surface.
//!
//! All operators are assembled into a triplet [`SparseMatrix`] and converted
//! by the caller into whatever compressed format its solve needs.

use crate::{
  error::{Error, Result},
  linalg::Vector,
  mesh::{FaceIdx, SurfaceMesh},
  sparse::SparseMatrix,
};

pub type ElMat = na::SMatrix<f64, 3, 3>;

/// Element matrix of the cotangent Laplacian on a single triangle.
///
/// Local indices follow the corners of the face. The entry coupling the
/// endpoints of a half-edge is `-cot / 2` of the angle facing it.
pub fn cotan_laplace_elmat(mesh: &SurfaceMesh, f: FaceIdx) -> ElMat {
  let mut elmat = ElMat::zeros();
  for (k, h) in mesh.face_halfedges(f).into_iter().enumerate() {
    let (i, j) = (k, (k + 1) % 3);
    let w = 0.5 * mesh.cotan(h);
    elmat[(i, i)] += w;
    elmat[(j, j)] += w;
    elmat[(i, j)] -= w;
    elmat[(j, i)] -= w;
  }
  elmat
}

/// Assembles a vertex-based Galerkin matrix from per-face element matrices.
pub fn assemble_vertex_galmat<F>(mesh: &SurfaceMesh, elmat: F) -> SparseMatrix
where
  F: Fn(&SurfaceMesh, FaceIdx) -> ElMat,
{
  let nvertices = mesh.nvertices();
  let mut galmat = SparseMatrix::zeros(nvertices, nvertices);
  for f in 0..mesh.nfaces() {
    let elmat = elmat(mesh, f);
    let vertices = mesh.face_vertices(f);
    for (ilocal, &iglobal) in vertices.iter().enumerate() {
      for (jlocal, &jglobal) in vertices.iter().enumerate() {
        galmat.push(iglobal, jglobal, elmat[(ilocal, jlocal)]);
      }
    }
  }
  galmat
}

/// Cotangent Laplacian `d0ᵗ h1 d0`, shifted by `regularization` on the diagonal.
///
/// Positive semi-definite, the shift makes it definite.
pub fn cotan_laplace(mesh: &SurfaceMesh, regularization: f64) -> SparseMatrix {
  let mut laplace = assemble_vertex_galmat(mesh, cotan_laplace_elmat);
  laplace.shift_diagonal(regularization);
  laplace
}

pub fn dual_areas(mesh: &SurfaceMesh) -> Vector {
  Vector::from_iterator(
    mesh.nvertices(),
    (0..mesh.nvertices()).map(|v| mesh.dual_area(v)),
  )
}

/// Lumped vertex mass, the barycentric dual area.
pub fn mass(mesh: &SurfaceMesh) -> SparseMatrix {
  SparseMatrix::from_diagonal(&dual_areas(mesh))
}

pub fn inverse_mass(mesh: &SurfaceMesh) -> SparseMatrix {
  SparseMatrix::from_diagonal(&dual_areas(mesh).map(f64::recip))
}

/// Vertex-to-edge incidence, `+1` at the head and `-1` at the tail of the
/// canonical half-edge.
pub fn exterior_derivative_0(mesh: &SurfaceMesh) -> SparseMatrix {
  let mut d0 = SparseMatrix::zeros(mesh.nedges(), mesh.nvertices());
  for e in 0..mesh.nedges() {
    let h = mesh.edge_halfedge(e);
    d0.push(e, mesh.head(h), 1.0);
    d0.push(e, mesh.origin(h), -1.0);
  }
  d0
}

/// Edge-to-face incidence, signed by the direction of each face half-edge.
pub fn exterior_derivative_1(mesh: &SurfaceMesh) -> SparseMatrix {
  let mut d1 = SparseMatrix::zeros(mesh.nfaces(), mesh.nedges());
  for f in 0..mesh.nfaces() {
    for h in mesh.face_halfedges(f) {
      d1.push(f, mesh.edge(h), mesh.edge_sign(h).as_f64());
    }
  }
  d1
}

pub fn hodge_star_1_diagonal(mesh: &SurfaceMesh) -> Vector {
  Vector::from_iterator(
    mesh.nedges(),
    (0..mesh.nedges()).map(|e| mesh.edge_cotan_weight(e)),
  )
}

/// Diagonal 1-form Hodge star, the cotangent weight of every edge.
pub fn hodge_star_1(mesh: &SurfaceMesh) -> SparseMatrix {
  SparseMatrix::from_diagonal(&hodge_star_1_diagonal(mesh))
}

/// Fails if any cotangent weight vanishes.
pub fn inverse_hodge_star_1(mesh: &SurfaceMesh) -> Result<SparseMatrix> {
  let diagonal = hodge_star_1_diagonal(mesh);
  let mut inverse = Vector::zeros(diagonal.len());
  for (edge, &w) in diagonal.iter().enumerate() {
    let w_inv = w.recip();
    if !w_inv.is_finite() {
      return Err(Error::DegenerateHodgeStar { edge });
    }
    inverse[edge] = w_inv;
  }
  Ok(SparseMatrix::from_diagonal(&inverse))
}
