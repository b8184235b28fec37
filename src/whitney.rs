//! Whitney interpolation of 1-forms into tangent vector fields.
//!
//! The lowest order Whitney form of the directed edge `(i, j)` is
//! $lambda_i dif lambda_j - lambda_j dif lambda_i$.
//! Identifying 1-forms with vectors through the embedding turns a 1-cochain
//! into a piecewise linear tangent field, constant along normals of each face.

use crate::{
  cochain::Cochain,
  mesh::{FaceIdx, SurfaceMesh},
};

/// Gradients of the three barycentric coordinate functions of a face.
pub fn barycentric_gradients(mesh: &SurfaceMesh, f: FaceIdx) -> [na::Vector3<f64>; 3] {
  let normal = mesh.face_normal(f);
  let double_area = 2.0 * mesh.face_area(f);
  let p = mesh.face_vertices(f).map(|v| *mesh.coord(v));
  [0, 1, 2].map(|k| normal.cross(&(p[(k + 2) % 3] - p[(k + 1) % 3])) / double_area)
}

/// Evaluates the Whitney interpolant of `omega` inside face `f`
/// at the point with barycentric coordinates `barys`.
pub fn whitney_interpolate(
  mesh: &SurfaceMesh,
  omega: &Cochain,
  f: FaceIdx,
  barys: [f64; 3],
) -> na::Vector3<f64> {
  assert_eq!(omega.dim(), 1);
  let difbarys = barycentric_gradients(mesh, f);
  mesh
    .face_halfedges(f)
    .into_iter()
    .enumerate()
    .map(|(k, h)| {
      let (i, j) = (k, (k + 1) % 3);
      omega.along(mesh, h) * (barys[i] * difbarys[j] - barys[j] * difbarys[i])
    })
    .sum()
}

/// One vector per face, sampled at the barycenter.
pub fn face_vectors(mesh: &SurfaceMesh, omega: &Cochain) -> Vec<na::Vector3<f64>> {
  let third = 1.0 / 3.0;
  (0..mesh.nfaces())
    .map(|f| whitney_interpolate(mesh, omega, f, [third; 3]))
    .collect()
}

/// Piecewise constant gradient of a 0-form, one vector per face.
pub fn face_gradients(mesh: &SurfaceMesh, phi: &Cochain) -> Vec<na::Vector3<f64>> {
  assert_eq!(phi.dim(), 0);
  (0..mesh.nfaces())
    .map(|f| {
      let difbarys = barycentric_gradients(mesh, f);
      mesh
        .face_vertices(f)
        .into_iter()
        .zip(difbarys)
        .map(|(v, difbary)| phi[v] * difbary)
        .sum()
    })
    .collect()
}

/// Integrates a piecewise constant face field along the edges.
///
/// The value of an edge is the average of the line integrals in its two faces.
pub fn integrate_face_vectors(mesh: &SurfaceMesh, vectors: &[na::Vector3<f64>]) -> Cochain {
  assert_eq!(vectors.len(), mesh.nfaces());
  Cochain::from_function(1, mesh, |e| {
    let h = mesh.edge_halfedge(e);
    let edge = mesh.vector(h);
    let f = mesh.face(h);
    let g = mesh.face(mesh.twin(h));
    0.5 * (vectors[f] + vectors[g]).dot(&edge)
  })
}

/// Gradient of `phi` plus the gradient of `psi` rotated by a quarter turn,
/// integrated into a 1-form. Curl-free plus divergence-free part in the smooth setting.
pub fn gradient_and_rotated_gradient(
  mesh: &SurfaceMesh,
  phi: &Cochain,
  psi: &Cochain,
) -> Cochain {
  let gradients = face_gradients(mesh, phi);
  let rotated: Vec<_> = face_gradients(mesh, psi)
    .into_iter()
    .enumerate()
    .map(|(f, grad)| mesh.face_normal(f).cross(&grad))
    .collect();
  let sum: Vec<_> = gradients
    .iter()
    .zip(&rotated)
    .map(|(a, b)| a + b)
    .collect();
  integrate_face_vectors(mesh, &sum)
}
