//! Discrete differential forms on a [`SurfaceMesh`].
//!
//! A `k`-cochain stores one coefficient per `k`-dimensional mesh entity.
//! 1-cochain coefficients are relative to the canonical direction of each edge.

use crate::{
  linalg::{CsrMatrix, Vector},
  mesh::{HalfEdgeIdx, SurfaceMesh},
  operators, Dim,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Cochain {
  pub coeffs: Vector,
  pub dim: Dim,
}
impl Cochain {
  pub fn new(dim: Dim, coeffs: Vector) -> Self {
    assert!(dim <= 2, "surfaces only carry 0-, 1- and 2-forms");
    Self { dim, coeffs }
  }
  pub fn constant(value: f64, dim: Dim, mesh: &SurfaceMesh) -> Self {
    Self::new(dim, Vector::from_element(nentities(dim, mesh), value))
  }
  pub fn zero(dim: Dim, mesh: &SurfaceMesh) -> Self {
    Self::constant(0.0, dim, mesh)
  }
  pub fn from_function<F>(dim: Dim, mesh: &SurfaceMesh, f: F) -> Self
  where
    F: FnMut(usize) -> f64,
  {
    let n = nentities(dim, mesh);
    Self::new(dim, Vector::from_iterator(n, (0..n).map(f)))
  }

  pub fn dim(&self) -> Dim {
    self.dim
  }
  pub fn coeffs(&self) -> &Vector {
    &self.coeffs
  }
  pub fn into_coeffs(self) -> Vector {
    self.coeffs
  }
  pub fn len(&self) -> usize {
    self.coeffs.len()
  }
  pub fn is_empty(&self) -> bool {
    self.coeffs().len() == 0
  }

  /// Value of a 1-form along a half-edge, i.e. signed by its direction.
  pub fn along(&self, mesh: &SurfaceMesh, h: HalfEdgeIdx) -> f64 {
    assert_eq!(self.dim, 1);
    mesh.edge_sign(h) * self.coeffs[mesh.edge(h)]
  }

  /// Exterior derivative.
  pub fn dif(&self, mesh: &SurfaceMesh) -> Self {
    let dif_operator = match self.dim {
      0 => CsrMatrix::from(&operators::exterior_derivative_0(mesh)),
      1 => CsrMatrix::from(&operators::exterior_derivative_1(mesh)),
      _ => panic!("no exterior derivative of top-dimensional forms"),
    };
    Cochain::new(self.dim + 1, &dif_operator * self.coeffs())
  }

  /// Scale this cochain by a factor, modifying it in-place
  pub fn scale(&mut self, factor: f64) -> &mut Self {
    self.coeffs *= factor;
    self
  }

  /// Create a new cochain by scaling this one.
  pub fn scaled(&self, factor: f64) -> Self {
    Self::new(self.dim, &self.coeffs * factor)
  }

  pub fn component_mul(&self, other: &Self) -> Self {
    assert_eq!(self.dim, other.dim);
    Self::new(self.dim, self.coeffs.component_mul(&other.coeffs))
  }

  pub fn norm(&self) -> f64 {
    self.coeffs.norm()
  }
}

fn nentities(dim: Dim, mesh: &SurfaceMesh) -> usize {
  match dim {
    0 => mesh.nvertices(),
    1 => mesh.nedges(),
    2 => mesh.nfaces(),
    _ => panic!("surfaces only carry 0-, 1- and 2-forms"),
  }
}

impl std::ops::Index<usize> for Cochain {
  type Output = f64;
  fn index(&self, idx: usize) -> &Self::Output {
    &self.coeffs[idx]
  }
}
impl std::ops::IndexMut<usize> for Cochain {
  fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
    &mut self.coeffs[idx]
  }
}

impl std::ops::Mul<f64> for Cochain {
  type Output = Cochain;
  fn mul(self, rhs: f64) -> Self::Output {
    self.scaled(rhs)
  }
}
impl std::ops::MulAssign<f64> for Cochain {
  fn mul_assign(&mut self, rhs: f64) {
    self.scale(rhs);
  }
}
impl std::ops::AddAssign<&Cochain> for Cochain {
  fn add_assign(&mut self, rhs: &Cochain) {
    assert_eq!(self.dim, rhs.dim);
    self.coeffs += &rhs.coeffs;
  }
}
impl std::ops::Add<&Cochain> for Cochain {
  type Output = Self;
  fn add(mut self, rhs: &Cochain) -> Self::Output {
    self += rhs;
    self
  }
}
impl std::ops::SubAssign<&Cochain> for Cochain {
  fn sub_assign(&mut self, rhs: &Cochain) {
    assert_eq!(self.dim, rhs.dim);
    self.coeffs -= &rhs.coeffs;
  }
}
impl std::ops::Sub<&Cochain> for Cochain {
  type Output = Self;
  fn sub(mut self, rhs: &Cochain) -> Self::Output {
    self -= rhs;
    self
  }
}
impl std::ops::Neg for Cochain {
  type Output = Self;
  fn neg(self) -> Self::Output {
    Self::new(self.dim, -self.coeffs)
  }
}

#[cfg(test)]
mod test {
  use super::Cochain;
  use crate::mesh::gen::mesh_sphere_surface;

  use approx::assert_relative_eq;

  #[test]
  fn dif_of_dif_vanishes() {
    let mesh = mesh_sphere_surface(2).into_surface_mesh().unwrap();
    let f = Cochain::from_function(0, &mesh, |v| {
      let p = mesh.coord(v);
      p.x * p.y + p.z.powi(3)
    });
    let df = f.dif(&mesh);
    assert_eq!(df.dim(), 1);
    assert_eq!(df.len(), mesh.nedges());

    let ddf = df.dif(&mesh);
    assert_eq!(ddf.dim(), 2);
    assert_relative_eq!(ddf.norm(), 0.0, epsilon = 1e-12);
  }

  #[test]
  fn along_flips_with_direction() {
    let mesh = mesh_sphere_surface(0).into_surface_mesh().unwrap();
    let f = Cochain::from_function(0, &mesh, |v| v as f64);
    let df = f.dif(&mesh);
    for h in 0..mesh.nhalfedges() {
      let expected = (mesh.head(h) as f64) - (mesh.origin(h) as f64);
      assert_relative_eq!(df.along(&mesh, h), expected);
      assert_relative_eq!(df.along(&mesh, mesh.twin(h)), -expected);
    }
  }

  #[test]
  fn arithmetic() {
    let mesh = mesh_sphere_surface(0).into_surface_mesh().unwrap();
    let a = Cochain::constant(2.0, 1, &mesh);
    let b = Cochain::constant(0.5, 1, &mesh);
    let c = (a.clone() - &b) * 2.0 + &b;
    assert!(c.coeffs().iter().all(|&x| x == 3.5));
    assert_eq!(-a.clone() + &a, Cochain::zero(1, &mesh));
  }
}
