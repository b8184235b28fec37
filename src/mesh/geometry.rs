//! Metric quantities of the embedded surface.

use super::{EdgeIdx, FaceIdx, HalfEdgeIdx, SurfaceMesh, VertexIdx};

use std::f64::consts::TAU;

/// Orthonormal tangent frame of a face.
#[derive(Debug, Clone, Copy)]
pub struct FaceBasis {
  pub e1: na::Vector3<f64>,
  pub e2: na::Vector3<f64>,
  pub normal: na::Vector3<f64>,
}
impl FaceBasis {
  /// Angle of the tangent vector `u` measured from `e1` towards `e2`.
  pub fn angle_of(&self, u: &na::Vector3<f64>) -> f64 {
    u.dot(&self.e2).atan2(u.dot(&self.e1))
  }
  pub fn vector_at(&self, angle: f64) -> na::Vector3<f64> {
    angle.cos() * self.e1 + angle.sin() * self.e2
  }
}

impl SurfaceMesh {
  /// Vector from origin to head.
  pub fn vector(&self, h: HalfEdgeIdx) -> na::Vector3<f64> {
    self.coord(self.head(h)) - self.coord(self.origin(h))
  }
  pub fn length(&self, h: HalfEdgeIdx) -> f64 {
    self.vector(h).norm()
  }

  /// Cotangent of the angle opposite to the half-edge in its face.
  pub fn cotan(&self, h: HalfEdgeIdx) -> f64 {
    let c = self.coord(self.origin(self.prev(h)));
    let u = self.coord(self.origin(h)) - c;
    let v = self.coord(self.head(h)) - c;
    u.dot(&v) / u.cross(&v).norm()
  }

  /// Cotangent weight `(cot α + cot β) / 2` of an edge.
  pub fn edge_cotan_weight(&self, e: EdgeIdx) -> f64 {
    let h = self.edge_halfedge(e);
    0.5 * (self.cotan(h) + self.cotan(self.twin(h)))
  }

  /// Interior angle of the face at the origin of `h`.
  pub fn corner_angle(&self, h: HalfEdgeIdx) -> f64 {
    let u = self.vector(h);
    let v = -self.vector(self.prev(h));
    u.cross(&v).norm().atan2(u.dot(&v))
  }

  /// Discrete Gaussian curvature `2π - Σ angles`.
  pub fn angle_defect(&self, v: VertexIdx) -> f64 {
    TAU - self.outgoing(v).map(|h| self.corner_angle(h)).sum::<f64>()
  }
  pub fn angle_defects(&self) -> na::DVector<f64> {
    na::DVector::from_iterator(
      self.nvertices(),
      (0..self.nvertices()).map(|v| self.angle_defect(v)),
    )
  }

  fn face_area_normal(&self, f: FaceIdx) -> na::Vector3<f64> {
    let [a, b, c] = self.face_vertices(f).map(|v| self.coord(v));
    (b - a).cross(&(c - a))
  }
  pub fn face_area(&self, f: FaceIdx) -> f64 {
    0.5 * self.face_area_normal(f).norm()
  }
  pub fn face_normal(&self, f: FaceIdx) -> na::Vector3<f64> {
    self.face_area_normal(f).normalize()
  }
  pub fn face_barycenter(&self, f: FaceIdx) -> na::Vector3<f64> {
    let [a, b, c] = self.face_vertices(f).map(|v| self.coord(v));
    (a + b + c) / 3.0
  }
  pub fn face_basis(&self, f: FaceIdx) -> FaceBasis {
    let normal = self.face_normal(f);
    let e1 = self.vector(self.face_halfedges(f)[0]).normalize();
    let e2 = normal.cross(&e1);
    FaceBasis { e1, e2, normal }
  }
  pub fn total_area(&self) -> f64 {
    (0..self.nfaces()).map(|f| self.face_area(f)).sum()
  }

  /// Barycentric dual area, a third of every incident face.
  pub fn dual_area(&self, v: VertexIdx) -> f64 {
    self
      .outgoing(v)
      .map(|h| self.face_area(self.face(h)) / 3.0)
      .sum()
  }
}

#[cfg(test)]
mod test {
  use crate::mesh::gen::{mesh_sphere_surface, mesh_torus_surface};

  use approx::assert_relative_eq;
  use std::f64::consts::{PI, TAU};

  #[test]
  fn gauss_bonnet_holds_discretely() {
    let sphere = mesh_sphere_surface(2).into_surface_mesh().unwrap();
    assert_relative_eq!(sphere.angle_defects().sum(), 2.0 * TAU, epsilon = 1e-10);

    let torus = mesh_torus_surface(3.0, 1.0, 24, 12)
      .into_surface_mesh()
      .unwrap();
    assert_relative_eq!(torus.angle_defects().sum(), 0.0, epsilon = 1e-10);
  }

  #[test]
  fn dual_areas_partition_surface() {
    let sphere = mesh_sphere_surface(3).into_surface_mesh().unwrap();
    let dual_total: f64 = (0..sphere.nvertices()).map(|v| sphere.dual_area(v)).sum();
    assert_relative_eq!(dual_total, sphere.total_area(), epsilon = 1e-12);
    assert_relative_eq!(sphere.total_area(), 4.0 * PI, max_relative = 1e-2);
  }

  #[test]
  fn face_basis_is_orthonormal_and_tangent() {
    let sphere = mesh_sphere_surface(1).into_surface_mesh().unwrap();
    for f in 0..sphere.nfaces() {
      let basis = sphere.face_basis(f);
      assert_relative_eq!(basis.e1.norm(), 1.0, epsilon = 1e-12);
      assert_relative_eq!(basis.e2.norm(), 1.0, epsilon = 1e-12);
      assert_relative_eq!(basis.e1.dot(&basis.e2), 0.0, epsilon = 1e-12);
      assert_relative_eq!(basis.e1.dot(&basis.normal), 0.0, epsilon = 1e-12);
      // Counter-clockwise triangles have outward normals on the sphere.
      assert!(basis.normal.dot(&sphere.face_barycenter(f)) > 0.0);

      let angle = 0.7;
      assert_relative_eq!(
        basis.angle_of(&basis.vector_at(angle)),
        angle,
        epsilon = 1e-12
      );
    }
  }

  #[test]
  fn cotan_of_right_angle_vanishes() {
    let surface = crate::mesh::TriangleSurface3D::new(
      vec![[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]],
      na::Matrix3xX::from_columns(&[
        na::Vector3::new(0.0, 0.0, 0.0),
        na::Vector3::new(1.0, 0.0, 0.0),
        na::Vector3::new(0.0, 1.0, 0.0),
        na::Vector3::new(0.0, 0.0, 1.0),
      ]),
    );
    let mesh = surface.into_surface_mesh().unwrap();
    // Half-edge 1 runs 1 -> 2 and faces the right angle at vertex 0.
    assert_eq!(mesh.origin(1), 1);
    assert_eq!(mesh.head(1), 2);
    assert_relative_eq!(mesh.cotan(1), 0.0, epsilon = 1e-12);
    // Half-edge 0 runs 0 -> 1 and faces the 45 degree angle at vertex 2.
    assert_relative_eq!(mesh.cotan(0), 1.0, epsilon = 1e-12);
  }
}
