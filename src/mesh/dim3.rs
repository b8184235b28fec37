use super::{SurfaceMesh, VertexIdx};
use crate::error::Result;

/// Indexed triangle list embedded in 3D.
///
/// This is the plain input format, [`SurfaceMesh`] is the
/// connectivity-aware representation built from it.
#[derive(Debug, Clone)]
pub struct TriangleSurface3D {
  triangles: Vec<[VertexIdx; 3]>,
  node_coords: na::Matrix3xX<f64>,
}
impl TriangleSurface3D {
  pub fn new(triangles: Vec<[VertexIdx; 3]>, node_coords: na::Matrix3xX<f64>) -> Self {
    Self {
      triangles,
      node_coords,
    }
  }
  pub fn triangles(&self) -> &[[VertexIdx; 3]] {
    &self.triangles
  }
  pub fn node_coords(&self) -> &na::Matrix3xX<f64> {
    &self.node_coords
  }
  pub fn nvertices(&self) -> usize {
    self.node_coords.ncols()
  }

  pub fn into_surface_mesh(self) -> Result<SurfaceMesh> {
    let coords = self
      .node_coords
      .column_iter()
      .map(|c| c.into_owned())
      .collect();
    SurfaceMesh::new(self.triangles, coords)
  }

  pub fn from_surface_mesh(mesh: &SurfaceMesh) -> Self {
    let triangles = mesh.topology().triangles().to_vec();
    let node_coords = na::Matrix3xX::from_columns(mesh.coords());
    Self::new(triangles, node_coords)
  }
}
