//! Closed, oriented triangle surfaces.
//!
//! A [`SurfaceMesh`] is a container of mesh entities (vertices, half-edges,
//! edges, faces). It provides a global numbering for them, the incidence
//! relations through the half-edge [`Topology`] and the embedding in 3D.
//! The mesh is read-only after construction.

pub mod dim3;
pub mod gen;
pub mod geometry;
pub mod topology;

pub use dim3::TriangleSurface3D;
pub use topology::Topology;

use crate::{error::Result, sign::Sign};

pub type VertexIdx = usize;
pub type HalfEdgeIdx = usize;
pub type EdgeIdx = usize;
pub type FaceIdx = usize;

#[derive(Debug, Clone)]
pub struct SurfaceMesh {
  topology: Topology,
  coords: Vec<na::Vector3<f64>>,
}

impl SurfaceMesh {
  /// Builds the half-edge structure of the triangles.
  ///
  /// Triangles must be consistently oriented and form a closed
  /// 2-manifold without boundary.
  pub fn new(triangles: Vec<[VertexIdx; 3]>, coords: Vec<na::Vector3<f64>>) -> Result<Self> {
    let topology = Topology::new(triangles, coords.len())?;
    tracing::debug!(
      "built surface mesh with {} vertices, {} edges, {} faces",
      topology.nvertices(),
      topology.nedges(),
      topology.nfaces()
    );
    Ok(Self { topology, coords })
  }

  /// Same connectivity, different embedding.
  pub fn with_coords(&self, coords: Vec<na::Vector3<f64>>) -> Self {
    assert_eq!(coords.len(), self.nvertices());
    Self {
      topology: self.topology.clone(),
      coords,
    }
  }

  pub fn topology(&self) -> &Topology {
    &self.topology
  }
  pub fn coords(&self) -> &[na::Vector3<f64>] {
    &self.coords
  }
  pub fn coord(&self, v: VertexIdx) -> &na::Vector3<f64> {
    &self.coords[v]
  }

  pub fn nvertices(&self) -> usize {
    self.topology.nvertices()
  }
  pub fn nedges(&self) -> usize {
    self.topology.nedges()
  }
  pub fn nfaces(&self) -> usize {
    self.topology.nfaces()
  }
  pub fn nhalfedges(&self) -> usize {
    self.topology.nhalfedges()
  }
  pub fn euler_characteristic(&self) -> i64 {
    self.topology.euler_characteristic()
  }
  pub fn ncomponents(&self) -> usize {
    self.topology.ncomponents()
  }
  pub fn is_connected(&self) -> bool {
    self.topology.is_connected()
  }
  /// Number of handles of the closed surface.
  ///
  /// Only defined for connected meshes.
  pub fn genus(&self) -> Option<usize> {
    let chi = self.euler_characteristic();
    (self.is_connected() && chi <= 2).then(|| ((2 - chi) / 2) as usize)
  }

  pub fn origin(&self, h: HalfEdgeIdx) -> VertexIdx {
    self.topology.origin(h)
  }
  pub fn head(&self, h: HalfEdgeIdx) -> VertexIdx {
    self.topology.head(h)
  }
  pub fn next(&self, h: HalfEdgeIdx) -> HalfEdgeIdx {
    self.topology.next(h)
  }
  pub fn prev(&self, h: HalfEdgeIdx) -> HalfEdgeIdx {
    self.topology.prev(h)
  }
  pub fn twin(&self, h: HalfEdgeIdx) -> HalfEdgeIdx {
    self.topology.twin(h)
  }
  pub fn face(&self, h: HalfEdgeIdx) -> FaceIdx {
    self.topology.face(h)
  }
  pub fn edge(&self, h: HalfEdgeIdx) -> EdgeIdx {
    self.topology.edge(h)
  }
  /// Orientation of the half-edge relative to the canonical direction of its edge.
  pub fn edge_sign(&self, h: HalfEdgeIdx) -> Sign {
    self.topology.edge_sign(h)
  }
  pub fn edge_halfedge(&self, e: EdgeIdx) -> HalfEdgeIdx {
    self.topology.edge_halfedge(e)
  }
  pub fn face_halfedges(&self, f: FaceIdx) -> [HalfEdgeIdx; 3] {
    self.topology.face_halfedges(f)
  }
  pub fn face_vertices(&self, f: FaceIdx) -> [VertexIdx; 3] {
    self.topology.face_vertices(f)
  }
  pub fn outgoing(&self, v: VertexIdx) -> impl Iterator<Item = HalfEdgeIdx> + '_ {
    self.topology.outgoing(v)
  }
}
