//! Half-edge connectivity of a closed triangle surface.
//!
//! Half-edges are stored implicitly per face: half-edge `3f + k` runs
//! from corner `k` to corner `k + 1` of triangle `f`. Every undirected edge
//! owns exactly two half-edges, the first one encountered is its canonical
//! direction.

use super::{EdgeIdx, FaceIdx, HalfEdgeIdx, VertexIdx};
use crate::{
  error::{Error, Result},
  sign::Sign,
};

use indexmap::IndexMap;
use itertools::Itertools;

#[derive(Debug, Clone)]
pub struct Topology {
  triangles: Vec<[VertexIdx; 3]>,
  nvertices: usize,
  /// A mapping [`HalfEdgeIdx`] -> [`HalfEdgeIdx`].
  twins: Vec<HalfEdgeIdx>,
  /// A mapping [`HalfEdgeIdx`] -> [`EdgeIdx`].
  edges: Vec<EdgeIdx>,
  /// A mapping [`EdgeIdx`] -> canonical [`HalfEdgeIdx`].
  edge_halfedges: Vec<HalfEdgeIdx>,
  /// One outgoing half-edge per vertex.
  vertex_halfedges: Vec<HalfEdgeIdx>,
  /// Number of edge-connected components.
  ncomponents: usize,
}

impl Topology {
  pub fn new(triangles: Vec<[VertexIdx; 3]>, nvertices: usize) -> Result<Self> {
    for (f, tri) in triangles.iter().enumerate() {
      if let Some(&vertex) = tri.iter().find(|&&v| v >= nvertices) {
        return Err(Error::VertexOutOfRange {
          face: f,
          vertex,
          nvertices,
        });
      }
      if !tri.iter().all_unique() {
        return Err(Error::DegenerateTriangle(f));
      }
    }

    let nhalfedges = 3 * triangles.len();
    let halfedge_vertices = |h: HalfEdgeIdx| {
      let tri = &triangles[h / 3];
      [tri[h % 3], tri[(h + 1) % 3]]
    };

    let mut edge_map: IndexMap<[VertexIdx; 2], Vec<HalfEdgeIdx>> = IndexMap::new();
    for h in 0..nhalfedges {
      let mut key = halfedge_vertices(h);
      key.sort_unstable();
      edge_map.entry(key).or_default().push(h);
    }

    let mut twins = vec![0; nhalfedges];
    let mut edges = vec![0; nhalfedges];
    let mut edge_halfedges = Vec::with_capacity(edge_map.len());
    for (e, (&[a, b], hs)) in edge_map.iter().enumerate() {
      let &[h0, h1] = hs.as_slice() else {
        return Err(match hs.len() {
          1 => Error::BoundaryEdge(a, b),
          _ => Error::NonManifoldEdge(a, b),
        });
      };
      if halfedge_vertices(h0)[0] == halfedge_vertices(h1)[0] {
        return Err(Error::InconsistentOrientation(a, b));
      }
      twins[h0] = h1;
      twins[h1] = h0;
      edges[h0] = e;
      edges[h1] = e;
      edge_halfedges.push(h0);
    }

    let mut vertex_halfedges = vec![None; nvertices];
    let mut vertex_degrees = vec![0usize; nvertices];
    for h in 0..nhalfedges {
      let v = halfedge_vertices(h)[0];
      vertex_halfedges[v].get_or_insert(h);
      vertex_degrees[v] += 1;
    }
    let vertex_halfedges = vertex_halfedges
      .into_iter()
      .enumerate()
      .map(|(v, h)| h.ok_or(Error::IsolatedVertex(v)))
      .collect::<Result<Vec<_>>>()?;

    let ncomponents = count_components(&twins);
    let topology = Self {
      triangles,
      nvertices,
      twins,
      edges,
      edge_halfedges,
      vertex_halfedges,
      ncomponents,
    };

    // A single fan around each vertex must visit every incident face.
    for (v, &degree) in vertex_degrees.iter().enumerate() {
      if topology.outgoing(v).count() != degree {
        return Err(Error::NonManifoldVertex(v));
      }
    }

    Ok(topology)
  }

  pub fn triangles(&self) -> &[[VertexIdx; 3]] {
    &self.triangles
  }
  pub fn nvertices(&self) -> usize {
    self.nvertices
  }
  pub fn nedges(&self) -> usize {
    self.edge_halfedges.len()
  }
  pub fn nfaces(&self) -> usize {
    self.triangles.len()
  }
  pub fn nhalfedges(&self) -> usize {
    self.twins.len()
  }
  pub fn euler_characteristic(&self) -> i64 {
    self.nvertices() as i64 - self.nedges() as i64 + self.nfaces() as i64
  }
  pub fn ncomponents(&self) -> usize {
    self.ncomponents
  }
  pub fn is_connected(&self) -> bool {
    self.ncomponents == 1
  }

  pub fn origin(&self, h: HalfEdgeIdx) -> VertexIdx {
    self.triangles[h / 3][h % 3]
  }
  pub fn head(&self, h: HalfEdgeIdx) -> VertexIdx {
    self.origin(self.next(h))
  }
  pub fn next(&self, h: HalfEdgeIdx) -> HalfEdgeIdx {
    3 * (h / 3) + (h + 1) % 3
  }
  pub fn prev(&self, h: HalfEdgeIdx) -> HalfEdgeIdx {
    self.next(self.next(h))
  }
  pub fn twin(&self, h: HalfEdgeIdx) -> HalfEdgeIdx {
    self.twins[h]
  }
  pub fn face(&self, h: HalfEdgeIdx) -> FaceIdx {
    h / 3
  }
  pub fn edge(&self, h: HalfEdgeIdx) -> EdgeIdx {
    self.edges[h]
  }
  pub fn edge_halfedge(&self, e: EdgeIdx) -> HalfEdgeIdx {
    self.edge_halfedges[e]
  }
  pub fn edge_sign(&self, h: HalfEdgeIdx) -> Sign {
    Sign::from_bool(self.edge_halfedges[self.edges[h]] == h)
  }
  /// Vertices of the edge in canonical direction.
  pub fn edge_vertices(&self, e: EdgeIdx) -> [VertexIdx; 2] {
    let h = self.edge_halfedge(e);
    [self.origin(h), self.head(h)]
  }

  pub fn face_halfedges(&self, f: FaceIdx) -> [HalfEdgeIdx; 3] {
    [3 * f, 3 * f + 1, 3 * f + 2]
  }
  pub fn face_vertices(&self, f: FaceIdx) -> [VertexIdx; 3] {
    self.triangles[f]
  }

  /// Half-edges leaving `v`, one per incident face, in fan order.
  pub fn outgoing(&self, v: VertexIdx) -> impl Iterator<Item = HalfEdgeIdx> + '_ {
    let start = self.vertex_halfedges[v];
    let mut current = Some(start);
    std::iter::from_fn(move || {
      let h = current?;
      let next = self.next(self.twin(h));
      current = (next != start).then_some(next);
      Some(h)
    })
  }
}

/// Flood fills the faces across twin half-edges.
fn count_components(twins: &[HalfEdgeIdx]) -> usize {
  let nfaces = twins.len() / 3;
  let mut visited = vec![false; nfaces];
  let mut ncomponents = 0;
  for root in 0..nfaces {
    if visited[root] {
      continue;
    }
    ncomponents += 1;
    visited[root] = true;
    let mut stack = vec![root];
    while let Some(f) = stack.pop() {
      for h in 3 * f..3 * f + 3 {
        let g = twins[h] / 3;
        if !visited[g] {
          visited[g] = true;
          stack.push(g);
        }
      }
    }
  }
  ncomponents
}
