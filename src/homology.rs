//! Homology generators of a closed surface via tree–cotree decomposition.
//!
//! A primal spanning tree over the vertices and a dual spanning tree over
//! the faces avoiding the primal tree leave exactly `2g` edges untouched.
//! Each of them closes a non-contractible loop in the dual tree.

use crate::{
  error::{Error, Result},
  mesh::{EdgeIdx, FaceIdx, HalfEdgeIdx, SurfaceMesh, VertexIdx},
};

use itertools::Itertools;
use std::collections::VecDeque;

/// A closed dual loop, stored as the half-edges it crosses.
///
/// Half-edge `h` crosses from `face(h)` into `face(twin(h))`, which is the
/// face of the following half-edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generator {
  halfedges: Vec<HalfEdgeIdx>,
}
impl Generator {
  pub fn new(halfedges: Vec<HalfEdgeIdx>) -> Self {
    Self { halfedges }
  }
  pub fn halfedges(&self) -> &[HalfEdgeIdx] {
    &self.halfedges
  }
  pub fn len(&self) -> usize {
    self.halfedges.len()
  }
  pub fn is_empty(&self) -> bool {
    self.halfedges.is_empty()
  }
  pub fn edges<'a>(&'a self, mesh: &'a SurfaceMesh) -> impl Iterator<Item = EdgeIdx> + 'a {
    self.halfedges.iter().map(|&h| mesh.edge(h))
  }

  /// Checks that consecutive half-edges chain up into a closed dual loop.
  pub fn is_closed_dual_loop(&self, mesh: &SurfaceMesh) -> bool {
    !self.halfedges.is_empty()
      && self
        .halfedges
        .iter()
        .circular_tuple_windows()
        .all(|(&h, &hnext)| mesh.face(mesh.twin(h)) == mesh.face(hnext))
  }
}

/// Breadth first spanning tree over the vertices.
///
/// Returns per vertex the half-edge pointing to it from its parent.
fn primal_tree(mesh: &SurfaceMesh) -> Vec<Option<HalfEdgeIdx>> {
  let root: VertexIdx = 0;
  let mut parent = vec![None; mesh.nvertices()];
  let mut visited = vec![false; mesh.nvertices()];
  let mut queue = VecDeque::from([root]);
  visited[root] = true;
  while let Some(v) = queue.pop_front() {
    for h in mesh.outgoing(v) {
      let w = mesh.head(h);
      if !visited[w] {
        visited[w] = true;
        parent[w] = Some(h);
        queue.push_back(w);
      }
    }
  }
  parent
}

/// Breadth first spanning tree over the faces, never crossing a primal tree edge.
///
/// Returns per face a half-edge of that face whose twin lies in the parent face.
fn dual_tree(mesh: &SurfaceMesh, in_primal: &[bool]) -> Vec<Option<HalfEdgeIdx>> {
  let root: FaceIdx = 0;
  let mut parent = vec![None; mesh.nfaces()];
  let mut visited = vec![false; mesh.nfaces()];
  let mut queue = VecDeque::from([root]);
  visited[root] = true;
  while let Some(f) = queue.pop_front() {
    for h in mesh.face_halfedges(f) {
      if in_primal[mesh.edge(h)] {
        continue;
      }
      let twin = mesh.twin(h);
      let g = mesh.face(twin);
      if !visited[g] {
        visited[g] = true;
        parent[g] = Some(twin);
        queue.push_back(g);
      }
    }
  }
  parent
}

/// Dual tree path from `f` up to the root, as half-edges crossing from child to parent.
fn path_to_root(
  mesh: &SurfaceMesh,
  dual_parent: &[Option<HalfEdgeIdx>],
  f: FaceIdx,
) -> Vec<HalfEdgeIdx> {
  let mut path = Vec::new();
  let mut current = f;
  while let Some(h) = dual_parent[current] {
    path.push(h);
    current = mesh.face(mesh.twin(h));
  }
  path
}

/// Extracts `2g` independent non-contractible dual loops.
///
/// The spanning trees only cover a single component, so disconnected
/// meshes are rejected.
pub fn build_generators(mesh: &SurfaceMesh) -> Result<Vec<Generator>> {
  if !mesh.is_connected() {
    return Err(Error::Disconnected {
      ncomponents: mesh.ncomponents(),
    });
  }

  let primal_parent = primal_tree(mesh);
  let mut in_primal = vec![false; mesh.nedges()];
  for h in primal_parent.iter().flatten() {
    in_primal[mesh.edge(*h)] = true;
  }

  let dual_parent = dual_tree(mesh, &in_primal);
  let mut in_dual = vec![false; mesh.nedges()];
  for h in dual_parent.iter().flatten() {
    in_dual[mesh.edge(*h)] = true;
  }

  let mut generators = Vec::new();
  for e in 0..mesh.nedges() {
    if in_primal[e] || in_dual[e] {
      continue;
    }
    let h = mesh.edge_halfedge(e);
    let mut up_f = path_to_root(mesh, &dual_parent, mesh.face(h));
    let mut up_g = path_to_root(mesh, &dual_parent, mesh.face(mesh.twin(h)));

    // Both paths end in the root, strip the shared part above the common ancestor.
    while let (Some(a), Some(b)) = (up_f.last(), up_g.last()) {
      if a != b {
        break;
      }
      up_f.pop();
      up_g.pop();
    }

    // Down from the common ancestor to `face(h)`, across `h`, back up.
    let halfedges = up_f
      .iter()
      .rev()
      .map(|&p| mesh.twin(p))
      .chain(std::iter::once(h))
      .chain(up_g)
      .collect();
    generators.push(Generator::new(halfedges));
  }

  debug_assert_eq!(generators.len() as i64, 2 - mesh.euler_characteristic());
  tracing::info!("found {} homology generators", generators.len());
  Ok(generators)
}
