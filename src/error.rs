use crate::mesh::{EdgeIdx, FaceIdx, VertexIdx};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error(
    "singularity indices sum to {sum}, but the Euler characteristic of the mesh is {euler_characteristic}"
  )]
  GaussBonnet { sum: f64, euler_characteristic: i64 },
  #[error("expected one singularity index per vertex ({expected}), found {found}")]
  SingularityLength { expected: usize, found: usize },

  #[error("sparse Cholesky factorization failed, the matrix is not symmetric positive definite")]
  Cholesky,
  #[error("LU factorization failed, the matrix is singular")]
  Lu,
  #[error("matrix is not diagonal")]
  NotDiagonal,
  #[error("eigensolver did not produce a finite eigenpair")]
  Eigen,

  #[error("edge {edge} has a vanishing cotangent weight, the 1-form Hodge star is not invertible")]
  DegenerateHodgeStar { edge: EdgeIdx },
  #[error("{count} faces are not reachable from the root face")]
  UnreachedFaces { count: usize },

  #[error("triangle {0} references the same vertex twice")]
  DegenerateTriangle(FaceIdx),
  #[error("triangle {face} references vertex {vertex}, but there are only {nvertices} vertices")]
  VertexOutOfRange {
    face: FaceIdx,
    vertex: VertexIdx,
    nvertices: usize,
  },
  #[error("edge ({0}, {1}) lies on the boundary, only closed surfaces are supported")]
  BoundaryEdge(VertexIdx, VertexIdx),
  #[error("edge ({0}, {1}) is shared by more than two triangles")]
  NonManifoldEdge(VertexIdx, VertexIdx),
  #[error("triangles adjacent to edge ({0}, {1}) are inconsistently oriented")]
  InconsistentOrientation(VertexIdx, VertexIdx),
  #[error("vertex {0} is not incident to any triangle")]
  IsolatedVertex(VertexIdx),
  #[error("the triangles around vertex {0} do not form a single fan")]
  NonManifoldVertex(VertexIdx),
  #[error("the mesh consists of {ncomponents} disconnected components")]
  Disconnected { ncomponents: usize },
}
