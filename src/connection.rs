//! Trivial connections with prescribed singularities.
//!
//! A connection is a 1-form `φ` of extra rotation applied on top of
//! Levi-Civita transport when a tangent direction crosses an edge.
//! It is trivial if the resulting holonomy vanishes around every vertex
//! except for the prescribed `2π · index`, and around every homology
//! generator. Integrating it over a spanning tree of the faces then gives
//! a globally consistent face vector field.

use crate::{
  cochain::Cochain,
  config::SolverConfig,
  error::{Error, Result},
  hodge::HodgeDecomposition,
  homology::{self, Generator},
  linalg::{regularize, CsrMatrix, FaerCholesky, Matrix, Vector},
  mesh::{FaceIdx, HalfEdgeIdx, SurfaceMesh},
  sparse::SparseMatrix,
};

use std::{
  collections::VecDeque,
  f64::consts::{PI, TAU},
};

/// Wraps an angle into `[-π, π)`.
pub fn wrap_angle(angle: f64) -> f64 {
  (angle + PI).rem_euclid(TAU) - PI
}

/// Levi-Civita transport of a direction across `h`.
///
/// Takes an angle in the frame of `face(h)` and returns the angle of the same
/// direction, unfolded over the shared edge, in the frame of `face(twin(h))`.
pub fn transport_no_rotation(mesh: &SurfaceMesh, h: HalfEdgeIdx, angle: f64) -> f64 {
  let u = mesh.vector(h);
  let from = mesh.face_basis(mesh.face(h)).angle_of(&u);
  let to = mesh.face_basis(mesh.face(mesh.twin(h))).angle_of(&u);
  angle - from + to
}

/// One tangent direction per face.
#[derive(Debug, Clone)]
pub struct FaceField {
  /// Angle relative to the face basis `(e1, e2)`.
  pub angles: Vec<f64>,
  /// Unit tangent vectors `cos α e1 + sin α e2`.
  pub vectors: Vec<na::Vector3<f64>>,
}

/// Solver for trivial connections on one mesh.
pub struct TrivialConnection<'m> {
  mesh: &'m SurfaceMesh,
  config: SolverConfig,
  generators: Vec<Generator>,
  /// Dual harmonic basis `star_1 γ_i`, one per generator.
  bases: Vec<Cochain>,
  period_matrix: Option<na::LU<f64, na::Dyn, na::Dyn>>,
  angle_defects: Vector,
  cycle_matrix: CsrMatrix,
  cycle_matrix_t: CsrMatrix,
  cycle_system: FaerCholesky,
}

impl<'m> TrivialConnection<'m> {
  pub fn new(mesh: &'m SurfaceMesh, config: &SolverConfig) -> Result<Self> {
    let generators = homology::build_generators(mesh)?;
    let hodge = HodgeDecomposition::new(mesh, config)?;

    let bases: Vec<_> = generators
      .iter()
      .map(|g| {
        let gamma = hodge.compute_harmonic_basis(g);
        Cochain::new(1, hodge.hodge_star_1() * gamma.coeffs())
      })
      .collect();

    let period_matrix = if generators.is_empty() {
      None
    } else {
      let period = Matrix::from_fn(generators.len(), generators.len(), |i, j| {
        generators[i]
          .halfedges()
          .iter()
          .map(|&h| bases[j].along(mesh, h))
          .sum()
      });
      let lu = period.lu();
      if !lu.is_invertible() {
        return Err(Error::Lu);
      }
      Some(lu)
    };

    let cycle_matrix = CsrMatrix::from(&build_cycle_matrix(mesh, &generators));
    let cycle_matrix_t = cycle_matrix.transpose();
    let normal = regularize(&(&cycle_matrix_t * &cycle_matrix), config.regularization);
    let cycle_system = FaerCholesky::new((&normal).into())?;

    tracing::info!(
      "trivial connection solver ready: {} vertices, {} generators",
      mesh.nvertices(),
      generators.len()
    );

    Ok(Self {
      mesh,
      config: *config,
      generators,
      bases,
      period_matrix,
      angle_defects: mesh.angle_defects(),
      cycle_matrix,
      cycle_matrix_t,
      cycle_system,
    })
  }

  pub fn mesh(&self) -> &'m SurfaceMesh {
    self.mesh
  }
  pub fn generators(&self) -> &[Generator] {
    &self.generators
  }
  pub fn cycle_matrix(&self) -> &CsrMatrix {
    &self.cycle_matrix
  }
  pub fn harmonic_bases(&self) -> &[Cochain] {
    &self.bases
  }

  /// Levi-Civita holonomy around a generator, wrapped into `[-π, π)`.
  pub fn generator_holonomy(&self, igenerator: usize) -> f64 {
    let angle: f64 = self.generators[igenerator]
      .halfedges()
      .iter()
      .map(|&h| transport_no_rotation(self.mesh, h, 0.0))
      .sum();
    wrap_angle(angle)
  }

  /// Rejects index assignments that violate Gauss–Bonnet.
  pub fn check_singularities(&self, singularity: &[f64]) -> Result<()> {
    if singularity.len() != self.mesh.nvertices() {
      return Err(Error::SingularityLength {
        expected: self.mesh.nvertices(),
        found: singularity.len(),
      });
    }
    let sum: f64 = singularity.iter().sum();
    let euler_characteristic = self.mesh.euler_characteristic();
    // Written so that a NaN sum fails as well.
    if !((sum - euler_characteristic as f64).abs() <= self.config.gauss_bonnet_tolerance) {
      return Err(Error::GaussBonnet {
        sum,
        euler_characteristic,
      });
    }
    Ok(())
  }

  /// Least squares connection matching all vertex and generator holonomies.
  pub fn compute_coexact_component(&self, singularity: &[f64]) -> Result<Cochain> {
    self.check_singularities(singularity)?;

    let nvertices = self.mesh.nvertices();
    let mut rhs = Vector::zeros(nvertices + self.generators.len());
    for v in 0..nvertices {
      rhs[v] = -self.angle_defects[v] + TAU * singularity[v];
    }
    for i in 0..self.generators.len() {
      rhs[nvertices + i] = self.generator_holonomy(i);
    }

    let normal_residual = |x: &Vector| &rhs - &self.cycle_matrix_t * &(&self.cycle_matrix * x);

    // One step of iterative refinement removes the bias of the diagonal shift.
    let mut x = self.cycle_system.solve(&rhs);
    x += self.cycle_system.solve(&normal_residual(&x));

    let connection = Cochain::new(1, &self.cycle_matrix * &x);
    tracing::debug!(
      "coexact component solved, residual {:.3e}",
      normal_residual(&x).norm()
    );
    Ok(connection)
  }

  /// Harmonic correction that cancels the remaining holonomy around each generator.
  pub fn compute_harmonic_component(&self, coexact: &Cochain) -> Result<Cochain> {
    let mut harmonic = Cochain::zero(1, self.mesh);
    let Some(period_matrix) = &self.period_matrix else {
      return Ok(harmonic);
    };

    let residual = Vector::from_iterator(
      self.generators.len(),
      self.generators.iter().map(|g| {
        let holonomy: f64 = g
          .halfedges()
          .iter()
          .map(|&h| transport_no_rotation(self.mesh, h, 0.0) + coexact.along(self.mesh, h))
          .sum();
        -wrap_angle(holonomy)
      }),
    );
    tracing::debug!("generator holonomy residual {:.3e}", residual.norm());

    let coeffs = period_matrix.solve(&residual).ok_or(Error::Lu)?;
    for (basis, &c) in self.bases.iter().zip(coeffs.iter()) {
      harmonic += &(basis.clone() * c);
    }
    Ok(harmonic)
  }

  pub fn compute_connections(&self, singularity: &[f64]) -> Result<Cochain> {
    let coexact = self.compute_coexact_component(singularity)?;
    let harmonic = self.compute_harmonic_component(&coexact)?;
    Ok(coexact + &harmonic)
  }

  /// Integrates the connection over a breadth first traversal of the faces.
  pub fn face_field(&self, connection: &Cochain) -> Result<FaceField> {
    reconstruct_face_field(self.mesh, connection, 0)
  }

  /// Solves and reconstructs the face field.
  pub fn solve(&self, singularity: &[f64]) -> Result<FaceField> {
    let connection = self.compute_connections(singularity)?;
    self.face_field(&connection)
  }
}

/// Signed incidence of edges to vertex fans and generator loops.
fn build_cycle_matrix(mesh: &SurfaceMesh, generators: &[Generator]) -> SparseMatrix {
  let nvertices = mesh.nvertices();
  let mut cycle_matrix = SparseMatrix::zeros(mesh.nedges(), nvertices + generators.len());
  for v in 0..nvertices {
    for h in mesh.outgoing(v) {
      cycle_matrix.push(mesh.edge(h), v, -mesh.edge_sign(h).as_f64());
    }
  }
  for (i, generator) in generators.iter().enumerate() {
    for &h in generator.halfedges() {
      cycle_matrix.push(mesh.edge(h), nvertices + i, -mesh.edge_sign(h).as_f64());
    }
  }
  cycle_matrix
}

/// Breadth first parallel transport starting with angle 0 in `root`.
pub fn reconstruct_face_field(
  mesh: &SurfaceMesh,
  connection: &Cochain,
  root: FaceIdx,
) -> Result<FaceField> {
  assert_eq!(connection.dim(), 1);

  let mut angles: Vec<Option<f64>> = vec![None; mesh.nfaces()];
  angles[root] = Some(0.0);
  let mut queue = VecDeque::from([(root, 0.0)]);
  while let Some((f, alpha)) = queue.pop_front() {
    for h in mesh.face_halfedges(f) {
      let g = mesh.face(mesh.twin(h));
      if angles[g].is_some() {
        continue;
      }
      let beta = transport_no_rotation(mesh, h, alpha) + connection.along(mesh, h);
      angles[g] = Some(beta);
      queue.push_back((g, beta));
    }
  }

  let count = angles.iter().filter(|a| a.is_none()).count();
  if count > 0 {
    return Err(Error::UnreachedFaces { count });
  }
  let angles: Vec<f64> = angles.into_iter().flatten().collect();
  let vectors = angles
    .iter()
    .enumerate()
    .map(|(f, &alpha)| mesh.face_basis(f).vector_at(alpha))
    .collect();
  Ok(FaceField { angles, vectors })
}

/// Recovers the index of the field around every vertex.
///
/// The rotation of the field relative to Levi-Civita transport, summed
/// around the fan of a vertex, equals `K - 2π · index`.
pub fn singularity_indices(mesh: &SurfaceMesh, field: &FaceField) -> Vec<i64> {
  (0..mesh.nvertices())
    .map(|v| {
      let rotation: f64 = mesh
        .outgoing(v)
        .map(|h| {
          let transported = transport_no_rotation(mesh, h, field.angles[mesh.face(h)]);
          wrap_angle(field.angles[mesh.face(mesh.twin(h))] - transported)
        })
        .sum();
      ((mesh.angle_defect(v) - rotation) / TAU).round() as i64
    })
    .collect()
}
