//! Discrete Hodge decomposition of 1-forms.
//!
//! Every 1-form splits `L²`-orthogonally into
//! $omega = dif alpha + delta beta + gamma$
//! with an exact, a coexact and a harmonic part.

use crate::{
  cochain::Cochain,
  config::SolverConfig,
  error::Result,
  homology::Generator,
  linalg::{regularize, CsrMatrix, FaerCholesky, FaerLu},
  mesh::SurfaceMesh,
  operators,
};

/// The three components of a decomposed 1-form.
#[derive(Debug, Clone)]
pub struct HodgeComponents {
  pub exact: Cochain,
  pub coexact: Cochain,
  pub harmonic: Cochain,
}
impl HodgeComponents {
  pub fn sum(&self) -> Cochain {
    self.exact.clone() + &self.coexact + &self.harmonic
  }
}

/// Precomputed operators and factorizations for one mesh.
pub struct HodgeDecomposition<'m> {
  mesh: &'m SurfaceMesh,
  d0: CsrMatrix,
  d0t: CsrMatrix,
  d1: CsrMatrix,
  d1t: CsrMatrix,
  hodge1: CsrMatrix,
  hodge1_inv: CsrMatrix,
  /// $d_0^T star_1 d_0 + epsilon I$
  exact_system: FaerCholesky,
  /// $d_1 star_1^(-1) d_1^T + epsilon I$
  coexact_system: FaerLu,
}

impl<'m> HodgeDecomposition<'m> {
  pub fn new(mesh: &'m SurfaceMesh, config: &SolverConfig) -> Result<Self> {
    let nnegative = operators::hodge_star_1_diagonal(mesh)
      .iter()
      .filter(|&&w| w < 0.0)
      .count();
    if nnegative > 0 {
      tracing::warn!("{nnegative} edges have negative cotangent weights, the mesh is not Delaunay");
    }

    let d0 = CsrMatrix::from(&operators::exterior_derivative_0(mesh));
    let d1 = CsrMatrix::from(&operators::exterior_derivative_1(mesh));
    let hodge1 = CsrMatrix::from(&operators::hodge_star_1(mesh));
    let hodge1_inv = CsrMatrix::from(&operators::inverse_hodge_star_1(mesh)?);
    let d0t = d0.transpose();
    let d1t = d1.transpose();

    let a = regularize(&(&d0t * &(&hodge1 * &d0)), config.regularization);
    let exact_system = FaerCholesky::new((&a).into())?;

    let b = regularize(&(&d1 * &(&hodge1_inv * &d1t)), config.regularization);
    let coexact_system = FaerLu::new((&b).into())?;

    tracing::info!(
      "factorized Hodge systems for {} vertices, {} edges, {} faces",
      mesh.nvertices(),
      mesh.nedges(),
      mesh.nfaces()
    );

    Ok(Self {
      mesh,
      d0,
      d0t,
      d1,
      d1t,
      hodge1,
      hodge1_inv,
      exact_system,
      coexact_system,
    })
  }

  pub fn mesh(&self) -> &'m SurfaceMesh {
    self.mesh
  }
  pub fn hodge_star_1(&self) -> &CsrMatrix {
    &self.hodge1
  }

  /// $dif alpha$ where $alpha$ solves $d_0^T star_1 d_0 alpha = d_0^T star_1 omega$.
  pub fn compute_exact(&self, omega: &Cochain) -> Cochain {
    assert_eq!(omega.dim(), 1);
    let rhs = &self.d0t * &(&self.hodge1 * omega.coeffs());
    let alpha = self.exact_system.solve(&rhs);
    Cochain::new(1, &self.d0 * &alpha)
  }

  /// $star_1^(-1) d_1^T beta$ where $beta$ solves $d_1 star_1^(-1) d_1^T beta = d_1 omega$.
  pub fn compute_coexact(&self, omega: &Cochain) -> Cochain {
    assert_eq!(omega.dim(), 1);
    let rhs = &self.d1 * omega.coeffs();
    let beta = self.coexact_system.solve(&rhs);
    Cochain::new(1, &self.hodge1_inv * &(&self.d1t * &beta))
  }

  pub fn compute_harmonic(&self, omega: &Cochain, exact: &Cochain, coexact: &Cochain) -> Cochain {
    omega.clone() - exact - coexact
  }

  pub fn decompose(&self, omega: &Cochain) -> HodgeComponents {
    tracing::debug!("decomposing 1-form with norm {:.3e}", omega.norm());
    let exact = self.compute_exact(omega);
    let coexact = self.compute_coexact(omega);
    let harmonic = self.compute_harmonic(omega, &exact, &coexact);
    HodgeComponents {
      exact,
      coexact,
      harmonic,
    }
  }

  /// Harmonic 1-form dual to a homology generator.
  ///
  /// The signed indicator of the loop is closed; removing its exact part
  /// leaves the harmonic representative of its cohomology class.
  pub fn compute_harmonic_basis(&self, generator: &Generator) -> Cochain {
    let mut gamma = Cochain::zero(1, self.mesh);
    for &h in generator.halfedges() {
      gamma[self.mesh.edge(h)] += self.mesh.edge_sign(h).as_f64();
    }
    let exact = self.compute_exact(&gamma);
    gamma - &exact
  }
}
