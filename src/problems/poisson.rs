//! Module for the Poisson Equation, the prototypical elliptic PDE.

use crate::{
  cochain::Cochain,
  config::SolverConfig,
  error::Result,
  linalg::{self, CsrMatrix, FaerCholesky},
  mesh::{SurfaceMesh, VertexIdx},
  operators,
};

/// Solves $L phi = -M (rho - macron(rho))$ for a vertex density `rho`.
///
/// On a closed surface only the deviation of `rho` from its mean
/// $macron(rho) = (sum_i M_(i i) rho_i) / "area"$ can be a source, otherwise
/// the problem would not be solvable.
pub fn solve_scalar_poisson(
  mesh: &SurfaceMesh,
  rho: &Cochain,
  config: &SolverConfig,
) -> Result<Cochain> {
  assert_eq!(rho.dim(), 0);

  let laplace = CsrMatrix::from(&operators::cotan_laplace(mesh, config.regularization));
  let mass = CsrMatrix::from(&operators::mass(mesh));

  let rho_bar = (&mass * rho.coeffs()).sum() / mesh.total_area();
  let rho_dif = rho.coeffs().add_scalar(-rho_bar);
  let source = -(&mass * &rho_dif);

  let phi = FaerCholesky::new((&laplace).into())?.solve(&source);
  tracing::debug!("solved scalar poisson problem with mean density {rho_bar:.3e}");
  Ok(Cochain::new(0, phi))
}

/// Unit point sources at the given vertices.
pub fn point_sources(mesh: &SurfaceMesh, vertices: &[VertexIdx]) -> Cochain {
  let mut rho = Cochain::zero(0, mesh);
  for &v in vertices {
    rho[v] = 1.0;
  }
  rho
}

/// Ground state of the Laplace-Beltrami operator,
/// the smallest eigenpair of $L u = lambda M u$.
pub fn solve_laplace_beltrami_ground_state(
  mesh: &SurfaceMesh,
  config: &SolverConfig,
) -> Result<(f64, Cochain)> {
  let laplace = operators::cotan_laplace(mesh, config.regularization);
  let mass = operators::mass(mesh);
  let (eigenvalue, eigenvector) =
    linalg::smallest_generalized_eigenpair(&laplace, &mass, config.lanczos_iterations)?;
  Ok((eigenvalue, Cochain::new(0, eigenvector)))
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::mesh::gen::mesh_sphere_surface;

  #[test]
  fn minimum_lies_at_a_source() {
    let mesh = mesh_sphere_surface(2).into_surface_mesh().unwrap();
    let rho = point_sources(&mesh, &[0, 5]);
    let phi = solve_scalar_poisson(&mesh, &rho, &SolverConfig::default()).unwrap();
    let imin = phi.coeffs().imin();
    assert!(imin == 0 || imin == 5);
  }

  #[test]
  fn constant_density_has_no_source() {
    let mesh = mesh_sphere_surface(1).into_surface_mesh().unwrap();
    let rho = Cochain::constant(3.0, 0, &mesh);
    let phi = solve_scalar_poisson(&mesh, &rho, &SolverConfig::default()).unwrap();
    assert!(phi.norm() < 1e-6);
  }
}
