/// Numerical parameters shared by the solvers.
///
/// All solver objects take a copy at construction; the defaults reproduce the
/// classic setup of a `1e-8` diagonal shift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
  /// Diagonal shift added to the semi-definite system matrices
  /// (cotangent Laplacian, Hodge systems, cycle normal equations).
  pub regularization: f64,
  /// Allowed deviation of the singularity sum from the Euler characteristic.
  pub gauss_bonnet_tolerance: f64,
  /// Upper bound on the Lanczos iterations of the eigen solve.
  pub lanczos_iterations: usize,
}

impl Default for SolverConfig {
  fn default() -> Self {
    Self {
      regularization: 1e-8,
      gauss_bonnet_tolerance: 1e-8,
      lanczos_iterations: 100,
    }
  }
}

impl SolverConfig {
  pub fn with_regularization(mut self, regularization: f64) -> Self {
    self.regularization = regularization;
    self
  }
  pub fn with_gauss_bonnet_tolerance(mut self, tolerance: f64) -> Self {
    self.gauss_bonnet_tolerance = tolerance;
    self
  }
  pub fn with_lanczos_iterations(mut self, iterations: usize) -> Self {
    self.lanczos_iterations = iterations;
    self
  }
}
