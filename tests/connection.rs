//! End-to-end trivial connection solves on closed surfaces.

extern crate nalgebra as na;

use vectorfield::{
  cochain::Cochain,
  connection::{
    reconstruct_face_field, singularity_indices, transport_no_rotation, wrap_angle, FaceField,
    TrivialConnection,
  },
  mesh::{
    gen::{mesh_handlebody_surface, mesh_sphere_surface, mesh_torus_surface, mesh_voxel_surface},
    SurfaceMesh,
  },
  Error, SolverConfig,
};

use std::f64::consts::TAU;

fn init_tracing() {
  let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn sphere() -> SurfaceMesh {
  mesh_sphere_surface(2).into_surface_mesh().unwrap()
}

fn torus() -> SurfaceMesh {
  mesh_torus_surface(3.0, 1.0, 36, 12)
    .into_surface_mesh()
    .unwrap()
}

/// Transporting across any edge, not just tree edges, reproduces the neighbor's angle.
fn assert_consistent(mesh: &SurfaceMesh, connection: &Cochain, field: &FaceField) {
  for h in 0..mesh.nhalfedges() {
    let f = mesh.face(h);
    let g = mesh.face(mesh.twin(h));
    let transported = transport_no_rotation(mesh, h, field.angles[f]) + connection.along(mesh, h);
    let mismatch = wrap_angle(field.angles[g] - transported);
    assert!(
      mismatch.abs() < 1e-6,
      "field mismatch {mismatch} across half-edge {h}"
    );
  }
}

fn assert_vertex_holonomies(mesh: &SurfaceMesh, connection: &Cochain, singularity: &[f64]) {
  for v in 0..mesh.nvertices() {
    let rotation: f64 = mesh.outgoing(v).map(|h| connection.along(mesh, h)).sum();
    let expected = mesh.angle_defect(v) - TAU * singularity[v];
    assert!((rotation - expected).abs() < 1e-8);
  }
}

fn assert_generator_holonomies(
  mesh: &SurfaceMesh,
  solver: &TrivialConnection,
  connection: &Cochain,
) {
  for generator in solver.generators() {
    let holonomy: f64 = generator
      .halfedges()
      .iter()
      .map(|&h| transport_no_rotation(mesh, h, 0.0) + connection.along(mesh, h))
      .sum();
    assert!(wrap_angle(holonomy).abs() < 1e-8);
  }
}

fn nearest_vertex(mesh: &SurfaceMesh, p: na::Vector3<f64>) -> usize {
  (0..mesh.nvertices())
    .min_by(|&a, &b| {
      let da = (mesh.coord(a) - p).norm();
      let db = (mesh.coord(b) - p).norm();
      da.total_cmp(&db)
    })
    .unwrap()
}

#[test]
fn gauss_bonnet_violation_fails_before_solving() {
  init_tracing();
  let mesh = sphere();
  let solver = TrivialConnection::new(&mesh, &SolverConfig::default()).unwrap();

  let mut singularity = vec![0.0; mesh.nvertices()];
  singularity[0] = 1.0;
  let err = solver.compute_connections(&singularity).unwrap_err();
  assert!(matches!(
    err,
    Error::GaussBonnet {
      euler_characteristic: 2,
      ..
    }
  ));
  assert!(matches!(
    solver.compute_coexact_component(&singularity),
    Err(Error::GaussBonnet { .. })
  ));

  let err = solver.compute_connections(&[2.0]).unwrap_err();
  assert!(matches!(err, Error::SingularityLength { found: 1, .. }));

  // Non-finite indices never satisfy Gauss-Bonnet.
  for bad in [f64::NAN, f64::INFINITY] {
    let mut singularity = vec![0.0; mesh.nvertices()];
    singularity[0] = bad;
    assert!(matches!(
      solver.compute_connections(&singularity),
      Err(Error::GaussBonnet { .. })
    ));
  }
}

#[test]
fn sphere_with_single_index_two_singularity() {
  init_tracing();
  let mesh = sphere();
  let solver = TrivialConnection::new(&mesh, &SolverConfig::default()).unwrap();
  assert!(solver.generators().is_empty());

  let mut singularity = vec![0.0; mesh.nvertices()];
  singularity[0] = 2.0;
  let connection = solver.compute_connections(&singularity).unwrap();
  assert_vertex_holonomies(&mesh, &connection, &singularity);

  let field = solver.face_field(&connection).unwrap();
  assert_consistent(&mesh, &connection, &field);

  let indices = singularity_indices(&mesh, &field);
  assert_eq!(indices[0], 2);
  assert!(indices[1..].iter().all(|&i| i == 0));

  for (f, v) in field.vectors.iter().enumerate() {
    approx::assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
    approx::assert_relative_eq!(v.dot(&mesh.face_normal(f)), 0.0, epsilon = 1e-12);
  }
}

#[test]
fn sphere_with_two_antipodal_sources() {
  init_tracing();
  let mesh = sphere();
  // Vertices 0 and 3 of the icosahedron are antipodal.
  approx::assert_relative_eq!(
    mesh.coord(0) + mesh.coord(3),
    na::Vector3::zeros(),
    epsilon = 1e-12
  );

  let solver = TrivialConnection::new(&mesh, &SolverConfig::default()).unwrap();
  let mut singularity = vec![0.0; mesh.nvertices()];
  singularity[0] = 1.0;
  singularity[3] = 1.0;
  let field = solver.solve(&singularity).unwrap();

  let indices = singularity_indices(&mesh, &field);
  let expected: Vec<i64> = singularity.iter().map(|&s| s as i64).collect();
  assert_eq!(indices, expected);
}

#[test]
fn torus_without_singularities() {
  init_tracing();
  let mesh = torus();
  let solver = TrivialConnection::new(&mesh, &SolverConfig::default()).unwrap();
  assert_eq!(solver.generators().len(), 2);

  let singularity = vec![0.0; mesh.nvertices()];
  let coexact = solver.compute_coexact_component(&singularity).unwrap();
  let harmonic = solver.compute_harmonic_component(&coexact).unwrap();
  // The least squares solve already meets the generator constraints.
  assert!(harmonic.norm() < 1e-6);

  let connection = solver.compute_connections(&singularity).unwrap();
  assert_vertex_holonomies(&mesh, &connection, &singularity);
  assert_generator_holonomies(&mesh, &solver, &connection);

  let field = solver.face_field(&connection).unwrap();
  assert_eq!(field.vectors.len(), mesh.nfaces());
  assert_consistent(&mesh, &connection, &field);
  assert!(singularity_indices(&mesh, &field).iter().all(|&i| i == 0));
}

#[test]
fn torus_with_singularity_pair() {
  init_tracing();
  let mesh = torus();
  let solver = TrivialConnection::new(&mesh, &SolverConfig::default()).unwrap();

  // Outer equator and the opposite side of the inner equator.
  let (source, sink) = (0, 6 * 36 + 18);
  let mut singularity = vec![0.0; mesh.nvertices()];
  singularity[source] = 1.0;
  singularity[sink] = -1.0;

  let connection = solver.compute_connections(&singularity).unwrap();
  let field = solver.face_field(&connection).unwrap();
  assert_consistent(&mesh, &connection, &field);

  let indices = singularity_indices(&mesh, &field);
  assert_eq!(indices[source], 1);
  assert_eq!(indices[sink], -1);
  assert_eq!(indices.iter().filter(|&&i| i != 0).count(), 2);
}

#[test]
fn harmonic_correction_cancels_generator_holonomy() {
  init_tracing();
  let mesh = torus();
  let solver = TrivialConnection::new(&mesh, &SolverConfig::default()).unwrap();

  // A bare vertex-only connection leaves the generator holonomies open.
  let bare = Cochain::zero(1, &mesh);
  let harmonic = solver.compute_harmonic_component(&bare).unwrap();
  let corrected = bare + &harmonic;
  assert_generator_holonomies(&mesh, &solver, &corrected);

  // The dual harmonic bases leave every vertex holonomy untouched.
  for basis in solver.harmonic_bases() {
    for v in 0..mesh.nvertices() {
      let rotation: f64 = mesh.outgoing(v).map(|h| basis.along(&mesh, h)).sum();
      assert!(rotation.abs() < 1e-6);
    }
  }
}

#[test]
fn genus_two_with_two_saddles() {
  init_tracing();
  let mesh = mesh_handlebody_surface(2).into_surface_mesh().unwrap();
  assert_eq!(mesh.euler_characteristic(), -2);
  let solver = TrivialConnection::new(&mesh, &SolverConfig::default()).unwrap();
  assert_eq!(solver.generators().len(), 4);
  assert!(solver
    .generators()
    .iter()
    .all(|g| g.is_closed_dual_loop(&mesh)));

  // Flat vertices on the top and bottom of the slab.
  let top = nearest_vertex(&mesh, na::Vector3::new(1.0, 1.0, 1.0));
  let bottom = nearest_vertex(&mesh, na::Vector3::new(4.0, 6.0, 0.0));
  let mut singularity = vec![0.0; mesh.nvertices()];
  singularity[top] = -1.0;
  singularity[bottom] = -1.0;

  let connection = solver.compute_connections(&singularity).unwrap();
  assert_vertex_holonomies(&mesh, &connection, &singularity);
  assert_generator_holonomies(&mesh, &solver, &connection);

  let field = solver.face_field(&connection).unwrap();
  assert_consistent(&mesh, &connection, &field);
  let indices = singularity_indices(&mesh, &field);
  let expected: Vec<i64> = singularity.iter().map(|&s| s as i64).collect();
  assert_eq!(indices, expected);
}

#[test]
fn disconnected_surfaces_are_rejected() {
  init_tracing();
  let mesh = mesh_voxel_surface(&[[0, 0, 0], [3, 0, 0]], 0.25)
    .into_surface_mesh()
    .unwrap();
  assert_eq!(mesh.ncomponents(), 2);

  assert!(matches!(
    TrivialConnection::new(&mesh, &SolverConfig::default()),
    Err(Error::Disconnected { ncomponents: 2 })
  ));

  // Transport from one cube never reaches the other.
  let err = reconstruct_face_field(&mesh, &Cochain::zero(1, &mesh), 0).unwrap_err();
  assert!(matches!(err, Error::UnreachedFaces { count } if count == mesh.nfaces() / 2));
}
