//! Procedural closed surfaces.

use super::{dim3::TriangleSurface3D, VertexIdx};

use once_cell::sync::Lazy;
use std::{
  collections::{HashMap, HashSet},
  f64::consts::TAU,
};

/// Geodesic sphere from subdividing a icosahedron
pub fn mesh_sphere_surface(nsubdivisions: usize) -> TriangleSurface3D {
  let triangles = ICOSAHEDRON_SURFACE.triangles().to_vec();
  let node_coords = ICOSAHEDRON_SURFACE
    .node_coords()
    .column_iter()
    .map(|c| c.into_owned())
    .collect();

  let (triangles, node_coords) = subdivide(triangles, node_coords, nsubdivisions);
  TriangleSurface3D::new(triangles, na::Matrix3xX::from_columns(&node_coords))
}

fn subdivide(
  triangles: Vec<[VertexIdx; 3]>,
  mut node_coords: Vec<na::Vector3<f64>>,
  depth: usize,
) -> (Vec<[VertexIdx; 3]>, Vec<na::Vector3<f64>>) {
  if depth == 0 {
    return (triangles, node_coords);
  }

  let mut midpoints = HashMap::new();
  let mut midpoint = |a: VertexIdx, b: VertexIdx| {
    let key = if a < b { (a, b) } else { (b, a) };
    *midpoints.entry(key).or_insert_with(|| {
      let mid = ((node_coords[a] + node_coords[b]) / 2.0).normalize();
      node_coords.push(mid);
      node_coords.len() - 1
    })
  };

  let triangles = triangles
    .into_iter()
    .flat_map(|[v0, v1, v2]| {
      let v01 = midpoint(v0, v1);
      let v12 = midpoint(v1, v2);
      let v20 = midpoint(v2, v0);
      [
        [v0, v01, v20],
        [v1, v12, v01],
        [v2, v20, v12],
        [v01, v12, v20],
      ]
    })
    .collect();

  subdivide(triangles, node_coords, depth - 1)
}

static ICOSAHEDRON_SURFACE: Lazy<TriangleSurface3D> = Lazy::new(|| {
  let phi = (1.0 + 5.0f64.sqrt()) / 2.0;

  #[rustfmt::skip]
  let vertices = [
    [-1.0, phi, 0.0],
    [ 1.0, phi, 0.0],
    [-1.0,-phi, 0.0],
    [ 1.0,-phi, 0.0],
    [ 0.0,-1.0, phi],
    [ 0.0, 1.0, phi],
    [ 0.0,-1.0,-phi],
    [ 0.0, 1.0,-phi],
    [ phi, 0.0,-1.0],
    [ phi, 0.0, 1.0],
    [-phi, 0.0,-1.0],
    [-phi, 0.0, 1.0],
  ];
  let vertices: Vec<_> = vertices
    .into_iter()
    .map(|[x, y, z]| na::Vector3::new(x, y, z).normalize())
    .collect();

  #[rustfmt::skip]
  let triangles = vec![
    [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
    [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
    [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
    [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
  ];

  TriangleSurface3D::new(triangles, na::Matrix3xX::from_columns(&vertices))
});

/// Torus of revolution around the z-axis.
///
/// The `nu x nv` vertex grid has every odd ring shifted by half a step,
/// which keeps all triangles close to equilateral.
/// `nv` must be even so the staggering closes up.
pub fn mesh_torus_surface(
  major_radius: f64,
  minor_radius: f64,
  nu: usize,
  nv: usize,
) -> TriangleSurface3D {
  assert!(nu >= 3 && nv >= 4 && nv % 2 == 0);
  assert!(major_radius > minor_radius);

  let idx = |i: usize, j: usize| (j % nv) * nu + (i % nu);

  let mut node_coords = Vec::with_capacity(nu * nv);
  for j in 0..nv {
    let v = TAU * j as f64 / nv as f64;
    let shift = 0.5 * (j % 2) as f64;
    for i in 0..nu {
      let u = TAU * (i as f64 + shift) / nu as f64;
      let ring = major_radius + minor_radius * v.cos();
      node_coords.push(na::Vector3::new(
        ring * u.cos(),
        ring * u.sin(),
        minor_radius * v.sin(),
      ));
    }
  }

  let mut triangles = Vec::with_capacity(2 * nu * nv);
  for j in 0..nv {
    for i in 0..nu {
      if j % 2 == 0 {
        triangles.push([idx(i, j), idx(i + 1, j), idx(i, j + 1)]);
        triangles.push([idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1)]);
      } else {
        triangles.push([idx(i, j), idx(i + 1, j + 1), idx(i, j + 1)]);
        triangles.push([idx(i, j), idx(i + 1, j), idx(i + 1, j + 1)]);
      }
    }
  }

  TriangleSurface3D::new(triangles, na::Matrix3xX::from_columns(&node_coords))
}

/// Boundary surface of a union of unit cubes.
///
/// Every boundary square gets an extra center vertex, pushed outwards by `bump`.
/// For `bump > 0` all triangles are acute, so all cotangent weights are positive.
/// The cells must not touch along an edge or corner only, otherwise the
/// surface is not a manifold.
pub fn mesh_voxel_surface(cells: &[[i64; 3]], bump: f64) -> TriangleSurface3D {
  let occupied: HashSet<[i64; 3]> = cells.iter().copied().collect();

  let mut node_coords: Vec<na::Vector3<f64>> = Vec::new();
  let mut grid_vertices: HashMap<[i64; 3], VertexIdx> = HashMap::new();
  let mut triangles = Vec::new();

  for cell in cells {
    for a in 0..3 {
      let (b, c) = ((a + 1) % 3, (a + 2) % 3);
      for side in [1, -1] {
        let mut neighbor = *cell;
        neighbor[a] += side;
        if occupied.contains(&neighbor) {
          continue;
        }

        let mut base = *cell;
        if side > 0 {
          base[a] += 1;
        }
        // Counter-clockwise around the outward normal.
        let offsets = match side {
          1 => [(0, 0), (1, 0), (1, 1), (0, 1)],
          _ => [(0, 0), (0, 1), (1, 1), (1, 0)],
        };
        let corners = offsets.map(|(ob, oc)| {
          let mut p = base;
          p[b] += ob;
          p[c] += oc;
          *grid_vertices.entry(p).or_insert_with(|| {
            node_coords.push(na::Vector3::new(p[0] as f64, p[1] as f64, p[2] as f64));
            node_coords.len() - 1
          })
        });

        let mut center = corners
          .iter()
          .map(|&v| node_coords[v])
          .sum::<na::Vector3<f64>>()
          / 4.0;
        center[a] += bump * side as f64;
        node_coords.push(center);
        let center = node_coords.len() - 1;

        for k in 0..4 {
          triangles.push([corners[k], corners[(k + 1) % 4], center]);
        }
      }
    }
  }

  TriangleSurface3D::new(triangles, na::Matrix3xX::from_columns(&node_coords))
}

/// Closed surface of genus `genus`: a `5 x (2 genus + 3)` slab of cubes
/// with `genus` holes punched through it.
pub fn mesh_handlebody_surface(genus: usize) -> TriangleSurface3D {
  let ny = 2 * genus as i64 + 3;
  let holes: Vec<[i64; 2]> = (0..genus as i64).map(|i| [2, 2 + 2 * i]).collect();
  let cells: Vec<[i64; 3]> = (0..5)
    .flat_map(|x| (0..ny).map(move |y| [x, y]))
    .filter(|xy| !holes.contains(xy))
    .map(|[x, y]| [x, y, 0])
    .collect();
  mesh_voxel_surface(&cells, 0.25)
}

#[cfg(test)]
mod test {
  use super::{
    mesh_handlebody_surface, mesh_sphere_surface, mesh_torus_surface, mesh_voxel_surface,
  };

  #[test]
  fn sphere_counts() {
    for (nsubdivisions, nvertices) in [(0, 12), (1, 42), (2, 162)] {
      let mesh = mesh_sphere_surface(nsubdivisions)
        .into_surface_mesh()
        .unwrap();
      assert_eq!(mesh.nvertices(), nvertices);
      assert_eq!(mesh.euler_characteristic(), 2);
      assert_eq!(mesh.genus(), Some(0));
    }
  }

  #[test]
  fn torus_counts() {
    let mesh = mesh_torus_surface(3.0, 1.0, 18, 8)
      .into_surface_mesh()
      .unwrap();
    assert_eq!(mesh.nvertices(), 18 * 8);
    assert_eq!(mesh.nfaces(), 2 * 18 * 8);
    assert_eq!(mesh.nedges(), 3 * 18 * 8);
    assert_eq!(mesh.euler_characteristic(), 0);
    assert_eq!(mesh.genus(), Some(1));
  }

  #[test]
  fn torus_triangles_are_acute() {
    let mesh = mesh_torus_surface(3.0, 1.0, 36, 12)
      .into_surface_mesh()
      .unwrap();
    for h in 0..mesh.nhalfedges() {
      assert!(mesh.cotan(h) > 0.0);
    }
  }

  #[test]
  fn cube_surface() {
    let mesh = mesh_voxel_surface(&[[0, 0, 0]], 0.25)
      .into_surface_mesh()
      .unwrap();
    assert_eq!(mesh.nvertices(), 8 + 6);
    assert_eq!(mesh.nfaces(), 6 * 4);
    assert_eq!(mesh.genus(), Some(0));
    for h in 0..mesh.nhalfedges() {
      assert!(mesh.cotan(h) > 0.0);
    }
    // Counter-clockwise triangles, outward normals.
    let center = na::Vector3::new(0.5, 0.5, 0.5);
    for f in 0..mesh.nfaces() {
      assert!(mesh.face_normal(f).dot(&(mesh.face_barycenter(f) - center)) > 0.0);
    }
  }

  #[test]
  fn handlebody_genus() {
    for genus in 0..=3 {
      let mesh = mesh_handlebody_surface(genus)
        .into_surface_mesh()
        .unwrap();
      assert_eq!(mesh.genus(), Some(genus));
      assert_eq!(mesh.euler_characteristic(), 2 - 2 * genus as i64);
    }
  }

  #[test]
  fn separate_cubes_are_disconnected() {
    let mesh = mesh_voxel_surface(&[[0, 0, 0], [3, 0, 0]], 0.25)
      .into_surface_mesh()
      .unwrap();
    assert_eq!(mesh.ncomponents(), 2);
    assert_eq!(mesh.euler_characteristic(), 4);
    assert_eq!(mesh.genus(), None);
  }
}
