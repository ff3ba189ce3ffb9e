use glam::Vec3;

use super::*;
use crate::tree::{Octree32, Octree64};

fn obj_string(tree: &Octree32, options: ExportOptions) -> String {
  let mut buffer = Vec::new();
  tree.write_obj(&mut buffer, options).expect("write to Vec cannot fail");
  String::from_utf8(buffer).expect("OBJ output is ASCII")
}

fn count_lines(obj: &str, prefix: &str) -> usize {
  obj.lines().filter(|line| line.starts_with(prefix)).count()
}

/// An empty tree exports no geometry.
#[test]
fn test_export_empty() {
  let tree = Octree32::new();
  let obj = obj_string(&tree, ExportOptions::default());

  assert_eq!(count_lines(&obj, "v "), 0);
  assert_eq!(count_lines(&obj, "f "), 0);
}

/// A single solid cell exports one cube: 8 vertices, 6 quad faces.
#[test]
fn test_export_single_cell() {
  let mut tree = Octree32::new();
  tree.set(0b1111);
  let obj = obj_string(&tree, ExportOptions::default());

  assert_eq!(count_lines(&obj, "v "), 8);
  assert_eq!(count_lines(&obj, "f "), 6);
}

/// A full tree exports 8 half-size cubes whose corners form a 3x3x3
/// grid: 27 shared vertices, 48 faces.
#[test]
fn test_export_dedups_shared_corners() {
  let tree = Octree32::full();
  let obj = obj_string(&tree, ExportOptions::default());

  assert_eq!(count_lines(&obj, "v "), 27);
  assert_eq!(count_lines(&obj, "f "), 48);
}

/// Face indices are 1-based and stay within the vertex count.
#[test]
fn test_export_face_indices_valid() {
  let tree = Octree32::full();
  let obj = obj_string(&tree, ExportOptions::default());
  let vertex_count = count_lines(&obj, "v ");

  for line in obj.lines().filter(|line| line.starts_with("f ")) {
    for index in line[2..].split_whitespace() {
      let index: usize = index.parse().expect("face index is an integer");
      assert!(index >= 1 && index <= vertex_count, "index {} out of range", index);
    }
  }
}

/// Default options map the tree onto the unit cube.
#[test]
fn test_export_unit_cube_coordinates() {
  let mut tree = Octree32::new();
  tree.set(0b1000);
  tree.set(0b1111);
  let obj = obj_string(&tree, ExportOptions::default());

  for line in obj.lines().filter(|line| line.starts_with("v ")) {
    for value in line[2..].split_whitespace() {
      let value: f32 = value.parse().expect("vertex coordinate is a float");
      assert!((0.0..=1.0).contains(&value), "coordinate {} outside unit cube", value);
    }
  }
}

/// Origin and root size shift and scale the exported coordinates.
#[test]
fn test_export_world_mapping() {
  let mut tree = Octree32::new();
  tree.set(0b1111); // octant 7: upper half on every axis
  let options = ExportOptions {
    origin: Vec3::new(10.0, 20.0, 30.0),
    root_size: 2.0,
  };
  let obj = obj_string(&tree, options);

  let mut xs = Vec::new();
  for line in obj.lines().filter(|line| line.starts_with("v ")) {
    let mut parts = line[2..].split_whitespace();
    let x: f32 = parts.next().unwrap().parse().unwrap();
    xs.push(x);
  }
  // Octant 7 spans the upper half of [10, 12] on X.
  assert!(xs.iter().all(|&x| (11.0..=12.0).contains(&x)), "{:?}", xs);
}

/// Degenerate root sizes are rejected instead of silently exporting
/// collapsed or mirrored geometry.
#[test]
fn test_export_rejects_bad_root_size() {
  let mut tree = Octree32::new();
  tree.set(0b1000);

  for root_size in [0.0f32, -1.0, f32::NAN, f32::INFINITY] {
    let options = ExportOptions {
      origin: Vec3::ZERO,
      root_size,
    };
    let mut buffer = Vec::new();
    let result = tree.write_obj(&mut buffer, options);
    assert!(
      matches!(result, Err(ExportError::InvalidOptions { .. })),
      "root_size {} was accepted",
      root_size
    );
    assert!(buffer.is_empty(), "root_size {} wrote output", root_size);
  }
}

/// A non-finite origin is rejected before anything is written.
#[test]
fn test_export_rejects_non_finite_origin() {
  let mut tree = Octree32::new();
  tree.set(0b1000);

  let options = ExportOptions {
    origin: Vec3::new(f32::NAN, 0.0, 0.0),
    root_size: 1.0,
  };
  let mut buffer = Vec::new();
  let result = tree.write_obj(&mut buffer, options);
  assert!(matches!(result, Err(ExportError::InvalidOptions { .. })));
  assert!(buffer.is_empty());
}

/// export_mesh writes the OBJ to disk.
#[test]
fn test_export_mesh_to_file() {
  let mut tree = Octree64::new();
  tree.set(0b1000);

  let path = std::env::temp_dir().join("voxel_octree_export_test.obj");
  tree
    .export_mesh(&path, ExportFormat::Obj, ExportOptions::default())
    .expect("export to temp dir succeeds");

  let contents = std::fs::read_to_string(&path).expect("exported file is readable");
  assert!(contents.contains("v "));
  assert!(contents.contains("f "));
  std::fs::remove_file(&path).ok();
}
