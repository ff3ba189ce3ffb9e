use glam::UVec3;

use super::*;

/// The root code is 1 at depth 0 with a zero corner.
#[test]
fn test_root_code() {
  assert_eq!(<u32 as LocationCode>::ROOT, 1);
  assert_eq!(1u32.depth(), 0);
  assert_eq!(1u32.lower_corner(), UVec3::ZERO);
}

/// Depth grows by one per appended octant.
#[test]
fn test_depth_tracks_path_length() {
  let mut code = 1u32;
  for depth in 1..=9u8 {
    code = code.child(5);
    assert_eq!(code.depth(), depth, "after {} child steps", depth);
  }
}

/// parent(child(code, octant)) returns the original code for any octant.
#[test]
fn test_child_parent_roundtrip() {
  let code = 0b1010110u32;

  for octant in 0..8u8 {
    let child = code.child(octant);
    assert_eq!(child.parent(), code, "roundtrip failed for octant {}", octant);
    assert_eq!(child.final_octant(), octant);
  }
}

/// ancestor(depth) walks all the way back to the root.
#[test]
fn test_ancestor_to_root() {
  let code = 0b1000111000111101010111u32;
  assert_eq!(code.ancestor(code.depth()), 1);
  assert_eq!(code.ancestor(1), code.parent());
}

/// Octant bit 0 is X, bit 1 is Y, bit 2 is Z.
#[test]
fn test_from_grid_axis_assignment() {
  assert_eq!(u32::from_grid(1, UVec3::new(1, 0, 0)), 0b1001);
  assert_eq!(u32::from_grid(1, UVec3::new(0, 1, 0)), 0b1010);
  assert_eq!(u32::from_grid(1, UVec3::new(0, 0, 1)), 0b1100);
  assert_eq!(u32::from_grid(1, UVec3::new(1, 1, 1)), 0b1111);
}

/// from_grid and lower_corner invert each other; corners are scaled to
/// finest-grid units.
#[test]
fn test_grid_roundtrip_u32() {
  // Cells at depth 3 cover 1 << (9 - 3) = 64 finest-grid units.
  for cell in [
    UVec3::new(0, 0, 0),
    UVec3::new(7, 7, 7),
    UVec3::new(3, 5, 6),
    UVec3::new(1, 0, 4),
  ] {
    let code = u32::from_grid(3, cell);
    assert_eq!(code.depth(), 3);
    assert_eq!(code.lower_corner(), cell * 64, "cell {:?}", cell);
  }
}

/// 64-bit codes roundtrip at the full depth of 20, where the finest grid
/// and the cell grid coincide.
#[test]
fn test_grid_roundtrip_u64_max_depth() {
  for cell in [
    UVec3::new(0, 0, 0),
    UVec3::new((1 << 20) - 1, 0, 1 << 19),
    UVec3::new(123_456, 654_321, 42),
  ] {
    let code = u64::from_grid(20, cell);
    assert_eq!(code.depth(), 20);
    assert_eq!(code.lower_corner(), cell, "cell {:?}", cell);
  }
}

/// Max depths leave the sentinel bit intact: 9 for u32, 20 for u64.
#[test]
fn test_max_depths() {
  assert_eq!(<u32 as LocationCode>::MAX_DEPTH, 9);
  assert_eq!(<u64 as LocationCode>::MAX_DEPTH, 20);

  let deepest32 = u32::from_grid(9, UVec3::splat((1 << 9) - 1));
  assert_eq!(deepest32.depth(), 9);
  let deepest64 = u64::from_grid(20, UVec3::splat((1 << 20) - 1));
  assert_eq!(deepest64.depth(), 20);
}

/// Binary rendering is zero-padded to the full code width.
#[test]
fn test_to_binary() {
  let rendered = 0b1000111u32.to_binary();
  assert_eq!(rendered.len(), 32);
  assert!(rendered.ends_with("1000111"));
  assert!(rendered.starts_with('0'));
}
