//! Hashed linear octree over location codes.
//!
//! The tree is a flat `HashMap<LocationCode, NodeMask>`; no pointers, no
//! explicit node structs. Parent/child relationships are pure code
//! arithmetic. Fully occupied subtrees collapse into a single "solid"
//! bit in their parent, so a solid region of any size costs one bit.
//!
//! # Structural Invariant
//!
//! After every mutation:
//! - the root entry is always present (it may be `EMPTY` or `FULL`),
//! - no non-root node is `FULL` (it would have merged into its parent),
//! - no non-root node is `EMPTY` (it would have been erased),
//! - every open bit has a matching map entry, and every non-root map
//!   entry has a matching open bit in its parent.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use glam::UVec3;
use smallvec::SmallVec;

use crate::code::LocationCode;
use crate::node::NodeMask;

/// Volume of the root cube in integer accounting units.
///
/// A solid cell at depth `d` contributes `ROOT_VOLUME >> 3 * d`, which
/// stays exact for every depth both code widths can address.
const ROOT_VOLUME: u64 = 1 << 63;

/// Sparse voxel occupancy octree.
///
/// Equality is structural: two trees are equal when they store the same
/// node map, which the merge/erase invariants make canonical for a given
/// occupancy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Octree<C: LocationCode = u32> {
  nodes: HashMap<C, NodeMask>,
}

/// Octree addressed by 32-bit codes (max depth 9, 512^3 finest grid).
pub type Octree32 = Octree<u32>;

/// Octree addressed by 64-bit codes (max depth 20).
pub type Octree64 = Octree<u64>;

impl<C: LocationCode> Octree<C> {
  /// Create an empty octree.
  pub fn new() -> Self {
    let mut nodes = HashMap::new();
    nodes.insert(C::ROOT, NodeMask::EMPTY);
    Self { nodes }
  }

  /// Create a fully occupied octree.
  pub fn full() -> Self {
    let mut nodes = HashMap::new();
    nodes.insert(C::ROOT, NodeMask::FULL);
    Self { nodes }
  }

  /// Create an empty octree with room for `capacity` nodes.
  pub fn with_capacity(capacity: usize) -> Self {
    let mut nodes = HashMap::with_capacity(capacity.max(1));
    nodes.insert(C::ROOT, NodeMask::EMPTY);
    Self { nodes }
  }

  /// Reserve room for `additional` more nodes.
  pub fn reserve(&mut self, additional: usize) {
    self.nodes.reserve(additional);
  }

  /// Reset to fully occupied.
  pub fn set_root(&mut self) {
    self.nodes.clear();
    self.nodes.insert(C::ROOT, NodeMask::FULL);
  }

  /// Reset to empty.
  pub fn clear_root(&mut self) {
    self.nodes.clear();
    self.nodes.insert(C::ROOT, NodeMask::EMPTY);
  }

  /// Mark the cube at `code` fully occupied.
  ///
  /// Creates ancestor nodes along the path as needed, drops any existing
  /// subtree under `code`, and merges ancestors that become full into
  /// their parents.
  ///
  /// `code` must not be deeper than [`max_depth`]; debug builds assert
  /// this.
  ///
  /// [`max_depth`]: Octree::max_depth
  pub fn set(&mut self, code: C) {
    debug_assert!(
      code.depth() <= C::MAX_DEPTH,
      "code depth {} exceeds max depth {}",
      code.depth(),
      C::MAX_DEPTH
    );
    if code == C::ROOT {
      self.set_root();
      return;
    }

    // The parent node is the one that will carry the new solid bit.
    let parent = code.parent();
    let parent_depth = parent.depth();

    // Walk down from the root to the parent, creating ancestors on
    // demand and opening the path.
    for depth in 0..parent_depth {
      let ancestor = code.ancestor(parent_depth + 1 - depth);
      let octant = code.ancestor(parent_depth - depth).final_octant();

      match self.nodes.entry(ancestor) {
        Entry::Vacant(entry) => {
          entry.insert(NodeMask::open_child(octant));
        }
        Entry::Occupied(mut entry) => {
          if entry.get().child_solid(octant) {
            return; // Already solid above the target; nothing to do.
          }
          entry.get_mut().mark_open(octant);
        }
      }
    }

    let octant = code.final_octant();
    match self.nodes.entry(parent) {
      Entry::Vacant(entry) => {
        entry.insert(NodeMask::solid_child(octant));
        return; // Fresh parent cannot be full and has no subtree below.
      }
      Entry::Occupied(mut entry) => {
        entry.get_mut().mark_solid(octant);
      }
    }

    // Drop any subtree that lived under the now-solid cell.
    self.erase_subtree(code);

    // Every ancestor already existed (the walk above would have returned
    // otherwise), so marking this cell may have completed some of them.
    // Merge full nodes upward; the root is never merged away.
    let mut ancestor = parent;
    for _ in 0..parent_depth {
      match self.nodes.get(&ancestor) {
        Some(&mask) if mask.is_full() => {}
        _ => break,
      }
      self.nodes.remove(&ancestor);
      let octant = ancestor.final_octant();
      ancestor = ancestor.parent();
      if let Some(node) = self.nodes.get_mut(&ancestor) {
        node.mark_solid(octant);
      }
    }
  }

  /// Carve out the cube at `code`, the exact mirror of [`set`].
  ///
  /// Solid ancestors along the path are split into full children, the
  /// target octant is dropped together with any subtree beneath it, and
  /// ancestors that become empty are erased upward. The depth contract
  /// matches [`set`].
  ///
  /// [`set`]: Octree::set
  pub fn clear(&mut self, code: C) {
    debug_assert!(
      code.depth() <= C::MAX_DEPTH,
      "code depth {} exceeds max depth {}",
      code.depth(),
      C::MAX_DEPTH
    );
    if code == C::ROOT {
      self.clear_root();
      return;
    }

    let parent = code.parent();
    let parent_depth = parent.depth();

    // Walk down from the root, splitting solid cells along the path.
    for depth in 0..parent_depth {
      let ancestor = code.ancestor(parent_depth + 1 - depth);
      let next = code.ancestor(parent_depth - depth);
      let octant = next.final_octant();

      let Some(node) = self.nodes.get_mut(&ancestor) else {
        return;
      };
      if node.child_open(octant) {
        continue;
      }
      if !node.child_solid(octant) {
        return; // Already empty below the target; nothing to carve.
      }
      node.mark_open(octant);
      self.nodes.insert(next, NodeMask::FULL);
    }

    // At the parent: drop the target octant and any subtree beneath it.
    let octant = code.final_octant();
    let Some(node) = self.nodes.get_mut(&parent) else {
      return;
    };
    if !node.child_open(octant) && !node.child_solid(octant) {
      return;
    }
    let had_subtree = node.child_open(octant);
    node.clear_child(octant);
    if had_subtree {
      self.erase_subtree(code);
    }

    // Carving may have emptied some ancestors; erase them upward. The
    // root stays, empty or not.
    let mut ancestor = parent;
    for _ in 0..parent_depth {
      match self.nodes.get(&ancestor) {
        Some(&mask) if mask.is_empty() => {}
        _ => break,
      }
      self.nodes.remove(&ancestor);
      let octant = ancestor.final_octant();
      ancestor = ancestor.parent();
      if let Some(node) = self.nodes.get_mut(&ancestor) {
        node.clear_child(octant);
      }
    }
  }

  /// Bulk-set every cell at `depth` whose grid coordinates satisfy the
  /// predicate.
  ///
  /// Visits the full `(1 << depth)^3` grid; solid regions still collapse
  /// through the normal merge path, so the resulting tree is as small as
  /// setting the cells one by one.
  #[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip_all, name = "octree::fill_at_depth")
  )]
  pub fn fill_at_depth<F>(&mut self, depth: u8, mut cell_is_solid: F)
  where
    F: FnMut(UVec3) -> bool,
  {
    debug_assert!(
      depth <= C::MAX_DEPTH,
      "depth {} exceeds max depth {}",
      depth,
      C::MAX_DEPTH
    );
    let resolution = 1u32 << depth;
    for x in 0..resolution {
      for y in 0..resolution {
        for z in 0..resolution {
          let cell = UVec3::new(x, y, z);
          if cell_is_solid(cell) {
            self.set(C::from_grid(depth, cell));
          }
        }
      }
    }
  }

  /// Occupied fraction of the root cube, in `[0, 1]`.
  ///
  /// Accumulated in exact integer units before the final division.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::volume"))]
  pub fn volume(&self) -> f64 {
    self.subtree_volume(C::ROOT, ROOT_VOLUME >> 3) as f64 / ROOT_VOLUME as f64
  }

  /// The stored mask for `code`, if a node exists there.
  pub fn node(&self, code: C) -> Option<NodeMask> {
    self.nodes.get(&code).copied()
  }

  /// Number of stored nodes (the root always counts).
  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  /// Deepest addressable level for this code width.
  pub const fn max_depth() -> u8 {
    C::MAX_DEPTH
  }

  /// Iterate over all stored nodes in unspecified order.
  pub fn nodes(&self) -> impl Iterator<Item = (C, NodeMask)> + '_ {
    self.nodes.iter().map(|(&code, &mask)| (code, mask))
  }

  /// Remove the node at `code` and every node below it.
  fn erase_subtree(&mut self, code: C) {
    let Some(mask) = self.nodes.remove(&code) else {
      return;
    };
    let children: SmallVec<[C; 8]> = mask.open_children().map(|octant| code.child(octant)).collect();
    for child in children {
      self.erase_subtree(child);
    }
  }

  /// Occupied volume under `code` in integer units, where a solid child
  /// of this node contributes `child_volume`.
  fn subtree_volume(&self, code: C, child_volume: u64) -> u64 {
    let Some(&mask) = self.nodes.get(&code) else {
      return 0;
    };
    let mut total = 0;
    for octant in 0..8u8 {
      if mask.child_open(octant) {
        total += self.subtree_volume(code.child(octant), child_volume >> 3);
      } else if mask.child_solid(octant) {
        total += child_volume;
      }
    }
    total
  }
}

impl<C: LocationCode> Default for Octree<C> {
  fn default() -> Self {
    Self::new()
  }
}

impl<C: LocationCode> fmt::Display for Octree<C> {
  /// Dump nodes sorted by code, one line each: solid children (SC) and
  /// open children (OC), codes padded to the widest width.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Octree with volume {}:", self.volume())?;

    let mut codes: Vec<C> = self.nodes.keys().copied().collect();
    codes.sort_unstable();
    let padding = codes.last().map_or(0, |code| format!("{code}").len());

    for code in codes {
      let Some(&mask) = self.nodes.get(&code) else {
        continue;
      };
      write!(f, "{code:>padding$} (D{}): SC: [", code.depth())?;
      for octant in mask.solid_children() {
        write!(f, "{} ", code.child(octant))?;
      }
      write!(f, "], OC: [")?;
      for octant in mask.open_children() {
        write!(f, "{} ", code.child(octant))?;
      }
      writeln!(f, "]")?;
    }
    Ok(())
  }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
