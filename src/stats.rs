//! On-demand statistics over the node map.

use crate::code::LocationCode;
use crate::tree::Octree;

/// Summary of the tree's current shape.
///
/// Computed by a single pass over the node map; nothing is cached.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OctreeStats {
  /// Stored nodes, including the root.
  pub node_count: usize,
  /// Solid leaf cells across all nodes.
  pub solid_leaf_count: usize,
  /// Depth of the deepest solid cell (0 when nothing is occupied).
  pub deepest_depth: u8,
  /// Node count per node depth, indexed by depth.
  pub nodes_per_depth: Vec<usize>,
}

impl<C: LocationCode> Octree<C> {
  /// Compute statistics for the current tree.
  pub fn stats(&self) -> OctreeStats {
    // Sized to cover every depth a stored node can occupy, including
    // parents of out-of-contract codes one level past MAX_DEPTH, so a
    // read never indexes out of bounds.
    let mut stats = OctreeStats {
      nodes_per_depth: vec![0; C::MAX_DEPTH as usize + 1],
      ..OctreeStats::default()
    };

    for (code, mask) in self.nodes() {
      let depth = code.depth();
      stats.node_count += 1;
      stats.nodes_per_depth[depth as usize] += 1;

      let solid = mask.solid_children().count();
      stats.solid_leaf_count += solid;
      if solid > 0 {
        // Solid children sit one level below their node.
        stats.deepest_depth = stats.deepest_depth.max(depth + 1);
      }
    }
    stats
  }
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod stats_test;
