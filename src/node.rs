//! NodeMask - per-node child occupancy bitmask.
//!
//! Each stored octree node is a single `u16` describing its 8 children:
//! the low byte marks children that have their own node in the map
//! ("open"), the high byte marks children that are fully occupied
//! ("solid"). The two planes are mutually exclusive per octant; a solid
//! child has no subtree and an open child's occupancy lives in its own
//! node.

/// Child occupancy mask of one octree node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NodeMask(u16);

impl NodeMask {
  /// No children open, none solid.
  pub const EMPTY: NodeMask = NodeMask(0);

  /// All 8 children solid.
  pub const FULL: NodeMask = NodeMask(0xff00);

  /// Mask with a single open child.
  #[inline]
  pub fn open_child(octant: u8) -> Self {
    NodeMask(1 << octant)
  }

  /// Mask with a single solid child.
  #[inline]
  pub fn solid_child(octant: u8) -> Self {
    NodeMask(0x100 << octant)
  }

  /// Construct from the raw bit pattern (low byte open, high byte solid).
  #[inline]
  pub fn from_raw(raw: u16) -> Self {
    NodeMask(raw)
  }

  /// The raw bit pattern.
  #[inline]
  pub fn raw(self) -> u16 {
    self.0
  }

  /// Whether the child in `octant` has its own node.
  #[inline]
  pub fn child_open(self, octant: u8) -> bool {
    self.0 & (1 << octant) != 0
  }

  /// Whether the child in `octant` is fully occupied (and has no node).
  #[inline]
  pub fn child_solid(self, octant: u8) -> bool {
    !self.child_open(octant) && self.0 & (0x100 << octant) != 0
  }

  /// Mark a child as open, dropping any solid marking.
  #[inline]
  pub fn mark_open(&mut self, octant: u8) {
    self.0 |= 1 << octant;
    self.0 &= !(0x100 << octant);
  }

  /// Mark a child as solid, dropping any open marking.
  #[inline]
  pub fn mark_solid(&mut self, octant: u8) {
    self.0 |= 0x100 << octant;
    self.0 &= !(1 << octant);
  }

  /// Drop both markings for a child (now empty).
  #[inline]
  pub fn clear_child(&mut self, octant: u8) {
    self.0 &= !(1 << octant | 0x100 << octant);
  }

  #[inline]
  pub fn is_empty(self) -> bool {
    self == Self::EMPTY
  }

  #[inline]
  pub fn is_full(self) -> bool {
    self == Self::FULL
  }

  /// Octants whose children have their own nodes.
  pub fn open_children(self) -> impl Iterator<Item = u8> {
    (0..8u8).filter(move |&octant| self.child_open(octant))
  }

  /// Octants whose children are fully occupied.
  pub fn solid_children(self) -> impl Iterator<Item = u8> {
    (0..8u8).filter(move |&octant| self.child_solid(octant))
  }
}

impl std::fmt::Debug for NodeMask {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NodeMask")
      .field("open", &self.open_children().collect::<Vec<_>>())
      .field("solid", &self.solid_children().collect::<Vec<_>>())
      .finish()
  }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
