//! Location codes - integer encodings of octree cell positions.
//!
//! A location code packs the path from the root to a cell into a single
//! unsigned integer: a sentinel high bit followed by one 3-bit octant index
//! per level. The root is `0b1`; appending octant `o` gives
//! `(code << 3) | o`. Depth falls out of the sentinel position, so no
//! separate depth field is stored anywhere.
//!
//! # Octant Convention
//!
//! Octant bits encode +X, +Y, +Z offsets:
//! - bit 0: X offset (0 or 1)
//! - bit 1: Y offset (0 or 1)
//! - bit 2: Z offset (0 or 1)

use std::fmt;
use std::hash::Hash;

use glam::UVec3;

mod sealed {
  pub trait Sealed {}
  impl Sealed for u32 {}
  impl Sealed for u64 {}
}

/// Integer type usable as an octree location code.
///
/// Implemented for `u32` (max depth 9) and `u64` (max depth 20). The max
/// depth is the deepest level whose codes still fit under the sentinel bit.
pub trait LocationCode:
  sealed::Sealed + Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + fmt::Binary + 'static
{
  /// The root code, `0b1`.
  const ROOT: Self;

  /// Deepest addressable level. The root is depth 0.
  const MAX_DEPTH: u8;

  /// Width of the code type in bits.
  const BITS: u32;

  /// Depth of the cell this code addresses (root = 0).
  fn depth(self) -> u8;

  /// Code of the ancestor `levels` levels up.
  fn ancestor(self, levels: u8) -> Self;

  /// Code of the parent cell.
  #[inline]
  fn parent(self) -> Self {
    self.ancestor(1)
  }

  /// Code of the child cell in the given octant (0-7).
  fn child(self, octant: u8) -> Self;

  /// The last octant step on the path, i.e. this cell's index within its
  /// parent.
  fn final_octant(self) -> u8;

  /// Build a code from per-axis cell indices at the given depth.
  ///
  /// Each index must be below `1 << depth`. Inverse of [`lower_corner`]
  /// up to the finest-grid scaling.
  ///
  /// [`lower_corner`]: LocationCode::lower_corner
  fn from_grid(depth: u8, cell: UVec3) -> Self;

  /// Minimum corner of the cell in finest-grid units.
  ///
  /// The grid spans `0..=1 << MAX_DEPTH` per axis; a cell at depth `d`
  /// covers `1 << (MAX_DEPTH - d)` units per axis.
  fn lower_corner(self) -> UVec3;

  /// Zero-padded binary rendering, for debugging dumps.
  fn to_binary(self) -> String {
    format!("{:0width$b}", self, width = Self::BITS as usize)
  }
}

// Bit-interleave masks: every 3rd bit, 20 triplets (covers u64's 60 path
// bits; u32 codes only ever populate the low 27).
const X_MASK: u64 = 0o1111_1111_1111_1111_1111;
const Y_MASK: u64 = 0o2222_2222_2222_2222_2222;
const Z_MASK: u64 = 0o4444_4444_4444_4444_4444;

/// Software pext: gather the bits of `value` selected by `mask` into the
/// low bits of the result.
const fn extract_bits(value: u64, mut mask: u64) -> u64 {
  let mut out = 0u64;
  let mut index = 0;
  while mask != 0 {
    let bit = mask & mask.wrapping_neg();
    if value & bit != 0 {
      out |= 1 << index;
    }
    index += 1;
    mask &= mask - 1;
  }
  out
}

/// Software pdep: scatter the low bits of `value` into the positions
/// selected by `mask`.
const fn deposit_bits(value: u64, mut mask: u64) -> u64 {
  let mut out = 0u64;
  let mut index = 0;
  while mask != 0 {
    let bit = mask & mask.wrapping_neg();
    if value & (1 << index) != 0 {
      out |= bit;
    }
    index += 1;
    mask &= mask - 1;
  }
  out
}

macro_rules! impl_location_code {
  ($ty:ty, $max_depth:expr) => {
    impl LocationCode for $ty {
      const ROOT: Self = 1;
      const MAX_DEPTH: u8 = $max_depth;
      const BITS: u32 = <$ty>::BITS;

      #[inline]
      fn depth(self) -> u8 {
        debug_assert!(self != 0, "location codes are never zero");
        ((<$ty>::BITS - 1 - self.leading_zeros()) / 3) as u8
      }

      #[inline]
      fn ancestor(self, levels: u8) -> Self {
        self >> (3 * levels as u32)
      }

      #[inline]
      fn child(self, octant: u8) -> Self {
        debug_assert!(octant < 8, "octant out of range: {}", octant);
        (self << 3) | octant as $ty
      }

      #[inline]
      fn final_octant(self) -> u8 {
        (self & 0x7) as u8
      }

      fn from_grid(depth: u8, cell: UVec3) -> Self {
        debug_assert!(
          depth <= Self::MAX_DEPTH,
          "depth {} exceeds max depth {}",
          depth,
          Self::MAX_DEPTH
        );
        debug_assert!(
          depth == 0 || cell.max_element() < 1u32 << depth,
          "cell {:?} out of range at depth {}",
          cell,
          depth
        );
        let sentinel = 1u64 << (3 * depth as u32);
        (sentinel
          | deposit_bits(cell.x as u64, X_MASK)
          | deposit_bits(cell.y as u64, Y_MASK)
          | deposit_bits(cell.z as u64, Z_MASK)) as $ty
      }

      fn lower_corner(self) -> UVec3 {
        let depth = self.depth();
        let code = self as u64;
        let path = code & !(1u64 << (63 - code.leading_zeros()));
        let shift = (Self::MAX_DEPTH - depth) as u32;
        UVec3::new(
          (extract_bits(path, X_MASK) as u32) << shift,
          (extract_bits(path, Y_MASK) as u32) << shift,
          (extract_bits(path, Z_MASK) as u32) << shift,
        )
      }
    }
  };
}

impl_location_code!(u32, 9);
impl_location_code!(u64, 20);

#[cfg(test)]
#[path = "code_test.rs"]
mod code_test;
