//! voxel_octree - sparse voxel occupancy octree over hashed location codes.
//!
//! The tree is stored as a flat hash map from location codes to 16-bit
//! child masks. Fully occupied regions collapse to a single bit in their
//! parent, so memory tracks the occupancy *surface* rather than the
//! occupied volume.
//!
//! # Features
//!
//! - **Set/clear at any depth**: cubes merge upward when a node fills and
//!   split downward when a solid region is carved
//! - **Exact volume**: occupied fraction accumulated in integer units
//! - **Grid codecs**: bit-interleaved conversion between location codes
//!   and per-axis cell indices
//! - **OBJ export**: dump the occupied cells as a cube mesh
//!
//! # Example
//!
//! ```
//! use voxel_octree::Octree32;
//!
//! let mut tree = Octree32::new();
//! tree.set(0b1000); // octant 0 of the root
//! assert_eq!(tree.volume(), 0.125);
//!
//! tree.clear(0b1000);
//! assert_eq!(tree.volume(), 0.0);
//! ```

pub mod code;
pub mod export;
pub mod node;
pub mod stats;
pub mod tree;

// Re-export commonly used items
pub use code::LocationCode;
pub use export::{ExportError, ExportFormat, ExportOptions};
pub use node::NodeMask;
pub use stats::OctreeStats;
pub use tree::{Octree, Octree32, Octree64};
