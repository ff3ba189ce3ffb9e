//! Mesh export of occupied cells.
//!
//! Emits one axis-aligned cube per solid leaf cell. Vertices are
//! deduplicated across cells by their finest-grid corner coordinates, so
//! adjacent cubes share corners. Faces between adjacent solid cells are
//! not culled; the output is a cell dump, not a watertight surface.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::{UVec3, Vec3};
use thiserror::Error;

use crate::code::LocationCode;
use crate::tree::Octree;

/// Supported mesh file formats.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExportFormat {
  /// Wavefront OBJ, quad faces.
  Obj,
}

/// Export failure.
#[derive(Debug, Error)]
pub enum ExportError {
  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),
  #[error("invalid export options: {reason}")]
  InvalidOptions { reason: &'static str },
}

/// World mapping for exported coordinates.
#[derive(Clone, Copy, Debug)]
pub struct ExportOptions {
  /// World-space position of the octree's minimum corner.
  pub origin: Vec3,
  /// World-space edge length of the whole octree cube.
  pub root_size: f32,
}

impl Default for ExportOptions {
  /// Unit cube at the origin.
  fn default() -> Self {
    Self {
      origin: Vec3::ZERO,
      root_size: 1.0,
    }
  }
}

/// Reject mappings that would collapse, mirror, or poison the geometry.
fn validate(options: &ExportOptions) -> Result<(), ExportError> {
  if !options.root_size.is_finite() || options.root_size <= 0.0 {
    return Err(ExportError::InvalidOptions {
      reason: "root_size must be finite and positive",
    });
  }
  if !options.origin.is_finite() {
    return Err(ExportError::InvalidOptions {
      reason: "origin must be finite",
    });
  }
  Ok(())
}

/// Cube corner offsets; corner index bits match the octant convention
/// (bit 0 = X, bit 1 = Y, bit 2 = Z).
const CORNER_OFFSETS: [UVec3; 8] = [
  UVec3::new(0, 0, 0),
  UVec3::new(1, 0, 0),
  UVec3::new(0, 1, 0),
  UVec3::new(1, 1, 0),
  UVec3::new(0, 0, 1),
  UVec3::new(1, 0, 1),
  UVec3::new(0, 1, 1),
  UVec3::new(1, 1, 1),
];

/// Corner indices of the 6 cube faces, wound counter-clockwise seen from
/// outside: -X, +X, -Y, +Y, -Z, +Z.
const FACE_CORNERS: [[usize; 4]; 6] = [
  [0, 4, 6, 2],
  [1, 3, 7, 5],
  [0, 1, 5, 4],
  [2, 6, 7, 3],
  [0, 2, 3, 1],
  [4, 5, 7, 6],
];

impl<C: LocationCode> Octree<C> {
  /// Export the occupied cells as a mesh file.
  pub fn export_mesh<P: AsRef<Path>>(
    &self,
    path: P,
    format: ExportFormat,
    options: ExportOptions,
  ) -> Result<(), ExportError> {
    validate(&options)?;
    match format {
      ExportFormat::Obj => {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_obj(&mut writer, options)?;
        writer.flush()?;
        Ok(())
      }
    }
  }

  /// Write the occupied cells as Wavefront OBJ to an arbitrary sink.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "octree::write_obj"))]
  pub fn write_obj<W: Write>(
    &self,
    writer: &mut W,
    options: ExportOptions,
  ) -> Result<(), ExportError> {
    validate(&options)?;

    // Gather solid cells sorted by code for deterministic output.
    let mut cells: Vec<C> = self
      .nodes()
      .flat_map(|(code, mask)| mask.solid_children().map(move |octant| code.child(octant)))
      .collect();
    cells.sort_unstable();

    // Deduplicate vertices by finest-grid corner position.
    let mut corner_index: HashMap<UVec3, u32> = HashMap::new();
    let mut corners: Vec<UVec3> = Vec::new();
    let mut faces: Vec<[u32; 4]> = Vec::with_capacity(cells.len() * 6);

    for cell in cells {
      let lower = cell.lower_corner();
      let size = 1u32 << (C::MAX_DEPTH - cell.depth()) as u32;

      let mut cube = [0u32; 8];
      for (corner, offset) in cube.iter_mut().zip(CORNER_OFFSETS) {
        let position = lower + offset * size;
        *corner = *corner_index.entry(position).or_insert_with(|| {
          corners.push(position);
          corners.len() as u32 - 1
        });
      }

      for face in FACE_CORNERS {
        faces.push([cube[face[0]], cube[face[1]], cube[face[2]], cube[face[3]]]);
      }
    }

    let scale = options.root_size / (1u32 << C::MAX_DEPTH as u32) as f32;

    writeln!(writer, "o octree")?;
    for corner in &corners {
      let position = options.origin + corner.as_vec3() * scale;
      writeln!(writer, "v {} {} {}", position.x, position.y, position.z)?;
    }
    for face in &faces {
      // OBJ indices are 1-based.
      writeln!(
        writer,
        "f {} {} {} {}",
        face[0] + 1,
        face[1] + 1,
        face[2] + 1,
        face[3] + 1
      )?;
    }
    Ok(())
  }
}

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;
