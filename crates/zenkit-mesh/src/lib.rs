//! Pack decoded ZenKit meshes into renderer-ready buffers.
//!
//! The archive decoder hands out meshes with separately indexed position and
//! attribute streams plus one material index per triangle. This crate turns
//! such a mesh into a single interleaved vertex buffer, a triangle index list
//! grouped by material and a deduplicated material table.
//!
//! # Design principles
//!
//! - **Synchronous**: No async, no threading primitives
//! - **Infallible**: Malformed indices degrade the output, they never fail it
//! - **User-controlled parallelism**: Independent meshes can be packed on any thread
//!
//! # Key functions
//!
//! - [`pack_mesh`]: Run the full pipeline on a [`RawMesh`]
//! - [`pack_mesh_with_report`]: Same, plus counters for everything that was repaired or dropped
//! - [`dedup_materials`]: Merge visually identical materials
//! - [`collect_triangles`] and [`sort_triangles`]: Build and group triangle records
//! - [`VertexWelder`]: Weld triangle corners into unique vertices

mod dedup;
mod pack;
mod triangles;
mod weld;

pub mod material;

pub use dedup::{MaterialTable, dedup_materials};
pub use material::{AnimationMapping, Color, Material, MaterialGroup, WaveMode, WaveSpeed};
pub use pack::{DrawRange, PackReport, PackedMesh, pack_mesh, pack_mesh_with_report};
pub use triangles::{Triangle, collect_triangles, sort_triangles};
pub use weld::{
    CornerResolution, ResolvedCorner, VertexWelder, WeldedBuffers, composite_key, resolve_corner,
};

use glam::{Vec2, Vec3};

/// Number of `f32` values per packed vertex.
pub const VERTEX_STRIDE: usize = 8;

/// Per-corner shading data referenced by attribute index.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VertexAttribute {
    pub normal: Vec3,
    pub uv: Vec2,
    /// Baked light color. Carried through decoding but not packed.
    pub light: u32,
}

/// Borrowed view of a decoded mesh.
///
/// Corner `c` of triangle `t` lives at `3 * t + c` in both corner streams.
/// Nothing here is validated up front; the packer tolerates any combination
/// of lengths and index values.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawMesh<'a> {
    pub positions: &'a [Vec3],
    pub attributes: &'a [VertexAttribute],
    pub corner_position_indices: &'a [u32],
    pub corner_attribute_indices: &'a [u32],
    pub triangle_material_indices: &'a [u32],
    pub materials: &'a [Material],
}

impl RawMesh<'_> {
    /// Number of triangles, as given by the per-triangle material stream.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangle_material_indices.len()
    }

    /// Number of corners that can be read from both corner streams.
    #[must_use]
    pub fn corner_count(&self) -> usize {
        self.corner_position_indices
            .len()
            .min(self.corner_attribute_indices.len())
    }
}

/// One packed vertex, laid out exactly as it appears in
/// [`PackedMesh::vertices`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

const _: () = assert!(std::mem::size_of::<Vertex>() == VERTEX_STRIDE * 4);

impl Vertex {
    /// Build a vertex from a resolved position and attribute.
    #[must_use]
    pub fn new(position: Vec3, attribute: &VertexAttribute) -> Self {
        Self {
            position: position.to_array(),
            normal: attribute.normal.to_array(),
            uv: attribute.uv.to_array(),
        }
    }

    /// Read a vertex back from a stride-sized slice.
    ///
    /// Returns `None` if `floats` is shorter than [`VERTEX_STRIDE`].
    #[must_use]
    pub fn from_floats(floats: &[f32]) -> Option<Self> {
        let f: &[f32; VERTEX_STRIDE] = floats.get(..VERTEX_STRIDE)?.try_into().ok()?;
        Some(Self {
            position: [f[0], f[1], f[2]],
            normal: [f[3], f[4], f[5]],
            uv: [f[6], f[7]],
        })
    }

    /// The interleaved float representation.
    #[must_use]
    pub fn to_floats(&self) -> [f32; VERTEX_STRIDE] {
        let [px, py, pz] = self.position;
        let [nx, ny, nz] = self.normal;
        let [u, v] = self.uv;
        [px, py, pz, nx, ny, nz, u, v]
    }
}
