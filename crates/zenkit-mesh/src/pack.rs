//! Full packing pipeline and its output.

use glam::Vec3;

use crate::{
    Material, RawMesh, VERTEX_STRIDE, Vertex, VertexWelder, collect_triangles, dedup_materials,
    sort_triangles,
};

/// A contiguous run of indices drawn with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DrawRange {
    /// Index into [`PackedMesh::materials`].
    pub material: u32,
    /// First element of [`PackedMesh::indices`] in this run.
    pub first_index: usize,
    pub index_count: usize,
}

/// Renderer-ready mesh.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PackedMesh {
    /// Interleaved position, normal and uv; [`VERTEX_STRIDE`] floats per vertex.
    pub vertices: Vec<f32>,
    /// Triangle list. Each entry is a float offset into `vertices`, so divide
    /// by [`VERTEX_STRIDE`] for the vertex number.
    pub indices: Vec<u32>,
    /// Material of each triangle, in the same order as `indices`.
    pub material_ids: Vec<u32>,
    /// Deduplicated material table.
    pub materials: Vec<Material>,
    /// Per-material index runs, in `indices` order.
    pub draw_ranges: Vec<DrawRange>,
}

impl PackedMesh {
    /// Whether nothing was packed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
            && self.indices.is_empty()
            && self.material_ids.is_empty()
            && self.materials.is_empty()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.material_ids.len()
    }

    /// The `index`th vertex.
    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<Vertex> {
        let start = index.checked_mul(VERTEX_STRIDE)?;
        Vertex::from_floats(self.vertices.get(start..)?)
    }

    /// Indices expressed as vertex numbers rather than float offsets.
    pub fn vertex_indices(&self) -> impl Iterator<Item = u32> + '_ {
        // VERTEX_STRIDE is a small constant.
        #[allow(clippy::cast_possible_truncation)]
        let stride = VERTEX_STRIDE as u32;
        self.indices.iter().map(move |&offset| offset / stride)
    }

    /// Axis-aligned bounds of all packed positions.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.vertices
            .chunks_exact(VERTEX_STRIDE)
            .map(|v| Vec3::new(v[0], v[1], v[2]))
            .fold(None, |bounds, p| match bounds {
                None => Some((p, p)),
                Some((min, max)) => Some((min.min(p), max.max(p))),
            })
    }
}

/// Counters describing what [`pack_mesh_with_report`] repaired or discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackReport {
    /// Input materials folded into a similar earlier one.
    pub merged_materials: usize,
    /// Triangles whose material index was out of range.
    pub dropped_triangles: usize,
    /// Corners beyond the end of the corner streams.
    pub skipped_corners: usize,
    /// Corners whose attribute index was shifted by 16 bits. A shifted corner
    /// that is still out of range also counts toward `fallback_corners`.
    pub corrected_attributes: usize,
    /// Corners forced to position and attribute 0.
    pub fallback_corners: usize,
    /// Corners that reused an already emitted vertex.
    pub welded_corners: usize,
}

/// Pack a decoded mesh.
///
/// Never fails. Malformed input produces a smaller or visibly wrong mesh,
/// and a mesh without corner indices or materials packs to an empty one.
#[must_use]
pub fn pack_mesh(mesh: &RawMesh<'_>) -> PackedMesh {
    pack_mesh_with_report(mesh).0
}

/// Pack a decoded mesh and count the repairs made along the way.
#[must_use]
pub fn pack_mesh_with_report(mesh: &RawMesh<'_>) -> (PackedMesh, PackReport) {
    if mesh.corner_count() == 0 || mesh.materials.is_empty() {
        tracing::debug!("Nothing to pack: no corner indices or no materials");
        return (PackedMesh::default(), PackReport::default());
    }

    let table = dedup_materials(mesh.materials);

    let mut triangles = collect_triangles(mesh.triangle_material_indices, &table.remap);
    sort_triangles(&mut triangles);

    let mut welder = VertexWelder::new(*mesh);
    for &triangle in &triangles {
        welder.weld_triangle(triangle);
    }
    let welded = welder.finish();

    let report = PackReport {
        merged_materials: table.merged_count(),
        dropped_triangles: mesh.triangle_count() - triangles.len(),
        skipped_corners: welded.skipped_corners,
        corrected_attributes: welded.corrected_attributes,
        fallback_corners: welded.fallback_corners,
        welded_corners: welded.welded_corners,
    };

    let packed = PackedMesh {
        vertices: welded.vertices,
        indices: welded.indices,
        material_ids: welded.material_ids,
        materials: table.materials,
        draw_ranges: welded.draw_ranges,
    };

    tracing::debug!(
        "Packed mesh: {} vertices, {} triangles, {} materials",
        packed.vertex_count(),
        packed.triangle_count(),
        packed.materials.len()
    );

    (packed, report)
}
