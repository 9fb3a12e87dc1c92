//! Vertex welding.
//!
//! Each triangle corner references a position and an attribute through two
//! independent index streams. Welding merges corners with the same
//! `(position, attribute)` pair into one output vertex.

use std::collections::HashMap;

use glam::Vec3;

use crate::{DrawRange, RawMesh, Triangle, VERTEX_STRIDE, Vertex};

/// Combine a position and attribute index into one cache key.
///
/// The position index occupies the high 32 bits.
#[must_use]
pub const fn composite_key(position: u32, attribute: u32) -> u64 {
    ((position as u64) << 32) | attribute as u64
}

/// How a corner's indices were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerResolution {
    /// Both indices were in range as read.
    Direct,
    /// The attribute index carried a stale high-order tag and the shift
    /// brought it into range.
    Corrected,
    /// At least one index stayed out of range; both were forced to zero.
    Fallback,
}

/// A corner's final `(position, attribute)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCorner {
    pub position: u32,
    pub attribute: u32,
    pub resolution: CornerResolution,
    /// The attribute index was shifted right by 16, whether or not that
    /// brought it into range.
    pub corrected: bool,
}

/// Apply the legacy attribute correction and the bounds fallback.
///
/// Some authoring tools stored attribute indices with the real index in the
/// upper 16 bits. An out-of-range attribute index is therefore shifted right
/// by 16 first; anything still out of range afterwards resolves to `(0, 0)`.
#[must_use]
pub fn resolve_corner(
    position: u32,
    attribute: u32,
    position_count: usize,
    attribute_count: usize,
) -> ResolvedCorner {
    let corrected = attribute as usize >= attribute_count;
    let attribute = if corrected { attribute >> 16 } else { attribute };

    if position as usize >= position_count || attribute as usize >= attribute_count {
        return ResolvedCorner {
            position: 0,
            attribute: 0,
            resolution: CornerResolution::Fallback,
            corrected,
        };
    }

    let resolution = if corrected {
        CornerResolution::Corrected
    } else {
        CornerResolution::Direct
    };
    ResolvedCorner {
        position,
        attribute,
        resolution,
        corrected,
    }
}

/// Buffers produced by a [`VertexWelder`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeldedBuffers {
    /// Interleaved vertices, [`VERTEX_STRIDE`] floats each.
    pub vertices: Vec<f32>,
    /// Float offsets into `vertices`, one per emitted corner.
    pub indices: Vec<u32>,
    /// Material of every welded triangle, in weld order.
    pub material_ids: Vec<u32>,
    /// Contiguous index runs sharing a material.
    pub draw_ranges: Vec<DrawRange>,
    /// Corners whose index read fell outside the corner streams.
    pub skipped_corners: usize,
    /// Corners whose attribute index was shifted by 16 bits, including
    /// those that still fell back afterwards.
    pub corrected_attributes: usize,
    /// Corners forced to `(0, 0)`.
    pub fallback_corners: usize,
    /// Corners that reused an existing vertex.
    pub welded_corners: usize,
}

/// Welds triangle corners into a deduplicated vertex buffer.
pub struct VertexWelder<'a> {
    mesh: RawMesh<'a>,
    cache: HashMap<u64, u32>,
    out: WeldedBuffers,
}

impl<'a> VertexWelder<'a> {
    #[must_use]
    pub fn new(mesh: RawMesh<'a>) -> Self {
        Self {
            mesh,
            cache: HashMap::new(),
            out: WeldedBuffers::default(),
        }
    }

    /// Emit the corners of one triangle.
    ///
    /// Corners that cannot be read from the corner streams are skipped, so a
    /// triangle may contribute fewer than three indices.
    pub fn weld_triangle(&mut self, triangle: Triangle) {
        let first_index = self.out.indices.len();

        for c in 0..3 {
            let corner = triangle.base_corner as usize + c;
            let (Some(&position), Some(&attribute)) = (
                self.mesh.corner_position_indices.get(corner),
                self.mesh.corner_attribute_indices.get(corner),
            ) else {
                self.out.skipped_corners += 1;
                continue;
            };

            let offset = self.weld_corner(corner, position, attribute);
            self.out.indices.push(offset);
        }

        self.out.material_ids.push(triangle.material);
        self.extend_draw_ranges(triangle.material, first_index);
    }

    /// Consume the welder, returning its buffers.
    #[must_use]
    pub fn finish(self) -> WeldedBuffers {
        tracing::debug!(
            "Welded {} corners into {} vertices ({} reused)",
            self.out.indices.len(),
            self.out.vertices.len() / VERTEX_STRIDE,
            self.out.welded_corners
        );
        self.out
    }

    fn weld_corner(&mut self, corner: usize, position: u32, attribute: u32) -> u32 {
        let resolved = resolve_corner(
            position,
            attribute,
            self.mesh.positions.len(),
            self.mesh.attributes.len(),
        );

        if resolved.corrected {
            self.out.corrected_attributes += 1;
            tracing::trace!(
                "Corner {corner}: attribute index {attribute} shifted to {}",
                attribute >> 16
            );
        }
        if resolved.resolution == CornerResolution::Fallback {
            self.out.fallback_corners += 1;
            tracing::trace!(
                "Corner {corner}: indices ({position}, {attribute}) out of range, using (0, 0)"
            );
        }

        let key = composite_key(resolved.position, resolved.attribute);
        if let Some(&offset) = self.cache.get(&key) {
            self.out.welded_corners += 1;
            return offset;
        }

        // Index buffers address vertices with u32 offsets.
        #[allow(clippy::cast_possible_truncation)]
        let offset = self.out.vertices.len() as u32;

        // A mesh without positions or attributes still falls back to index 0.
        let position = self
            .mesh
            .positions
            .get(resolved.position as usize)
            .copied()
            .unwrap_or(Vec3::ZERO);
        let attribute = self
            .mesh
            .attributes
            .get(resolved.attribute as usize)
            .copied()
            .unwrap_or_default();

        self.out
            .vertices
            .extend_from_slice(&Vertex::new(position, &attribute).to_floats());
        self.cache.insert(key, offset);
        offset
    }

    fn extend_draw_ranges(&mut self, material: u32, first_index: usize) {
        let emitted = self.out.indices.len() - first_index;
        if emitted == 0 {
            return;
        }

        match self.out.draw_ranges.last_mut() {
            Some(range) if range.material == material => range.index_count += emitted,
            _ => self.out.draw_ranges.push(DrawRange {
                material,
                first_index,
                index_count: emitted,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::VertexAttribute;

    fn attribute(u: f32) -> VertexAttribute {
        VertexAttribute {
            normal: Vec3::Y,
            uv: Vec2::new(u, 1.0 - u),
            light: 0,
        }
    }

    fn tri(base_corner: u32, material: u32) -> Triangle {
        Triangle {
            base_corner,
            material,
        }
    }

    fn range(material: u32, first_index: usize, index_count: usize) -> DrawRange {
        DrawRange {
            material,
            first_index,
            index_count,
        }
    }

    #[test]
    fn composite_key_packs_position_high() {
        assert_eq!(composite_key(1, 2), 0x0000_0001_0000_0002);
        assert_eq!(composite_key(u32::MAX, 0), 0xFFFF_FFFF_0000_0000);
        assert_ne!(composite_key(1, 2), composite_key(2, 1));
    }

    #[test]
    fn in_range_corner_is_direct() {
        let resolved = resolve_corner(3, 4, 10, 10);
        assert_eq!(
            resolved,
            ResolvedCorner {
                position: 3,
                attribute: 4,
                resolution: CornerResolution::Direct,
                corrected: false,
            }
        );
    }

    #[test]
    fn tagged_attribute_is_shifted() {
        let attribute_count = 5;
        let tagged = attribute_count + (2 << 16);
        let resolved = resolve_corner(1, tagged, 4, attribute_count as usize);
        assert_eq!(resolved.attribute, 2);
        assert_eq!(resolved.position, 1);
        assert_eq!(resolved.resolution, CornerResolution::Corrected);
        assert!(resolved.corrected);
    }

    #[test]
    fn shifted_attribute_still_out_of_range_falls_back() {
        let attribute_count = 5;
        let tagged = attribute_count + (9 << 16);
        let resolved = resolve_corner(1, tagged, 4, attribute_count as usize);
        assert_eq!((resolved.position, resolved.attribute), (0, 0));
        assert_eq!(resolved.resolution, CornerResolution::Fallback);
        assert!(resolved.corrected);
    }

    #[test]
    fn position_fallback_is_not_a_correction() {
        let resolved = resolve_corner(9, 1, 4, 5);
        assert_eq!(resolved.resolution, CornerResolution::Fallback);
        assert!(!resolved.corrected);
    }

    #[test]
    fn position_one_past_end_falls_back() {
        let resolved = resolve_corner(4, 1, 4, 5);
        assert_eq!((resolved.position, resolved.attribute), (0, 0));
        assert_eq!(resolved.resolution, CornerResolution::Fallback);
    }

    #[test]
    fn shared_corners_reuse_vertices() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE];
        let attributes = [attribute(0.0), attribute(1.0)];
        let mesh = RawMesh {
            positions: &positions,
            attributes: &attributes,
            corner_position_indices: &[0, 1, 2, 2, 1, 3],
            corner_attribute_indices: &[0, 0, 0, 0, 0, 1],
            ..RawMesh::default()
        };

        let mut welder = VertexWelder::new(mesh);
        welder.weld_triangle(tri(0, 0));
        welder.weld_triangle(tri(3, 0));
        let out = welder.finish();

        assert_eq!(out.indices, [0, 8, 16, 16, 8, 24]);
        assert_eq!(out.vertices.len(), 4 * VERTEX_STRIDE);
        assert_eq!(out.welded_corners, 2);
        assert_eq!(
            Vertex::from_floats(&out.vertices[24..]),
            Some(Vertex::new(Vec3::ONE, &attribute(1.0)))
        );
    }

    #[test]
    fn same_position_different_attribute_is_not_welded() {
        let positions = [Vec3::ZERO];
        let attributes = [attribute(0.0), attribute(0.5), attribute(1.0)];
        let mesh = RawMesh {
            positions: &positions,
            attributes: &attributes,
            corner_position_indices: &[0, 0, 0],
            corner_attribute_indices: &[0, 1, 2],
            ..RawMesh::default()
        };

        let mut welder = VertexWelder::new(mesh);
        welder.weld_triangle(tri(0, 0));
        let out = welder.finish();

        assert_eq!(out.indices, [0, 8, 16]);
        assert_eq!(out.welded_corners, 0);
    }

    #[test]
    fn corners_past_stream_end_are_skipped() {
        let positions = [Vec3::ZERO, Vec3::X];
        let attributes = [attribute(0.0)];
        let mesh = RawMesh {
            positions: &positions,
            attributes: &attributes,
            corner_position_indices: &[0, 1, 0, 1],
            corner_attribute_indices: &[0, 0, 0, 0, 0],
            ..RawMesh::default()
        };

        let mut welder = VertexWelder::new(mesh);
        welder.weld_triangle(tri(3, 2));
        let out = welder.finish();

        assert_eq!(out.indices, [0]);
        assert_eq!(out.skipped_corners, 2);
        assert_eq!(out.material_ids, [2]);
        assert_eq!(out.draw_ranges, [range(2, 0, 1)]);
    }

    #[test]
    fn empty_geometry_writes_zeroed_vertex() {
        let mesh = RawMesh {
            corner_position_indices: &[7, 8, 9],
            corner_attribute_indices: &[1, 2, 3],
            ..RawMesh::default()
        };

        let mut welder = VertexWelder::new(mesh);
        welder.weld_triangle(tri(0, 0));
        let out = welder.finish();

        assert_eq!(out.indices, [0, 0, 0]);
        assert_eq!(out.vertices, [0.0; VERTEX_STRIDE]);
        assert_eq!(out.fallback_corners, 3);
    }

    #[test]
    fn shifted_then_fallback_counts_both() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let attributes = [attribute(0.5)];
        let mesh = RawMesh {
            positions: &positions,
            attributes: &attributes,
            corner_position_indices: &[0, 1, 2],
            corner_attribute_indices: &[0, 1 << 16, 0],
            ..RawMesh::default()
        };

        let mut welder = VertexWelder::new(mesh);
        welder.weld_triangle(tri(0, 0));
        let out = welder.finish();

        assert_eq!(out.corrected_attributes, 1);
        assert_eq!(out.fallback_corners, 1);
        assert_eq!(out.welded_corners, 1);
        assert_eq!(out.indices, [0, 0, 8]);
    }

    #[test]
    fn shift_into_range_is_corrected_only() {
        let positions = [Vec3::ZERO];
        let attributes = [attribute(0.0), attribute(1.0)];
        let mesh = RawMesh {
            positions: &positions,
            attributes: &attributes,
            corner_position_indices: &[0, 0, 0],
            corner_attribute_indices: &[0, 1 << 16, 1],
            ..RawMesh::default()
        };

        let mut welder = VertexWelder::new(mesh);
        welder.weld_triangle(tri(0, 0));
        let out = welder.finish();

        assert_eq!(out.corrected_attributes, 1);
        assert_eq!(out.fallback_corners, 0);
        assert_eq!(out.indices, [0, 8, 8]);
    }

    #[test]
    fn draw_ranges_follow_material_runs() {
        let positions = [Vec3::ZERO];
        let attributes = [attribute(0.0)];
        let mesh = RawMesh {
            positions: &positions,
            attributes: &attributes,
            corner_position_indices: &[0; 9],
            corner_attribute_indices: &[0; 9],
            ..RawMesh::default()
        };

        let mut welder = VertexWelder::new(mesh);
        welder.weld_triangle(tri(0, 0));
        welder.weld_triangle(tri(3, 0));
        welder.weld_triangle(tri(6, 1));
        let out = welder.finish();

        assert_eq!(out.draw_ranges, [range(0, 0, 6), range(1, 6, 3)]);
    }
}
