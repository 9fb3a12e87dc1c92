//! Triangle records and material grouping.

/// A triangle waiting to be welded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle {
    /// Offset of the first corner in the corner streams (`3 * t`).
    pub base_corner: u32,
    /// Index into the deduplicated material table.
    pub material: u32,
}

/// Build one record per triangle with a valid material.
///
/// `remap` is the original-to-deduplicated material map from
/// [`MaterialTable`](crate::MaterialTable). Triangles whose material index
/// falls outside it are dropped. The corner streams are not consulted here.
#[must_use]
pub fn collect_triangles(triangle_material_indices: &[u32], remap: &[u32]) -> Vec<Triangle> {
    let mut triangles = Vec::with_capacity(triangle_material_indices.len());

    for (t, &material_index) in triangle_material_indices.iter().enumerate() {
        let Some(&material) = remap.get(material_index as usize) else {
            tracing::trace!("Dropping triangle {t}: material index {material_index} out of range");
            continue;
        };
        let Ok(base_corner) = u32::try_from(t * 3) else {
            break;
        };
        triangles.push(Triangle {
            base_corner,
            material,
        });
    }

    let dropped = triangle_material_indices.len() - triangles.len();
    if dropped > 0 {
        tracing::debug!("Dropped {dropped} triangles with invalid material indices");
    }

    triangles
}

/// Group triangles by material.
///
/// The sort is unstable: triangles sharing a material may come out in any
/// relative order.
pub fn sort_triangles(triangles: &mut [Triangle]) {
    triangles.sort_unstable_by_key(|triangle| triangle.material);
}
