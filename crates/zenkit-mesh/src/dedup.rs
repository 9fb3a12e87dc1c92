//! Material deduplication.

use crate::Material;

/// Result of [`dedup_materials`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialTable {
    /// One representative per class of similar materials, in order of first
    /// appearance.
    pub materials: Vec<Material>,
    /// For every input material, its position in `materials`.
    pub remap: Vec<u32>,
}

impl MaterialTable {
    /// Deduplicated index for an original material index, if it exists.
    #[must_use]
    pub fn get(&self, original: u32) -> Option<u32> {
        self.remap.get(original as usize).copied()
    }

    /// Number of input materials folded into another one.
    #[must_use]
    pub fn merged_count(&self) -> usize {
        self.remap.len() - self.materials.len()
    }
}

/// Merge materials that render identically.
///
/// Every pair `(i, r)` with `i < r` is visited once in index order. When the
/// two are [similar](Material::is_similar) and not yet in the same class, `r`
/// joins the class of `i`. Similarity is not guaranteed to be transitive, so
/// class membership follows this traversal order; chains like `a ~ b ~ c`
/// with `a !~ c` resolve in favor of the lower index.
#[must_use]
pub fn dedup_materials(materials: &[Material]) -> MaterialTable {
    let count = materials.len();
    let mut class_of: Vec<usize> = (0..count).collect();

    for i in 0..count {
        for r in (i + 1)..count {
            if class_of[i] != class_of[r] && materials[i].is_similar(&materials[r]) {
                class_of[r] = class_of[i];
            }
        }
    }

    // Compact: the first index of each class seeds its output slot.
    let mut slot_of_class: Vec<Option<u32>> = vec![None; count];
    let mut table = MaterialTable {
        materials: Vec::new(),
        remap: Vec::with_capacity(count),
    };

    for (index, &class) in class_of.iter().enumerate() {
        let slot = if let Some(slot) = slot_of_class[class] {
            slot
        } else {
            let Ok(slot) = u32::try_from(table.materials.len()) else {
                break;
            };
            table.materials.push(materials[index].clone());
            slot_of_class[class] = Some(slot);
            slot
        };
        table.remap.push(slot);
    }

    tracing::debug!(
        "Deduplicated materials: {} in, {} out",
        count,
        table.materials.len()
    );

    table
}
