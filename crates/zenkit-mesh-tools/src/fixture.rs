//! JSON mesh fixtures.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use zenkit_mesh::{Material, PackReport, PackedMesh, RawMesh, VertexAttribute};

use crate::{Error, Result};

/// Owned, serializable counterpart of [`RawMesh`].
///
/// Missing fields default to empty, so partial fixtures describing only
/// the streams under test are valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshFixture {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub attributes: Vec<VertexAttribute>,
    pub corner_position_indices: Vec<u32>,
    pub corner_attribute_indices: Vec<u32>,
    pub triangle_material_indices: Vec<u32>,
    pub materials: Vec<Material>,
}

impl MeshFixture {
    /// Borrow the fixture as packer input.
    #[must_use]
    pub fn as_raw(&self) -> RawMesh<'_> {
        RawMesh {
            positions: &self.positions,
            attributes: &self.attributes,
            corner_position_indices: &self.corner_position_indices,
            corner_attribute_indices: &self.corner_attribute_indices,
            triangle_material_indices: &self.triangle_material_indices,
            materials: &self.materials,
        }
    }
}

pub fn parse_fixture(json: &str) -> Result<MeshFixture> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_fixture(path: impl AsRef<Path>) -> Result<MeshFixture> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let fixture = parse_fixture(&content)?;
    tracing::debug!(
        "Loaded fixture '{}' from {}: {} triangles, {} materials",
        fixture.name,
        path.display(),
        fixture.triangle_material_indices.len(),
        fixture.materials.len()
    );
    Ok(fixture)
}

/// Render a packed mesh, and optionally its report, as JSON.
///
/// Counts are duplicated at the top level so summaries can be compared
/// without walking the buffers.
pub fn packed_to_json(
    packed: &PackedMesh,
    report: Option<&PackReport>,
) -> Result<serde_json::Value> {
    let mesh = serde_json::to_value(packed)?;
    let mut json = serde_json::json!({
        "vertex_count": packed.vertex_count(),
        "index_count": packed.indices.len(),
        "triangle_count": packed.triangle_count(),
        "material_count": packed.materials.len(),
        "mesh": mesh,
    });
    if let Some(report) = report {
        json["report"] = serde_json::to_value(report)?;
    }
    Ok(json)
}

pub fn save_packed(
    path: impl AsRef<Path>,
    packed: &PackedMesh,
    report: Option<&PackReport>,
) -> Result<()> {
    let path = path.as_ref();
    let json = packed_to_json(packed, report)?;
    fs::write(path, serde_json::to_string_pretty(&json)?).map_err(|e| Error::io(path, e))?;
    tracing::info!("Wrote packed mesh to {}", path.display());
    Ok(())
}

/// Read packed output previously written by [`save_packed`] or another
/// packer, for use with [`compare_packed`](crate::compare_packed).
pub fn load_packed_json(path: impl AsRef<Path>) -> Result<serde_json::Value> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&content)?)
}
