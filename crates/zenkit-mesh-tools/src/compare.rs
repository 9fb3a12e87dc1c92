//! Compare packed output against reference JSON.
//!
//! Both sides use the layout produced by
//! [`packed_to_json`](crate::packed_to_json). Integers must match exactly,
//! vertex floats within a tolerance.

use serde_json::Value;

use crate::{Error, Result};

/// Default tolerance for vertex floats.
pub const VERTEX_TOLERANCE: f64 = 1e-6;

/// Compare two packed meshes, failing on the first difference.
pub fn compare_packed(actual: &Value, expected: &Value, tolerance: f64) -> Result<()> {
    for field in ["vertex_count", "index_count", "triangle_count", "material_count"] {
        let actual_count = int_field(actual, field, "actual")?;
        let expected_count = int_field(expected, field, "expected")?;
        compare_i64(field, actual_count, expected_count)?;
    }

    let actual_mesh = &actual["mesh"];
    let expected_mesh = &expected["mesh"];

    compare_f64_array(
        "mesh.vertices",
        array_field(actual_mesh, "vertices", "actual")?,
        array_field(expected_mesh, "vertices", "expected")?,
        tolerance,
    )?;
    for field in ["indices", "material_ids"] {
        compare_i64_array(
            &format!("mesh.{field}"),
            array_field(actual_mesh, field, "actual")?,
            array_field(expected_mesh, field, "expected")?,
        )?;
    }
    compare_materials(
        array_field(actual_mesh, "materials", "actual")?,
        array_field(expected_mesh, "materials", "expected")?,
    )?;

    Ok(())
}

fn int_field(json: &Value, field: &str, side: &str) -> Result<i64> {
    json[field]
        .as_i64()
        .ok_or_else(|| Error::mismatch(field, format!("missing {side} value")))
}

fn array_field<'a>(json: &'a Value, field: &str, side: &str) -> Result<&'a [Value]> {
    json[field]
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| Error::mismatch(format!("mesh.{field}"), format!("missing {side} array")))
}

/// Representatives must agree on texture, the field most likely to differ
/// when dedup picks a different class member.
fn compare_materials(actual: &[Value], expected: &[Value]) -> Result<()> {
    check_len("mesh.materials", actual.len(), expected.len())?;

    for (i, (actual_material, expected_material)) in actual.iter().zip(expected).enumerate() {
        let actual_texture = actual_material["texture"].as_str().unwrap_or_default();
        let expected_texture = expected_material["texture"].as_str().unwrap_or_default();
        if actual_texture != expected_texture {
            return Err(Error::mismatch(
                format!("mesh.materials[{i}].texture"),
                format!("actual={actual_texture}, expected={expected_texture}"),
            ));
        }
    }

    tracing::info!("mesh.materials: {} textures match", actual.len());
    Ok(())
}

fn check_len(name: &str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(Error::mismatch(
            name,
            format!("length mismatch: actual={actual}, expected={expected}"),
        ));
    }
    Ok(())
}

fn compare_i64(name: &str, actual: i64, expected: i64) -> Result<()> {
    if actual != expected {
        return Err(Error::mismatch(
            name,
            format!("actual={actual}, expected={expected}"),
        ));
    }
    tracing::info!("{name}: {actual}");
    Ok(())
}

fn compare_i64_array(name: &str, actual: &[Value], expected: &[Value]) -> Result<()> {
    check_len(name, actual.len(), expected.len())?;

    for (i, (actual_val, expected_val)) in actual.iter().zip(expected).enumerate() {
        let actual_num = actual_val
            .as_i64()
            .ok_or_else(|| Error::mismatch(format!("{name}[{i}]"), "invalid actual value"))?;
        let expected_num = expected_val
            .as_i64()
            .ok_or_else(|| Error::mismatch(format!("{name}[{i}]"), "invalid expected value"))?;
        if actual_num != expected_num {
            return Err(Error::mismatch(
                format!("{name}[{i}]"),
                format!("actual={actual_num}, expected={expected_num}"),
            ));
        }
    }

    tracing::info!("{name}: {} values match", actual.len());
    Ok(())
}

fn compare_f64_array(
    name: &str,
    actual: &[Value],
    expected: &[Value],
    tolerance: f64,
) -> Result<()> {
    check_len(name, actual.len(), expected.len())?;

    for (i, (actual_val, expected_val)) in actual.iter().zip(expected).enumerate() {
        let actual_num = actual_val
            .as_f64()
            .ok_or_else(|| Error::mismatch(format!("{name}[{i}]"), "invalid actual value"))?;
        let expected_num = expected_val
            .as_f64()
            .ok_or_else(|| Error::mismatch(format!("{name}[{i}]"), "invalid expected value"))?;
        let diff = (actual_num - expected_num).abs();
        if diff > tolerance {
            return Err(Error::mismatch(
                format!("{name}[{i}]"),
                format!("actual={actual_num}, expected={expected_num}, diff={diff}"),
            ));
        }
    }

    tracing::info!(
        "{name}: {} values match (tolerance={tolerance})",
        actual.len()
    );
    Ok(())
}
