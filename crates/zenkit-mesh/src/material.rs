//! Material records as decoded from ZenKit meshes.

use glam::Vec2;

/// Surface class used for footstep sounds and hit effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum MaterialGroup {
    #[default]
    Undefined = 0,
    Metal = 1,
    Stone = 2,
    Wood = 3,
    Earth = 4,
    Water = 5,
    Snow = 6,
    None = 7,
}

/// How an animated texture advances its mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum AnimationMapping {
    #[default]
    None = 0,
    Linear = 1,
}

/// Vertex wave animation applied by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum WaveMode {
    #[default]
    None = 0,
    GroundAmbient = 1,
    Ground = 2,
    WallAmbient = 3,
    Wall = 4,
    Environment = 5,
    WindAmbient = 6,
    Wind = 7,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u8)]
pub enum WaveSpeed {
    #[default]
    None = 0,
    Slow = 1,
    Normal = 2,
    Fast = 3,
}

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// A mesh material.
///
/// `name` identifies the material in the source data but does not affect
/// how it renders, so it is ignored by [`Material::is_similar`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Material {
    pub name: String,
    pub group: MaterialGroup,
    pub color: Color,
    /// Smoothing angle in degrees.
    pub smooth_angle: f32,
    pub texture: String,
    pub texture_scale: Vec2,
    pub texture_anim_fps: f32,
    pub texture_anim_map_mode: AnimationMapping,
    pub texture_anim_map_dir: Vec2,
    /// Name of the detail texture. Empty when the material has none.
    pub detail_object: String,
    pub detail_object_scale: f32,
    pub occluder: bool,
    pub environment_mapping: bool,
    pub environment_mapping_strength: f32,
    pub wave_mode: WaveMode,
    pub wave_speed: WaveSpeed,
    pub wave_max_amplitude: f32,
    pub wave_grid_size: f32,
    pub ignore_sun: bool,
    pub default_mapping: Vec2,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            group: MaterialGroup::Undefined,
            color: Color::WHITE,
            smooth_angle: 60.0,
            texture: String::new(),
            texture_scale: Vec2::ONE,
            texture_anim_fps: 0.0,
            texture_anim_map_mode: AnimationMapping::None,
            texture_anim_map_dir: Vec2::ZERO,
            detail_object: String::new(),
            detail_object_scale: 1.0,
            occluder: false,
            environment_mapping: false,
            environment_mapping_strength: 1.0,
            wave_mode: WaveMode::None,
            wave_speed: WaveSpeed::None,
            wave_max_amplitude: 30.0,
            wave_grid_size: 100.0,
            ignore_sun: false,
            default_mapping: Vec2::ZERO,
        }
    }
}

impl Material {
    /// Whether two materials render identically.
    ///
    /// Every field except `name` must match. Floats are compared exactly:
    /// materials that look the same come from the same source values.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_similar(&self, other: &Self) -> bool {
        self.group == other.group
            && self.color == other.color
            && self.smooth_angle == other.smooth_angle
            && self.texture == other.texture
            && self.texture_scale == other.texture_scale
            && self.texture_anim_fps == other.texture_anim_fps
            && self.texture_anim_map_mode == other.texture_anim_map_mode
            && self.texture_anim_map_dir == other.texture_anim_map_dir
            && self.detail_object == other.detail_object
            && self.detail_object_scale == other.detail_object_scale
            && self.occluder == other.occluder
            && self.environment_mapping == other.environment_mapping
            && self.environment_mapping_strength == other.environment_mapping_strength
            && self.wave_mode == other.wave_mode
            && self.wave_speed == other.wave_speed
            && self.wave_max_amplitude == other.wave_max_amplitude
            && self.wave_grid_size == other.wave_grid_size
            && self.ignore_sun == other.ignore_sun
            && self.default_mapping == other.default_mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stone(texture: &str) -> Material {
        Material {
            name: "STONE_WALL".to_owned(),
            group: MaterialGroup::Stone,
            texture: texture.to_owned(),
            ..Material::default()
        }
    }

    #[test]
    fn name_is_ignored() {
        let a = stone("WALL.TGA");
        let b = Material {
            name: "OTHER".to_owned(),
            ..stone("WALL.TGA")
        };
        assert!(a.is_similar(&b));
        assert!(b.is_similar(&a));
    }

    #[test]
    fn texture_name_distinguishes() {
        assert!(!stone("WALL.TGA").is_similar(&stone("FLOOR.TGA")));
    }

    #[test]
    fn every_render_field_distinguishes() {
        let base = stone("WALL.TGA");
        let tweaks: [fn(&mut Material); 21] = [
            |m| m.group = MaterialGroup::Wood,
            |m| m.color = Color::new(255, 0, 0, 255),
            |m| m.smooth_angle = 45.0,
            |m| m.texture_scale.x = 2.0,
            |m| m.texture_scale.y = 2.0,
            |m| m.texture_anim_fps = 12.0,
            |m| m.texture_anim_map_mode = AnimationMapping::Linear,
            |m| m.texture_anim_map_dir.x = 0.5,
            |m| m.texture_anim_map_dir.y = 0.5,
            |m| m.detail_object = "DETAIL.TGA".to_owned(),
            |m| m.detail_object_scale = 4.0,
            |m| m.occluder = true,
            |m| m.environment_mapping = true,
            |m| m.environment_mapping_strength = 0.5,
            |m| m.wave_mode = WaveMode::Wind,
            |m| m.wave_speed = WaveSpeed::Fast,
            |m| m.wave_max_amplitude = 10.0,
            |m| m.wave_grid_size = 50.0,
            |m| m.ignore_sun = true,
            |m| m.default_mapping.x = 1.0,
            |m| m.default_mapping.y = 1.0,
        ];

        for (i, tweak) in tweaks.iter().enumerate() {
            let mut variant = base.clone();
            tweak(&mut variant);
            assert!(!base.is_similar(&variant), "tweak {i} compared similar");
        }
    }

    #[test]
    fn floats_compare_exactly() {
        let next = f32::from_bits(60.0_f32.to_bits() + 1);
        let mut a = stone("WALL.TGA");
        let mut b = stone("WALL.TGA");
        a.smooth_angle = 60.0;
        b.smooth_angle = next;
        assert!(!a.is_similar(&b));
    }
}
