// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Material descriptions and the handle-keyed material store
//!
//! Materials here are plain state consumed by an external renderer. The core
//! never draws; it only keeps the flags that rendering would read consistent.

use crate::error::{EditorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable handle for a material in a [`MaterialStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(u32);

impl MaterialId {
    pub fn index(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Linear RGB color with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Color from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
        )
    }

    pub fn to_hex(&self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Color from hue, saturation and lightness, each in [0, 1]
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let hue = hue.rem_euclid(1.0);
        let saturation = saturation.clamp(0.0, 1.0);
        let lightness = lightness.clamp(0.0, 1.0);

        if saturation == 0.0 {
            return Self::new(lightness, lightness, lightness);
        }

        let p = if lightness <= 0.5 {
            lightness * (1.0 + saturation)
        } else {
            lightness + saturation - lightness * saturation
        };
        let q = 2.0 * lightness - p;

        Self::new(
            hue_to_rgb(q, p, hue + 1.0 / 3.0),
            hue_to_rgb(q, p, hue),
            hue_to_rgb(q, p, hue - 1.0 / 3.0),
        )
    }
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

impl FromStr for Color {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(EditorError::InvalidColor(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Color::from_hex)
            .map_err(|_| EditorError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = EditorError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Which faces a material renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
    Double,
}

/// Shading model requested from the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingModel {
    /// Physically based (metal/roughness)
    Standard,
    /// Blinn-Phong with specular color and shininess
    Phong,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolygonOffset {
    pub factor: f32,
    pub units: f32,
}

/// Render state for one surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub model: ShadingModel,
    pub color: Color,
    pub opacity: f32,
    pub transparent: bool,
    pub depth_write: bool,
    pub side: Side,
    pub premultiplied_alpha: bool,
    pub polygon_offset: Option<PolygonOffset>,
    pub roughness: f32,
    pub specular: Color,
    pub shininess: f32,
    pub vertex_colors: bool,
    pub flat_shading: bool,
    pub grid_texture: bool,
    /// Bumped whenever a flag that requires shader recompilation changes
    pub version: u32,
}

impl Material {
    pub fn standard(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            model: ShadingModel::Standard,
            color,
            opacity: 1.0,
            transparent: false,
            depth_write: true,
            side: Side::Front,
            premultiplied_alpha: false,
            polygon_offset: None,
            roughness: 1.0,
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
            vertex_colors: false,
            flat_shading: false,
            grid_texture: false,
            version: 0,
        }
    }

    pub fn phong(name: impl Into<String>, color: Color) -> Self {
        Self {
            model: ShadingModel::Phong,
            ..Self::standard(name, color)
        }
    }

    /// Translucent double-sided brush material shown while editing
    pub fn brush_preview(name: impl Into<String>, color: Color) -> Self {
        Self {
            opacity: 0.15,
            transparent: true,
            depth_write: false,
            side: Side::Double,
            premultiplied_alpha: true,
            polygon_offset: Some(PolygonOffset {
                factor: 0.2,
                units: 0.2,
            }),
            ..Self::standard(name, color)
        }
    }

    /// Opaque material used for the result when groups are disabled
    pub fn flat_result() -> Self {
        Self {
            polygon_offset: Some(PolygonOffset {
                factor: 0.1,
                units: 0.1,
            }),
            ..Self::standard("result", Color::WHITE)
        }
    }

    /// Translucent tint cloned for every placed decal
    pub fn decal_tint() -> Self {
        Self {
            specular: Color::from_hex(0x444444),
            shininess: 30.0,
            transparent: true,
            depth_write: false,
            polygon_offset: Some(PolygonOffset {
                factor: -4.0,
                units: 0.0,
            }),
            ..Self::phong("decal", Color::WHITE)
        }
    }

    /// Grey surface for the decal target
    pub fn decal_target() -> Self {
        Self {
            specular: Color::from_hex(0x111111),
            shininess: 25.0,
            ..Self::phong("decal-target", Color::from_hex(0xaaaaaa))
        }
    }

    /// Opaque single-sided depth-writing clone of this material
    pub fn to_final(&self) -> Self {
        Self {
            name: format!("{}-final", self.name),
            side: Side::Front,
            opacity: 1.0,
            transparent: false,
            depth_write: true,
            version: 0,
            ..self.clone()
        }
    }

    pub fn mark_updated(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

/// Owns every material and hands out stable [`MaterialId`] handles
#[derive(Debug, Clone, Default)]
pub struct MaterialStore {
    materials: Vec<Material>,
}

impl MaterialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(material);
        id
    }

    pub fn get(&self, id: MaterialId) -> Result<&Material> {
        self.materials
            .get(id.0 as usize)
            .ok_or(EditorError::UnknownMaterial(id))
    }

    pub fn get_mut(&mut self, id: MaterialId) -> Result<&mut Material> {
        self.materials
            .get_mut(id.0 as usize)
            .ok_or(EditorError::UnknownMaterial(id))
    }

    pub fn contains(&self, id: MaterialId) -> bool {
        (id.0 as usize) < self.materials.len()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, m)| (MaterialId(i as u32), m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_color_parse_and_display() {
        let color: Color = "#E91E63".parse().unwrap();
        assert_eq!(color.to_hex(), 0xE91E63);
        assert_eq!(color.to_string(), "#e91e63");
        assert!("E91E63".parse::<Color>().is_ok());
        assert!(matches!("#12345".parse::<Color>(), Err(EditorError::InvalidColor(_))));
        assert!("#zzzzzz".parse::<Color>().is_err());
    }

    #[test]
    fn test_hsl_primaries() {
        let red = Color::from_hsl(0.0, 1.0, 0.5);
        assert_relative_eq!(red.r, 1.0, epsilon = 1e-6);
        assert_relative_eq!(red.g, 0.0, epsilon = 1e-6);

        let green = Color::from_hsl(1.0 / 3.0, 1.0, 0.5);
        assert_relative_eq!(green.g, 1.0, epsilon = 1e-6);
        assert_relative_eq!(green.b, 0.0, epsilon = 1e-6);

        let grey = Color::from_hsl(0.7, 0.0, 0.25);
        assert_eq!(grey, Color::new(0.25, 0.25, 0.25));
    }

    #[test]
    fn test_final_clone_is_opaque() {
        let preview = Material::brush_preview("a", Color::from_hex(0xE91E63));
        let fin = preview.to_final();
        assert_eq!(fin.side, Side::Front);
        assert_eq!(fin.opacity, 1.0);
        assert!(!fin.transparent);
        assert!(fin.depth_write);
        assert_eq!(fin.color, preview.color);
        assert_eq!(fin.polygon_offset, preview.polygon_offset);
    }

    #[test]
    fn test_store_handles() {
        let mut store = MaterialStore::new();
        let a = store.insert(Material::flat_result());
        let b = store.insert(Material::decal_tint());
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(b).unwrap().model, ShadingModel::Phong);
        store.get_mut(a).unwrap().flat_shading = true;
        assert!(store.get(a).unwrap().flat_shading);
        assert!(matches!(
            MaterialStore::new().get(a),
            Err(EditorError::UnknownMaterial(_))
        ));
    }

    #[test]
    fn test_color_serde_as_string() {
        let json = serde_json::to_string(&Color::from_hex(0x00BCD4)).unwrap();
        assert_eq!(json, "\"#00bcd4\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_hex(), 0x00BCD4);
    }
}
