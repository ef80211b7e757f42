// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Editor configuration

use crate::evaluator::Operation;
use crate::geometry::ShapeKind;
use crate::material::Color;
use crate::utils::math::clamp;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file looked up by [`EditorConfig::load`]
pub const CONFIG_FILE: &str = "brushlab.toml";

/// Bounds accepted for decal box sizes
pub const DECAL_SCALE_RANGE: (f32, f32) = (1.0, 30.0);

/// Per-brush starting shape and tint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushConfig {
    pub shape: ShapeKind,
    pub complexity: f32,
    pub color: Color,
    /// Uniform starting scale
    #[serde(default = "default_brush_scale")]
    pub scale: f32,
}

fn default_brush_scale() -> f32 {
    0.5
}

/// Visibility of scene elements; never triggers re-evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub wireframe: bool,
    pub display_brushes: bool,
    pub display_controls: bool,
    pub shadows: bool,
    pub display_brush_a_bvh: bool,
    pub display_brush_b_bvh: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            wireframe: false,
            display_brushes: true,
            display_controls: true,
            shadows: false,
            display_brush_a_bvh: false,
            display_brush_b_bvh: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Ask the evaluator for debug payloads
    pub enabled: bool,
    pub display_intersection_edges: bool,
    pub display_triangle_intersections: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            display_intersection_edges: false,
            display_triangle_intersections: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecalConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Randomize twist about the surface normal
    pub rotate: bool,
    /// Seed for placement randomness; entropy when unset
    pub seed: Option<u64>,
    /// Pointer travel in pixels that turns a click into a drag
    pub drag_threshold: f32,
}

impl Default for DecalConfig {
    fn default() -> Self {
        Self {
            min_scale: 10.0,
            max_scale: 20.0,
            rotate: true,
            seed: None,
            drag_threshold: 2.0,
        }
    }
}

/// Placement of the decal target mesh
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub position: [f32; 3],
    pub scale: f32,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 10.0, 0.0],
            scale: 0.5,
        }
    }
}

/// Full editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub operation: Operation,
    pub use_groups: bool,
    pub vertex_colors: bool,
    pub flat_shading: bool,
    pub grid_texture: bool,
    pub brush_a: BrushConfig,
    pub brush_b: BrushConfig,
    pub display: DisplayConfig,
    pub diagnostics: DiagnosticsConfig,
    pub decals: DecalConfig,
    pub target: TargetConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            operation: Operation::Subtraction,
            use_groups: true,
            vertex_colors: false,
            flat_shading: false,
            grid_texture: false,
            brush_a: BrushConfig {
                shape: ShapeKind::Box,
                complexity: 1.0,
                color: Color::WHITE,
                scale: default_brush_scale(),
            },
            brush_b: BrushConfig {
                shape: ShapeKind::Sphere,
                complexity: 1.0,
                color: Color::from_hex(0xE91E63),
                scale: default_brush_scale(),
            },
            display: DisplayConfig::default(),
            diagnostics: DiagnosticsConfig::default(),
            decals: DecalConfig::default(),
            target: TargetConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: EditorConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `brushlab.toml` if present, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `BRUSHLAB_OPERATION`, `BRUSHLAB_DECAL_SEED` and `BRUSHLAB_DIAGNOSTICS`
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(operation) = std::env::var("BRUSHLAB_OPERATION") {
            self.operation = operation
                .parse()
                .with_context(|| format!("Invalid BRUSHLAB_OPERATION: {}", operation))?;
        }

        if let Ok(seed) = std::env::var("BRUSHLAB_DECAL_SEED") {
            self.decals.seed = seed.parse().ok();
        }

        if let Ok(diagnostics) = std::env::var("BRUSHLAB_DIAGNOSTICS") {
            self.diagnostics.enabled = diagnostics.parse().unwrap_or(self.diagnostics.enabled);
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Copy with out-of-range values clamped into range
    pub fn sanitized(&self) -> Self {
        let mut config = self.clone();
        for brush in [&mut config.brush_a, &mut config.brush_b] {
            brush.complexity = clamp(brush.complexity, 0.0, 2.0);
        }

        let (lo, hi) = DECAL_SCALE_RANGE;
        let min_scale = clamp(config.decals.min_scale, lo, hi);
        let max_scale = clamp(config.decals.max_scale, lo, hi);
        config.decals.min_scale = min_scale.min(max_scale);
        config.decals.max_scale = min_scale.max(max_scale);
        config.decals.drag_threshold = config.decals.drag_threshold.max(0.0);
        config
    }
}
