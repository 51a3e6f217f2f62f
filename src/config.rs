// src/config.rs

//! Defines the configuration structures for `ascii-shapes`.
//!
//! Every struct deserializes from JSON with `#[serde(default)]`, so a config
//! file only has to name the fields it wants to change. Defaults reproduce
//! the original animated shapes demo.

use anyhow::{Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::glyph::DEFAULT_GRADIENT;
use crate::rasterizer::{Cube, Torus};
use crate::rotation::{CubeRotation, TorusRotation};
use crate::scene::{ShapeKind, SwitchPolicy, Theme};

/// Environment variable naming an optional JSON config file.
pub const CONFIG_PATH_ENV: &str = "ASCII_SHAPES_CONFIG";

/// Global configuration, loaded once on first use.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_from_env);

// --- Top-Level Configuration Structure ---

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub torus: TorusConfig,
    pub cube: CubeConfig,
    pub host: HostConfig,
    pub keybindings: KeybindingsConfig,
}

impl Config {
    /// Parses a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse config JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Loads the file named by `ASCII_SHAPES_CONFIG`, falling back to the
    /// defaults when the variable is unset or the file cannot be used.
    pub fn load_from_env() -> Self {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => match Self::load(Path::new(&path)) {
                Ok(config) => {
                    info!("Loaded configuration from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("{:#}. Using default configuration.", e);
                    Config::default()
                }
            },
            None => {
                info!("{} not set, using default configuration.", CONFIG_PATH_ENV);
                Config::default()
            }
        }
    }
}

// --- Shape Configuration ---

/// Torus ("donut") parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TorusConfig {
    pub width: usize,
    pub height: usize,
    /// Horizontal projection scale.
    pub scale_x: f64,
    /// Vertical projection scale. Smaller than `scale_x` because character
    /// cells are taller than they are wide.
    pub scale_y: f64,
    /// Step of the cross-section angle, in radians.
    pub theta_step: f64,
    /// Step of the revolution angle, in radians.
    pub phi_step: f64,
    /// Light-to-dense gradient.
    pub chars: String,
    /// Radius of the tube.
    pub minor_radius: f64,
    /// Distance from the torus center to the tube center.
    pub major_radius: f64,
    /// Distance pushed onto every rotated z before projection.
    pub camera_distance: f64,
    /// Rotation added after each frame.
    pub rotation_step: TorusRotation,
}

impl Default for TorusConfig {
    fn default() -> Self {
        TorusConfig {
            width: 140,
            height: 70,
            scale_x: 45.0,
            scale_y: 22.0,
            theta_step: 0.05,
            phi_step: 0.015,
            chars: DEFAULT_GRADIENT.to_string(),
            minor_radius: 1.0,
            major_radius: 2.0,
            camera_distance: 5.0,
            rotation_step: TorusRotation::new(0.04, 0.02),
        }
    }
}

impl TorusConfig {
    /// Validates the parameters and builds the shape.
    pub fn build(&self) -> Result<Torus> {
        Torus::new(self)
    }
}

/// Cube parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CubeConfig {
    pub width: usize,
    pub height: usize,
    /// Half the edge length.
    pub half_extent: f64,
    /// Spacing between sampled points on each face.
    pub sample_step: f64,
    pub camera_distance: f64,
    /// Vertical compression applied after projection.
    pub vertical_aspect: f64,
    pub chars: String,
    pub rotation_step: CubeRotation,
}

impl Default for CubeConfig {
    fn default() -> Self {
        CubeConfig {
            width: 120,
            height: 60,
            half_extent: 18.0,
            sample_step: 0.5,
            camera_distance: 60.0,
            vertical_aspect: 0.5,
            chars: DEFAULT_GRADIENT.to_string(),
            rotation_step: CubeRotation::new(0.02, 0.03, 0.01),
        }
    }
}

impl CubeConfig {
    pub fn build(&self) -> Result<Cube> {
        Cube::new(self)
    }
}

// --- Host Configuration ---

/// Settings for the terminal host that drives the animation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HostConfig {
    /// Period of the tick source in milliseconds.
    pub tick_ms: u64,
    pub initial_shape: ShapeKind,
    pub initial_theme: Theme,
    /// What happens to a shape's rotation when it is selected again.
    pub switch_policy: SwitchPolicy,
    /// Stop after presenting this many frames. `None` runs until quit.
    pub max_frames: Option<u64>,
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            tick_ms: 50,
            initial_shape: ShapeKind::Donut,
            initial_theme: Theme::Matrix,
            switch_policy: SwitchPolicy::Persist,
            max_frames: None,
        }
    }
}

// --- Keybinding Configuration ---

/// Single-character bindings for the host commands.
///
/// Escape and Ctrl-C always quit in addition to `quit`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub donut: char,
    pub cube: char,
    pub cycle_shape: char,
    pub toggle_theme: char,
    pub quit: char,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        KeybindingsConfig {
            donut: 'd',
            cube: 'c',
            cycle_shape: ' ',
            toggle_theme: 'm',
            quit: 'q',
        }
    }
}
