// src/scene.rs

//! Host-side animation state: which shape is showing, where each shape's
//! rotation stands, and which color theme paints the frames.

use crate::color::{Color, NamedColor};
use crate::config::Config;
use crate::rasterizer::{render_into, Cube, DepthGrid, Frame, Torus};
use crate::rotation::{CubeRotation, TorusRotation};
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Donut,
    Cube,
}

impl ShapeKind {
    pub fn other(self) -> Self {
        match self {
            ShapeKind::Donut => ShapeKind::Cube,
            ShapeKind::Cube => ShapeKind::Donut,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Green on black.
    Matrix,
    /// Deep blue on pale sky blue.
    Arctic,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Matrix => Theme::Arctic,
            Theme::Arctic => Theme::Matrix,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Theme::Matrix => "Matrix Mode",
            Theme::Arctic => "Arctic Mode",
        }
    }

    pub fn style(self) -> FrameStyle {
        match self {
            Theme::Matrix => FrameStyle {
                foreground: Color::Named(NamedColor::Green),
                background: Color::Named(NamedColor::Black),
            },
            Theme::Arctic => FrameStyle {
                foreground: Color::Rgb(29, 78, 216),
                background: Color::Rgb(224, 242, 254),
            },
        }
    }
}

/// Colors a display paints a frame with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStyle {
    pub foreground: Color,
    pub background: Color,
}

/// What happens to a shape's rotation when it becomes active again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SwitchPolicy {
    /// Each shape keeps its own accumulated rotation.
    #[default]
    Persist,
    /// The newly selected shape starts again from zero rotation.
    Reset,
}

pub struct Scene {
    torus: Torus,
    cube: Cube,
    torus_rotation: TorusRotation,
    cube_rotation: CubeRotation,
    active: ShapeKind,
    theme: Theme,
    policy: SwitchPolicy,
    grid: DepthGrid,
}

impl Scene {
    pub fn new(
        torus: Torus,
        cube: Cube,
        active: ShapeKind,
        theme: Theme,
        policy: SwitchPolicy,
    ) -> Self {
        Scene {
            torus,
            cube,
            torus_rotation: TorusRotation::default(),
            cube_rotation: CubeRotation::default(),
            active,
            theme,
            policy,
            grid: DepthGrid::new(0, 0),
        }
    }

    /// Builds both shapes from `config` and applies the host's initial
    /// shape, theme and switch policy.
    pub fn from_config(config: &Config) -> Result<Self> {
        let torus = config.torus.build().context("Failed to build torus")?;
        let cube = config.cube.build().context("Failed to build cube")?;
        Ok(Scene::new(
            torus,
            cube,
            config.host.initial_shape,
            config.host.initial_theme,
            config.host.switch_policy,
        ))
    }

    pub fn active_shape(&self) -> ShapeKind {
        self.active
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn style(&self) -> FrameStyle {
        self.theme.style()
    }

    pub fn torus_rotation(&self) -> TorusRotation {
        self.torus_rotation
    }

    pub fn cube_rotation(&self) -> CubeRotation {
        self.cube_rotation
    }

    /// Makes `kind` the active shape. Returns `false` if it already was.
    pub fn select_shape(&mut self, kind: ShapeKind) -> bool {
        if kind == self.active {
            return false;
        }
        if self.policy == SwitchPolicy::Reset {
            match kind {
                ShapeKind::Donut => self.torus_rotation = TorusRotation::default(),
                ShapeKind::Cube => self.cube_rotation = CubeRotation::default(),
            }
        }
        info!("Scene: switching shape {:?} -> {:?}", self.active, kind);
        self.active = kind;
        true
    }

    pub fn cycle_shape(&mut self) -> ShapeKind {
        self.select_shape(self.active.other());
        self.active
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        info!("Scene: theme is now {}", self.theme.name());
        self.theme
    }

    /// Renders the active shape and advances its rotation.
    pub fn tick(&mut self) -> Frame {
        let frame = match self.active {
            ShapeKind::Donut => {
                let (frame, next) = render_into(&mut self.grid, &self.torus, self.torus_rotation);
                self.torus_rotation = next;
                frame
            }
            ShapeKind::Cube => {
                let (frame, next) = render_into(&mut self.grid, &self.cube, self.cube_rotation);
                self.cube_rotation = next;
                frame
            }
        };
        debug!(
            "Scene: rendered {:?} frame {}x{}",
            self.active,
            frame.width(),
            frame.height()
        );
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CubeConfig, TorusConfig};
    use test_log::test;

    fn small_scene(policy: SwitchPolicy) -> Scene {
        let torus = TorusConfig {
            width: 24,
            height: 12,
            scale_x: 8.0,
            scale_y: 4.0,
            theta_step: 0.3,
            phi_step: 0.1,
            ..TorusConfig::default()
        }
        .build()
        .unwrap();
        let cube = CubeConfig {
            width: 20,
            height: 10,
            half_extent: 4.0,
            sample_step: 1.0,
            camera_distance: 20.0,
            ..CubeConfig::default()
        }
        .build()
        .unwrap();
        Scene::new(torus, cube, ShapeKind::Donut, Theme::Matrix, policy)
    }

    #[test]
    fn tick_advances_only_the_active_shape() {
        let mut scene = small_scene(SwitchPolicy::Persist);
        let frame = scene.tick();
        assert_eq!((frame.width(), frame.height()), (24, 12));
        assert_eq!(scene.torus_rotation(), TorusRotation::new(0.04, 0.02));
        assert_eq!(scene.cube_rotation(), CubeRotation::default());

        scene.select_shape(ShapeKind::Cube);
        let frame = scene.tick();
        assert_eq!((frame.width(), frame.height()), (20, 10));
        assert_eq!(scene.cube_rotation(), CubeRotation::new(0.02, 0.03, 0.01));
        assert_eq!(scene.torus_rotation(), TorusRotation::new(0.04, 0.02));
    }

    #[test]
    fn persist_policy_keeps_rotation_across_switches() {
        let mut scene = small_scene(SwitchPolicy::Persist);
        scene.tick();
        scene.tick();
        let before = scene.torus_rotation();
        scene.cycle_shape();
        scene.tick();
        assert_eq!(scene.cycle_shape(), ShapeKind::Donut);
        assert_eq!(scene.torus_rotation(), before);
    }

    #[test]
    fn reset_policy_zeroes_the_newly_selected_shape() {
        let mut scene = small_scene(SwitchPolicy::Reset);
        scene.tick();
        assert_ne!(scene.torus_rotation(), TorusRotation::default());
        scene.select_shape(ShapeKind::Cube);
        scene.tick();
        scene.select_shape(ShapeKind::Donut);
        assert_eq!(scene.torus_rotation(), TorusRotation::default());
        // The cube keeps its value until it is selected again.
        assert_eq!(scene.cube_rotation(), CubeRotation::new(0.02, 0.03, 0.01));
    }

    #[test]
    fn reselecting_active_shape_is_a_no_op() {
        let mut scene = small_scene(SwitchPolicy::Reset);
        scene.tick();
        assert!(!scene.select_shape(ShapeKind::Donut));
        assert_eq!(scene.torus_rotation(), TorusRotation::new(0.04, 0.02));
    }

    #[test]
    fn theme_toggles_between_two_styles() {
        let mut scene = small_scene(SwitchPolicy::Persist);
        assert_eq!(scene.theme(), Theme::Matrix);
        assert_eq!(scene.style().foreground, Color::Named(NamedColor::Green));
        assert_eq!(scene.toggle_theme(), Theme::Arctic);
        assert_eq!(scene.style().background, Color::Rgb(224, 242, 254));
        assert_eq!(scene.toggle_theme(), Theme::Matrix);
    }
}
