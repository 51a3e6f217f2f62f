// src/host.rs
//! Drives the animation: consumes ticks and key presses, advances the
//! [`Scene`] and hands each frame to a [`Display`].
//!
//! The host owns no threads itself. Ticks arrive as [`HostEvent`]s from a
//! [`TickSource`]; every frame is rendered synchronously inside
//! [`Host::handle_event`], so at most one render is ever in flight.

use crate::config::{Config, KeybindingsConfig};
use crate::display::{Display, InputEvent};
use crate::keys::{map_key_to_command, Command};
use crate::scene::Scene;
use crate::ticker::TickSource;
use anyhow::{Context, Result};
use std::sync::mpsc::Receiver;

/// Messages delivered to the host's event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Time to render a frame. `generation` identifies the timer that sent it.
    Tick { generation: u64 },
    /// Stop the event loop.
    Shutdown,
}

/// Represents the status of the host after handling an event.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum HostStatus {
    Running,
    Shutdown,
}

pub struct Host<'a> {
    scene: Scene,
    display: &'a mut dyn Display,
    ticks: &'a mut dyn TickSource,
    bindings: KeybindingsConfig,
    max_frames: Option<u64>,
    frames_presented: u64,
}

impl<'a> Host<'a> {
    pub fn new(
        scene: Scene,
        display: &'a mut dyn Display,
        ticks: &'a mut dyn TickSource,
        config: &Config,
    ) -> Self {
        Host {
            scene,
            display,
            ticks,
            bindings: config.keybindings.clone(),
            max_frames: config.host.max_frames,
            frames_presented: 0,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Starts (or restarts) the tick source.
    pub fn start(&mut self) -> Result<()> {
        self.ticks.restart().context("Failed to start tick source")
    }

    pub fn handle_event(&mut self, event: HostEvent) -> Result<HostStatus> {
        match event {
            HostEvent::Shutdown => {
                log::info!("Host: Shutdown event received.");
                Ok(HostStatus::Shutdown)
            }
            HostEvent::Tick { generation } => self.handle_tick(generation),
        }
    }

    fn handle_tick(&mut self, generation: u64) -> Result<HostStatus> {
        if generation != self.ticks.generation() {
            log::trace!(
                "Host: dropping stale tick (generation {}, current {})",
                generation,
                self.ticks.generation()
            );
            return Ok(HostStatus::Running);
        }

        let input = self
            .display
            .poll_input()
            .context("Failed to poll display input")?;
        for event in input {
            let command = match event {
                InputEvent::Closed => {
                    log::info!("Host: input closed. Signaling shutdown.");
                    return Ok(HostStatus::Shutdown);
                }
                InputEvent::Key(symbol) => map_key_to_command(symbol, &self.bindings),
            };
            if let Some(command) = command {
                if self.apply_command(command)? == HostStatus::Shutdown {
                    return Ok(HostStatus::Shutdown);
                }
            }
        }

        // A command restarted the timer; the new one paces the next frame.
        if generation != self.ticks.generation() {
            return Ok(HostStatus::Running);
        }

        let frame = self.scene.tick();
        self.display
            .present(&frame, &self.scene.style())
            .context("Failed to present frame")?;
        self.frames_presented += 1;

        match self.max_frames {
            Some(max) if self.frames_presented >= max => {
                log::info!("Host: presented {} frames, stopping.", self.frames_presented);
                Ok(HostStatus::Shutdown)
            }
            _ => Ok(HostStatus::Running),
        }
    }

    fn apply_command(&mut self, command: Command) -> Result<HostStatus> {
        log::debug!("Host: applying {:?}", command);
        let changed = match command {
            Command::Quit => return Ok(HostStatus::Shutdown),
            Command::SelectShape(kind) => self.scene.select_shape(kind),
            Command::CycleShape => {
                self.scene.cycle_shape();
                true
            }
            Command::ToggleTheme => {
                self.scene.toggle_theme();
                true
            }
        };
        if changed {
            self.ticks
                .restart()
                .context("Failed to restart tick source")?;
        }
        Ok(HostStatus::Running)
    }

    /// Starts the tick source and processes events until shutdown, then
    /// stops the timer and cleans up the display.
    pub fn run(&mut self, events: &Receiver<HostEvent>) -> Result<()> {
        let result = self.start().and_then(|_| self.event_loop(events));
        self.ticks.stop();
        let cleanup = self.display.cleanup().context("Failed to clean up display");
        result.and(cleanup)
    }

    fn event_loop(&mut self, events: &Receiver<HostEvent>) -> Result<()> {
        log::info!("Host: starting event loop.");
        loop {
            let event = match events.recv() {
                Ok(event) => event,
                Err(_) => {
                    log::warn!("Host: event channel closed. Exiting loop.");
                    return Ok(());
                }
            };
            if self.handle_event(event)? == HostStatus::Shutdown {
                log::info!("Host: shutting down after {} frames.", self.frames_presented);
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CubeConfig, HostConfig, TorusConfig};
    use crate::display::drivers::HeadlessDisplay;
    use crate::keys::{KeySymbol, CTRL_C};
    use crate::scene::{ShapeKind, Theme};
    use crate::ticker::ManualTickSource;
    use std::sync::mpsc;
    use test_log::test;

    fn small_config() -> Config {
        Config {
            torus: TorusConfig {
                width: 20,
                height: 10,
                scale_x: 8.0,
                scale_y: 4.0,
                theta_step: 0.4,
                phi_step: 0.2,
                ..TorusConfig::default()
            },
            cube: CubeConfig {
                width: 16,
                height: 8,
                half_extent: 3.0,
                sample_step: 1.0,
                camera_distance: 12.0,
                ..CubeConfig::default()
            },
            host: HostConfig::default(),
            ..Config::default()
        }
    }

    fn key(c: char) -> InputEvent {
        InputEvent::Key(KeySymbol::Char(c))
    }

    #[test]
    fn each_current_tick_presents_one_frame() {
        let config = small_config();
        let mut display = HeadlessDisplay::new();
        let mut ticks = ManualTickSource::new();
        {
            let scene = Scene::from_config(&config).unwrap();
            let mut host = Host::new(scene, &mut display, &mut ticks, &config);
            host.start().unwrap();
            for _ in 0..3 {
                let tick = HostEvent::Tick { generation: 1 };
                assert_eq!(host.handle_event(tick).unwrap(), HostStatus::Running);
            }
            assert_eq!(host.frames_presented(), 3);
        }
        assert_eq!(display.presented().len(), 3);
        let frame = display.last_frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (20, 10));
    }

    #[test]
    fn stale_ticks_render_nothing() {
        let config = small_config();
        let mut display = HeadlessDisplay::new();
        let mut ticks = ManualTickSource::new();
        {
            let scene = Scene::from_config(&config).unwrap();
            let mut host = Host::new(scene, &mut display, &mut ticks, &config);
            host.start().unwrap();
            host.start().unwrap();
            let status = host.handle_event(HostEvent::Tick { generation: 1 }).unwrap();
            assert_eq!(status, HostStatus::Running);
            assert_eq!(host.frames_presented(), 0);
        }
        assert!(display.presented().is_empty());
    }

    #[test]
    fn shape_key_switches_shape_and_restarts_timer() {
        let config = small_config();
        let mut display = HeadlessDisplay::new();
        display.push_input(vec![key('c')]);
        let mut ticks = ManualTickSource::new();
        {
            let scene = Scene::from_config(&config).unwrap();
            let mut host = Host::new(scene, &mut display, &mut ticks, &config);
            host.start().unwrap();

            // The tick that carried the key press is superseded by the restart.
            host.handle_event(HostEvent::Tick { generation: 1 }).unwrap();
            assert_eq!(host.scene().active_shape(), ShapeKind::Cube);
            assert_eq!(host.frames_presented(), 0);

            host.handle_event(HostEvent::Tick { generation: 2 }).unwrap();
            assert_eq!(host.frames_presented(), 1);
        }
        assert_eq!(ticks.restarts(), 2);
        let frame = display.last_frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (16, 8));
    }

    #[test]
    fn reselecting_current_shape_keeps_timer() {
        let config = small_config();
        let mut display = HeadlessDisplay::new();
        display.push_input(vec![key('d')]);
        let mut ticks = ManualTickSource::new();
        {
            let scene = Scene::from_config(&config).unwrap();
            let mut host = Host::new(scene, &mut display, &mut ticks, &config);
            host.start().unwrap();
            host.handle_event(HostEvent::Tick { generation: 1 }).unwrap();
            assert_eq!(host.frames_presented(), 1);
        }
        assert_eq!(ticks.restarts(), 1);
    }

    #[test]
    fn theme_toggle_restarts_timer_and_restyles() {
        let config = small_config();
        let mut display = HeadlessDisplay::new();
        display.push_input(vec![]);
        display.push_input(vec![key('m')]);
        let mut ticks = ManualTickSource::new();
        {
            let scene = Scene::from_config(&config).unwrap();
            let mut host = Host::new(scene, &mut display, &mut ticks, &config);
            host.start().unwrap();
            host.handle_event(HostEvent::Tick { generation: 1 }).unwrap();
            host.handle_event(HostEvent::Tick { generation: 1 }).unwrap();
            host.handle_event(HostEvent::Tick { generation: 2 }).unwrap();
            assert_eq!(host.scene().theme(), Theme::Arctic);
        }
        assert_eq!(ticks.restarts(), 2);
        let styles: Vec<_> = display.presented().iter().map(|(_, s)| *s).collect();
        assert_eq!(styles, vec![Theme::Matrix.style(), Theme::Arctic.style()]);
    }

    #[test]
    fn quit_keys_and_closed_input_shut_down() {
        for input in [key('q'), key(CTRL_C), InputEvent::Key(KeySymbol::Escape), InputEvent::Closed] {
            let config = small_config();
            let mut display = HeadlessDisplay::new();
            display.push_input(vec![input]);
            let mut ticks = ManualTickSource::new();
            let scene = Scene::from_config(&config).unwrap();
            let mut host = Host::new(scene, &mut display, &mut ticks, &config);
            host.start().unwrap();
            let status = host.handle_event(HostEvent::Tick { generation: 1 }).unwrap();
            assert_eq!(status, HostStatus::Shutdown, "input {:?}", input);
            assert_eq!(host.frames_presented(), 0);
        }
    }

    #[test]
    fn max_frames_ends_the_run() {
        let mut config = small_config();
        config.host.max_frames = Some(2);
        let mut display = HeadlessDisplay::new();
        let mut ticks = ManualTickSource::new();
        let (tx, rx) = mpsc::channel();
        // Generation 1 is what `run` starts the manual source at.
        for _ in 0..5 {
            tx.send(HostEvent::Tick { generation: 1 }).unwrap();
        }
        {
            let scene = Scene::from_config(&config).unwrap();
            let mut host = Host::new(scene, &mut display, &mut ticks, &config);
            host.run(&rx).unwrap();
            assert_eq!(host.frames_presented(), 2);
        }
        assert_eq!(display.presented().len(), 2);
        assert_eq!(display.cleanups(), 1);
    }

    #[test]
    fn run_returns_when_channel_closes() {
        let config = small_config();
        let mut display = HeadlessDisplay::new();
        let mut ticks = ManualTickSource::new();
        let (tx, rx) = mpsc::channel();
        tx.send(HostEvent::Tick { generation: 1 }).unwrap();
        drop(tx);
        {
            let scene = Scene::from_config(&config).unwrap();
            let mut host = Host::new(scene, &mut display, &mut ticks, &config);
            host.run(&rx).unwrap();
        }
        assert_eq!(display.presented().len(), 1);
        assert_eq!(display.cleanups(), 1);
    }

    #[test]
    fn shutdown_event_stops_immediately() {
        let config = small_config();
        let mut display = HeadlessDisplay::new();
        let mut ticks = ManualTickSource::new();
        let scene = Scene::from_config(&config).unwrap();
        let mut host = Host::new(scene, &mut display, &mut ticks, &config);
        assert_eq!(
            host.handle_event(HostEvent::Shutdown).unwrap(),
            HostStatus::Shutdown
        );
    }
}
