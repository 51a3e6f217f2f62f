//! Runs the binary under a pseudo-terminal and checks that it animates a
//! bounded number of frames and restores the terminal on exit.

use rexpect::error::Error;
use rexpect::session::spawn_command;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn write_config(name: &str, json: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "ascii-shapes-{}-{}.json",
        name,
        std::process::id()
    ));
    fs::write(&path, json).expect("write test config");
    path
}

fn command_with_config(path: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ascii-shapes"));
    cmd.env("ASCII_SHAPES_CONFIG", path);
    cmd.env("RUST_LOG", "off");
    cmd
}

#[test]
fn renders_bounded_frames_and_restores_cursor() -> Result<(), Error> {
    let config = write_config(
        "bounded",
        r#"{ "host": { "tick_ms": 10, "max_frames": 3 },
             "torus": { "width": 30, "height": 12, "scale_x": 12.0, "scale_y": 6.0 } }"#,
    );
    let mut session = spawn_command(command_with_config(&config), Some(10_000))?;

    // Cursor is hidden on startup and shown again during cleanup.
    session.exp_string("\x1b[?25l")?;
    session.exp_string("\x1b[?25h")?;
    session.exp_eof()?;

    let _ = fs::remove_file(config);
    Ok(())
}

#[test]
fn quit_key_exits_early() -> Result<(), Error> {
    let config = write_config(
        "quit",
        r#"{ "host": { "tick_ms": 10, "initial_shape": "cube" },
             "cube": { "width": 24, "height": 12, "half_extent": 4.0, "camera_distance": 16.0 } }"#,
    );
    let mut session = spawn_command(command_with_config(&config), Some(10_000))?;

    session.exp_string("\x1b[?25l")?;
    session.send("q")?;
    session.flush()?;
    session.exp_string("\x1b[?25h")?;
    session.exp_eof()?;

    let _ = fs::remove_file(config);
    Ok(())
}
