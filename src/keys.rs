// src/keys.rs

//! Key symbols read from the terminal and their mapping onto host commands.

use crate::config::KeybindingsConfig;
use crate::scene::ShapeKind;

/// ASCII ETX, what Ctrl-C produces once the terminal is in raw mode.
pub const CTRL_C: char = '\u{3}';

const ESC_BYTE: u8 = 0x1b;

/// A single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeySymbol {
    Char(char),
    Escape,
    #[default]
    Unknown,
}

impl KeySymbol {
    /// Decodes one byte of raw terminal input.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            ESC_BYTE => KeySymbol::Escape,
            b if b.is_ascii() => KeySymbol::Char(b as char),
            _ => KeySymbol::Unknown,
        }
    }
}

/// Something the user asked the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SelectShape(ShapeKind),
    CycleShape,
    ToggleTheme,
    Quit,
}

/// Maps a key press to a command under `bindings`.
pub fn map_key_to_command(symbol: KeySymbol, bindings: &KeybindingsConfig) -> Option<Command> {
    let c = match symbol {
        KeySymbol::Escape => return Some(Command::Quit),
        KeySymbol::Unknown => return None,
        KeySymbol::Char(c) => c,
    };
    if c == CTRL_C || c == bindings.quit {
        Some(Command::Quit)
    } else if c == bindings.donut {
        Some(Command::SelectShape(ShapeKind::Donut))
    } else if c == bindings.cube {
        Some(Command::SelectShape(ShapeKind::Cube))
    } else if c == bindings.cycle_shape {
        Some(Command::CycleShape)
    } else if c == bindings.toggle_theme {
        Some(Command::ToggleTheme)
    } else {
        None
    }
}
