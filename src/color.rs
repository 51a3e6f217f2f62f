// src/color.rs

//! Defines color-related enums (`NamedColor`, `Color`) and their encoding
//! as ANSI SGR (Select Graphic Rendition) parameters.

use serde::{Deserialize, Serialize};

/// Standard ANSI named colors (indices 0-15).
/// These are the 8 normal and 8 bright colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NamedColor {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    BrightBlack = 8,
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

impl NamedColor {
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// A color a frame can be painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Color {
    /// Whatever the terminal's own default is.
    #[default]
    Default,
    Named(NamedColor),
    /// An entry of the 256-color palette.
    Indexed(u8),
    Rgb(u8, u8, u8),
}

// SGR parameter bases.
const SGR_FG_BASE: u16 = 30;
const SGR_BG_BASE: u16 = 40;
const SGR_FG_BRIGHT_BASE: u16 = 90;
const SGR_BG_BRIGHT_BASE: u16 = 100;
const SGR_FG_DEFAULT: u16 = 39;
const SGR_BG_DEFAULT: u16 = 49;
const SGR_FG_EXTENDED: u16 = 38;
const SGR_BG_EXTENDED: u16 = 48;

/// Which half of the cell a color applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Foreground,
    Background,
}

impl Color {
    /// Appends the SGR parameters selecting this color for `layer` to
    /// `codes`, e.g. `[38, 2, 29, 78, 216]`.
    pub fn sgr_append(self, codes: &mut Vec<u16>, layer: Layer) {
        let (base, bright_base, default, extended) = match layer {
            Layer::Foreground => (SGR_FG_BASE, SGR_FG_BRIGHT_BASE, SGR_FG_DEFAULT, SGR_FG_EXTENDED),
            Layer::Background => (SGR_BG_BASE, SGR_BG_BRIGHT_BASE, SGR_BG_DEFAULT, SGR_BG_EXTENDED),
        };
        match self {
            Color::Default => codes.push(default),
            Color::Named(named) => {
                let idx = named.index() as u16;
                if idx < 8 {
                    codes.push(base + idx);
                } else {
                    codes.push(bright_base + idx - 8);
                }
            }
            Color::Indexed(idx) => codes.extend([extended, 5, idx as u16]),
            Color::Rgb(r, g, b) => codes.extend([extended, 2, r as u16, g as u16, b as u16]),
        }
    }
}
