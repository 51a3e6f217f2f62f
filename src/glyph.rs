// src/glyph.rs

//! Defines `Gradient`, the lookup table that turns a luminance value into the
//! character drawn in a grid cell.
//!
//! A gradient is ordered from the lightest (emptiest) character to the
//! densest one, e.g. `" .:-=+*#%@"`.

use anyhow::{bail, Result};
use std::fmt;

/// Default gradient shared by both shapes.
pub const DEFAULT_GRADIENT: &str = " .:-=+*#%@";

/// The character a cell holds before anything is drawn into it.
pub const BLANK: char = ' ';

/// An ordered, non-empty luminance-to-character table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gradient {
    chars: Vec<char>,
}

impl Gradient {
    /// Builds a gradient from a string of characters ordered light to dense.
    ///
    /// Fails if the string is empty, since there is nothing to index.
    pub fn new(chars: &str) -> Result<Self> {
        let chars: Vec<char> = chars.chars().collect();
        if chars.is_empty() {
            bail!("gradient must contain at least one character");
        }
        Ok(Gradient { chars })
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Never true once constructed.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Quantizes `luminance` into an index of the table.
    ///
    /// Luminance is clamped into `[0, 1]` first; negative values (back-lit
    /// samples) and NaN land on the lightest character.
    pub fn index_for(&self, luminance: f64) -> usize {
        let last = self.chars.len() - 1;
        let l = if luminance > 0.0 { luminance.min(1.0) } else { 0.0 };
        let idx = (l * last as f64).floor() as usize;
        idx.min(last)
    }

    pub fn shade(&self, luminance: f64) -> char {
        self.chars[self.index_for(luminance)]
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Gradient {
            chars: DEFAULT_GRADIENT.chars().collect(),
        }
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.chars {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn empty_gradient_is_rejected() {
        assert!(Gradient::new("").is_err());
    }

    #[test]
    fn endpoints_map_to_first_and_last_char() {
        let g = Gradient::new(DEFAULT_GRADIENT).unwrap();
        assert_eq!(g.shade(0.0), ' ');
        assert_eq!(g.shade(1.0), '@');
    }

    #[test]
    fn out_of_range_luminance_clamps() {
        let g = Gradient::new(" .#").unwrap();
        assert_eq!(g.shade(-3.5), ' ');
        assert_eq!(g.shade(1.7), '#');
        assert_eq!(g.shade(f64::NAN), ' ');
        assert_eq!(g.shade(f64::INFINITY), '#');
    }

    #[test]
    fn interior_values_floor() {
        let g = Gradient::new(" .:-=+*#%@").unwrap();
        // 0.5 * 9 = 4.5 -> 4
        assert_eq!(g.index_for(0.5), 4);
        assert_eq!(g.shade(0.5), '=');
        // Just below one step.
        assert_eq!(g.index_for(0.11), 0);
    }

    #[test]
    fn single_char_gradient_always_returns_it() {
        let g = Gradient::new("x").unwrap();
        assert_eq!(g.shade(0.0), 'x');
        assert_eq!(g.shade(0.9), 'x');
        assert_eq!(g.shade(f64::NAN), 'x');
    }
}
