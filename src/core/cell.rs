//! Terminal Cell
//!
//! Represents a single cell in the terminal grid, containing a glyph
//! and the pen attributes it was written with.

use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

/// Most zero-width characters one cell keeps after its base glyph
pub const MAX_COMBINING: usize = 16;

/// A single cell in the terminal grid
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    /// The glyph in this cell. Empty for blank cells and for the trailing
    /// half of a wide character; may hold combining marks after the base.
    pub glyph: String,
    /// Attributes the glyph was written with
    pub attributes: CellAttributes,
    /// This cell is the trailing half of a wide character
    pub wide_continuation: bool,
}

impl Cell {
    /// Create a new cell with a single character
    pub fn new(c: char) -> Self {
        Self {
            glyph: c.to_string(),
            ..Default::default()
        }
    }

    /// Create a cell holding `c` written with `attributes`
    pub fn with_attributes(c: char, attributes: CellAttributes) -> Self {
        Self {
            glyph: c.to_string(),
            attributes,
            wide_continuation: false,
        }
    }

    /// Trailing half of a wide character
    pub fn continuation(attributes: CellAttributes) -> Self {
        Self {
            glyph: String::new(),
            attributes,
            wide_continuation: true,
        }
    }

    /// A blank cell carrying only the background of `attributes`
    pub fn blank(attributes: &CellAttributes) -> Self {
        Self {
            glyph: String::new(),
            attributes: CellAttributes {
                bg: attributes.bg,
                ..Default::default()
            },
            wide_continuation: false,
        }
    }

    /// Check if this cell is empty (no glyph)
    pub fn is_empty(&self) -> bool {
        self.glyph.is_empty()
    }

    /// Display width of the glyph
    pub fn width(&self) -> usize {
        self.glyph.width()
    }

    /// Attach a zero-width character to the glyph. Returns false, leaving
    /// the cell unchanged, once it already holds `MAX_COMBINING` of them.
    pub fn push_combining(&mut self, c: char) -> bool {
        if self.glyph.chars().count() > MAX_COMBINING {
            return false;
        }
        self.glyph.push(c);
        true
    }

    /// Erase the cell, keeping only the background of `attributes`
    pub fn erase(&mut self, attributes: &CellAttributes) {
        *self = Self::blank(attributes);
    }
}

/// Color representation supporting indexed and RGB colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Color {
    /// Default terminal color (foreground or background)
    #[default]
    Default,
    /// 256-color palette entry
    Indexed(u8),
    /// 24-bit RGB color
    Rgb(u8, u8, u8),
}

impl Color {
    pub const BLACK: Color = Color::Indexed(0);
    pub const RED: Color = Color::Indexed(1);
    pub const GREEN: Color = Color::Indexed(2);
    pub const YELLOW: Color = Color::Indexed(3);
    pub const BLUE: Color = Color::Indexed(4);
    pub const MAGENTA: Color = Color::Indexed(5);
    pub const CYAN: Color = Color::Indexed(6);
    pub const WHITE: Color = Color::Indexed(7);
}

/// Pen state applied to newly written cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellAttributes {
    pub bold: bool,
    pub underline: bool,
    pub blink: bool,
    pub inverse: bool,
    pub hidden: bool,
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
}
