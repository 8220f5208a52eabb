use std::fmt;

use crossterm::style::Color;

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// Part of the maze (a corridor).
    Carved,
    /// Wall or not yet visited.
    Uncarved,
}

impl Cell {
    pub fn is_carved(self) -> bool {
        matches!(self, Cell::Carved)
    }

    /// Color a cell in this state is plotted with.
    pub fn color(self) -> Rgb15 {
        match self {
            Cell::Carved => Rgb15::WHITE,
            Cell::Uncarved => Rgb15::BACKGROUND,
        }
    }
}

impl From<bool> for Cell {
    fn from(carved: bool) -> Self {
        if carved { Cell::Carved } else { Cell::Uncarved }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Cell::Carved => '#',
            Cell::Uncarved => '.',
        };
        write!(f, "{}", symbol)
    }
}

/// A fully opaque 15-bit color sample, 5 bits per channel.
///
/// Layout: bits 0..5 red, bits 5..10 green, bits 10..15 blue. Bit 15 is unused
/// and always zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rgb15(u16);

impl Rgb15 {
    pub const WHITE: Rgb15 = Rgb15::new(31, 31, 31);
    pub const BACKGROUND: Rgb15 = Rgb15::new(0, 0, 31);
    pub const BLACK: Rgb15 = Rgb15::new(0, 0, 0);

    /// Builds a color from 5-bit channels. Channel values above 31 are masked.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb15((r as u16 & 0x1f) | ((g as u16 & 0x1f) << 5) | ((b as u16 & 0x1f) << 10))
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn red(self) -> u8 {
        (self.0 & 0x1f) as u8
    }

    pub const fn green(self) -> u8 {
        ((self.0 >> 5) & 0x1f) as u8
    }

    pub const fn blue(self) -> u8 {
        ((self.0 >> 10) & 0x1f) as u8
    }

    /// Expands to 24-bit color, replicating the high bits into the low ones so
    /// that 31 maps to 255.
    pub fn to_terminal_color(self) -> Color {
        let widen = |c: u8| (c << 3) | (c >> 2);
        Color::Rgb {
            r: widen(self.red()),
            g: widen(self.green()),
            b: widen(self.blue()),
        }
    }
}
