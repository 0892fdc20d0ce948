//! 8-bit colors and outfit color zones.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing a hex color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color '{0}' (expected #rrggbb)")]
pub struct ParseColorError(pub String);

/// RGB color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create white.
    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Components as an array.
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parses `#rrggbb` or `rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ParseColorError(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Body zone painted by a color-template pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorZone {
    Head,
    Body,
    Legs,
    Feet,
}

impl ColorZone {
    /// Classifies a template pixel by which RGB channels are non-zero.
    ///
    /// Yellow is head, red is body, green is legs, blue is feet. Any other
    /// combination (black, white, magenta, cyan) has no zone.
    pub fn classify(r: u8, g: u8, b: u8) -> Option<ColorZone> {
        match (r > 0, g > 0, b > 0) {
            (true, true, false) => Some(ColorZone::Head),
            (true, false, false) => Some(ColorZone::Body),
            (false, true, false) => Some(ColorZone::Legs),
            (false, false, true) => Some(ColorZone::Feet),
            _ => None,
        }
    }
}

/// Target colors of the four outfit zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutfitColors {
    pub head: Rgb,
    pub body: Rgb,
    pub legs: Rgb,
    pub feet: Rgb,
}

impl OutfitColors {
    /// Same color for every zone.
    pub const fn uniform(color: Rgb) -> Self {
        Self {
            head: color,
            body: color,
            legs: color,
            feet: color,
        }
    }

    /// Color assigned to a zone.
    pub fn zone(&self, zone: ColorZone) -> Rgb {
        match zone {
            ColorZone::Head => self.head,
            ColorZone::Body => self.body,
            ColorZone::Legs => self.legs,
            ColorZone::Feet => self.feet,
        }
    }
}

impl Default for OutfitColors {
    fn default() -> Self {
        Self::uniform(Rgb::white())
    }
}
