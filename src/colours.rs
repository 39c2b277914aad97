//! Colours and track palettes.
//!
//! Colours are given as CSS colour names (`gray`, `orange`) or hex strings and
//! parsed with `colorgrad`. Track palettes hand out one colour per track.

use colorgrad::Color;

use crate::error::{DoylineError, Result};

/// An RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// `#rrggbb`, alpha dropped
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as a fraction in [0, 1]
    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }
}

impl From<[u8; 4]> for Colour {
    fn from(value: [u8; 4]) -> Self {
        Colour {
            r: value[0],
            g: value[1],
            b: value[2],
            a: value[3],
        }
    }
}

impl From<Colour> for image::Rgba<u8> {
    fn from(value: Colour) -> Self {
        image::Rgba([value.r, value.g, value.b, value.a])
    }
}

/// Parse a CSS colour name or hex string
pub fn parse_colour(name: &str) -> Result<Colour> {
    Color::from_html(name.trim())
        .map(|c| Colour::from(c.to_rgba8()))
        .map_err(|e| DoylineError::InvalidParameter {
            param: "colour".to_string(),
            message: format!("Unknown colour '{}': {}", name, e),
        })
}

/// Trait for track palettes
pub trait Palette {
    /// Colour of track `index` out of `count` tracks
    fn colour(&self, index: usize, count: usize) -> Colour;

    /// Get the name of this palette
    fn name(&self) -> &str;
}

/// The matplotlib default property cycle
pub struct Tab10;

const TAB10: [Colour; 10] = [
    Colour::from_rgb(0x1f, 0x77, 0xb4),
    Colour::from_rgb(0xff, 0x7f, 0x0e),
    Colour::from_rgb(0x2c, 0xa0, 0x2c),
    Colour::from_rgb(0xd6, 0x27, 0x28),
    Colour::from_rgb(0x94, 0x67, 0xbd),
    Colour::from_rgb(0x8c, 0x56, 0x4b),
    Colour::from_rgb(0xe3, 0x77, 0xc2),
    Colour::from_rgb(0x7f, 0x7f, 0x7f),
    Colour::from_rgb(0xbc, 0xbd, 0x22),
    Colour::from_rgb(0x17, 0xbe, 0xcf),
];

impl Palette for Tab10 {
    fn colour(&self, index: usize, _count: usize) -> Colour {
        TAB10[index % TAB10.len()]
    }

    fn name(&self) -> &str {
        "tab10"
    }
}

/// Evenly spaced samples of a continuous gradient
pub struct GradientPalette {
    name: &'static str,
    gradient: colorgrad::Gradient,
}

impl GradientPalette {
    pub fn new(name: &'static str, gradient: colorgrad::Gradient) -> Self {
        Self { name, gradient }
    }
}

impl Palette for GradientPalette {
    fn colour(&self, index: usize, count: usize) -> Colour {
        let t = if count > 1 {
            index as f64 / (count - 1) as f64
        } else {
            0.0
        };
        Colour::from(self.gradient.at(t).to_rgba8())
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Get a palette by name
pub fn get_palette(name: &str) -> Result<Box<dyn Palette>> {
    match name.to_lowercase().as_str() {
        "tab10" => Ok(Box::new(Tab10)),
        "viridis" => Ok(Box::new(GradientPalette::new("viridis", colorgrad::viridis()))),
        "plasma" => Ok(Box::new(GradientPalette::new("plasma", colorgrad::plasma()))),
        "turbo" => Ok(Box::new(GradientPalette::new("turbo", colorgrad::turbo()))),
        "sinebow" => Ok(Box::new(GradientPalette::new("sinebow", colorgrad::sinebow()))),
        _ => Err(DoylineError::InvalidParameter {
            param: "palette".to_string(),
            message: format!("Unknown palette: {}", name),
        }),
    }
}
