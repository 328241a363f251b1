// ── Colour themes ──
//
// A theme is a named three-colour palette. The terminal layer maps
// these to its own colour type; nothing here depends on a renderer.

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        let [_, r, g, b] = hex.to_be_bytes();
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub main: Rgb,
    pub dim: Rgb,
    pub bright: Rgb,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    #[default]
    Amber,
    Green,
    Blue,
}

impl Theme {
    pub const fn palette(self) -> Palette {
        match self {
            Self::Amber => Palette {
                main: Rgb::from_hex(0xFF_BF_00),
                dim: Rgb::from_hex(0xCC_99_00),
                bright: Rgb::from_hex(0xFF_DF_00),
            },
            Self::Green => Palette {
                main: Rgb::from_hex(0x00_FF_00),
                dim: Rgb::from_hex(0x00_99_00),
                bright: Rgb::from_hex(0xCC_FF_CC),
            },
            Self::Blue => Palette {
                main: Rgb::from_hex(0x00_BF_FF),
                dim: Rgb::from_hex(0x00_99_CC),
                bright: Rgb::from_hex(0x99_CC_FF),
            },
        }
    }

    /// `"amber, green, blue"`
    pub fn available() -> String {
        Self::iter()
            .map(<&'static str>::from)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("GREEN".parse::<Theme>().unwrap(), Theme::Green);
        assert_eq!("Blue".parse::<Theme>().unwrap(), Theme::Blue);
        assert!("purple".parse::<Theme>().is_err());
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(Theme::Amber.to_string(), "amber");
    }

    #[test]
    fn available_lists_every_theme() {
        assert_eq!(Theme::available(), "amber, green, blue");
    }

    #[test]
    fn amber_palette() {
        let palette = Theme::Amber.palette();
        assert_eq!(palette.main, Rgb { r: 0xFF, g: 0xBF, b: 0x00 });
        assert_eq!(palette.dim, Rgb { r: 0xCC, g: 0x99, b: 0x00 });
        assert_eq!(palette.bright, Rgb { r: 0xFF, g: 0xDF, b: 0x00 });
    }
}
