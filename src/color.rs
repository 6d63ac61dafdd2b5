//! Species color categories and text contrast

use ratatui::style::Color;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An 8-bit RGB swatch used as a result row background.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct SwatchColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl SwatchColor {
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
    pub const BLUE: Self = Self::rgb(0x00, 0x00, 0xFF);
    pub const BROWN: Self = Self::rgb(0xA5, 0x2A, 0x2A);
    pub const GRAY: Self = Self::rgb(0x88, 0x88, 0x88);
    pub const GREEN: Self = Self::rgb(0x00, 0xFF, 0x00);
    pub const PINK: Self = Self::rgb(0xFF, 0xC0, 0xCB);
    pub const PURPLE: Self = Self::rgb(0x80, 0x00, 0x80);
    pub const RED: Self = Self::rgb(0xFF, 0x00, 0x00);
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    pub const YELLOW: Self = Self::rgb(0xFF, 0xFF, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Map a `pokemon_color_id` to its swatch. Unknown ids fall back to white.
    pub fn from_category(id: i64) -> Self {
        match id {
            1 => Self::BLACK,
            2 => Self::BLUE,
            3 => Self::BROWN,
            4 => Self::GRAY,
            5 => Self::GREEN,
            6 => Self::PINK,
            7 => Self::PURPLE,
            8 => Self::RED,
            9 => Self::WHITE,
            10 => Self::YELLOW,
            _ => Self::WHITE,
        }
    }

    /// Perceived luminance in `0.0..=1.0`.
    pub fn luminance(self) -> f64 {
        (0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b))
            / 255.0
    }

    /// Text color that stays readable on top of this swatch.
    pub fn contrast_text(self) -> Self {
        let darkness = 1.0 - self.luminance();
        if darkness < 0.5 {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }
}

impl From<SwatchColor> for Color {
    fn from(color: SwatchColor) -> Self {
        Color::Rgb(color.r, color.g, color.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_categories() {
        let expected = [
            (1, SwatchColor::BLACK),
            (2, SwatchColor::BLUE),
            (3, SwatchColor::rgb(0xA5, 0x2A, 0x2A)),
            (4, SwatchColor::GRAY),
            (5, SwatchColor::GREEN),
            (6, SwatchColor::rgb(0xFF, 0xC0, 0xCB)),
            (7, SwatchColor::rgb(0x80, 0x00, 0x80)),
            (8, SwatchColor::RED),
            (9, SwatchColor::WHITE),
            (10, SwatchColor::YELLOW),
        ];
        for (id, color) in expected {
            assert_eq!(SwatchColor::from_category(id), color, "category {id}");
        }
    }

    #[test]
    fn test_unknown_categories_are_white() {
        for id in [i64::MIN, -1, 0, 11, 42, i64::MAX] {
            assert_eq!(SwatchColor::from_category(id), SwatchColor::WHITE);
        }
    }

    #[test]
    fn test_contrast_extremes() {
        assert_eq!(SwatchColor::BLACK.contrast_text(), SwatchColor::WHITE);
        assert_eq!(SwatchColor::WHITE.contrast_text(), SwatchColor::BLACK);
    }

    #[test]
    fn test_contrast_palette() {
        assert_eq!(SwatchColor::YELLOW.contrast_text(), SwatchColor::BLACK);
        assert_eq!(SwatchColor::PINK.contrast_text(), SwatchColor::BLACK);
        assert_eq!(SwatchColor::GREEN.contrast_text(), SwatchColor::BLACK);
        // 0x88 sits just above the midpoint
        assert_eq!(SwatchColor::GRAY.contrast_text(), SwatchColor::BLACK);
        assert_eq!(SwatchColor::BLUE.contrast_text(), SwatchColor::WHITE);
        assert_eq!(SwatchColor::RED.contrast_text(), SwatchColor::WHITE);
        assert_eq!(SwatchColor::BROWN.contrast_text(), SwatchColor::WHITE);
        assert_eq!(SwatchColor::PURPLE.contrast_text(), SwatchColor::WHITE);
    }

    #[test]
    fn test_contrast_is_stable() {
        let color = SwatchColor::rgb(120, 130, 140);
        assert_eq!(color.contrast_text(), color.contrast_text());
    }

    #[test]
    fn test_into_terminal_color() {
        let color: Color = SwatchColor::BROWN.into();
        assert_eq!(color, Color::Rgb(0xA5, 0x2A, 0x2A));
    }
}
