//! Color palette - Monochrome grayscale theme

use ratatui::style::Color;

/// Monochrome grayscale palette
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_dim: Color,
    pub accent: Color,
    pub accent_alt: Color,
    pub border: Color,
    pub border_held: Color,
    pub playing: Color,
    pub error: Color,
}

impl Palette {
    /// Monochrome palette - pure black, white, and grays
    pub const MONO: Self = Self {
        fg_primary: Color::Rgb(255, 255, 255),   // #ffffff white
        fg_secondary: Color::Rgb(136, 136, 136), // #888888 medium gray
        fg_dim: Color::Rgb(88, 88, 88),          // #585858 dim gray
        accent: Color::Rgb(255, 255, 255),       // #ffffff white (accent = white)
        accent_alt: Color::Rgb(200, 200, 200),   // #c8c8c8 light gray
        border: Color::Rgb(64, 64, 64),          // #404040 dark gray
        border_held: Color::Rgb(160, 160, 160),  // #a0a0a0 while the user holds scroll
        playing: Color::Rgb(255, 255, 255),      // #ffffff white
        error: Color::Rgb(255, 255, 255),        // #ffffff white (errors still visible via icon)
    };
}

impl Default for Palette {
    fn default() -> Self {
        Self::MONO
    }
}
