use ratatui::style::Color;

use scrollstage_core::VisualVariant;

/// Colors for one header/section variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey0: Color,
    pub grey1: Color,

    // Semantic colors
    pub accent: Color,
    pub selection: Color,
    pub disabled: Color,
}

impl Theme {
    /// Gruvbox dark
    pub const DARK: Theme = Theme {
        bg0: Color::Rgb(0x28, 0x28, 0x28),
        bg1: Color::Rgb(0x32, 0x30, 0x2f),
        bg2: Color::Rgb(0x45, 0x40, 0x3d),
        fg0: Color::Rgb(0xd4, 0xbe, 0x98),
        fg1: Color::Rgb(0xdd, 0xc7, 0xa1),
        grey0: Color::Rgb(0x7c, 0x6f, 0x64),
        grey1: Color::Rgb(0x92, 0x83, 0x74),
        accent: Color::Rgb(0x89, 0xb4, 0x82),
        selection: Color::Rgb(0x45, 0x40, 0x3d),
        disabled: Color::Rgb(0xea, 0x69, 0x62),
    };

    /// Gruvbox light
    pub const LIGHT: Theme = Theme {
        bg0: Color::Rgb(0xfb, 0xf1, 0xc7),
        bg1: Color::Rgb(0xf2, 0xe5, 0xbc),
        bg2: Color::Rgb(0xe5, 0xd5, 0xad),
        fg0: Color::Rgb(0x65, 0x47, 0x35),
        fg1: Color::Rgb(0x4f, 0x38, 0x29),
        grey0: Color::Rgb(0xa8, 0x99, 0x84),
        grey1: Color::Rgb(0x92, 0x83, 0x74),
        accent: Color::Rgb(0x45, 0x70, 0x7a),
        selection: Color::Rgb(0xe5, 0xd5, 0xad),
        disabled: Color::Rgb(0xc1, 0x4a, 0x4a),
    };

    pub fn for_variant(variant: VisualVariant) -> Self {
        match variant {
            VisualVariant::Dark => Self::DARK,
            VisualVariant::Light => Self::LIGHT,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::DARK
    }
}
