use ratatui::style::Color;
use std::sync::LazyLock;

// Color palette structure
#[derive(Clone, Debug)]
pub struct Base16Palette {
    pub base_00: Color, // Background
    pub base_01: Color, // Lighter background
    pub base_02: Color, // Selection background
    pub base_03: Color, // Comments, invisibles
    pub base_04: Color, // Dark foreground
    pub base_05: Color, // Default foreground
    pub base_06: Color, // Light foreground
    pub base_07: Color, // Light background
    pub base_08: Color, // Red
    pub base_0a: Color, // Yellow
    pub base_0d: Color, // Blue
}

const fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

// Oceanic Next theme
static OCEANIC_NEXT_PALETTE: LazyLock<Base16Palette> = LazyLock::new(|| Base16Palette {
    base_00: rgb(0x1B2B34),
    base_01: rgb(0x343D46),
    base_02: rgb(0x4F5B66),
    base_03: rgb(0x65737E),
    base_04: rgb(0xA7ADBA),
    base_05: rgb(0xC0C5CE),
    base_06: rgb(0xCDD3DE),
    base_07: rgb(0xF0F4F8),
    base_08: rgb(0xEC5F67),
    base_0a: rgb(0xFAC863),
    base_0d: rgb(0x6699CC),
});

pub fn current_theme() -> &'static Base16Palette {
    &OCEANIC_NEXT_PALETTE
}

impl Base16Palette {
    /// (text, border) colors for a navigation control
    pub fn control_colors(&self, enabled: bool) -> (Color, Color) {
        if enabled {
            (self.base_07, self.base_04)
        } else {
            // Disabled controls fade into the background
            (self.base_03, self.base_02)
        }
    }

    /// (background, foreground) of a page surface
    pub fn page_colors(&self) -> (Color, Color) {
        (self.base_07, self.base_00)
    }
}
