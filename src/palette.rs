use image::Rgba;

/// A named set of five terrain colours ordered deep sea -> high land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub name: &'static str,
    colors: [u32; 5],
}

impl ColorScheme {
    /// Colour for a terrain class index; indices above 4 use the highest band.
    pub fn terrain_color(&self, index: usize) -> Rgba<u8> {
        rgba(self.colors[index.min(self.colors.len() - 1)], 255)
    }

    pub fn colors(&self) -> [Rgba<u8>; 5] {
        self.colors.map(|hex| rgba(hex, 255))
    }
}

/// Converts a 0xRRGGBB literal plus alpha into a pixel.
pub const fn rgba(hex: u32, alpha: u8) -> Rgba<u8> {
    Rgba([(hex >> 16) as u8, (hex >> 8) as u8, hex as u8, alpha])
}

pub const COLOR_SCHEMES: [ColorScheme; 14] = [
    ColorScheme { name: "A Land of Blue and Gold", colors: [0xC4D3FF, 0xE2FFFF, 0x66999B, 0xB3AF8F, 0xFFC482] },
    ColorScheme { name: "Awash In a Chemical Sea", colors: [0xEFFFB7, 0x90FFD1, 0x348AA7, 0x525174, 0x513B56] },
    ColorScheme { name: "Another Green World", colors: [0xA0EEC0, 0x8AE9C1, 0x86CD82, 0x72A276, 0x666B6A] },
    ColorScheme { name: "Beneath a Steel Sky", colors: [0xBEF1F1, 0xFFFFFF, 0xFFD5C2, 0xF28F3B, 0xC8553D] },
    ColorScheme { name: "In the Pink", colors: [0xFFE2FF, 0xFFCAFF, 0xA480CF, 0x779BE7, 0x49B6FF] },
    ColorScheme { name: "Spicy Citrus", colors: [0xC7D5FF, 0xE7E7E7, 0xF9C784, 0xFC7A1E, 0xF24C00] },
    ColorScheme { name: "The Desert Coast; Salt and Sand", colors: [0x53B3CB, 0xF9C22E, 0xF15946, 0xE01A4F, 0xE29578] },
    ColorScheme { name: "The Fertile Lands", colors: [0x8DF1FF, 0x6BFFB8, 0x2CEAA3, 0x28965A, 0x2A6041] },
    ColorScheme { name: "All Around Us, Plains of Ice", colors: [0xE7E7E7, 0xE5E5E5, 0x999999, 0xBBBBBB, 0xEEEEEE] },
    ColorScheme { name: "The Trappings of Autumn", colors: [0xA0EEC0, 0xFFFFCE, 0xFFC53A, 0xE06D06, 0xB26700] },
    ColorScheme { name: "Beneath the Water's Icy Depths", colors: [0xE6E5E6, 0xFFE7FF, 0x02A9EA, 0x4E4C67, 0x54428E] },
    ColorScheme { name: "The Drowned World", colors: [0xEEEEFF, 0xD2E7FA, 0x28587B, 0x48233C, 0x32021F] },
    ColorScheme { name: "Crisp Leaves Crumple Underfoot", colors: [0x40A4DF, 0x514B23, 0x656839, 0xCBC9AD, 0xBDDBD0] },
    ColorScheme { name: "Two Weeks in Mordor", colors: [0x86E6FE, 0xFFFFC7, 0xF15946, 0xE01A4F, 0xE29578] },
];

// Fixed decoration colours
pub const STIPPLE_DARK: Rgba<u8> = rgba(0x000000, 85);
pub const STIPPLE_LIGHT: Rgba<u8> = rgba(0x808080, 85);
pub const RIPPLE_LIGHT: Rgba<u8> = rgba(0xFFFFFF, 64);
pub const RIPPLE_SHADOW: Rgba<u8> = rgba(0x000000, 21);
// Alpha is chosen per clump
pub const FOREST: Rgba<u8> = rgba(0x0A0707, 0);
pub const BORDER_CREAM: Rgba<u8> = rgba(0xFFFFF0, 255);
pub const INK: Rgba<u8> = rgba(0x000000, 255);
pub const PAPER: Rgba<u8> = rgba(0xFFFFFF, 255);

/// Same colour with a different alpha.
pub fn with_alpha(color: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], alpha])
}
