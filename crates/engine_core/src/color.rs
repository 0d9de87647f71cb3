//! RGB colors for palettes, materials and per-instance tints.

/// An RGB color with components in `0.0..=1.0` (sRGB encoded).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as f32 / 255.0,
            g: ((rgb >> 8) & 0xff) as f32 / 255.0,
            b: (rgb & 0xff) as f32 / 255.0,
        }
    }

    /// Convert the sRGB encoded color to linear space for shading.
    pub fn to_linear(self) -> Self {
        fn channel(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Self::rgb(channel(self.r), channel(self.g), channel(self.b))
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self::rgb(self.r * factor, self.g * factor, self.b * factor)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// RGBA array with the given alpha, for GPU buffers.
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

/// Named colors of the scene's gold and emerald theme.
pub mod theme {
    use super::Color;

    pub const EMERALD_DARK: Color = Color::hex(0x013220);
    pub const EMERALD_LIGHT: Color = Color::hex(0x005533);
    pub const EMERALD_WARM: Color = Color::hex(0x2E4A3B);

    pub const GOLD: Color = Color::hex(0xFFD700);
    pub const GOLD_LIGHT: Color = Color::hex(0xFFFACD);
    pub const GOLD_DARK: Color = Color::hex(0xB8860B);
    pub const AMBER: Color = Color::hex(0xFFBF00);
    pub const ORANGE_GOLD: Color = Color::hex(0xDAA520);
    pub const BRONZE: Color = Color::hex(0xCD7F32);
    pub const CHAMPAGNE: Color = Color::hex(0xF7E7CE);

    pub const DEEP_RED: Color = Color::hex(0x500000);
    pub const PEARL: Color = Color::hex(0xF0F0F0);

    pub const BACKGROUND: Color = Color::hex(0x020403);

    pub const GIFT_RED: Color = Color::hex(0x8B0000);
    pub const GIFT_GREEN: Color = Color::hex(0x004D00);
    pub const GIFT_GOLD: Color = Color::hex(0xFFD700);
    pub const GIFT_WHITE: Color = Color::hex(0xF0F0F0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_unpacks_channels() {
        let c = Color::hex(0xFF8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn linear_conversion_keeps_endpoints() {
        assert_eq!(Color::rgb(0.0, 0.0, 0.0).to_linear(), Color::rgb(0.0, 0.0, 0.0));
        let white = Color::WHITE.to_linear();
        assert!((white.r - 1.0).abs() < 1e-5);
        let mid = Color::rgb(0.5, 0.5, 0.5).to_linear();
        assert!(mid.r < 0.25 && mid.r > 0.2);
    }
}
