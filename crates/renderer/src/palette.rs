//! Shading colours for the curtains background.
//!
//! A [`Palette`] is derived either from one of the hand-authored
//! [`BackgroundStyle`]s or from a single base colour by fixed multiplicative
//! shades. Every channel is clamped to `[0, 1]` on construction.

use personalization::{BackgroundEffectSettings, BackgroundStyle, RgbaColor};

const TOP_SHADE: f32 = 1.0;
const BOTTOM_SHADE: f32 = 0.16;
const GLOW_SHADE: f32 = 0.42;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Clamps every channel into `[0, 1]`; non-finite channels become `0`.
    pub fn clamped(self) -> Self {
        fn channel(value: f32) -> f32 {
            if value.is_finite() {
                value.clamp(0.0, 1.0)
            } else {
                0.0
            }
        }
        Self::new(channel(self.r), channel(self.g), channel(self.b), channel(self.a))
    }

    /// Linear interpolation written as `a * (1 - t) + b * t` so both endpoints
    /// are reproduced exactly.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let inv = 1.0 - t;
        Self::new(
            self.r * inv + other.r * t,
            self.g * inv + other.g * t,
            self.b * inv + other.b * t,
            self.a * inv + other.a * t,
        )
    }

    fn shade(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor, 1.0).clamped()
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<RgbaColor> for Rgba {
    fn from(value: RgbaColor) -> Self {
        Self::new(
            value.red as f32,
            value.green as f32,
            value.blue as f32,
            value.alpha as f32,
        )
    }
}

/// Four colours consumed by the background shader and the surface clear.
///
/// `clear` is its own channel set and is interpolated independently of
/// `bottom` during transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub top: Rgba,
    pub bottom: Rgba,
    pub glow: Rgba,
    pub clear: Rgba,
}

impl Palette {
    /// Builds a palette from a single base colour.
    ///
    /// Top keeps the base colour, bottom and glow are darker shades of it and
    /// the clear colour matches the bottom shade. Alpha is always `1`.
    pub fn from_base_color(base: Rgba) -> Self {
        let base = base.clamped();
        let bottom = base.shade(BOTTOM_SHADE);
        Self {
            top: base.shade(TOP_SHADE),
            bottom,
            glow: base.shade(GLOW_SHADE),
            clear: bottom,
        }
    }

    pub fn from_style(style: BackgroundStyle) -> Self {
        let palette = match style {
            BackgroundStyle::DeepBlue => Self {
                top: Rgba::opaque(0.14, 0.34, 0.72),
                bottom: Rgba::opaque(0.05, 0.06, 0.10),
                glow: Rgba::opaque(0.20, 0.12, 0.08),
                clear: Rgba::opaque(0.08, 0.10, 0.15),
            },
            BackgroundStyle::DeepRed => Self {
                top: Rgba::opaque(0.58, 0.08, 0.13),
                bottom: Rgba::opaque(0.09, 0.01, 0.02),
                glow: Rgba::opaque(0.24, 0.07, 0.04),
                clear: Rgba::opaque(0.14, 0.03, 0.04),
            },
            BackgroundStyle::DeepGreen => Self {
                top: Rgba::opaque(0.07, 0.46, 0.28),
                bottom: Rgba::opaque(0.01, 0.09, 0.06),
                glow: Rgba::opaque(0.14, 0.22, 0.12),
                clear: Rgba::opaque(0.02, 0.12, 0.08),
            },
        };
        palette.clamped()
    }

    /// Per-channel interpolation of all four colours.
    pub fn blend(&self, other: &Palette, t: f32) -> Palette {
        Palette {
            top: self.top.lerp(other.top, t),
            bottom: self.bottom.lerp(other.bottom, t),
            glow: self.glow.lerp(other.glow, t),
            clear: self.clear.lerp(other.clear, t),
        }
    }

    fn clamped(self) -> Self {
        Self {
            top: self.top.clamped(),
            bottom: self.bottom.clamped(),
            glow: self.glow.clamped(),
            clear: self.clear.clamped(),
        }
    }

    #[cfg(test)]
    fn channels(&self) -> [Rgba; 4] {
        [self.top, self.bottom, self.glow, self.clear]
    }
}

/// Where the live palette comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaletteSource {
    Style(BackgroundStyle),
    Custom(Rgba),
}

impl PaletteSource {
    /// A named style wins over the custom base colour.
    pub fn from_settings(settings: &BackgroundEffectSettings) -> Self {
        match settings.style {
            Some(style) => PaletteSource::Style(style),
            None => PaletteSource::Custom(settings.custom_color.into()),
        }
    }

    pub fn resolve(self) -> Palette {
        match self {
            PaletteSource::Style(style) => Palette::from_style(style),
            PaletteSource::Custom(base) => Palette::from_base_color(base),
        }
    }
}
