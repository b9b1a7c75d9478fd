//! RGBA color with HSL conversion and WCAG contrast helpers.
//!
//! Components are stored as `f32` in `[0.0, 1.0]`. Packed `0xAARRGGBB` values,
//! the form notification payloads carry, convert through [`Color::from_argb`] and
//! [`Color::to_argb`].

use serde::{Deserialize, Serialize};

/// Minimum WCAG contrast ratio for normal-size text.
pub const MIN_TEXT_CONTRAST_RATIO: f32 = 4.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };

    /// Creates a color, clamping every component to `[0.0, 1.0]`.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
            a: a.clamp(0.0, 1.0),
        }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Unpacks `0xAARRGGBB`.
    pub fn from_argb(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Packs into `0xAARRGGBB`, rounding each channel.
    pub fn to_argb(&self) -> u32 {
        let (r, g, b) = self.to_rgb8();
        let a = (self.a * 255.0).round() as u8;
        u32::from_be_bytes([a, r, g, b])
    }

    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        (
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
        )
    }

    /// Returns `(hue in degrees, saturation, lightness)`.
    pub fn to_hsl(&self) -> (f32, f32, f32) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let l = (max + min) / 2.0;

        if max == min {
            return (0.0, 0.0, l);
        }

        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };

        let h = if max == self.r {
            (self.g - self.b) / d + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / d + 2.0
        } else {
            (self.r - self.g) / d + 4.0
        };

        (h * 60.0, s, l)
    }

    /// Builds an opaque color from HSL; hue wraps, saturation and lightness clamp.
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(360.0) / 360.0;
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self::rgb(l, l, l);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self::rgb(
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    }

    /// Same hue and saturation with lightness replaced; alpha is preserved.
    pub fn with_lightness(&self, lightness: f32) -> Self {
        let (h, s, _) = self.to_hsl();
        let mut color = Self::from_hsl(h, s, lightness);
        color.a = self.a;
        color
    }

    /// Shifts HSL lightness by `amount`, clamped to `[0.0, 1.0]`.
    pub fn adjust_lightness(&self, amount: f32) -> Self {
        let (_, _, l) = self.to_hsl();
        self.with_lightness(l + amount)
    }

    /// WCAG 2.x relative luminance of the RGB channels.
    pub fn relative_luminance(&self) -> f32 {
        fn channel(c: f32) -> f32 {
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }

    /// WCAG contrast ratio between two colors, in `[1.0, 21.0]`.
    pub fn contrast_ratio(&self, other: &Color) -> f32 {
        let l1 = self.relative_luminance();
        let l2 = other.relative_luminance();
        let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }

    /// Returns the lightest variant of `self` (same hue and saturation) whose
    /// contrast against `background` reaches `min_ratio`.
    ///
    /// Colors that already satisfy the ratio are returned unchanged. Lightness is
    /// searched downwards for light backgrounds and upwards for dark ones.
    pub fn ensure_contrast(&self, background: &Color, min_ratio: f32) -> Color {
        if self.contrast_ratio(background) >= min_ratio {
            return *self;
        }

        let (_, _, l) = self.to_hsl();
        let darken = background.relative_luminance() > 0.5;
        // `good` always meets the ratio; `bad` never does.
        let (mut good, mut bad) = if darken { (0.0_f32, l) } else { (1.0_f32, l) };

        for _ in 0..16 {
            let mid = (good + bad) / 2.0;
            if self.with_lightness(mid).contrast_ratio(background) >= min_ratio {
                good = mid;
            } else {
                bad = mid;
            }
        }
        self.with_lightness(good)
    }
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
