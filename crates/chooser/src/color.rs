use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Luma threshold below which a color counts as dark.
const DARK_LUMA_THRESHOLD: f32 = 186.0;

/// A hue/saturation/value triple without alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsv {
    pub h: f32, // 0..360
    pub s: f32, // 0..1
    pub v: f32, // 0..1
}

impl Hsv {
    pub fn new(h: f32, s: f32, v: f32) -> Self {
        Self {
            h: normalize_hue(h),
            s: s.clamp(0.0, 1.0),
            v: v.clamp(0.0, 1.0),
        }
    }

    /// Convert to 8-bit RGB channels.
    pub fn to_rgb(self) -> [u8; 3] {
        let h = normalize_hue(self.h) / 60.0;
        let s = self.s.clamp(0.0, 1.0);
        let v = self.v.clamp(0.0, 1.0);
        let c = v * s;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let m = v - c;

        let (r, g, b) = match (h as u32).min(5) {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        [to_channel(r + m), to_channel(g + m), to_channel(b + m)]
    }

    /// Pack with the given alpha.
    pub fn to_argb(self, alpha: u8) -> Argb {
        let [r, g, b] = self.to_rgb();
        Argb::from_components(alpha, r, g, b)
    }
}

/// Wrap any hue into `[0, 360)`.
pub fn normalize_hue(hue: f32) -> f32 {
    if !hue.is_finite() {
        return 0.0;
    }
    let hue = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if hue >= 360.0 { 0.0 } else { hue }
}

fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// A color packed as `0xAARRGGBB`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Argb(pub u32);

impl Argb {
    pub const WHITE: Argb = Argb(0xffff_ffff);
    pub const BLACK: Argb = Argb(0xff00_0000);

    pub const fn from_components(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    pub const fn components(self) -> [u8; 4] {
        [self.alpha(), self.red(), self.green(), self.blue()]
    }

    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self((self.0 & 0x00ff_ffff) | (alpha as u32) << 24)
    }

    /// Decompose the RGB part into HSV. Hue is 0 for grays.
    pub fn to_hsv(self) -> Hsv {
        let r = self.red() as f32 / 255.0;
        let g = self.green() as f32 / 255.0;
        let b = self.blue() as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let d = max - min;

        let s = if max == 0.0 { 0.0 } else { d / max };
        let v = max;

        let mut h = 0.0;
        if max != min {
            if max == r {
                h = (g - b) / d + (if g < b { 6.0 } else { 0.0 });
            } else if max == g {
                h = (b - r) / d + 2.0;
            } else {
                h = (r - g) / d + 4.0;
            }
            h *= 60.0;
        }

        Hsv::new(h, s, v)
    }

    /// Perceived-luma contrast test: dark colors get light marks and vice versa.
    pub fn is_dark(self) -> bool {
        let luma = self.red() as f32 * 0.299
            + self.green() as f32 * 0.587
            + self.blue() as f32 * 0.114;
        luma < DARK_LUMA_THRESHOLD
    }

    /// White on dark colors, black on light ones.
    pub fn contrast(self) -> Argb {
        if self.is_dark() {
            Argb::WHITE
        } else {
            Argb::BLACK
        }
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.red(), self.green(), self.blue(), self.alpha())
    }

    /// Parse `#RGB`, `#ARGB`, `#RRGGBB` or `#AARRGGBB`. Short forms expand each nibble
    /// and forms without alpha are opaque.
    pub fn parse_hex(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(text.to_string());
        let digits = text.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let raw = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;

        let expand = |nibble: u32| ((nibble & 0xf) * 0x11) as u8;
        let argb = match digits.len() {
            3 => Self::from_components(0xff, expand(raw >> 8), expand(raw >> 4), expand(raw)),
            4 => Self::from_components(
                expand(raw >> 12),
                expand(raw >> 8),
                expand(raw >> 4),
                expand(raw),
            ),
            6 => Self(0xff00_0000 | raw),
            8 => Self(raw),
            _ => return Err(invalid()),
        };
        Ok(argb)
    }
}

impl fmt::Debug for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Argb({self})")
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08x}", self.0)
    }
}

impl From<u32> for Argb {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Serialize for Argb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Argb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Argb::parse_hex(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_primary_hues() {
        assert_eq!(Hsv::new(0.0, 1.0, 1.0).to_rgb(), [255, 0, 0]);
        assert_eq!(Hsv::new(120.0, 1.0, 1.0).to_rgb(), [0, 255, 0]);
        assert_eq!(Hsv::new(240.0, 1.0, 1.0).to_rgb(), [0, 0, 255]);
        assert_eq!(Hsv::new(360.0, 1.0, 1.0).to_rgb(), [255, 0, 0]);
        assert_eq!(Hsv::new(0.0, 0.0, 1.0).to_rgb(), [255, 255, 255]);
        assert_eq!(Hsv::new(200.0, 0.7, 0.0).to_rgb(), [0, 0, 0]);
    }

    #[test]
    fn test_normalize_hue() {
        assert_eq!(normalize_hue(-30.0), 330.0);
        assert_eq!(normalize_hue(720.0), 0.0);
        assert_eq!(normalize_hue(f32::NAN), 0.0);
        assert!(normalize_hue(-1e-9) < 360.0);
    }

    #[test]
    fn test_components() {
        let color = Argb::from_components(0x12, 0x34, 0x56, 0x78);
        assert_eq!(color, Argb(0x1234_5678));
        assert_eq!(color.components(), [0x12, 0x34, 0x56, 0x78]);
        assert_eq!(color.with_alpha(0xff), Argb(0xff34_5678));
        assert_eq!(color.to_string(), "#12345678");
    }

    #[test]
    fn test_gray_has_zero_hue() {
        let hsv = Argb(0xff80_8080).to_hsv();
        assert_eq!(hsv.h, 0.0);
        assert_eq!(hsv.s, 0.0);
        assert!((hsv.v - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_is_dark() {
        assert!(Argb::BLACK.is_dark());
        assert!(!Argb::WHITE.is_dark());
        // Pure red: 0.299 * 255 = 76.2
        assert!(Argb(0xffff_0000).is_dark());
        // Yellow: 0.299 * 255 + 0.587 * 255 = 225.9
        assert!(!Argb(0xffff_ff00).is_dark());
        assert_eq!(Argb::BLACK.contrast(), Argb::WHITE);
        assert_eq!(Argb::WHITE.contrast(), Argb::BLACK);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(Argb::parse_hex("#f00").unwrap(), Argb(0xffff_0000));
        assert_eq!(Argb::parse_hex("#8f00").unwrap(), Argb(0x88ff_0000));
        assert_eq!(Argb::parse_hex("#808080").unwrap(), Argb(0xff80_8080));
        assert_eq!(Argb::parse_hex(" #20ABCDEF ").unwrap(), Argb(0x20ab_cdef));
        assert!(Argb::parse_hex("808080").is_err());
        assert!(Argb::parse_hex("#12345").is_err());
        assert!(Argb::parse_hex("#+12345").is_err());
        assert!(Argb::parse_hex("#ggg").is_err());
    }

    #[test]
    fn test_serde_hex() {
        let color: Argb = serde_json::from_str(r##""#ff808080""##).unwrap();
        assert_eq!(color, Argb(0xff80_8080));
        assert_eq!(serde_json::to_string(&color).unwrap(), r##""#ff808080""##);
        assert!(serde_json::from_str::<Argb>(r#""red""#).is_err());
    }

    proptest! {
        #[test]
        fn argb_hsv_argb_round_trips(a in 0u8..=255, r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let color = Argb::from_components(a, r, g, b);
            let back = color.to_hsv().to_argb(color.alpha());

            prop_assert_eq!(back.alpha(), a);
            prop_assert!((back.red() as i16 - r as i16).abs() <= 1);
            prop_assert!((back.green() as i16 - g as i16).abs() <= 1);
            prop_assert!((back.blue() as i16 - b as i16).abs() <= 1);
        }

        #[test]
        fn hsv_argb_hsv_keeps_channels_in_range(h in 0.0f32..360.0, s in 0.0f32..=1.0, v in 0.0f32..=1.0) {
            let hsv = Hsv::new(h, s, v).to_argb(255).to_hsv();
            prop_assert!(hsv.h >= 0.0 && hsv.h < 360.0);
            prop_assert!((0.0..=1.0).contains(&hsv.s));
            prop_assert!((0.0..=1.0).contains(&hsv.v));
        }
    }
}
