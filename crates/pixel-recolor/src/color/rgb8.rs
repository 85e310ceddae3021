//! 8-bit RGB color type

use std::fmt;
use std::str::FromStr;

use crate::error::ParseColorError;

/// An opaque 8-bit RGB color.
///
/// Opacity is never stored here; callers keep it next to the color (an
/// annotation style carries `opacity` separately, configuration colors are
/// always opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb8 {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl Rgb8 {
    /// Pure black
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Pure white
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Default markup color
    pub const YELLOW: Self = Self::new(255, 255, 0);
    /// Neutral gray used for placeholders
    pub const GRAY: Self = Self::new(160, 160, 164);

    /// Create a new color from 8-bit channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a byte array [R, G, B].
    ///
    /// # Example
    /// ```
    /// use pixel_recolor::Rgb8;
    /// let white = Rgb8::from_bytes([255, 255, 255]);
    /// assert_eq!(white, Rgb8::WHITE);
    /// ```
    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array [R, G, B].
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Perceptual gray level of this color, see [`crate::gray`].
    #[inline]
    pub fn gray(self) -> u8 {
        super::gray(self.r, self.g, self.b)
    }

    /// Darker variant of this color.
    ///
    /// `factor` follows the usual percentage convention: 150 returns a color
    /// whose HSV value is 100/150 of the original. Hue and saturation are
    /// kept, which for RGB means all channels scale by the same ratio.
    /// A factor of 0 returns the color unchanged.
    ///
    /// # Example
    /// ```
    /// use pixel_recolor::Rgb8;
    /// assert_eq!(Rgb8::new(255, 150, 0).darker(150), Rgb8::new(170, 100, 0));
    /// ```
    pub fn darker(self, factor: u32) -> Self {
        if factor == 0 {
            return self;
        }
        let scale = |c: u8| ((c as u32 * 100) / factor).min(255) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

impl fmt::Display for Rgb8 {
    /// Formats as lowercase `#rrggbb`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb8 {
    type Err = ParseColorError;

    /// Parse a color from a hex string.
    ///
    /// Supports the following formats:
    /// - `#RRGGBB` - standard 6-digit hex with hash
    /// - `RRGGBB` - standard 6-digit hex without hash
    /// - `#RGB` - shorthand 3-digit hex with hash (expands to RRGGBB)
    /// - `RGB` - shorthand 3-digit hex without hash
    ///
    /// Parsing is case-insensitive. Leading and trailing whitespace is trimmed.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixel_recolor::Rgb8;
    ///
    /// let red: Rgb8 = "#F00".parse().unwrap();
    /// assert_eq!(red, Rgb8::new(255, 0, 0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if !s.is_ascii() {
            return Err(ParseColorError::InvalidLength);
        }

        match s.len() {
            3 => {
                // Shorthand: expand each digit by multiplying by 17 (0xF -> 0xFF)
                let r = u8::from_str_radix(&s[0..1], 16)? * 17;
                let g = u8::from_str_radix(&s[1..2], 16)? * 17;
                let b = u8::from_str_radix(&s[2..3], 16)? * 17;
                Ok(Self::new(r, g, b))
            }
            6 => {
                let r = u8::from_str_radix(&s[0..2], 16)?;
                let g = u8::from_str_radix(&s[2..4], 16)?;
                let b = u8::from_str_radix(&s[4..6], 16)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ParseColorError::InvalidLength),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Rgb8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Rgb8 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
