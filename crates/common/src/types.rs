use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identity of a body placed in the scene.
///
/// Scene membership and "is this the mounted body" checks compare ids, never
/// positions or geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub Uuid);

impl BodyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for BodyId {
    fn default() -> Self {
        Self::new()
    }
}

/// A color string that is neither `#rrggbb` nor `#aarrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}, expected #rrggbb or #aarrggbb")]
pub struct ParseColorError(pub String);

/// 8-bit RGBA color. Serialized as a hex string in the `#rrggbb` /
/// `#aarrggbb` form accepted by [`Rgba::parse_hex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#aarrggbb` (alpha first, as Android color strings do).
    pub fn parse_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
            _ => None,
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value).ok_or(ParseColorError(value))
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> Self {
        if c.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", c.a, c.r, c.g, c.b)
        }
    }
}

/// Stroke end style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Horizontal anchoring of text relative to its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Style passed along with every canvas operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    pub color: Rgba,
    pub stroke_width: f32,
    pub cap: StrokeCap,
    pub text_size: f32,
    pub text_align: TextAlign,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            stroke_width: 1.0,
            cap: StrokeCap::Butt,
            text_size: 12.0,
            text_align: TextAlign::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_id_uniqueness() {
        let a = BodyId::new();
        let b = BodyId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn parse_rgb_hex() {
        assert_eq!(Rgba::parse_hex("#55280f"), Some(Rgba::rgb(0x55, 0x28, 0x0f)));
    }

    #[test]
    fn parse_argb_hex_puts_alpha_last() {
        assert_eq!(
            Rgba::parse_hex("#aa6d8346"),
            Some(Rgba::rgba(0x6d, 0x83, 0x46, 0xaa))
        );
    }

    #[test]
    fn hex_string_form() {
        assert_eq!(String::from(Rgba::rgb(0x55, 0x28, 0x0f)), "#55280f");
        assert_eq!(String::from(Rgba::rgba(0x6d, 0x83, 0x46, 0xaa)), "#aa6d8346");
        let err = Rgba::try_from("teal".to_owned()).unwrap_err();
        assert_eq!(err, ParseColorError("teal".to_owned()));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(Rgba::parse_hex("55280f"), None);
        assert_eq!(Rgba::parse_hex("#5528"), None);
        assert_eq!(Rgba::parse_hex("#zz280f"), None);
    }
}
