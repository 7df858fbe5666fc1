//! Connection colors.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A 24-bit display color, serialized as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }
}

/// The default connection palette.
///
/// Some colors appear twice, which weights them in uniform sampling.
pub const DEFAULT: [Rgb; 20] = [
    Rgb::from_hex(0xFF1493),
    Rgb::from_hex(0x00FFFF),
    Rgb::from_hex(0xFF00FF),
    Rgb::from_hex(0xFFFF00),
    Rgb::from_hex(0x00FF00),
    Rgb::from_hex(0xFF4500),
    Rgb::from_hex(0xFF69B4),
    Rgb::from_hex(0x00CED1),
    Rgb::from_hex(0xFFD700),
    Rgb::from_hex(0x32CD32),
    Rgb::from_hex(0xFF6347),
    Rgb::from_hex(0x9370DB),
    Rgb::from_hex(0x20B2AA),
    Rgb::from_hex(0xFFA500),
    Rgb::from_hex(0xFF1493),
    Rgb::from_hex(0x00FA9A),
    Rgb::from_hex(0x1E90FF),
    Rgb::from_hex(0xFF69B4),
    Rgb::from_hex(0xBA55D3),
    Rgb::from_hex(0x48D1CC),
];

/// Picks a color uniformly from `palette`.
///
/// Falls back to white for an empty palette.
pub fn pick(palette: &[Rgb], rng: &mut impl Rng) -> Rgb {
    if palette.is_empty() {
        return Rgb::new(0xff, 0xff, 0xff);
    }
    palette[rng.random_range(0..palette.len())]
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid color `{0}`, expected #RRGGBB")]
pub struct ParseRgbError(String);

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseRgbError(s.to_owned());
        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        u32::from_str_radix(digits, 16)
            .map(Rgb::from_hex)
            .map_err(|_| invalid())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
