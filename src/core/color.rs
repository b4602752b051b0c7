//! # Colors
//!
//! RGBA colors with components in `0.0..=1.0`, hex parsing, and the named
//! palette used for bubbles, labels and backgrounds.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// The string contained a non-hex digit.
    InvalidDigit(String),
    /// Digit count was not 3, 4, 6 or 8.
    InvalidLength(usize),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorParseError::InvalidDigit(s) => write!(f, "invalid hex color: {s}"),
            ColorParseError::InvalidLength(n) => {
                write!(f, "hex color must have 3, 4, 6 or 8 digits, got {n}")
            }
        }
    }
}

impl std::error::Error for ColorParseError {}

impl Color {
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Opaque color from 8-bit channels.
    pub const fn from_rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::new(
            red as f32 / 255.0,
            green as f32 / 255.0,
            blue as f32 / 255.0,
            1.0,
        )
    }

    /// Opaque color from a packed `0xRRGGBB` value.
    pub const fn from_hex_int(hex: u32) -> Self {
        Self::from_rgb8(
            ((hex >> 16) & 0xff) as u8,
            ((hex >> 8) & 0xff) as u8,
            (hex & 0xff) as u8,
        )
    }

    /// Parses `RGB`, `RGBA`, `RRGGBB` or `RRGGBBAA`, with an optional `#` or
    /// `0x` prefix. `alpha` applies unless the string carries its own.
    pub fn from_hex_str(hex: &str, alpha: f32) -> Result<Self, ColorParseError> {
        let digits = hex
            .strip_prefix('#')
            .or_else(|| hex.strip_prefix("0x"))
            .unwrap_or(hex);
        let value = u64::from_str_radix(digits, 16)
            .map_err(|_| ColorParseError::InvalidDigit(hex.to_string()))?;

        let nibble = |shift: u32| ((value >> shift) & 0xF) as f32 / 15.0;
        let byte = |shift: u32| ((value >> shift) & 0xFF) as f32 / 255.0;

        match digits.len() {
            3 => Ok(Self::new(nibble(8), nibble(4), nibble(0), alpha)),
            4 => Ok(Self::new(nibble(12), nibble(8), nibble(4), nibble(0))),
            6 => Ok(Self::new(byte(16), byte(8), byte(0), alpha)),
            8 => Ok(Self::new(byte(24), byte(16), byte(8), byte(0))),
            n => Err(ColorParseError::InvalidLength(n)),
        }
    }

    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    pub fn components(&self) -> (f32, f32, f32, f32) {
        (self.red, self.green, self.blue, self.alpha)
    }

    /// 8-bit channels, alpha dropped.
    pub fn to_rgb8(&self) -> (u8, u8, u8) {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.red), channel(self.green), channel(self.blue))
    }
}

pub const INCOMING_GRAY: Color = Color::from_rgb8(230, 230, 235);
pub const OUTGOING_GREEN: Color = Color::from_rgb8(69, 214, 93);
pub const PLAY_BUTTON_LIGHT_GRAY: Color = Color::from_rgb8(230, 230, 230);
pub const SMS_GREEN: Color = Color::new(0.602, 0.792, 0.377, 1.0);
pub const C2C_BLUE: Color = Color::new(0.005, 0.458, 0.850, 1.0);
pub const ROYAL_BLUE: Color = Color::from_hex_int(0x1E96FC);
pub const GLOBAL_TINT: Color = Color::from_hex_int(0xE9E9EC);
pub const DARK_GREY: Color = Color::from_hex_int(0x1E1F20);

// Messaging
pub const THREAD_BACKGROUND: Color = Color::from_hex_int(0xFAFAFA);
pub const MESSAGING_LIGHT_GRAY: Color = Color::from_hex_int(0x8F92A1);
pub const PRIVATE_CHAT_MODE: Color = Color::from_hex_int(0xFBAB3D);
pub const INTERNAL_MESSAGE_BACKGROUND: Color = Color::from_hex_int(0xFAEAD4);
