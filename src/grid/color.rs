//! RGBA cell payload.

use std::fmt;
use std::str::FromStr;

/// An 8-bit-per-channel RGBA color.
///
/// The grid stores colors verbatim: there is no blending, premultiplication
/// or color-space handling.
///
/// # Examples
///
/// ```rust
/// use sparse_raster::grid::Color;
///
/// let color: Color = "#ff8000".parse().unwrap();
/// assert_eq!(color, Color::rgb(255, 128, 0));
/// assert_eq!(color.to_string(), "#ff8000");
///
/// let translucent = Color::rgba(0, 0, 255, 128);
/// assert_eq!(translucent.to_string(), "#0000ff80");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Color {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Alpha channel, `255` is fully opaque.
    pub alpha: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, u8::MAX)
    }

    /// Creates a color with an explicit alpha channel.
    #[must_use]
    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Returns `true` if the alpha channel is `255`.
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.alpha == u8::MAX
    }
}

impl fmt::Display for Color {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "#{:02x}{:02x}{:02x}",
            self.red, self.green, self.blue
        )?;
        if !self.is_opaque() {
            write!(formatter, "{:02x}", self.alpha)?;
        }
        Ok(())
    }
}

/// Error returned when parsing a [`Color`] from a hex string fails.
///
/// # Examples
///
/// ```rust
/// use sparse_raster::grid::{Color, ColorParseError};
///
/// assert_eq!("ff0000".parse::<Color>(), Err(ColorParseError::MissingPrefix));
/// assert_eq!(
///     "#ff00".parse::<Color>(),
///     Err(ColorParseError::InvalidLength { length: 4 })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// The string does not start with `#`.
    MissingPrefix,
    /// The number of hex digits is neither 6 nor 8.
    InvalidLength {
        /// Number of digits after the `#`.
        length: usize,
    },
    /// A character is not a hex digit.
    InvalidDigit {
        /// Character index of the offending digit, counting the `#`.
        position: usize,
    },
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPrefix => write!(formatter, "color must start with '#'"),
            Self::InvalidLength { length } => write!(
                formatter,
                "color must have 6 or 8 hex digits, found {length}"
            ),
            Self::InvalidDigit { position } => {
                write!(formatter, "invalid hex digit at position {position}")
            }
        }
    }
}

impl std::error::Error for ColorParseError {}

impl FromStr for Color {
    type Err = ColorParseError;

    /// Parses `#rrggbb` (opaque) or `#rrggbbaa`, case-insensitively.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let digits = text
            .strip_prefix('#')
            .ok_or(ColorParseError::MissingPrefix)?;

        if let Some(index) = digits.chars().position(|digit| !digit.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit { position: index + 1 });
        }
        if digits.len() != 6 && digits.len() != 8 {
            return Err(ColorParseError::InvalidLength {
                length: digits.len(),
            });
        }

        let channel = |index: usize| {
            let start = index * 2;
            u8::from_str_radix(&digits[start..start + 2], 16)
                .map_err(|_| ColorParseError::InvalidDigit { position: start + 1 })
        };

        let alpha = if digits.len() == 8 {
            channel(3)?
        } else {
            u8::MAX
        };
        Ok(Self::rgba(channel(0)?, channel(1)?, channel(2)?, alpha))
    }
}
