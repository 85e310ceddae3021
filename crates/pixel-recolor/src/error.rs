//! Error types for color parsing and buffer construction

use std::fmt;
use std::num::ParseIntError;

/// Error type for parsing hex color strings.
///
/// Returned when parsing a hex color string fails, either due to
/// invalid length or invalid hexadecimal characters.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    InvalidLength,
    /// Invalid hexadecimal character encountered
    InvalidHex(ParseIntError),
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength => {
                write!(f, "invalid hex color length (expected 3 or 6 characters)")
            }
            ParseColorError::InvalidHex(err) => {
                write!(f, "invalid hex character: {}", err)
            }
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}

/// Error type for [`PixelBuffer`](crate::PixelBuffer) construction.
#[derive(Debug, Clone, PartialEq)]
pub enum BufferError {
    /// Width or height is zero
    EmptyDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// Byte length does not match `width * height * 4`
    LengthMismatch {
        /// Expected byte count
        expected: usize,
        /// Byte count actually provided
        actual: usize,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::EmptyDimensions { width, height } => {
                write!(f, "buffer dimensions must be non-zero, got {}x{}", width, height)
            }
            BufferError::LengthMismatch { expected, actual } => {
                write!(
                    f,
                    "buffer length mismatch: expected {} bytes, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for BufferError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_error_display() {
        assert_eq!(
            ParseColorError::InvalidLength.to_string(),
            "invalid hex color length (expected 3 or 6 characters)"
        );
        let err: ParseColorError = u8::from_str_radix("zz", 16).unwrap_err().into();
        assert!(err.to_string().starts_with("invalid hex character"));
    }

    #[test]
    fn test_buffer_error_display() {
        let err = BufferError::LengthMismatch {
            expected: 16,
            actual: 12,
        };
        assert_eq!(
            err.to_string(),
            "buffer length mismatch: expected 16 bytes, got 12"
        );
        let err = BufferError::EmptyDimensions {
            width: 0,
            height: 3,
        };
        assert_eq!(err.to_string(), "buffer dimensions must be non-zero, got 0x3");
    }
}
