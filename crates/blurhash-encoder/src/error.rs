//! Error types for BlurHash encoding.

use thiserror::Error;

/// Errors that can occur while encoding a BlurHash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlurhashError {
    /// The component count is out of the valid range (1..=9).
    #[error("component count out of range: {component} = {value} (must be 1..=9)")]
    InvalidComponentCount {
        /// Which component axis ("x" or "y").
        component: &'static str,
        /// The invalid value.
        value: u32,
    },

    /// The image has a zero width or height, or its pixel planes are too
    /// small for the declared size.
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidImageDimensions {
        /// The width value.
        width: u32,
        /// The height value.
        height: u32,
    },

    /// A value does not fit in the requested number of base83 digits.
    #[error("value {value} does not fit in {digits} base83 digits")]
    DigitOverflow {
        /// The value that was being encoded.
        value: u64,
        /// The number of digits requested.
        digits: usize,
    },

    /// An invalid character was encountered during base83 decoding.
    #[error("invalid base83 character: {0:?}")]
    InvalidBase83Character(char),

    /// The decoded base83 value does not fit in a `u64`.
    #[error("base83 value overflows u64")]
    Base83Overflow,
}
