//! Color space conversion between gamma-encoded sRGB bytes and linear light.
//!
//! The sRGB-to-linear direction runs once per pixel channel and goes through
//! a 256-entry table built on first use. The opposite direction only ever
//! runs three times per hash (the DC term), so it evaluates the transfer
//! function directly.

use std::sync::OnceLock;

/// Build the sRGB-to-linear table with the exact IEC 61966-2-1 curve.
fn build_srgb_to_linear_lut() -> [f64; 256] {
    let mut lut = [0.0f64; 256];
    for (i, slot) in lut.iter_mut().enumerate() {
        let value = i as f64 / 255.0;
        *slot = if value <= 0.04045 {
            value / 12.92
        } else {
            ((value + 0.055) / 1.055).powf(2.4)
        };
    }
    lut
}

/// Process-wide sRGB-to-linear table, immutable once built.
static SRGB_TO_LINEAR_LUT: OnceLock<[f64; 256]> = OnceLock::new();

/// Borrow the sRGB-to-linear table, building it on the first call.
///
/// The encoder fetches the table once per call and indexes it directly in
/// the pixel loop.
#[inline]
pub fn srgb_to_linear_table() -> &'static [f64; 256] {
    SRGB_TO_LINEAR_LUT.get_or_init(build_srgb_to_linear_lut)
}

/// Convert an sRGB byte value (0..=255) to linear RGB (0.0..=1.0).
///
/// # Examples
///
/// ```
/// use blurhash_encoder::color::srgb_to_linear;
/// assert_eq!(srgb_to_linear(0), 0.0);
/// assert_eq!(srgb_to_linear(255), 1.0);
/// ```
#[inline]
pub fn srgb_to_linear(value: u8) -> f64 {
    srgb_to_linear_table()[value as usize]
}

/// Convert a linear RGB value to an sRGB byte value (0..=255).
///
/// Values outside \[0.0, 1.0\] are clamped first. The final scale truncates
/// `x * 255 + 0.5`, which is what other encoders of the format do.
///
/// # Examples
///
/// ```
/// use blurhash_encoder::color::linear_to_srgb;
/// assert_eq!(linear_to_srgb(0.0), 0);
/// assert_eq!(linear_to_srgb(1.0), 255);
/// assert_eq!(linear_to_srgb(-3.0), 0);
/// ```
#[inline]
pub fn linear_to_srgb(value: f64) -> u8 {
    let v = value.clamp(0.0, 1.0);
    let encoded = if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    // `as u8` saturates, so the result is already clamped to 0..=255.
    (encoded.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

/// Compute `sign(value) * sqrt(|value|)`.
///
/// # Examples
///
/// ```
/// use blurhash_encoder::color::sign_sqrt;
/// assert_eq!(sign_sqrt(4.0), 2.0);
/// assert_eq!(sign_sqrt(-9.0), -3.0);
/// ```
#[inline]
pub fn sign_sqrt(value: f64) -> f64 {
    value.abs().sqrt().copysign(value)
}
