//! Quantization of basis factors and packing of the final hash.
//!
//! Field order and widths of a hash:
//!
//! | field        | digits | range        |
//! |--------------|--------|--------------|
//! | packed shape | 1      | 0..=80       |
//! | AC scale     | 1      | 0..=82       |
//! | DC           | 4      | 0..2^24      |
//! | each AC      | 2      | 0..=6858     |

use crate::base83;
use crate::basis::{Factor, Factors};
use crate::color::{linear_to_srgb, sign_sqrt};
use crate::error::BlurhashError;

/// The integer fields of a hash, before base83 packing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedHash {
    components_x: u32,
    components_y: u32,
    scale_index: u32,
    dc: u32,
    ac: Vec<u32>,
}

impl QuantizedHash {
    /// Component counts `(x, y)`.
    pub fn components(&self) -> (u32, u32) {
        (self.components_x, self.components_y)
    }

    /// The single-digit shape field, `(y - 1) * 9 + (x - 1)`.
    pub fn packed_shape(&self) -> u32 {
        (self.components_y - 1) * 9 + (self.components_x - 1)
    }

    /// Quantized AC scale, 0..=82. Always 0 without AC terms.
    pub fn scale_index(&self) -> u32 {
        self.scale_index
    }

    /// The AC magnitude the AC digits are relative to.
    pub fn scale(&self) -> f64 {
        if self.ac.is_empty() {
            1.0
        } else {
            (self.scale_index + 1) as f64 / 166.0
        }
    }

    /// The average color as `0xRRGGBB`, gamma encoded.
    pub fn dc(&self) -> u32 {
        self.dc
    }

    /// AC values in row-major basis order, each `r * 19^2 + g * 19 + b`.
    pub fn ac(&self) -> &[u32] {
        &self.ac
    }

    /// Split an AC value into its three per-channel digits (0..=18).
    pub fn ac_channels(value: u32) -> [u32; 3] {
        [value / (19 * 19), (value / 19) % 19, value % 19]
    }

    /// Number of base83 characters [`write_to`](Self::write_to) appends.
    pub fn encoded_length(&self) -> usize {
        1 + 1 + 4 + 2 * self.ac.len()
    }

    /// Append the base83 form of every field to `dst`.
    ///
    /// # Errors
    ///
    /// Returns [`BlurhashError::DigitOverflow`] if a field is out of range,
    /// which quantization never produces.
    pub fn write_to(&self, dst: &mut String) -> Result<(), BlurhashError> {
        dst.reserve(self.encoded_length());
        base83::encode_into(dst, self.packed_shape() as u64, 1)?;
        base83::encode_into(dst, self.scale_index as u64, 1)?;
        base83::encode_into(dst, self.dc as u64, 4)?;
        for &value in &self.ac {
            base83::encode_into(dst, value as u64, 2)?;
        }
        Ok(())
    }
}

/// Quantize normalized factors into hash fields.
pub(crate) fn quantize(factors: &Factors, components_x: u32, components_y: u32) -> QuantizedHash {
    debug_assert_eq!(factors.ac.len() + 1, (components_x * components_y) as usize);

    let Factors { dc, ac } = factors;
    let (scale_index, max) = if ac.is_empty() {
        (0, 1.0)
    } else {
        let actual_max = ac
            .iter()
            .fold(0.0f64, |m, f| m.max(f.r.abs()).max(f.g.abs()).max(f.b.abs()));
        let quantized = (actual_max * 166.0 - 0.5).floor().clamp(0.0, 82.0) as u32;
        // Reconstruct from the bucket above so decoders never clip.
        (quantized, (quantized + 1) as f64 / 166.0)
    };

    QuantizedHash {
        components_x,
        components_y,
        scale_index,
        dc: encode_dc(dc),
        ac: ac.iter().map(|f| encode_ac(f, max)).collect(),
    }
}

fn encode_dc(dc: &Factor) -> u32 {
    ((linear_to_srgb(dc.r) as u32) << 16)
        | ((linear_to_srgb(dc.g) as u32) << 8)
        | linear_to_srgb(dc.b) as u32
}

fn encode_ac(ac: &Factor, max: f64) -> u32 {
    let quant = |v: f64| (sign_sqrt(v / max) * 9.0 + 9.5).floor().clamp(0.0, 18.0) as u32;
    quant(ac.r) * 19 * 19 + quant(ac.g) * 19 + quant(ac.b)
}
