//! Per-pixel color sampling.
//!
//! A [`Sampler`] is picked once per encode from the source's
//! [`PixelLayout`] and then answers every pixel query with the same call.
//! Each strategy yields exactly the top 8 bits of what
//! [`ImageSource::rgba16`] reports for that pixel; the specialized ones only
//! skip the trait call and the 16-bit round trip.

use crate::source::{premultiply8, ImageSource, PixelLayout};
use crate::ycbcr::{ycbcr_to_rgb16, YCbCrImage};

/// Which sampling strategy a [`Sampler`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerKind {
    /// Calls [`ImageSource::rgba16`] for every pixel.
    Generic,
    /// Reads interleaved RGBA bytes directly, premultiplying in place.
    PackedRgba8,
    /// Converts planar Y'CbCr samples in place.
    Planar,
}

/// Reads gamma-encoded 8-bit RGB from an [`ImageSource`].
pub enum Sampler<'a, S: ?Sized> {
    /// Per-pixel trait calls.
    Generic(&'a S),
    /// Interleaved RGBA rows.
    PackedRgba8 {
        /// Raw bytes, row-major.
        data: &'a [u8],
        /// Byte distance between rows.
        stride: usize,
    },
    /// Planar Y'CbCr.
    Planar(&'a YCbCrImage),
}

impl<'a, S: ImageSource + ?Sized> Sampler<'a, S> {
    /// Pick the fastest strategy the source's layout allows.
    ///
    /// A packed layout whose buffer is too short for the reported dimensions
    /// is ignored in favour of the generic accessor.
    pub fn new(source: &'a S) -> Self {
        let (width, height) = source.dimensions();
        match source.layout() {
            PixelLayout::PackedRgba8 { data, stride }
                if stride >= width as usize * 4
                    && data.len() >= packed_len(stride, width, height) =>
            {
                Sampler::PackedRgba8 { data, stride }
            }
            PixelLayout::Planar(img) if img.width() == width && img.height() == height => {
                Sampler::Planar(img)
            }
            _ => Sampler::Generic(source),
        }
    }

    /// Always use the per-pixel accessor.
    pub fn generic(source: &'a S) -> Self {
        Sampler::Generic(source)
    }

    /// The strategy in use.
    pub fn kind(&self) -> SamplerKind {
        match self {
            Sampler::Generic(_) => SamplerKind::Generic,
            Sampler::PackedRgba8 { .. } => SamplerKind::PackedRgba8,
            Sampler::Planar(_) => SamplerKind::Planar,
        }
    }

    /// The gamma-encoded `[R, G, B]` bytes of the pixel at `(x, y)`.
    #[inline]
    pub fn rgb8(&self, x: u32, y: u32) -> [u8; 3] {
        match self {
            Sampler::Generic(source) => {
                let [r, g, b, _] = source.rgba16(x, y);
                [(r >> 8) as u8, (g >> 8) as u8, (b >> 8) as u8]
            }
            Sampler::PackedRgba8 { data, stride } => {
                let i = y as usize * stride + x as usize * 4;
                let (r, g, b, a) = (data[i], data[i + 1], data[i + 2], data[i + 3]);
                if a == 0xff {
                    [r, g, b]
                } else {
                    let [r, g, b, _] = premultiply8([r, g, b, a]);
                    [(r >> 8) as u8, (g >> 8) as u8, (b >> 8) as u8]
                }
            }
            Sampler::Planar(img) => {
                let (luma, cb, cr) = img.ycbcr_at(x, y);
                let [r, g, b] = ycbcr_to_rgb16(luma, cb, cr);
                [(r >> 8) as u8, (g >> 8) as u8, (b >> 8) as u8]
            }
        }
    }
}

fn packed_len(stride: usize, width: u32, height: u32) -> usize {
    if width == 0 || height == 0 {
        0
    } else {
        (height as usize - 1) * stride + width as usize * 4
    }
}
