//! Image sources the encoder can read pixels from.
//!
//! Any 2D pixel grid can be encoded by implementing [`ImageSource`]. The
//! per-pixel accessor returns expanded 16-bit samples (an 8-bit value `v`
//! becomes `v * 257`) with color premultiplied by alpha, and only the top
//! 8 bits of R, G and B are used. The returned alpha itself never affects
//! the hash.
//!
//! Sources that store pixels in a layout the sampler knows how to walk
//! directly can say so through [`ImageSource::layout`].

use std::ops::Deref;

use image::{DynamicImage, GenericImageView, ImageBuffer, Luma, Rgb, Rgba};

use crate::ycbcr::{ycbcr_to_rgb16, YCbCrImage};

/// How a source stores its pixels.
#[derive(Debug, Clone, Copy)]
pub enum PixelLayout<'a> {
    /// Only the per-pixel accessor is available.
    Generic,
    /// Interleaved 8-bit RGBA rows with straight alpha, `stride` bytes
    /// apart.
    PackedRgba8 {
        /// Raw bytes, row-major.
        data: &'a [u8],
        /// Byte distance between rows.
        stride: usize,
    },
    /// Planar Y'CbCr with optional chroma subsampling.
    Planar(&'a YCbCrImage),
}

/// A 2D grid of pixels that can be encoded.
pub trait ImageSource {
    /// Width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// The `[R, G, B, A]` samples of the pixel at `(x, y)`, expanded to
    /// 16 bits, with R, G and B premultiplied by alpha.
    ///
    /// `x` and `y` are always within [`dimensions`](Self::dimensions).
    fn rgba16(&self, x: u32, y: u32) -> [u16; 4];

    /// The storage layout, used to pick a faster sampling strategy.
    ///
    /// A specialized layout must describe exactly the pixels that
    /// [`rgba16`](Self::rgba16) returns.
    fn layout(&self) -> PixelLayout<'_> {
        PixelLayout::Generic
    }
}

impl<T: ImageSource + ?Sized> ImageSource for &T {
    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }

    fn rgba16(&self, x: u32, y: u32) -> [u16; 4] {
        (**self).rgba16(x, y)
    }

    fn layout(&self) -> PixelLayout<'_> {
        (**self).layout()
    }
}

/// Expand an 8-bit sample to 16 bits.
#[inline]
fn expand8(v: u8) -> u16 {
    v as u16 * 257
}

/// Expand straight-alpha 8-bit RGBA and premultiply the color by alpha.
#[inline]
pub(crate) fn premultiply8([r, g, b, a]: [u8; 4]) -> [u16; 4] {
    let alpha = a as u32;
    let mul = |v: u8| (expand8(v) as u32 * alpha / 0xff) as u16;
    [mul(r), mul(g), mul(b), expand8(a)]
}

/// Premultiply straight-alpha 16-bit RGBA.
#[inline]
fn premultiply16([r, g, b, a]: [u16; 4]) -> [u16; 4] {
    let alpha = a as u32;
    let mul = |v: u16| (v as u32 * alpha / 0xffff) as u16;
    [mul(r), mul(g), mul(b), a]
}

/// Expand a float sample in `0.0..=1.0` to 16 bits.
#[inline]
fn expand_f32(v: f32) -> u16 {
    (v.clamp(0.0, 1.0) * 65535.0).round() as u16
}

impl<C> ImageSource for ImageBuffer<Rgba<u8>, C>
where
    C: Deref<Target = [u8]>,
{
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn rgba16(&self, x: u32, y: u32) -> [u16; 4] {
        premultiply8(self.get_pixel(x, y).0)
    }

    fn layout(&self) -> PixelLayout<'_> {
        PixelLayout::PackedRgba8 {
            data: &**self,
            stride: self.width() as usize * 4,
        }
    }
}

impl<C> ImageSource for ImageBuffer<Rgb<u8>, C>
where
    C: Deref<Target = [u8]>,
{
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn rgba16(&self, x: u32, y: u32) -> [u16; 4] {
        let [r, g, b] = self.get_pixel(x, y).0;
        [expand8(r), expand8(g), expand8(b), 0xffff]
    }
}

impl<C> ImageSource for ImageBuffer<Luma<u8>, C>
where
    C: Deref<Target = [u8]>,
{
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn rgba16(&self, x: u32, y: u32) -> [u16; 4] {
        let l = expand8(self.get_pixel(x, y).0[0]);
        [l, l, l, 0xffff]
    }
}

impl<C> ImageSource for ImageBuffer<Rgba<u16>, C>
where
    C: Deref<Target = [u16]>,
{
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn rgba16(&self, x: u32, y: u32) -> [u16; 4] {
        premultiply16(self.get_pixel(x, y).0)
    }
}

impl<C> ImageSource for ImageBuffer<Rgb<u16>, C>
where
    C: Deref<Target = [u16]>,
{
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn rgba16(&self, x: u32, y: u32) -> [u16; 4] {
        let [r, g, b] = self.get_pixel(x, y).0;
        [r, g, b, 0xffff]
    }
}

impl ImageSource for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn rgba16(&self, x: u32, y: u32) -> [u16; 4] {
        match self {
            DynamicImage::ImageRgba16(buf) => buf.rgba16(x, y),
            DynamicImage::ImageRgb16(buf) => buf.rgba16(x, y),
            DynamicImage::ImageLuma16(buf) => {
                let l = buf.get_pixel(x, y).0[0];
                [l, l, l, 0xffff]
            }
            DynamicImage::ImageLumaA16(buf) => {
                let [l, a] = buf.get_pixel(x, y).0;
                premultiply16([l, l, l, a])
            }
            DynamicImage::ImageRgb32F(buf) => {
                let [r, g, b] = buf.get_pixel(x, y).0;
                [expand_f32(r), expand_f32(g), expand_f32(b), 0xffff]
            }
            DynamicImage::ImageRgba32F(buf) => {
                let [r, g, b, a] = buf.get_pixel(x, y).0.map(expand_f32);
                premultiply16([r, g, b, a])
            }
            // 8-bit variants go through the 8-bit RGBA view.
            _ => premultiply8(self.get_pixel(x, y).0),
        }
    }

    fn layout(&self) -> PixelLayout<'_> {
        match self {
            DynamicImage::ImageRgba8(buf) => buf.layout(),
            _ => PixelLayout::Generic,
        }
    }
}

impl ImageSource for YCbCrImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn rgba16(&self, x: u32, y: u32) -> [u16; 4] {
        let (luma, cb, cr) = self.ycbcr_at(x, y);
        let [r, g, b] = ycbcr_to_rgb16(luma, cb, cr);
        [r, g, b, 0xffff]
    }

    fn layout(&self) -> PixelLayout<'_> {
        PixelLayout::Planar(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage, RgbaImage};

    #[test]
    fn test_rgba8_premultiplies_color() {
        let img = RgbaImage::from_pixel(2, 1, Rgba([1, 128, 255, 7]));
        // (v * 257) * a / 255, alpha expanded.
        assert_eq!(img.rgba16(1, 0), [7, 903, 1799, 7 * 257]);
        let opaque = RgbaImage::from_pixel(1, 1, Rgba([1, 128, 255, 255]));
        assert_eq!(opaque.rgba16(0, 0), [257, 128 * 257, 0xffff, 0xffff]);
        assert!(matches!(
            img.layout(),
            PixelLayout::PackedRgba8 { stride: 8, .. }
        ));
    }

    #[test]
    fn test_rgb8_is_generic() {
        let img = RgbImage::from_pixel(3, 2, Rgb([10, 20, 30]));
        assert_eq!(ImageSource::dimensions(&img), (3, 2));
        assert_eq!(img.rgba16(2, 1), [2570, 5140, 7710, 0xffff]);
        assert!(matches!(img.layout(), PixelLayout::Generic));
    }

    #[test]
    fn test_luma8() {
        let img = GrayImage::from_pixel(1, 1, Luma([200]));
        assert_eq!(img.rgba16(0, 0), [200 * 257, 200 * 257, 200 * 257, 0xffff]);
    }

    #[test]
    fn test_dynamic_16bit_keeps_full_samples() {
        let buf =
            ImageBuffer::<Rgb<u16>, Vec<u16>>::from_pixel(1, 1, Rgb([0x12ff, 0x8000, 0x00ff]));
        let img = DynamicImage::ImageRgb16(buf);
        assert_eq!(img.rgba16(0, 0), [0x12ff, 0x8000, 0x00ff, 0xffff]);
        assert!(matches!(img.layout(), PixelLayout::Generic));
    }

    #[test]
    fn test_16bit_alpha_premultiplies() {
        let buf =
            ImageBuffer::<Rgba<u16>, Vec<u16>>::from_pixel(1, 1, Rgba([0x8000, 0xffff, 0, 0x8000]));
        assert_eq!(buf.rgba16(0, 0), [0x4000, 0x8000, 0, 0x8000]);
        let luma = ImageBuffer::from_pixel(1, 1, image::LumaA([0x8000u16, 0x8000]));
        let img = DynamicImage::ImageLumaA16(luma);
        assert_eq!(img.rgba16(0, 0), [0x4000, 0x4000, 0x4000, 0x8000]);
    }

    #[test]
    fn test_float_variants_expand_to_16_bits() {
        let buf = ImageBuffer::<Rgb<f32>, Vec<f32>>::from_pixel(1, 1, Rgb([0.998, 0.0, 2.0]));
        let img = DynamicImage::ImageRgb32F(buf);
        let [r, g, b, a] = img.rgba16(0, 0);
        // The 8-bit view would round 0.998 down to 254.
        assert_eq!(r >> 8, 255);
        assert_eq!((g, b, a), (0, 0xffff, 0xffff));

        let buf = ImageBuffer::<Rgba<f32>, Vec<f32>>::from_pixel(1, 1, Rgba([1.0, 1.0, 1.0, 0.0]));
        assert_eq!(DynamicImage::ImageRgba32F(buf).rgba16(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_dynamic_rgba8_uses_packed_layout() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(4, 4));
        assert!(matches!(img.layout(), PixelLayout::PackedRgba8 { stride: 16, .. }));
    }

    #[test]
    fn test_reference_forwards() {
        let img = RgbImage::from_pixel(2, 2, Rgb([1, 2, 3]));
        let by_ref: &dyn ImageSource = &img;
        assert_eq!(by_ref.dimensions(), (2, 2));
        fn first<S: ImageSource>(source: S) -> [u16; 4] {
            source.rgba16(0, 0)
        }
        assert_eq!(first(&img), [257, 514, 771, 0xffff]);
    }
}
