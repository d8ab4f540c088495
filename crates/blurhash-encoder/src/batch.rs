//! Parallel encoding of many images (requires the `parallel` feature).
//!
//! Each image is still encoded on a single thread; rayon only spreads
//! independent images across the pool.

use rayon::prelude::*;

use crate::encode_impl::Encoder;
use crate::error::BlurhashError;
use crate::source::ImageSource;

impl Encoder {
    /// Encode every image in `images`, in parallel.
    ///
    /// Results are in input order. A failing image does not affect the
    /// others.
    pub fn encode_batch<S>(&self, images: &[S]) -> Vec<Result<String, BlurhashError>>
    where
        S: ImageSource + Sync,
    {
        images.par_iter().map(|image| self.encode(image)).collect()
    }
}

/// Encode every image in `images` with the default basis strategy.
///
/// # Examples
///
/// ```
/// use blurhash_encoder::encode_batch;
/// use image::{Rgb, RgbImage};
///
/// let images = vec![RgbImage::from_pixel(2, 2, Rgb([0, 0, 0])), RgbImage::new(0, 0)];
/// let hashes = encode_batch(&images, 1, 1);
/// assert_eq!(hashes[0].as_deref(), Ok("000000"));
/// assert!(hashes[1].is_err());
/// ```
pub fn encode_batch<S>(
    images: &[S],
    components_x: u32,
    components_y: u32,
) -> Vec<Result<String, BlurhashError>>
where
    S: ImageSource + Sync,
{
    Encoder::new(components_x, components_y).encode_batch(images)
}
