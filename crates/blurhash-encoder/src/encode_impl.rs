//! BlurHash encoding: turn an image source into a compact BlurHash string.
//!
//! The encoder samples every pixel, projects the linear colors onto a small
//! cosine basis, quantizes the resulting factors and packs them in base83.
//! The output is byte-for-byte what other encoders of the format produce.

use tracing::debug;

use crate::basis::{compute_factors, BasisStrategy};
use crate::error::BlurhashError;
use crate::quantize::{quantize, QuantizedHash};
use crate::sampler::Sampler;
use crate::source::ImageSource;

/// Valid range for components per axis.
pub const COMPONENT_RANGE: std::ops::RangeInclusive<u32> = 1..=9;

/// Number of characters in a hash with the given component counts.
///
/// `1 + 1 + 4 + 2 * (x * y - 1)`: shape, AC scale, DC, and two digits per
/// AC term. Only meaningful for counts in [`COMPONENT_RANGE`]; larger
/// counts saturate instead of overflowing.
///
/// # Examples
///
/// ```
/// use blurhash_encoder::encoded_length;
/// assert_eq!(encoded_length(1, 1), 6);
/// assert_eq!(encoded_length(4, 3), 28);
/// ```
pub const fn encoded_length(components_x: u32, components_y: u32) -> usize {
    (components_x as usize)
        .saturating_mul(components_y as usize)
        .saturating_mul(2)
        .saturating_add(4)
}

/// Encoder settings.
///
/// The default is 4 x 3 components with the recurrence basis, the usual
/// choice for landscape thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    components_x: u32,
    components_y: u32,
    strategy: BasisStrategy,
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(4, 3)
    }
}

impl Encoder {
    /// An encoder for `components_x` x `components_y` components.
    ///
    /// Counts are validated when encoding, not here.
    pub const fn new(components_x: u32, components_y: u32) -> Self {
        Self {
            components_x,
            components_y,
            strategy: BasisStrategy::Recurrence,
        }
    }

    /// Select how the cosine basis is evaluated.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: BasisStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Component counts `(x, y)`.
    pub const fn components(&self) -> (u32, u32) {
        (self.components_x, self.components_y)
    }

    /// The basis evaluation strategy.
    pub const fn strategy(&self) -> BasisStrategy {
        self.strategy
    }

    /// Length of the hashes this encoder produces.
    pub const fn encoded_length(&self) -> usize {
        encoded_length(self.components_x, self.components_y)
    }

    /// Compute the integer fields of the hash without packing them.
    ///
    /// # Errors
    ///
    /// Returns [`BlurhashError::InvalidComponentCount`] if a component count
    /// is outside 1..=9 and [`BlurhashError::InvalidImageDimensions`] if the
    /// image has zero width or height. Nothing is sampled in either case.
    pub fn quantize<S: ImageSource + ?Sized>(
        &self,
        image: &S,
    ) -> Result<QuantizedHash, BlurhashError> {
        let (width, height) = image.dimensions();
        if let Err(err) = self.validate(width, height) {
            debug!(width, height, error = %err, "rejected blurhash input");
            return Err(err);
        }

        let sampler = Sampler::new(image);
        debug!(
            width,
            height,
            components_x = self.components_x,
            components_y = self.components_y,
            sampler = ?sampler.kind(),
            strategy = ?self.strategy,
            "encoding blurhash"
        );

        let factors = compute_factors(
            &sampler,
            width,
            height,
            self.components_x as usize,
            self.components_y as usize,
            self.strategy,
        );
        Ok(quantize(&factors, self.components_x, self.components_y))
    }

    /// Encode `image` into a new string.
    ///
    /// # Errors
    ///
    /// See [`Encoder::quantize`].
    pub fn encode<S: ImageSource + ?Sized>(&self, image: &S) -> Result<String, BlurhashError> {
        // Sized by `write_to` once the counts are known to be valid.
        let mut out = String::new();
        self.append_encoded(&mut out, image)?;
        Ok(out)
    }

    /// Append the hash of `image` to `dst`.
    ///
    /// `dst` is left untouched on error.
    ///
    /// # Errors
    ///
    /// See [`Encoder::quantize`].
    pub fn append_encoded<S: ImageSource + ?Sized>(
        &self,
        dst: &mut String,
        image: &S,
    ) -> Result<(), BlurhashError> {
        let hash = self.quantize(image)?;
        hash.write_to(dst)
    }

    fn validate(&self, width: u32, height: u32) -> Result<(), BlurhashError> {
        if !COMPONENT_RANGE.contains(&self.components_x) {
            return Err(BlurhashError::InvalidComponentCount {
                component: "x",
                value: self.components_x,
            });
        }
        if !COMPONENT_RANGE.contains(&self.components_y) {
            return Err(BlurhashError::InvalidComponentCount {
                component: "y",
                value: self.components_y,
            });
        }
        if width == 0 || height == 0 {
            return Err(BlurhashError::InvalidImageDimensions { width, height });
        }
        Ok(())
    }
}

/// Encode an image into a BlurHash string.
///
/// # Arguments
///
/// * `image` - Any [`ImageSource`], e.g. an `image::RgbaImage`.
/// * `components_x` - Number of horizontal components (1..=9).
/// * `components_y` - Number of vertical components (1..=9).
///
/// # Errors
///
/// Returns an error if the component counts are out of range or the image
/// is empty.
///
/// # Examples
///
/// ```
/// use blurhash_encoder::encode;
/// use image::{Rgb, RgbImage};
///
/// let gray = RgbImage::from_pixel(4, 4, Rgb([128, 128, 128]));
/// assert_eq!(encode(&gray, 1, 1).unwrap(), "00Eyb[");
/// ```
pub fn encode<S: ImageSource + ?Sized>(
    image: &S,
    components_x: u32,
    components_y: u32,
) -> Result<String, BlurhashError> {
    Encoder::new(components_x, components_y).encode(image)
}

/// Encode an image, appending the hash to `dst`.
///
/// Handy for building many hashes into one buffer; `dst` only grows when the
/// call succeeds.
///
/// # Errors
///
/// Same as [`encode`].
pub fn append_encoded<S: ImageSource + ?Sized>(
    dst: &mut String,
    image: &S,
    components_x: u32,
    components_y: u32,
) -> Result<(), BlurhashError> {
    Encoder::new(components_x, components_y).append_encoded(dst, image)
}
