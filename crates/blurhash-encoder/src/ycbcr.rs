//! Planar Y'CbCr images, as produced by JPEG and most video decoders.
//!
//! Luma is stored at full resolution; the two chroma planes may be
//! subsampled. Conversion to RGB uses full-range JFIF coefficients in
//! 16.16 fixed point and yields 16-bit samples.

use crate::error::BlurhashError;

/// Chroma subsampling ratio of a [`YCbCrImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChromaSubsampling {
    /// No subsampling (4:4:4).
    #[default]
    S444,
    /// Half horizontal resolution (4:2:2).
    S422,
    /// Half horizontal and vertical resolution (4:2:0).
    S420,
    /// Half vertical resolution (4:4:0).
    S440,
    /// Quarter horizontal resolution (4:1:1).
    S411,
    /// Quarter horizontal, half vertical resolution (4:1:0).
    S410,
}

impl ChromaSubsampling {
    /// Horizontal subsampling factor for chroma.
    #[must_use]
    pub const fn h_factor(self) -> u32 {
        match self {
            ChromaSubsampling::S444 | ChromaSubsampling::S440 => 1,
            ChromaSubsampling::S422 | ChromaSubsampling::S420 => 2,
            ChromaSubsampling::S411 | ChromaSubsampling::S410 => 4,
        }
    }

    /// Vertical subsampling factor for chroma.
    #[must_use]
    pub const fn v_factor(self) -> u32 {
        match self {
            ChromaSubsampling::S444 | ChromaSubsampling::S422 | ChromaSubsampling::S411 => 1,
            ChromaSubsampling::S420 | ChromaSubsampling::S440 | ChromaSubsampling::S410 => 2,
        }
    }

    /// Size of each chroma plane for a `width` x `height` luma plane.
    #[must_use]
    pub const fn chroma_size(self, width: u32, height: u32) -> (u32, u32) {
        (
            width.div_ceil(self.h_factor()),
            height.div_ceil(self.v_factor()),
        )
    }
}

/// A planar Y'CbCr image with 8-bit samples.
#[derive(Debug, Clone)]
pub struct YCbCrImage {
    y: Vec<u8>,
    cb: Vec<u8>,
    cr: Vec<u8>,
    y_stride: usize,
    c_stride: usize,
    width: u32,
    height: u32,
    subsampling: ChromaSubsampling,
}

impl YCbCrImage {
    /// Wrap existing planes.
    ///
    /// `y_stride` and `c_stride` are the byte distances between rows of the
    /// luma and chroma planes.
    ///
    /// # Errors
    ///
    /// Returns [`BlurhashError::InvalidImageDimensions`] if a stride is
    /// narrower than its plane or a plane holds fewer rows than required.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        width: u32,
        height: u32,
        subsampling: ChromaSubsampling,
        y: Vec<u8>,
        y_stride: usize,
        cb: Vec<u8>,
        cr: Vec<u8>,
        c_stride: usize,
    ) -> Result<Self, BlurhashError> {
        let invalid = BlurhashError::InvalidImageDimensions { width, height };
        let (cw, ch) = subsampling.chroma_size(width, height);
        if y_stride < width as usize || c_stride < cw as usize {
            return Err(invalid);
        }
        if y.len() < plane_len(y_stride, width, height)
            || cb.len() < plane_len(c_stride, cw, ch)
            || cr.len() < plane_len(c_stride, cw, ch)
        {
            return Err(invalid);
        }
        Ok(Self {
            y,
            cb,
            cr,
            y_stride,
            c_stride,
            width,
            height,
            subsampling,
        })
    }

    /// Convert packed 8-bit RGB into a planar image, averaging chroma over
    /// each subsampled block.
    ///
    /// # Errors
    ///
    /// Returns [`BlurhashError::InvalidImageDimensions`] if `rgb` does not
    /// hold exactly `width * height * 3` bytes.
    pub fn from_rgb(
        rgb: &[u8],
        width: u32,
        height: u32,
        subsampling: ChromaSubsampling,
    ) -> Result<Self, BlurhashError> {
        let (w, h) = (width as usize, height as usize);
        if rgb.len() != w * h * 3 {
            return Err(BlurhashError::InvalidImageDimensions { width, height });
        }
        let (cw, ch) = subsampling.chroma_size(width, height);
        let (cw, ch) = (cw as usize, ch as usize);
        let (hf, vf) = (
            subsampling.h_factor() as usize,
            subsampling.v_factor() as usize,
        );

        let mut y = vec![0u8; w * h];
        let mut cb_sum = vec![0u32; cw * ch];
        let mut cr_sum = vec![0u32; cw * ch];
        let mut count = vec![0u32; cw * ch];
        for (idx, px) in rgb.chunks_exact(3).enumerate() {
            let (luma, cb, cr) = rgb_to_ycbcr(px[0], px[1], px[2]);
            y[idx] = luma;
            let ci = (idx / w / vf) * cw + (idx % w) / hf;
            cb_sum[ci] += cb as u32;
            cr_sum[ci] += cr as u32;
            count[ci] += 1;
        }
        let average = |sums: Vec<u32>| -> Vec<u8> {
            sums.iter()
                .zip(&count)
                .map(|(&s, &n)| ((s + n / 2) / n.max(1)) as u8)
                .collect()
        };
        let cb = average(cb_sum);
        let cr = average(cr_sum);
        Self::new(width, height, subsampling, y, w, cb, cr, cw)
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The chroma subsampling ratio.
    pub fn subsampling(&self) -> ChromaSubsampling {
        self.subsampling
    }

    /// Luma plane.
    pub fn y_plane(&self) -> &[u8] {
        &self.y
    }

    /// Blue-difference chroma plane.
    pub fn cb_plane(&self) -> &[u8] {
        &self.cb
    }

    /// Red-difference chroma plane.
    pub fn cr_plane(&self) -> &[u8] {
        &self.cr
    }

    /// Row stride of the luma plane.
    pub fn y_stride(&self) -> usize {
        self.y_stride
    }

    /// Row stride of both chroma planes.
    pub fn c_stride(&self) -> usize {
        self.c_stride
    }

    /// Index of the luma sample for pixel `(x, y)`.
    #[inline]
    pub fn y_offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.y_stride + x as usize
    }

    /// Index of the chroma samples for pixel `(x, y)`.
    #[inline]
    pub fn c_offset(&self, x: u32, y: u32) -> usize {
        let s = self.subsampling;
        (y / s.v_factor()) as usize * self.c_stride + (x / s.h_factor()) as usize
    }

    /// The raw `(Y, Cb, Cr)` samples at `(x, y)`.
    #[inline]
    pub fn ycbcr_at(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let ci = self.c_offset(x, y);
        (self.y[self.y_offset(x, y)], self.cb[ci], self.cr[ci])
    }
}

fn plane_len(stride: usize, width: u32, height: u32) -> usize {
    if width == 0 || height == 0 {
        0
    } else {
        (height as usize - 1) * stride + width as usize
    }
}

/// Convert one Y'CbCr triple to 16-bit RGB.
///
/// The luma is expanded to 16.16 fixed point (`Y * 0x10101`), the chroma
/// terms are added with JFIF coefficients scaled by 65536, and the result is
/// shifted down to 16 bits. Out-of-range values saturate.
#[inline]
pub fn ycbcr_to_rgb16(y: u8, cb: u8, cr: u8) -> [u16; 3] {
    let yy = y as i32 * 0x10101;
    let cb = cb as i32 - 128;
    let cr = cr as i32 - 128;
    [
        saturate16(yy + 91881 * cr),
        saturate16(yy - 22554 * cb - 46802 * cr),
        saturate16(yy + 116130 * cb),
    ]
}

#[inline]
fn saturate16(v: i32) -> u16 {
    if (v as u32) & 0xff00_0000 == 0 {
        (v >> 8) as u16
    } else if v < 0 {
        0
    } else {
        0xffff
    }
}

/// Convert 8-bit RGB to Y'CbCr with JFIF coefficients (16.16 fixed point).
#[inline]
pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (r as i32, g as i32, b as i32);
    let y = (19595 * r + 38470 * g + 7471 * b + (1 << 15)) >> 16;

    let cb = -11056 * r - 21712 * g + 32768 * b + (257 << 15);
    let cb = if (cb as u32) & 0xff00_0000 == 0 {
        cb >> 16
    } else if cb < 0 {
        0
    } else {
        255
    };

    let cr = 32768 * r - 27440 * g - 5328 * b + (257 << 15);
    let cr = if (cr as u32) & 0xff00_0000 == 0 {
        cr >> 16
    } else if cr < 0 {
        0
    } else {
        255
    };

    (y as u8, cb as u8, cr as u8)
}
