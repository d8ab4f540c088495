//! Projection of an image onto the 2D cosine basis.
//!
//! For every pixel and every retained frequency pair `(i, j)` the linear
//! color is weighted by `cos(PI * i * y / height) * cos(PI * j * x / width)`
//! and summed into factor `i * components_x + j`. The cost is
//! O(width * height * components_x * components_y).

use std::f64::consts::PI;

use crate::color::srgb_to_linear_table;
use crate::sampler::Sampler;
use crate::source::ImageSource;

/// Upper bound on components per axis.
pub(crate) const MAX_COMPONENTS: usize = 9;

/// How the cosine weights are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BasisStrategy {
    /// Advance each frequency's `(sin, cos)` pair by a fixed rotation per
    /// pixel instead of calling `cos`. State is reset at the start of every
    /// row (horizontal) and at the first row (vertical), so rounding drift
    /// is bounded by one image dimension.
    #[default]
    Recurrence,
    /// Call `cos` for every weight, in the same order as the reference
    /// encoders. Bit-for-bit reproducible against them.
    Direct,
}

/// One accumulated coefficient, per color channel, in linear light.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Factor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Factor {
    #[inline]
    fn add_weighted(&mut self, weight: f64, [r, g, b]: [f64; 3]) {
        self.r += weight * r;
        self.g += weight * g;
        self.b += weight * b;
    }

    fn scale(&mut self, v: f64) {
        self.r *= v;
        self.g *= v;
        self.b *= v;
    }
}

/// Normalized factors of one image. The DC term is kept apart so the AC
/// scaling can never touch it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Factors {
    pub dc: Factor,
    pub ac: Vec<Factor>,
}

/// A `(sin, cos)` pair.
type Rotation = (f64, f64);

const IDENTITY: Rotation = (0.0, 1.0);

/// Angle addition: the rotation by `a` followed by `b`.
#[inline]
fn rotate((sin_a, cos_a): Rotation, (sin_b, cos_b): Rotation) -> Rotation {
    (
        sin_a * cos_b + cos_a * sin_b,
        cos_a * cos_b - sin_a * sin_b,
    )
}

/// Per-axis rotation state for the recurrence strategy.
struct AxisRotor {
    step: [Rotation; MAX_COMPONENTS],
    state: [Rotation; MAX_COMPONENTS],
    len: usize,
}

impl AxisRotor {
    fn new(components: usize, axis_len: u32) -> Self {
        let mut step = [IDENTITY; MAX_COMPONENTS];
        let increment = PI / axis_len as f64;
        for (index, slot) in step.iter_mut().enumerate().take(components) {
            *slot = (increment * index as f64).sin_cos();
        }
        Self {
            step,
            state: [IDENTITY; MAX_COMPONENTS],
            len: components,
        }
    }

    /// Move to position `pos` along the axis. Position 0 and frequency 0
    /// reset to the identity; everything else rotates one step forward.
    #[inline]
    fn advance(&mut self, pos: u32) {
        for index in 0..self.len {
            self.state[index] = if pos == 0 || index == 0 {
                IDENTITY
            } else {
                rotate(self.state[index], self.step[index])
            };
        }
    }

    #[inline]
    fn cos(&self, index: usize) -> f64 {
        self.state[index].1
    }
}

/// Accumulate and normalize the `components_x * components_y` factors.
///
/// AC factors come back in row-major basis order, skipping index 0.
///
/// The DC factor is scaled by `1 / (width * height)` and every AC factor by
/// `2 / (width * height)`. Callers guarantee non-zero dimensions and
/// component counts in `1..=9`.
pub(crate) fn compute_factors<S: ImageSource + ?Sized>(
    sampler: &Sampler<'_, S>,
    width: u32,
    height: u32,
    components_x: usize,
    components_y: usize,
    strategy: BasisStrategy,
) -> Factors {
    debug_assert!((1..=MAX_COMPONENTS).contains(&components_x));
    debug_assert!((1..=MAX_COMPONENTS).contains(&components_y));
    debug_assert!(width > 0 && height > 0);

    let mut factors = vec![Factor::default(); components_x * components_y];
    match strategy {
        BasisStrategy::Recurrence => {
            accumulate_recurrence(sampler, width, height, components_x, components_y, &mut factors)
        }
        BasisStrategy::Direct => {
            accumulate_direct(sampler, width, height, components_x, components_y, &mut factors)
        }
    }

    let pixels = (width as u64 * height as u64) as f64;
    let mut factors = factors.into_iter();
    let mut dc = factors.next().unwrap_or_default();
    dc.scale(1.0 / pixels);
    let ac = factors
        .map(|mut factor| {
            factor.scale(2.0 / pixels);
            factor
        })
        .collect();
    Factors { dc, ac }
}

fn accumulate_recurrence<S: ImageSource + ?Sized>(
    sampler: &Sampler<'_, S>,
    width: u32,
    height: u32,
    components_x: usize,
    components_y: usize,
    factors: &mut [Factor],
) {
    let lut = srgb_to_linear_table();
    let mut rows = AxisRotor::new(components_y, height);
    let mut cols = AxisRotor::new(components_x, width);

    for y in 0..height {
        rows.advance(y);
        for x in 0..width {
            cols.advance(x);
            let [r, g, b] = sampler.rgb8(x, y);
            let linear = [lut[r as usize], lut[g as usize], lut[b as usize]];
            for i in 0..components_y {
                let cos_y = rows.cos(i);
                let row = &mut factors[i * components_x..(i + 1) * components_x];
                for (j, factor) in row.iter_mut().enumerate() {
                    factor.add_weighted(cos_y * cols.cos(j), linear);
                }
            }
        }
    }
}

fn accumulate_direct<S: ImageSource + ?Sized>(
    sampler: &Sampler<'_, S>,
    width: u32,
    height: u32,
    components_x: usize,
    components_y: usize,
    factors: &mut [Factor],
) {
    let lut = srgb_to_linear_table();
    let pi_w = PI / width as f64;
    let pi_h = PI / height as f64;
    let mut x_cos = [0.0f64; MAX_COMPONENTS];
    let mut y_cos = [0.0f64; MAX_COMPONENTS];

    for y in 0..height {
        for (i, c) in y_cos.iter_mut().enumerate().take(components_y) {
            *c = (pi_h * (i as u64 * y as u64) as f64).cos();
        }
        for x in 0..width {
            for (j, c) in x_cos.iter_mut().enumerate().take(components_x) {
                *c = (pi_w * (j as u64 * x as u64) as f64).cos();
            }
            let [r, g, b] = sampler.rgb8(x, y);
            let linear = [lut[r as usize], lut[g as usize], lut[b as usize]];
            for i in 0..components_y {
                let row = &mut factors[i * components_x..(i + 1) * components_x];
                for (j, factor) in row.iter_mut().enumerate() {
                    factor.add_weighted(y_cos[i] * x_cos[j], linear);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 255 / width) as u8,
                (y * 255 / height) as u8,
                ((x ^ y) * 7) as u8,
            ])
        })
    }

    /// All factors in basis order, DC first.
    fn factors(img: &RgbImage, cx: usize, cy: usize, strategy: BasisStrategy) -> Vec<Factor> {
        let (w, h) = img.dimensions();
        let Factors { dc, ac } = compute_factors(&Sampler::new(img), w, h, cx, cy, strategy);
        std::iter::once(dc).chain(ac).collect()
    }

    #[test]
    fn test_rotor_tracks_cosine() {
        let mut rotor = AxisRotor::new(9, 37);
        for pos in 0..37u32 {
            rotor.advance(pos);
            for index in 0..9 {
                let expected = (PI * index as f64 * pos as f64 / 37.0).cos();
                assert!((rotor.cos(index) - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_rotor_resets_at_axis_start() {
        let mut rotor = AxisRotor::new(3, 5);
        for pos in 0..5 {
            rotor.advance(pos);
        }
        rotor.advance(0);
        assert_eq!(rotor.state[..3], [IDENTITY; 3]);
    }

    #[test]
    fn test_factor_count() {
        let img = gradient(8, 8);
        assert_eq!(factors(&img, 4, 3, BasisStrategy::Direct).len(), 12);
        assert_eq!(factors(&img, 9, 9, BasisStrategy::Recurrence).len(), 81);
        assert_eq!(factors(&img, 1, 1, BasisStrategy::Recurrence).len(), 1);
    }

    #[test]
    fn test_dc_is_mean_linear_color() {
        let img = gradient(6, 4);
        let dc = factors(&img, 3, 3, BasisStrategy::Direct)[0];
        let n = 24.0;
        let mean_r: f64 = img.pixels().map(|p| srgb_to_linear_table()[p[0] as usize]).sum::<f64>() / n;
        assert!((dc.r - mean_r).abs() < 1e-12);
    }

    #[test]
    fn test_solid_black_has_no_ac_energy() {
        let img = RgbImage::new(13, 7);
        for strategy in [BasisStrategy::Direct, BasisStrategy::Recurrence] {
            for f in &factors(&img, 5, 4, strategy)[1..] {
                assert_eq!(*f, Factor::default());
            }
        }
    }

    #[test]
    fn test_solid_image_odd_frequencies() {
        // Samples sit at x = 0..width with no half-pixel offset, so the
        // cosines of an odd horizontal frequency sum to 1 over a row.
        let img = RgbImage::from_pixel(13, 7, Rgb([90, 160, 220]));
        let lin = srgb_to_linear_table()[90];
        for strategy in [BasisStrategy::Direct, BasisStrategy::Recurrence] {
            let f = factors(&img, 3, 1, strategy);
            assert!((f[1].r - 2.0 * lin / 13.0).abs() < 1e-12);
            assert!(f[2].r.abs() < 1e-12);
        }
    }

    #[test]
    fn test_strategies_agree() {
        let img = gradient(61, 43);
        let direct = factors(&img, 9, 9, BasisStrategy::Direct);
        let recurrence = factors(&img, 9, 9, BasisStrategy::Recurrence);
        for (a, b) in direct.iter().zip(&recurrence) {
            assert!((a.r - b.r).abs() < 1e-10);
            assert!((a.g - b.g).abs() < 1e-10);
            assert!((a.b - b.b).abs() < 1e-10);
        }
    }

    #[test]
    fn test_horizontal_ramp_even_rows_cancel() {
        let img = RgbImage::from_fn(16, 16, |x, _| Rgb([(x * 16) as u8; 3]));
        let f = factors(&img, 3, 3, BasisStrategy::Direct);
        // Even vertical frequencies cancel for an image constant along y.
        for factor in &f[6..] {
            assert!(factor.r.abs() < 1e-12);
        }
        assert!(f[1].r.abs() > 0.1);
    }
}
