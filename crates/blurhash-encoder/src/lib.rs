//! # blurhash-encoder
//!
//! Byte-exact BlurHash encoding in pure Rust.
//!
//! [BlurHash](https://blurha.sh/) is a compact representation of a placeholder
//! for an image. This crate reads pixels from any [`ImageSource`] (the
//! `image` crate's buffers, planar [`YCbCrImage`]s, or your own type),
//! projects them onto a small cosine basis and packs the result into the
//! standard base83 text format.
//!
//! ## Quick Start
//!
//! ```
//! use blurhash_encoder::{encode, encoded_length};
//! use image::{Rgb, RgbImage};
//!
//! let img = RgbImage::from_fn(32, 32, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 128]));
//! let hash = encode(&img, 4, 3).unwrap();
//! assert_eq!(hash.len(), encoded_length(4, 3));
//! ```
//!
//! ## Features
//!
//! - `parallel`: [`encode_batch`] for encoding many images on a rayon pool.

pub mod base83;
pub mod color;
pub mod error;
pub mod sampler;
pub mod source;
pub mod ycbcr;

#[cfg(feature = "parallel")]
mod batch;
mod basis;
mod encode_impl;
mod quantize;

// Re-export primary functions at crate root.
#[cfg(feature = "parallel")]
pub use batch::encode_batch;
pub use basis::BasisStrategy;
pub use encode_impl::{append_encoded, encode, encoded_length, Encoder, COMPONENT_RANGE};
pub use error::BlurhashError;
pub use quantize::QuantizedHash;
pub use sampler::{Sampler, SamplerKind};
pub use source::{ImageSource, PixelLayout};
pub use ycbcr::{ChromaSubsampling, YCbCrImage};
