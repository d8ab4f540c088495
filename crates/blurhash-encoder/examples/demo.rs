//! BlurHash Demo - encode a few synthetic images
//!
//! Run with: RUST_LOG=debug cargo run --example demo

use blurhash_encoder::{
    encode, BasisStrategy, ChromaSubsampling, Encoder, YCbCrImage,
};
use image::{Rgb, RgbImage};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== BlurHash Demo ===\n");

    // Red grows to the right, green grows downwards.
    let (width, height) = (32, 32);
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = ((x as f64 / width as f64) * 255.0) as u8;
        let g = ((y as f64 / height as f64) * 255.0) as u8;
        Rgb([r, g, 128])
    });
    println!("1. Created a {width}x{height} gradient image");

    let hash = encode(&img, 4, 3)?;
    println!("2. Encoded to BlurHash: {hash}");
    println!("   Hash length: {} characters\n", hash.len());

    let q = Encoder::new(4, 3)
        .with_strategy(BasisStrategy::Direct)
        .quantize(&img)?;
    println!("3. Quantized fields (direct basis)");
    println!("   Average color: #{:06x}", q.dc());
    println!("   AC scale: {:.4} (index {})", q.scale(), q.scale_index());
    println!("   AC values: {:?}\n", q.ac());

    let planar = YCbCrImage::from_rgb(img.as_raw(), width, height, ChromaSubsampling::S420)?;
    println!("4. Same image as 4:2:0 Y'CbCr: {}", encode(&planar, 4, 3)?);

    println!("\n=== Demo Complete ===");
    Ok(())
}
