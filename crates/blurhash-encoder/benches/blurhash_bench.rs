use blurhash_encoder::{
    base83, color, encode, BasisStrategy, ChromaSubsampling, Encoder, YCbCrImage,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgb, RgbImage, Rgba, RgbaImage};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn gradient_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let r = ((x as f64 / width as f64) * 255.0) as u8;
        let g = ((y as f64 / height as f64) * 255.0) as u8;
        Rgb([r, g, 128])
    })
}

fn gradient_rgba(width: u32, height: u32) -> RgbaImage {
    let rgb = gradient_image(width, height);
    RgbaImage::from_fn(width, height, |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Rgba([r, g, b, 255])
    })
}

// ---------------------------------------------------------------------------
// Encode benchmarks
// ---------------------------------------------------------------------------

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for &(w, h) in &[(32u32, 32u32), (128, 128), (256, 256), (512, 512)] {
        let rgb = gradient_image(w, h);
        let rgba = gradient_rgba(w, h);
        let planar = YCbCrImage::from_rgb(rgb.as_raw(), w, h, ChromaSubsampling::S420)
            .expect("valid planes");
        let label = format!("{w}x{h}");
        group.throughput(Throughput::Elements((w as u64) * (h as u64)));
        group.bench_with_input(BenchmarkId::new("generic", &label), &rgb, |b, img| {
            b.iter(|| encode(img, 4, 3).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("packed_rgba8", &label), &rgba, |b, img| {
            b.iter(|| encode(img, 4, 3).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("ycbcr_420", &label), &planar, |b, img| {
            b.iter(|| encode(img, 4, 3).unwrap());
        });
    }

    group.finish();
}

fn bench_encode_component_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_components");

    let img = gradient_rgba(128, 128);
    for &(cx, cy) in &[(1u32, 1u32), (4, 3), (4, 4), (9, 9)] {
        for strategy in [BasisStrategy::Recurrence, BasisStrategy::Direct] {
            let encoder = Encoder::new(cx, cy).with_strategy(strategy);
            let label = format!("{cx}x{cy}/{strategy:?}");
            group.bench_with_input(BenchmarkId::new("128x128", &label), &img, |b, img| {
                b.iter(|| encoder.encode(img).unwrap());
            });
        }
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// Primitive benchmarks
// ---------------------------------------------------------------------------

fn bench_base83(c: &mut Criterion) {
    let mut group = c.benchmark_group("base83");

    group.bench_function("encode_4", |b| {
        let mut buf = String::with_capacity(4);
        b.iter(|| {
            buf.clear();
            base83::encode_into(&mut buf, std::hint::black_box(0x00ab_cdef), 4).unwrap();
        });
    });
    group.bench_function("decode_4", |b| {
        b.iter(|| base83::decode(std::hint::black_box("Eyb[")).unwrap());
    });

    group.finish();
}

fn bench_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("color");

    group.bench_function("srgb_to_linear", |b| {
        b.iter(|| (0..=255u8).map(color::srgb_to_linear).sum::<f64>());
    });
    group.bench_function("linear_to_srgb", |b| {
        b.iter(|| {
            (0..1024)
                .map(|i| color::linear_to_srgb(i as f64 / 1023.0) as u32)
                .sum::<u32>()
        });
    });

    group.finish();
}

#[cfg(feature = "parallel")]
fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");

    let images: Vec<RgbaImage> = (0..64).map(|_| gradient_rgba(128, 128)).collect();
    group.throughput(Throughput::Elements(images.len() as u64));
    group.bench_function("64x128x128", |b| {
        b.iter(|| blurhash_encoder::encode_batch(&images, 4, 3));
    });

    group.finish();
}

#[cfg(not(feature = "parallel"))]
fn bench_batch(_: &mut Criterion) {}

criterion_group!(
    benches,
    bench_encode,
    bench_encode_component_counts,
    bench_base83,
    bench_color,
    bench_batch
);
criterion_main!(benches);
