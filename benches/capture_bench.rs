use criterion::{criterion_group, criterion_main, Criterion};
use std::io::Cursor;

// Benchmarks cover the browser-free parts of a capture. Run with:
//    cargo bench

fn bench_background_script(c: &mut Criterion) {
    c.bench_function("background_script", |b| {
        b.iter(|| webshot::style::background_script(webshot::style::WHITE_BACKGROUND_CSS))
    });
}

fn bench_thumbnail(c: &mut Criterion) {
    let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        1152,
        648,
        image::Rgba([240, 240, 240, 255]),
    ));
    let mut png = Cursor::new(Vec::new());
    img.write_to(&mut png, image::ImageFormat::Png).unwrap();
    let png = png.into_inner();

    c.bench_function("thumbnail_320_jpeg", |b| {
        b.iter(|| {
            webshot::thumbnail::thumbnail_from_bytes(&png, 320, 320, webshot::thumbnail::ThumbnailFormat::Jpeg).unwrap()
        })
    });
}

criterion_group!(benches, bench_background_script, bench_thumbnail);
criterion_main!(benches);
