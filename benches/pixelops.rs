use criterion::{criterion_group, criterion_main, Criterion};
use pixelops::{
    blur, crop, gradient_edges, match_template, multi_stage_edges, pyramid_scale, rotate,
    ChannelLayout, OwnedImage, ScaleDirection,
};
use std::hint::black_box;

fn make_image(width: usize, height: usize) -> OwnedImage {
    let mut data = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.extend_from_slice(&[value as u8, (value as u8).wrapping_add(40), 255 - value as u8]);
        }
    }
    OwnedImage::new(data, width, height, ChannelLayout::Rgb).expect("bench image")
}

fn bench_filters(c: &mut Criterion) {
    let image = make_image(256, 256);
    c.bench_function("blur_15x15_rgb_256", |b| {
        b.iter(|| blur(black_box(&image)).unwrap())
    });
    c.bench_function("pyramid_down_2_rgb_256", |b| {
        b.iter(|| pyramid_scale(black_box(&image), 2, ScaleDirection::Down).unwrap())
    });
    c.bench_function("rotate_30_rgb_256", |b| {
        b.iter(|| rotate(black_box(&image), 30).unwrap())
    });
}

fn bench_detectors(c: &mut Criterion) {
    let image = make_image(256, 256);
    c.bench_function("gradient_edges_256", |b| {
        b.iter(|| gradient_edges(black_box(&image)).unwrap())
    });
    c.bench_function("multi_stage_edges_256", |b| {
        b.iter(|| multi_stage_edges(black_box(&image), 50.0, 150.0).unwrap())
    });

    let search = make_image(160, 120);
    let template = crop(&search, 40, 88, 30, 58).expect("template crop");
    c.bench_function("match_template_160x120_32x32", |b| {
        b.iter(|| match_template(black_box(&search), black_box(&template)).unwrap())
    });
}

criterion_group!(benches, bench_filters, bench_detectors);
criterion_main!(benches);
