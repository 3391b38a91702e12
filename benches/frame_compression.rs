use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gifenc::Frame;
use rand::{prelude::StdRng, Rng, SeedableRng};

fn prepare_frame() -> Frame {
    let mut rand = StdRng::seed_from_u64(42);
    let pixels: Vec<u8> = (0..256 * 256)
        .map(|offset| {
            if offset % 256 < 128 {
                (offset / 1024) as u8 % 16
            } else {
                rand.gen_range(0..16)
            }
        })
        .collect();
    Frame::with_pixels(256, 256, pixels).expect("Error")
}

pub fn compress_with_weezl(c: &mut Criterion) {
    let frame = prepare_frame();

    c.bench_function("frame image data with weezl", |b| {
        b.iter(|| {
            let mut encoder = weezl::encode::Encoder::new(weezl::BitOrder::Lsb, black_box(4));
            encoder.encode(frame.pixels()).expect("Error")
        })
    });
}

pub fn compress_with_gifenc(c: &mut Criterion) {
    let frame = prepare_frame();

    c.bench_function("frame image data with gifenc", |b| {
        b.iter(|| frame.encode_image_data(black_box(4)).expect("Error"))
    });
}

criterion_group!(benches, compress_with_weezl, compress_with_gifenc);
criterion_main!(benches);
