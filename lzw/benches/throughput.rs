use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gifenc_lzw::{
    block::blockify,
    encoder::{GifStyleEncoder, LzwEncoder},
};
use rand::{prelude::StdRng, RngCore, SeedableRng};

fn bench_random(c: &mut Criterion) {
    let data = prepare_random_data();

    bench(c, "Random data", data.as_slice(), 8);
}

fn bench_stripes(c: &mut Criterion) {
    let data: Vec<u8> = (0..1usize << 20).map(|i| ((i / 64) % 16) as u8).collect();

    bench(c, "Stripes", data.as_slice(), 4);
}

fn bench(c: &mut Criterion, name: &str, data: &[u8], code_size: u8) {
    let mut group = c.benchmark_group("Throughput");
    group.throughput(criterion::Throughput::Bytes(data.len() as u64));

    let id = BenchmarkId::new(name, "Code stream");
    group.bench_with_input(id, data, |b, data| {
        let mut encoder = LzwEncoder::new(code_size).expect("Error");
        b.iter(|| encoder.encode(black_box(data)).expect("Error"))
    });

    let stream = LzwEncoder::new(code_size)
        .and_then(|mut encoder| encoder.encode(data))
        .expect("Error");
    let id = BenchmarkId::new(name, "Packing");
    group.bench_with_input(id, &stream, |b, stream| {
        b.iter(|| stream.pack(std::io::sink()).expect("Error"))
    });

    let packed = GifStyleEncoder::encode_to_vec(data, code_size).expect("Error");
    let id = BenchmarkId::new(name, "Blockify");
    group.bench_with_input(id, &packed, |b, packed| b.iter(|| blockify(black_box(packed))));

    let id = BenchmarkId::new(name, "Encode GIF image data");
    group.bench_with_input(id, data, |b, data| {
        b.iter(|| {
            GifStyleEncoder::encode_blocks(data, std::io::sink(), black_box(code_size))
                .expect("Error")
        })
    });
    group.finish();
}

fn prepare_random_data() -> Vec<u8> {
    let mut rand = StdRng::seed_from_u64(42);
    let mut data: Vec<u8> = vec![0; 1 << 20];
    rand.fill_bytes(&mut data[..]);

    data
}

criterion_group!(benches, bench_random, bench_stripes);

criterion_main!(benches);
