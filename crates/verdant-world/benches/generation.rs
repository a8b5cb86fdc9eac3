//! Benchmarks for chunk and flora generation.
//!
//! Run with: cargo bench --package verdant-world --bench generation

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use verdant_common::ChunkCoord;
use verdant_world::{
    FloraGenerator, GroundHeight, HeightField, HeightConfig, ObjectCollection, StreamingWindow,
    Terrain, WorldConfig,
};

fn benchmark_single_chunk(c: &mut Criterion) {
    let config = WorldConfig {
        cache_capacity: 1,
        ..WorldConfig::default()
    };
    let mut terrain = Terrain::new(config, 720.0, 42);

    c.bench_function("single_chunk_generation", |b| {
        let mut coord = 0i32;
        b.iter(|| {
            coord = coord.wrapping_add(1);
            let chunk = ChunkCoord::new(coord);
            black_box(terrain.create_in_range(chunk.min_x(300), chunk.max_x(300)))
        });
    });
}

fn benchmark_height_samples(c: &mut Criterion) {
    let field = HeightField::new(42, 333.0, &HeightConfig::default());

    c.bench_function("height_sample", |b| {
        let mut x = 0.0f32;
        b.iter(|| {
            x += 30.0;
            black_box(field.height_at(black_box(x)))
        });
    });
}

fn benchmark_flora(c: &mut Criterion) {
    let config = WorldConfig::default();
    let flora = FloraGenerator::new(42, &config);
    let field = HeightField::new(42, 333.0, &config.height);

    let mut group = c.benchmark_group("flora");
    group.throughput(Throughput::Elements(100));
    group.bench_function("100_chunks", |b| {
        b.iter(|| {
            for x in 0..100 {
                let chunk = ChunkCoord::new(x);
                black_box(flora.generate_in_range(&field, chunk, chunk.min_x(300), chunk.max_x(300)));
            }
        });
    });
    group.finish();
}

fn benchmark_streaming_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming");
    group.sample_size(10);
    group.throughput(Throughput::Elements(1000));

    group.bench_function("walk_1000_ticks", |b| {
        b.iter(|| {
            let config = WorldConfig::default();
            let mut terrain = Terrain::new(config.clone(), 500.0, 7);
            let mut window = StreamingWindow::for_world(&config, 7);
            let mut objects = ObjectCollection::new();
            for step in 0..1000 {
                black_box(window.tick(step as f32 * 45.0, &mut terrain, &mut objects));
            }
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_chunk,
    benchmark_height_samples,
    benchmark_flora,
    benchmark_streaming_walk,
);
criterion_main!(benches);
