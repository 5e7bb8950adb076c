use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use glam::IVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cytos::labeling::label;
use cytos::morphology::{dilate, erode};
use cytos::outline::count_surface_faces;
use cytos::{
    BoundingBox, DilateConfig, ErodeConfig, Extent, LabelConfig, ObjectMask, SurfaceConfig,
};

fn blob_volume() -> ObjectMask {
    let mut rng = StdRng::seed_from_u64(42);
    let bbox = BoundingBox::new(IVec3::ZERO, Extent::new(96, 96, 16));
    ObjectMask::from_fn(bbox, |_| rng.random_bool(0.45))
}

fn bench_morphology(c: &mut Criterion) {
    let mask = blob_volume();
    let dilate_config = DilateConfig {
        use_3d: true,
        ..DilateConfig::new(2)
    };
    let erode_config = ErodeConfig {
        use_3d: true,
        ..ErodeConfig::new(2)
    };

    c.bench_function("dilate_3d_x2", |b| {
        b.iter(|| black_box(dilate(black_box(&mask), &dilate_config)))
    });
    c.bench_function("erode_3d_x2", |b| {
        b.iter(|| black_box(erode(black_box(&mask), &erode_config)))
    });
}

fn bench_labeling(c: &mut Criterion) {
    let mask = blob_volume();
    let six = LabelConfig::default();
    let twenty_six = LabelConfig {
        big_neighborhood: true,
        ..LabelConfig::default()
    };

    c.bench_function("label_6", |b| b.iter(|| black_box(label(black_box(&mask), &six))));
    c.bench_function("label_26", |b| {
        b.iter(|| black_box(label(black_box(&mask), &twenty_six)))
    });
    c.bench_function("surface_faces", |b| {
        b.iter(|| black_box(count_surface_faces(black_box(&mask), &SurfaceConfig::default())))
    });
}

criterion_group!(benches, bench_morphology, bench_labeling);
criterion_main!(benches);
