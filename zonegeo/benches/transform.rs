//! Benchmarks pour la transformation de coordonnées

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geojson::{Geometry, Value as GeoValue};
use zonegeo::reproject_lite::ReprojectorLite;
use zonegeo::{BatchOptions, CoordinateTransformer, Coordinates, TransformOptions};

const SPECS: &[(&str, &str)] = &[
    (
        "cgcs2000_gk",
        "+proj=tmerc +lat_0=0 +lon_0=117 +k=1 +x_0=39500000 +y_0=0 +ellps=GRS80 \
         +towgs84=0,0,0,0,0,0,0 +units=m +no_defs",
    ),
    (
        "xian_gk_helmert",
        "+proj=tmerc +lat_0=0 +lon_0=114 +k=1 +x_0=500000 +y_0=0 +a=6378140 \
         +b=6356755.288157528 +towgs84=12.7,-131.3,-44.7,0,0,0,0 +units=m +no_defs",
    ),
    ("utm", "+proj=utm +zone=50 +datum=WGS84 +units=m +no_defs"),
];

fn polygon(vertices: usize) -> Coordinates {
    let ring: Vec<Vec<f64>> = (0..vertices)
        .map(|i| {
            let angle = i as f64 / vertices as f64 * std::f64::consts::TAU;
            vec![
                39_500_000.0 + 1_000.0 * angle.cos(),
                4_500_000.0 + 1_000.0 * angle.sin(),
            ]
        })
        .collect();
    Geometry::new(GeoValue::Polygon(vec![ring])).into()
}

fn bench_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("to_wgs84");

    for (name, spec) in SPECS {
        let reproj = ReprojectorLite::from_spec(spec).unwrap();
        let (x, y) = reproj.from_wgs84(117.3, 31.8).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &(x, y), |b, &(x, y)| {
            b.iter(|| black_box(reproj.to_wgs84(black_box(x), black_box(y))))
        });
    }

    group.finish();
}

fn bench_polygon(c: &mut Criterion) {
    let transformer = CoordinateTransformer::default();
    let options = TransformOptions::default();
    let mut group = c.benchmark_group("transform_polygon");

    for vertices in [16, 256, 4096] {
        let coords = polygon(vertices);
        group.throughput(Throughput::Elements(vertices as u64));
        group.bench_with_input(BenchmarkId::from_parameter(vertices), &coords, |b, coords| {
            b.iter(|| black_box(transformer.transform(coords, None, &options)))
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let transformer = CoordinateTransformer::default();
    let points: Vec<[f64; 2]> = (0..10_000)
        .map(|i| [39_500_000.0 + (i % 100) as f64 * 50.0, 4_500_000.0 + (i / 100) as f64 * 50.0])
        .collect();

    c.bench_function("batch_10k", |b| {
        b.iter(|| black_box(transformer.batch_transform(&points, None, &BatchOptions::default())))
    });
}

criterion_group!(benches, bench_point, bench_polygon, bench_batch);
criterion_main!(benches);
