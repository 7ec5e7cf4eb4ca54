use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use planar::prelude::*;
use planar::CascadedPolygonUnion;

fn regular_polygon(cx: f64, cy: f64, r: f64, sides: usize) -> Polygon {
    let mut coords: Vec<Coord> = (0..sides)
        .map(|i| {
            let a = std::f64::consts::TAU * i as f64 / sides as f64;
            Coord::new(cx + r * a.cos(), cy + r * a.sin())
        })
        .collect();
    coords.push(coords[0]);
    Polygon::from_coords(coords).unwrap()
}

fn benchmark_overlay(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay");

    for sides in [16, 64, 256] {
        let a = Geometry::from(regular_polygon(0.0, 0.0, 10.0, sides));
        let b = Geometry::from(regular_polygon(5.0, 3.0, 10.0, sides));
        group.bench_with_input(BenchmarkId::new("intersection", sides), &sides, |bench, _| {
            bench.iter(|| black_box(&a).intersection(black_box(&b)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("union", sides), &sides, |bench, _| {
            bench.iter(|| black_box(&a).union(black_box(&b)).unwrap())
        });
    }

    // Grid of overlapping cells, unioned in one pass
    let cells: Vec<Polygon> = (0..100)
        .map(|i| regular_polygon((i % 10) as f64 * 1.5, (i / 10) as f64 * 1.5, 1.0, 12))
        .collect();
    group.bench_function("cascaded_union_100", |b| {
        b.iter(|| CascadedPolygonUnion::union(black_box(&cells)).unwrap())
    });

    group.finish();
}

fn benchmark_buffer(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer");

    let point = Geometry::from(Point::from_xy(0.0, 0.0).unwrap());
    group.bench_function("point", |b| {
        b.iter(|| point.buffer(black_box(10.0)).unwrap())
    });

    let zigzag = Geometry::from(
        LineString::from_coords((0..50).map(|i| Coord::new(i as f64, (i % 2) as f64 * 3.0)))
            .unwrap(),
    );
    group.bench_function("zigzag_line", |b| {
        b.iter(|| zigzag.buffer(black_box(0.5)).unwrap())
    });

    let mitre = BufferParameters::default().with_join_style(JoinStyle::Mitre);
    let polygon = Geometry::from(regular_polygon(0.0, 0.0, 10.0, 64));
    group.bench_function("polygon_mitre", |b| {
        b.iter(|| polygon.buffer_with_params(black_box(1.0), &mitre).unwrap())
    });
    group.bench_function("polygon_erode", |b| {
        b.iter(|| polygon.buffer(black_box(-1.0)).unwrap())
    });

    group.finish();
}

fn benchmark_strtree(c: &mut Criterion) {
    let mut group = c.benchmark_group("strtree");

    let items: Vec<(Envelope, usize)> = (0..10_000)
        .map(|i| {
            let x = (i % 100) as f64;
            let y = (i / 100) as f64;
            (Envelope::new(x, x + 0.8, y, y + 0.8), i)
        })
        .collect();

    group.bench_function("bulk_load_10k", |b| {
        b.iter(|| StrTree::bulk_load(black_box(items.clone())))
    });

    let tree = StrTree::bulk_load(items.clone());
    let window = Envelope::new(40.0, 45.0, 40.0, 45.0);
    group.bench_function("query_window", |b| {
        b.iter(|| tree.query(black_box(&window)).len())
    });

    group.bench_function("insert_then_query", |b| {
        b.iter(|| {
            let mut tree = StrTree::new();
            for (env, i) in items.iter().take(1_000) {
                tree.insert(*env, *i);
            }
            tree.query(black_box(&window)).len()
        })
    });

    group.finish();
}

fn benchmark_wkb(c: &mut Criterion) {
    let mut group = c.benchmark_group("wkb");

    let polygons: Vec<Polygon> = (0..100)
        .map(|i| regular_polygon(i as f64 * 30.0, 0.0, 10.0, 64))
        .collect();
    let geometry = Geometry::MultiPolygon(planar::MultiPolygon::new(polygons));
    let writer = WkbWriter::new();
    let reader = WkbReader::new();
    let bytes = writer.write(&geometry);

    group.bench_function("write_multipolygon", |b| {
        b.iter(|| writer.write(black_box(&geometry)))
    });
    group.bench_function("read_multipolygon", |b| {
        b.iter(|| reader.read(black_box(&bytes)).unwrap())
    });

    let text = WktWriter::new().write(&geometry);
    group.bench_function("wkt_read_multipolygon", |b| {
        b.iter(|| WktReader::new().read(black_box(&text)).unwrap())
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_overlay,
    benchmark_buffer,
    benchmark_strtree,
    benchmark_wkb
);
criterion_main!(benches);
