use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quake_dash::catalog::Catalog;
use quake_dash::country::{extract_country, ALL_COUNTRIES};
use quake_dash::i18n::Lang;
use quake_dash::map::{point_descriptors, HeatGrid, MapRenderer, Viewport};
use quake_dash::query::YearRange;
use quake_dash::record::EarthquakeRecord;

const PLACES: [&str; 6] = [
    "10km N of Tokyo, Japan",
    "offshore Chile",
    "45 km SW of Hualien City, Taiwan",
    "Kepulauan Talaud, Indonesia",
    "near the east coast of Honshu, Japan",
    "Fiji region",
];

/// Deterministic synthetic catalog spread over the globe and 2015-2024
fn synthetic_catalog(n: usize) -> Catalog {
    let start = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).single().unwrap_or_default();
    let records = (0..n)
        .map(|i| {
            let lon = (i as f64 * 37.7) % 360.0 - 180.0;
            let lat = (i as f64 * 13.3) % 160.0 - 80.0;
            let time = start + Duration::hours(i as i64 * 11);
            EarthquakeRecord::new(
                i,
                Some(PLACES[i % PLACES.len()].to_string()),
                lat,
                lon,
                4.0 + (i % 30) as f64 / 10.0,
                10.0 + (i % 600) as f64,
                time,
            )
        })
        .collect();
    Catalog::from_records(records)
}

fn bench_extract_country(c: &mut Criterion) {
    c.bench_function("extract_country_6", |b| {
        b.iter(|| {
            for place in PLACES {
                black_box(extract_country(black_box(Some(place))));
            }
        });
    });
}

fn bench_view(c: &mut Criterion) {
    let catalog = synthetic_catalog(20_000);
    c.bench_function("view_all_20k", |b| {
        b.iter(|| black_box(catalog.view(ALL_COUNTRIES, YearRange::DASHBOARD).count()));
    });
    c.bench_function("view_japan_20k", |b| {
        b.iter(|| black_box(catalog.view("Japan", YearRange::DASHBOARD).count()));
    });
}

fn bench_heat(c: &mut Criterion) {
    let catalog = synthetic_catalog(20_000);
    let coords = catalog.heat_coordinates().to_vec();
    let renderer = MapRenderer::new();
    let viewport = Viewport::world(160, 120);

    c.bench_function("heat_grid_20k", |b| {
        b.iter(|| black_box(HeatGrid::build(&coords).iter_cells().count()));
    });
    c.bench_function("render_heat_20k", |b| {
        b.iter(|| black_box(renderer.render_heat(80, 30, &viewport, &coords)));
    });
}

fn bench_render_points(c: &mut Criterion) {
    let catalog = synthetic_catalog(5_000);
    let view = catalog.view(ALL_COUNTRIES, YearRange::DASHBOARD);
    let points = point_descriptors(&view.map_records, Lang::En);
    let renderer = MapRenderer::new();
    let viewport = Viewport::world(160, 120);

    c.bench_function("render_points_5k", |b| {
        b.iter(|| black_box(renderer.render_points(80, 30, &viewport, &points, Some(42))));
    });
}

criterion_group!(
    benches,
    bench_extract_country,
    bench_view,
    bench_heat,
    bench_render_points
);
criterion_main!(benches);
