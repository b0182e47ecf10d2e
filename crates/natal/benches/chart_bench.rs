use criterion::{black_box, criterion_group, criterion_main, Criterion};
use natal::chart::{ChartAssembler, Observer};
use natal::ephemeris::{AnalyticalEphemeris, CelestialBody, Ephemeris, SwissEphemerisAdapter};
use natal::houses::{calc_houses, HouseSystem};

fn bench_chart(c: &mut Criterion) {
    // Without data files under SWISS_EPHEMERIS_PATH this measures the
    // analytical fallback.
    let observer = Observer {
        latitude: 40.7128,
        longitude: -74.0060,
        julian_day: 2_451_545.0,
    };

    let parallel = ChartAssembler::new(Ephemeris::new(SwissEphemerisAdapter::new(None)));
    c.bench_function("chart_parallel", |b| {
        b.iter(|| parallel.compute_for_observer(black_box(&observer)))
    });

    let sequential =
        ChartAssembler::new(Ephemeris::new(SwissEphemerisAdapter::new(None))).with_parallel(false);
    c.bench_function("chart_sequential", |b| {
        b.iter(|| sequential.compute_for_observer(black_box(&observer)))
    });
}

fn bench_components(c: &mut Criterion) {
    let analytical = AnalyticalEphemeris::new();
    c.bench_function("analytical_moon", |b| {
        b.iter(|| analytical.calc_body_position(CelestialBody::Moon, black_box(2_451_545.0)))
    });
    c.bench_function("analytical_saturn", |b| {
        b.iter(|| analytical.calc_body_position(CelestialBody::Saturn, black_box(2_451_545.0)))
    });
    c.bench_function("placidus", |b| {
        b.iter(|| calc_houses(HouseSystem::Placidus, black_box(2_451_545.0), 51.5, -0.12))
    });
}

criterion_group!(benches, bench_chart, bench_components);
criterion_main!(benches);
