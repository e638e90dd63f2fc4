use criterion::{black_box, criterion_group, criterion_main, Criterion};
use huddle_test_fixtures::plays;
use huddle_timeline_core::{interpolate, parse_play_json, Config, PlayDriver};

fn bench_timeline(c: &mut Criterion) {
    let json = plays::json("horns-legacy").expect("fixture");
    let doc = parse_play_json(&json, 45.0).expect("play");

    c.bench_function("interpolate_mid_step", |b| {
        b.iter(|| interpolate(black_box(&doc), black_box(1.37), 1.0, 45.0))
    });

    c.bench_function("driver_update_60hz", |b| {
        let mut driver = PlayDriver::with_document(Config::default(), doc.clone()).expect("driver");
        b.iter(|| {
            if !driver.is_running() {
                driver.restart();
            }
            black_box(driver.update(1.0 / 60.0).positions.len());
        })
    });
}

criterion_group!(benches, bench_timeline);
criterion_main!(benches);
