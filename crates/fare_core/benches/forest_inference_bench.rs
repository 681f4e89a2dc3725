use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fare_core::{
    Airline, CabinClass, City, FeatureEncoder, Forest, Node, RouteStatistics, Stops, TimeBand,
    TrainedModel, Tree, TripRecord,
};

const TREES: usize = 100;

fn trip(duration: f64, days_left: u32) -> TripRecord {
    TripRecord {
        source_city: City::Delhi,
        destination_city: City::Mumbai,
        cabin_class: CabinClass::Economy,
        stops: Stops::One,
        days_left,
        duration: Some(duration),
        airline: Airline::Vistara,
        departure_time: TimeBand::Morning,
        arrival_time: TimeBand::Evening,
    }
}

fn sample_model() -> TrainedModel {
    let history: Vec<TripRecord> = (1..=20).map(|i| trip(f64::from(i), i)).collect();
    let encoder = FeatureEncoder::fit(&history);

    // Depth-two trees over duration and days_left
    let trees = (0..TREES)
        .map(|i| {
            let offset = i as f64;
            Tree::new(vec![
                Node::internal(0, 0, 5.0, 1, 2),
                Node::internal(1, 1, 10.0, 3, 4),
                Node::internal(2, 1, 30.0, 5, 6),
                Node::leaf(3, 6000.0 + offset),
                Node::leaf(4, 4500.0 + offset),
                Node::leaf(5, 8000.0 + offset),
                Node::leaf(6, 5200.0 + offset),
            ])
        })
        .collect();

    let forest = Forest::new(trees, encoder.width());
    TrainedModel::new(forest, encoder, RouteStatistics::build(&history), "bench")
}

fn bench_forest_inference(c: &mut Criterion) {
    let model = sample_model();
    let query = trip(2.5, 12);

    c.bench_function("forest_predict_with_uncertainty", |b| {
        b.iter(|| {
            let interval = model.predict_with_uncertainty(black_box(&query));
            black_box(interval).ok();
        });
    });

    c.bench_function("forest_local_contributions", |b| {
        b.iter(|| {
            let contributions = model.local_contributions(black_box(&query));
            black_box(contributions).ok();
        });
    });
}

criterion_group!(fare_benches, bench_forest_inference);
criterion_main!(fare_benches);
