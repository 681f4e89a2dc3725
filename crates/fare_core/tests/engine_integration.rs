//! Engine behavior over a hand-built model, through the public API only

use fare_core::{
    Airline, CabinClass, City, Direction, FeatureEncoder, Forest, Node, RouteStatistics, Stops,
    TimeBand, TrainedModel, Tree, TripInput, TripRecord, TOP_CONTRIBUTORS,
};
use tempfile::tempdir;

fn record(source: City, destination: City, duration: Option<f64>, airline: Airline) -> TripRecord {
    TripRecord {
        source_city: source,
        destination_city: destination,
        cabin_class: CabinClass::Economy,
        stops: Stops::Zero,
        days_left: 10,
        duration,
        airline,
        departure_time: TimeBand::Morning,
        arrival_time: TimeBand::Evening,
    }
}

fn history() -> Vec<TripRecord> {
    vec![
        record(City::Delhi, City::Mumbai, Some(2.0), Airline::Vistara),
        record(City::Delhi, City::Mumbai, Some(4.0), Airline::Indigo),
        record(City::Delhi, City::Mumbai, Some(6.0), Airline::Vistara),
        record(City::Chennai, City::Kolkata, Some(10.0), Airline::AirAsia),
        record(City::Chennai, City::Kolkata, None, Airline::SpiceJet),
    ]
}

/// Trees splitting on duration (column 0) and the Vistara one-hot column
fn model() -> TrainedModel {
    let history = history();
    let encoder = FeatureEncoder::fit(&history);
    let vistara = encoder
        .feature_names()
        .iter()
        .position(|name| name == "airline_Vistara")
        .unwrap() as i32;

    let forest = Forest::new(
        vec![
            Tree::new(vec![
                Node::internal(0, 0, 5.0, 1, 2),
                Node::leaf(1, 4000.0),
                Node::leaf(2, 9000.0),
            ]),
            Tree::new(vec![
                Node::internal(0, vistara, 0.5, 1, 2),
                Node::leaf(1, 4200.0),
                Node::leaf(2, 6800.0),
            ]),
            Tree::new(vec![Node::leaf(0, 5000.0)]),
        ],
        encoder.width(),
    );
    TrainedModel::new(forest, encoder, RouteStatistics::build(&history), "rf-fixture")
}

#[test]
fn route_medians_follow_history() {
    let stats = RouteStatistics::build(&history());
    assert_eq!(stats.route_median(City::Delhi, City::Mumbai), Some(4.0));
    assert_eq!(stats.route_median(City::Chennai, City::Kolkata), Some(10.0));
    assert_eq!(stats.global_median(), 5.0);

    let passed = stats.impute_duration(City::Delhi, City::Mumbai, Some(1.5));
    assert!(!passed.was_imputed);
    assert_eq!(passed.value, 1.5);

    let filled = stats.impute_duration(City::Mumbai, City::Delhi, None);
    assert!(filled.was_imputed);
    assert_eq!(filled.value, 5.0);
}

#[test]
fn interval_brackets_point_and_stays_non_negative() {
    let model = model();
    for trip in history() {
        let interval = model.predict_with_uncertainty(&trip).unwrap();
        assert!(interval.lower >= 0.0);
        assert!(interval.lower <= interval.point);
        assert!(interval.point <= interval.upper);
    }
}

#[test]
fn contributions_are_ranked_and_bounded() {
    let model = model();
    let trip = record(City::Delhi, City::Mumbai, Some(8.0), Airline::Vistara);
    let contributions = model.local_contributions(&trip).unwrap();

    assert_eq!(contributions.len(), TOP_CONTRIBUTORS);
    for pair in contributions.windows(2) {
        assert!(pair[0].contribution >= pair[1].contribution);
    }

    // Baseline duration is the global median 5.0, which goes left
    assert_eq!(contributions[0].feature, "duration");
    assert_eq!(contributions[0].direction, Direction::Increase);
    assert!((contributions[0].contribution - 5000.0 / 3.0).abs() < 1e-9);
    assert_eq!(contributions[1].feature, "airline");
    assert!((contributions[1].contribution - 2600.0 / 3.0).abs() < 1e-9);
}

#[test]
fn end_to_end_prediction_reports_assumptions() {
    let model = model();
    let input = TripInput {
        source_city: City::Delhi,
        destination_city: City::Mumbai,
        cabin_class: CabinClass::Economy,
        stops: Stops::Zero,
        days_left: 10,
        duration: None,
        airline: None,
        departure_time: None,
        arrival_time: None,
    };

    let result = model.predict(&input).unwrap();
    assert!(result.predicted_price > 0.0);
    assert_eq!(result.assumptions_used["duration"].method, "route_median");
    assert_eq!(result.assumptions_used["airline"].method, "default_unknown");
    assert_eq!(result.assumptions_used["departure_time"].method, "default_unknown");

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["assumptions_used"]["duration"]["value"], 4.0);
    assert!(json["top_contributors"].as_array().unwrap().len() <= TOP_CONTRIBUTORS);
    assert!(json.get("trip").is_none());
}

#[test]
fn same_city_trip_is_rejected() {
    let model = model();
    let input = TripInput {
        source_city: City::Delhi,
        destination_city: City::Delhi,
        cabin_class: CabinClass::Business,
        stops: Stops::One,
        days_left: 3,
        duration: Some(2.0),
        airline: Some("Vistara".to_string()),
        departure_time: None,
        arrival_time: None,
    };
    let err = model.predict(&input).unwrap_err();
    assert!(err.to_string().contains("Source and destination can't be the same."));
}

#[test]
fn persisted_model_predicts_identically() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("model").join("fare_model.bin");
    let model = model();
    model.save(&path).unwrap();

    let loaded = TrainedModel::load(&path).unwrap();
    let trip = record(City::Delhi, City::Mumbai, Some(3.0), Airline::Indigo);
    assert_eq!(
        loaded.predict_with_uncertainty(&trip).unwrap(),
        model.predict_with_uncertainty(&trip).unwrap()
    );
    assert_eq!(loaded.version, "rf-fixture");
}
