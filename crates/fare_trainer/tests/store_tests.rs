//! Train-or-load lifecycle against real files on disk

use fare_core::{CabinClass, City, Stops, TripInput};
use fare_trainer::{ForestConfig, ModelPaths, ModelStore, TrainerError};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

const HEADER: &str =
    ",airline,flight,source_city,departure_time,stops,arrival_time,destination_city,class,duration,days_left,price";

const AIRLINES: [&str; 4] = ["Vistara", "Air_India", "Indigo", "SpiceJet"];
const ROUTES: [(&str, &str, f64); 3] = [
    ("Delhi", "Mumbai", 2.0),
    ("Mumbai", "Bangalore", 1.5),
    ("Kolkata", "Chennai", 2.5),
];

/// Synthetic history where price grows with duration and class
fn write_dataset(path: &Path, price_scale: f64) {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for i in 0..90usize {
        let (source, destination, base) = ROUTES[i % ROUTES.len()];
        let airline = AIRLINES[i % AIRLINES.len()];
        let class = if i % 5 == 0 { "Business" } else { "Economy" };
        let stops = ["zero", "one", "two_or_more"][i % 3];
        let duration = base + (i % 4) as f64 * 0.5;
        let days_left = 1 + i % 45;
        let mut price = 3000.0 + duration * 800.0 - days_left as f64 * 20.0;
        if class == "Business" {
            price *= 6.0;
        }
        price *= price_scale;
        writeln!(
            csv,
            "{i},{airline},XX-{i},{source},Morning,{stops},Evening,{destination},{class},{duration},{days_left},{price:.0}"
        )
        .unwrap();
    }
    fs::write(path, csv).unwrap();
}

fn set_mtime(path: &Path, time: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

fn config() -> ForestConfig {
    ForestConfig {
        n_trees: 12,
        ..ForestConfig::default()
    }
}

fn delhi_mumbai() -> TripInput {
    TripInput {
        source_city: City::Delhi,
        destination_city: City::Mumbai,
        cabin_class: CabinClass::Economy,
        stops: Stops::Zero,
        days_left: 10,
        duration: None,
        airline: None,
        departure_time: None,
        arrival_time: None,
    }
}

#[test]
fn first_call_trains_and_persists() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("Clean_Dataset.csv");
    write_dataset(&dataset, 1.0);

    let store = ModelStore::new(ModelPaths::beside_dataset(&dataset), config());
    assert!(store.get().is_none());

    let model = store.load_or_train().unwrap();
    assert!(model.version.starts_with("rf-"));
    assert!(dir.path().join("model").join("fare_model.bin").exists());
    assert!(store.paths().artifact_is_fresh());
}

#[test]
fn repeated_calls_share_one_model() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("flights.csv");
    write_dataset(&dataset, 1.0);

    let store = ModelStore::new(ModelPaths::beside_dataset(&dataset), config());
    let first = store.load_or_train().unwrap();
    let second = store.load_or_train().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn concurrent_first_calls_train_once() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("flights.csv");
    write_dataset(&dataset, 1.0);

    let store = Arc::new(ModelStore::new(
        ModelPaths::beside_dataset(&dataset),
        config(),
    ));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.load_or_train().unwrap())
        })
        .collect();
    let models: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    for model in &models[1..] {
        assert!(Arc::ptr_eq(&models[0], model));
    }
    assert!(Arc::ptr_eq(&models[0], &store.get().unwrap()));
}

#[test]
fn fresh_store_loads_the_same_version() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("flights.csv");
    write_dataset(&dataset, 1.0);
    let paths = ModelPaths::beside_dataset(&dataset);

    let trained = ModelStore::new(paths.clone(), config()).load_or_train().unwrap();
    let loaded = ModelStore::new(paths, config()).load_or_train().unwrap();

    assert_eq!(trained.version, loaded.version);
    assert_eq!(
        trained.forest.hash_hex().unwrap(),
        loaded.forest.hash_hex().unwrap()
    );
}

#[test]
fn newer_dataset_triggers_retraining() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("flights.csv");
    write_dataset(&dataset, 1.0);
    let paths = ModelPaths::beside_dataset(&dataset);

    let before = ModelStore::new(paths.clone(), config()).load_or_train().unwrap();
    let old_price = before.predict(&delhi_mumbai()).unwrap().predicted_price;

    write_dataset(&dataset, 10.0);
    set_mtime(&dataset, SystemTime::now() + Duration::from_secs(60));
    assert!(!paths.artifact_is_fresh());

    let after = ModelStore::new(paths, config()).load_or_train().unwrap();
    let new_price = after.predict(&delhi_mumbai()).unwrap().predicted_price;
    assert!(new_price > old_price * 5.0);
}

#[test]
fn corrupt_artifact_is_fatal() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("flights.csv");
    write_dataset(&dataset, 1.0);
    set_mtime(&dataset, SystemTime::now() - Duration::from_secs(3600));

    let paths = ModelPaths::beside_dataset(&dataset);
    fs::create_dir_all(paths.artifact.parent().unwrap()).unwrap();
    fs::write(&paths.artifact, b"not a model").unwrap();

    let err = ModelStore::new(paths, config()).load_or_train().unwrap_err();
    assert!(matches!(err, TrainerError::Model(_)));
}

#[test]
fn missing_dataset_without_artifact_fails() {
    let dir = tempdir().unwrap();
    let store = ModelStore::new(
        ModelPaths::beside_dataset(dir.path().join("absent.csv")),
        config(),
    );
    assert!(matches!(
        store.load_or_train(),
        Err(TrainerError::Dataset(_))
    ));
}

#[test]
fn end_to_end_prediction_with_defaults() {
    let dir = tempdir().unwrap();
    let dataset = dir.path().join("flights.csv");
    write_dataset(&dataset, 1.0);

    let model = ModelStore::new(ModelPaths::beside_dataset(&dataset), config())
        .load_or_train()
        .unwrap();
    let result = model.predict(&delhi_mumbai()).unwrap();

    assert!(result.predicted_price > 0.0);
    assert!(result.lower_bound <= result.predicted_price);
    assert!(result.predicted_price <= result.upper_bound);
    assert_eq!(result.assumptions_used["duration"].method, "route_median");
    assert_eq!(result.assumptions_used["airline"].method, "default_unknown");
    assert!(result.top_contributors.len() <= 5);
}
