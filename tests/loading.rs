use std::io::Write;

use rusty_eden::data::loader::load_csv_sample;
use rusty_eden::{load_file, ColumnId, DataModel, ModelConfig};

fn csv_fixture(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("profile.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "depth,temperature,salinity").unwrap();
    for i in 0..20 {
        let depth = i as f64 * 10.0;
        writeln!(file, "{depth},{},{}", 20.0 - depth / 20.0, 34.0 + depth / 100.0).unwrap();
    }
    writeln!(file, "oops,1,2").unwrap();
    path
}

#[test]
fn csv_into_model_and_query() {
    let dir = tempfile::tempdir().unwrap();
    let table = load_file(&csv_fixture(&dir)).unwrap();
    assert_eq!(table.tuples.len(), 20);
    assert_eq!(table.skipped_rows, 1);

    let config = ModelConfig {
        histogram_bins: 4,
        ..Default::default()
    };
    let mut model = DataModel::with_config(config).unwrap();
    model.set_data(table.tuples, table.columns).unwrap();

    let depth = model.column_by_name("depth").unwrap();
    assert_eq!(depth.id(), ColumnId(0));
    assert_eq!(depth.full().histogram.counts(), &[5, 5, 5, 5]);

    model.set_query_range(ColumnId(0), 0.0, 45.0).unwrap();
    model.set_queried_tuples();
    assert_eq!(model.queried_tuple_count(), 5);
    let temperature = model.column_by_name("temperature").unwrap();
    assert_eq!(temperature.query().histogram.counts(), &[0, 0, 0, 5]);
}

#[test]
fn sampled_csv_is_a_subset() {
    let dir = tempfile::tempdir().unwrap();
    let path = csv_fixture(&dir);
    let full = load_file(&path).unwrap();
    let half = load_csv_sample(&path, 0.5, 3).unwrap();

    assert!(half.tuples.len() <= 11);
    assert!(half
        .tuples
        .iter()
        .all(|t| full.tuples.iter().any(|f| f.values() == t.values())));
    assert!(load_csv_sample(&path, 1.5, 3).is_err());
}
