use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const ROWS: usize = 500;
const SEED: u64 = 42;

/// Box-Muller transform for normal distribution
fn gauss(rng: &mut fastrand::Rng, mean: f64, std_dev: f64) -> f64 {
    let u1 = rng.f64().max(1e-15);
    let u2 = rng.f64();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

/// Ocean-profile style table: several columns driven by depth, one
/// near-duplicate of temperature and one pure noise column.
fn generate(rng: &mut fastrand::Rng) -> (Vec<&'static str>, Vec<Vec<f64>>) {
    let names = vec![
        "depth",
        "temperature",
        "temperature_f",
        "salinity",
        "oxygen",
        "chlorophyll",
        "noise",
    ];
    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(ROWS); names.len()];

    for _ in 0..ROWS {
        let depth = rng.f64() * 1000.0;
        let temperature = 25.0 * (-depth / 400.0).exp() + 4.0 + gauss(rng, 0.0, 0.5);
        let temperature_f = temperature * 1.8 + 32.0 + gauss(rng, 0.0, 0.1);
        let salinity = 34.0 + 0.002 * depth + gauss(rng, 0.0, 0.15);
        let oxygen = 2.0 + 0.25 * temperature + gauss(rng, 0.0, 0.4);
        let chlorophyll = (1.5 * (-depth / 80.0).exp() + gauss(rng, 0.0, 0.05)).max(0.0);
        let noise = gauss(rng, 0.0, 1.0);

        let row = [
            depth,
            temperature,
            temperature_f,
            salinity,
            oxygen,
            chlorophyll,
            noise,
        ];
        for (column, value) in columns.iter_mut().zip(row) {
            column.push(value);
        }
    }
    (names, columns)
}

fn write_csv(path: &str, names: &[&str], columns: &[Vec<f64>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("Failed to create {path}"))?;
    writer.write_record(names)?;
    for row in 0..ROWS {
        writer.write_record(columns.iter().map(|c| format!("{:.6}", c[row])))?;
    }
    writer.flush().with_context(|| format!("Failed to write {path}"))?;
    Ok(())
}

fn write_parquet(path: &str, names: &[&str], columns: &[Vec<f64>]) -> Result<()> {
    let schema = Arc::new(Schema::new(
        names
            .iter()
            .map(|&name| Field::new(name, DataType::Float64, false))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|c| Arc::new(Float64Array::from(c.clone())) as ArrayRef)
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("Failed to create RecordBatch")?;

    let file = std::fs::File::create(path).with_context(|| format!("Failed to create {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("Failed to create writer")?;
    writer.write(&batch).context("Failed to write batch")?;
    writer.close().context("Failed to close writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = fastrand::Rng::with_seed(SEED);
    let (names, columns) = generate(&mut rng);

    write_csv("sample_data.csv", &names, &columns)?;
    write_parquet("sample_data.parquet", &names, &columns)?;

    println!(
        "Wrote {ROWS} rows x {} columns to sample_data.csv and sample_data.parquet",
        names.len()
    );
    Ok(())
}
