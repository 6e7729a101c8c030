use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float64Array};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Column, Tuple};

// ---------------------------------------------------------------------------
// LoadedTable – what ingestion hands to the data model
// ---------------------------------------------------------------------------

/// A parsed numeric table, ready for
/// [`DataModel::set_data`](crate::state::DataModel::set_data).
#[derive(Debug, Clone, Default)]
pub struct LoadedTable {
    pub tuples: Vec<Tuple>,
    pub columns: Vec<Column>,
    /// Rows dropped because a cell was missing or not a number.
    pub skipped_rows: usize,
}

impl LoadedTable {
    fn new(names: Vec<String>) -> Self {
        Self {
            tuples: Vec::new(),
            columns: names.into_iter().map(Column::new).collect(),
            skipped_rows: 0,
        }
    }

    fn skip(&mut self, reason: std::fmt::Arguments<'_>) {
        log::warn!("{reason}; row skipped");
        self.skipped_rows += 1;
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a numeric table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row of column names, one numeric cell per column
/// * `.json`    – `[{ "a": 1.0, "b": 2.0 }, ...]`
/// * `.parquet` – every numeric column becomes a table column
pub fn load_file(path: &Path) -> Result<LoadedTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" | "txt" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "Loaded {} tuples x {} columns from {} ({} rows skipped)",
        table.tuples.len(),
        table.columns.len(),
        path.display(),
        table.skipped_rows
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one number per cell.
/// Rows with a non-numeric cell or the wrong number of cells are skipped.
pub fn load_csv(path: &Path) -> Result<LoadedTable> {
    let (names, records) = read_csv_records(path)?;
    let mut table = LoadedTable::new(names);
    for (row_no, record) in records.iter().enumerate() {
        push_csv_row(&mut table, record, row_no);
    }
    Ok(table)
}

/// Load a random `fraction` of the CSV rows.
///
/// Rows are chosen before parsing, so skipped rows reduce the sample. The
/// same `seed` always picks the same rows.
pub fn load_csv_sample(path: &Path, fraction: f64, seed: u64) -> Result<LoadedTable> {
    if !(0.0..=1.0).contains(&fraction) {
        bail!("sample fraction must lie in [0, 1], got {fraction}");
    }
    let (names, records) = read_csv_records(path)?;

    let total = records.len();
    let sample_size = (fraction * total as f64) as usize;
    log::debug!("sampling {sample_size} of {total} CSV rows");

    let mut rng = fastrand::Rng::with_seed(seed);
    let mut order: Vec<usize> = (0..total).collect();
    rng.shuffle(&mut order);
    let chosen: BTreeSet<usize> = order.into_iter().take(sample_size).collect();

    let mut table = LoadedTable::new(names);
    for row_no in chosen {
        push_csv_row(&mut table, &records[row_no], row_no);
    }
    Ok(table)
}

fn read_csv_records(path: &Path) -> Result<(Vec<String>, Vec<csv::StringRecord>)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;
    let names: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if names.is_empty() {
        bail!("CSV file has no header columns");
    }

    let records = reader
        .records()
        .enumerate()
        .map(|(row_no, r)| r.with_context(|| format!("CSV row {row_no}")))
        .collect::<Result<Vec<_>>>()?;
    Ok((names, records))
}

fn push_csv_row(table: &mut LoadedTable, record: &csv::StringRecord, row_no: usize) {
    let expected = table.columns.len();
    if record.len() != expected {
        table.skip(format_args!(
            "CSV row {row_no}: {} cells, expected {expected}",
            record.len()
        ));
        return;
    }
    let parsed: Result<Vec<f64>, _> = record.iter().map(|cell| cell.parse::<f64>()).collect();
    match parsed {
        Ok(values) => table.tuples.push(Tuple::new(values)),
        Err(e) => table.skip(format_args!("CSV row {row_no}: {e}")),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "depth": 12.5, "magnitude": 3.1 },
///   { "depth": 40.0, "magnitude": 4.7 }
/// ]
/// ```
///
/// The columns are the keys of the first record, in sorted key order.
fn load_json(path: &Path) -> Result<LoadedTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let first = records
        .first()
        .and_then(|r| r.as_object())
        .context("Expected at least one JSON object record")?;
    let mut names: Vec<String> = first.keys().cloned().collect();
    names.sort();

    let mut table = LoadedTable::new(names.clone());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let values: Option<Vec<f64>> = names
            .iter()
            .map(|name| obj.get(name).and_then(JsonValue::as_f64))
            .collect();
        match values {
            Some(values) => table.tuples.push(Tuple::new(values)),
            None => table.skip(format_args!("JSON row {i}: missing or non-numeric field")),
        }
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Every integer or floating-point column becomes a
/// table column; other columns are ignored. Rows with a null in any numeric
/// column are skipped.
fn load_parquet(path: &Path) -> Result<LoadedTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    let numeric: Vec<(usize, String)> = schema
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, f)| is_numeric(f.data_type()))
        .map(|(i, f)| (i, f.name().clone()))
        .collect();
    if numeric.is_empty() {
        bail!("Parquet file has no numeric columns");
    }

    let reader = builder.build().context("building parquet reader")?;
    let mut table = LoadedTable::new(numeric.iter().map(|(_, n)| n.clone()).collect());
    let mut row_offset = 0;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let arrays: Vec<Float64Array> = numeric
            .iter()
            .map(|(idx, name)| {
                let casted = cast(batch.column(*idx), &DataType::Float64)
                    .with_context(|| format!("casting column '{name}' to Float64"))?;
                casted
                    .as_any()
                    .downcast_ref::<Float64Array>()
                    .cloned()
                    .with_context(|| format!("column '{name}' is not Float64 after cast"))
            })
            .collect::<Result<_>>()?;

        for row in 0..batch.num_rows() {
            if arrays.iter().any(|a| a.is_null(row)) {
                table.skip(format_args!("Parquet row {}: null value", row_offset + row));
                continue;
            }
            table
                .tuples
                .push(Tuple::new(arrays.iter().map(|a| a.value(row)).collect()));
        }
        row_offset += batch.num_rows();
    }

    Ok(table)
}

fn is_numeric(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}
