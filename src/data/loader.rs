use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
    UInt32Array, UInt64Array,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{REQUIRED_COLUMNS, ShowRecord, ShowTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the show table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` – header row with at least [`REQUIRED_COLUMNS`]
/// * `.json`         – `[{ "show_id": 1, "name": "...", ... }, ...]`
/// * `.parquet`      – flat columns with the same names
pub fn load_file(path: &Path) -> Result<ShowTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    Ok(ShowTable::from_rows(rows))
}

fn missing_columns(present: &[&str]) -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !present.contains(col))
        .collect()
}

// ---------------------------------------------------------------------------
// Delimited loader
// ---------------------------------------------------------------------------

/// Extra columns are ignored; an empty `spoken_language_name` cell is a
/// missing language.
fn load_delimited(path: &Path, delimiter: u8) -> Result<Vec<ShowRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = reader.headers().context("reading CSV headers")?.clone();
    let missing = missing_columns(&headers.iter().collect::<Vec<_>>());
    if !missing.is_empty() {
        bail!("CSV missing column(s): {}", missing.join(", "));
    }

    reader
        .deserialize::<ShowRecord>()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<ShowRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
            let missing = missing_columns(&keys);
            if !missing.is_empty() {
                bail!("Row {i}: missing column(s): {}", missing.join(", "));
            }
            ShowRecord::deserialize(rec).with_context(|| format!("Row {i}"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); integer and float columns may use
/// either width.
fn load_parquet(path: &Path) -> Result<Vec<ShowRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let missing = missing_columns(&names);
    if !missing.is_empty() {
        bail!("Parquet file missing column(s): {}", missing.join(", "));
    }

    let reader = builder.build().context("building parquet reader")?;
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        read_batch(&batch, &mut rows)?;
    }

    Ok(rows)
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Arc<dyn Array>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow!("Parquet batch missing '{name}' column"))?;
    Ok(batch.column(idx))
}

fn read_batch(batch: &RecordBatch, rows: &mut Vec<ShowRecord>) -> Result<()> {
    let col = |name: &str| column(batch, name);

    let show_id = col("show_id")?;
    let name = col("name")?;
    let genre = col("genre_name")?;
    let status = col("status_name")?;
    let network = col("network_name")?;
    let language = col("spoken_language_name")?;
    let seasons = col("number_of_seasons")?;
    let vote_average = col("vote_average")?;
    let vote_count = col("vote_count")?;
    let popularity = col("popularity")?;

    for row in 0..batch.num_rows() {
        let int = |arr: &Arc<dyn Array>, field: &str| {
            extract_i64(arr, row).with_context(|| format!("Row {row}: failed to read '{field}'"))
        };
        let float = |arr: &Arc<dyn Array>, field: &str| {
            extract_f64(arr, row).with_context(|| format!("Row {row}: failed to read '{field}'"))
        };
        let text = |arr: &Arc<dyn Array>, field: &str| {
            extract_string(arr, row)
                .and_then(|s| s.context("null value"))
                .with_context(|| format!("Row {row}: failed to read '{field}'"))
        };

        rows.push(ShowRecord {
            show_id: int(show_id, "show_id")?,
            name: text(name, "name")?,
            genre_name: text(genre, "genre_name")?,
            status_name: text(status, "status_name")?,
            network_name: text(network, "network_name")?,
            spoken_language_name: extract_string(language, row)
                .with_context(|| format!("Row {row}: failed to read 'spoken_language_name'"))?
                .filter(|s| !s.is_empty()),
            number_of_seasons: u32::try_from(int(seasons, "number_of_seasons")?)
                .with_context(|| format!("Row {row}: negative 'number_of_seasons'"))?,
            vote_average: float(vote_average, "vote_average")?,
            vote_count: u64::try_from(int(vote_count, "vote_count")?)
                .with_context(|| format!("Row {row}: negative 'vote_count'"))?,
            popularity: float(popularity, "popularity")?,
        });
    }
    Ok(())
}

// -- Parquet / Arrow helpers --

fn downcast<'a, T: 'static>(col: &'a Arc<dyn Array>) -> Result<&'a T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array for {:?}", col.data_type()))
}

fn extract_i64(col: &Arc<dyn Array>, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value in integer column");
    }
    match col.data_type() {
        DataType::Int32 => Ok(i64::from(downcast::<Int32Array>(col)?.value(row))),
        DataType::Int64 => Ok(downcast::<Int64Array>(col)?.value(row)),
        DataType::UInt32 => Ok(i64::from(downcast::<UInt32Array>(col)?.value(row))),
        DataType::UInt64 => i64::try_from(downcast::<UInt64Array>(col)?.value(row))
            .context("integer out of range"),
        // Pandas widens integer columns holding NaN to float.
        DataType::Float64 => {
            let v = downcast::<Float64Array>(col)?.value(row);
            if !v.is_finite() || v.fract() != 0.0 {
                bail!("non-integral value {v} in integer column");
            }
            Ok(v as i64)
        }
        other => bail!("Expected integer column, got {other:?}"),
    }
}

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in float column");
    }
    match col.data_type() {
        DataType::Float32 => Ok(f64::from(downcast::<Float32Array>(col)?.value(row))),
        DataType::Float64 => Ok(downcast::<Float64Array>(col)?.value(row)),
        DataType::Int32 | DataType::Int64 | DataType::UInt32 | DataType::UInt64 => {
            extract_i64(col, row).map(|v| v as f64)
        }
        other => bail!("Expected float column, got {other:?}"),
    }
}

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    match col.data_type() {
        DataType::Utf8 => Ok(Some(downcast::<StringArray>(col)?.value(row).to_string())),
        DataType::LargeUtf8 => Ok(Some(col.as_string::<i64>().value(row).to_string())),
        other => bail!("Expected string column, got {other:?}"),
    }
}
