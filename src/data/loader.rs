use std::path::Path;

use anyhow::{bail, Context, Result};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::columnar::column_values;
use super::frame::DataFrame;
use super::model::Value;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – any mix of integer, float, boolean and string columns
/// * `.json`    – `[{ "col": value, ... }, ...]` (records orientation)
/// * `.csv`     – header row, one value per cell
pub fn load_file(path: &Path) -> Result<DataFrame> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let frame = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::debug!(
        "{}: {} rows, columns {:?}",
        path.display(),
        frame.shape().0,
        frame.column_names()
    );
    Ok(frame)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "name": "Ann", "age": 28,   "score": 88.5 },
///   { "name": "Bob", "age": null, "score": 92.0 }
/// ]
/// ```
///
/// Columns appear in first-seen order; a key absent from a record is a
/// missing value.
fn load_json(path: &Path) -> Result<DataFrame> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: Vec<(String, Vec<Value>)> = Vec::new();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        for key in obj.keys() {
            if !columns.iter().any(|(name, _)| name == key) {
                columns.push((key.clone(), vec![Value::Null; i]));
            }
        }
        for (name, values) in &mut columns {
            values.push(obj.get(name.as_str()).map_or(Value::Null, json_to_value));
        }
    }

    Ok(DataFrame::from_columns(columns)?)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row with column names, then one value per cell.
/// Empty cells, `NaN` and `NA` are missing values.
fn load_csv(path: &Path) -> Result<DataFrame> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields but found {}",
                headers.len(),
                record.len()
            );
        }
        for (col, value) in columns.iter_mut().zip(record.iter()) {
            col.push(guess_value(value));
        }
    }

    Ok(DataFrame::from_columns(
        headers.into_iter().zip(columns).collect(),
    )?)
}

fn guess_value(s: &str) -> Value {
    let s = s.trim();
    if s.is_empty() || s == "NaN" || s == "NA" {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::float(f);
    }
    if s == "true" || s == "false" {
        return Value::Bool(s == "true");
    }
    Value::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Every column must be an integer, float, boolean or
/// string column; record batches are concatenated in file order.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<DataFrame> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (i, values) in columns.iter_mut().enumerate() {
            let extracted = column_values(batch.column(i))
                .with_context(|| format!("column '{}'", names[i]))?;
            values.extend(extracted);
        }
    }

    Ok(DataFrame::from_columns(
        names.into_iter().zip(columns).collect(),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_cells_are_typed() {
        let file = write_temp(".csv", "name,age,score\nAnn,28,88.5\nBob,,92\n");
        let frame = load_file(file.path()).unwrap();
        assert_eq!(frame.column_names(), vec!["name", "age", "score"]);
        let age = frame.column("age").unwrap();
        assert_eq!(age.values(), &[Value::Float(28.0), Value::Null]);
        assert_eq!(age.count(), 1);
        let score = frame.column("score").unwrap();
        assert_eq!(score.values(), &[Value::Float(88.5), Value::Float(92.0)]);
    }

    #[test]
    fn ragged_csv_is_rejected() {
        let file = write_temp(".csv", "a,b\n1,2\n3\n");
        assert!(load_file(file.path()).is_err());
    }

    #[test]
    fn json_records_keep_key_order_and_fill_gaps() {
        let file = write_temp(
            ".json",
            r#"[{"b": 1, "a": "x"}, {"a": "y", "c": true}]"#,
        );
        let frame = load_file(file.path()).unwrap();
        assert_eq!(frame.column_names(), vec!["b", "a", "c"]);
        assert_eq!(
            frame.column("b").unwrap().values(),
            &[Value::Float(1.0), Value::Null]
        );
        assert_eq!(
            frame.column("c").unwrap().values(),
            &[Value::Null, Value::Bool(true)]
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_temp(".xlsx", "");
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension"));
    }

    #[test]
    fn missing_markers() {
        assert_eq!(guess_value("NaN"), Value::Null);
        assert_eq!(guess_value(" 7 "), Value::Integer(7));
        assert_eq!(guess_value("true"), Value::Bool(true));
        assert_eq!(guess_value("red"), Value::from("red"));
    }
}
