use anyhow::Result;
use arrow::util::display::FormatOptions;
use arrow::util::pretty::pretty_format_batches_with_options;
use serde::Serialize;

use crate::data::columnar::to_record_batch;
use crate::data::frame::DataFrame;
use crate::data::model::Value;
use crate::data::series::Series;

// ---------------------------------------------------------------------------
// Cell output
// ---------------------------------------------------------------------------

/// What a notebook cell produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum Output {
    Scalar(Value),
    Series(Series),
    Frame(DataFrame),
    /// The call was rejected on purpose; the message is the point of the cell.
    Rejected(String),
}

impl From<Value> for Output {
    fn from(v: Value) -> Self {
        Output::Scalar(v)
    }
}

impl From<Series> for Output {
    fn from(s: Series) -> Self {
        Output::Series(s)
    }
}

impl From<DataFrame> for Output {
    fn from(f: DataFrame) -> Self {
        Output::Frame(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Aligned text tables.
    #[default]
    Table,
    Json,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render(output: &Output, format: Format) -> Result<String> {
    match format {
        Format::Table => render_table(output),
        Format::Json => Ok(serde_json::to_string_pretty(output)?),
    }
}

fn render_table(output: &Output) -> Result<String> {
    match output {
        Output::Scalar(v) => Ok(v.to_string()),
        Output::Series(s) => series_table(s),
        Output::Frame(f) => frame_table(f),
        Output::Rejected(msg) => Ok(format!("rejected: {msg}")),
    }
}

/// A series prints as a two-column table: row labels, then values.
pub fn series_table(series: &Series) -> Result<String> {
    let name = series.name().unwrap_or("value").to_string();
    let frame = DataFrame::with_index(
        series.index().to_vec(),
        vec![(name, series.values().to_vec())],
    )?;
    frame_table(&frame)
}

/// Missing cells print as `NaN`.
pub fn frame_table(frame: &DataFrame) -> Result<String> {
    let batch = to_record_batch(frame, true)?;
    let options = FormatOptions::default().with_null("NaN");
    Ok(pretty_format_batches_with_options(&[batch], &options)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::samples;

    #[test]
    fn scalars_print_plainly() {
        assert_eq!(render(&Value::Integer(31).into(), Format::Table).unwrap(), "31");
        assert_eq!(render(&Value::Null.into(), Format::Table).unwrap(), "NaN");
    }

    #[test]
    fn tables_show_labels_and_missing_values() {
        let text = render(&samples::with_missing().into(), Format::Table).unwrap();
        assert!(text.contains("with_missing"));
        assert!(text.contains("NaN"));
        assert!(text.contains("9.0"));

        let text = render(&samples::mixed().into(), Format::Table).unwrap();
        assert!(text.contains("name"));
        assert!(text.contains("Dee"));
    }

    #[test]
    fn json_is_tagged_by_kind() {
        let text = render(&Value::Float(3.875).into(), Format::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["kind"], "scalar");
        assert_eq!(parsed["data"], 3.875);

        let text = render(&Output::Rejected("nope".into()), Format::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["kind"], "rejected");
    }
}
