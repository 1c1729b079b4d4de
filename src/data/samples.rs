//! The constant sample datasets every notebook cell reads from.

use super::frame::DataFrame;
use super::model::Value;
use super::series::Series;

const NAN: f64 = f64::NAN;

/// Eight integers, nothing missing.
pub fn numbers() -> Series {
    Series::from_i64("numbers", &[3, 1, 4, 1, 5, 9, 2, 6])
}

/// The same eight readings with the third one missing.
pub fn with_missing() -> Series {
    Series::from_f64("with_missing", &[3.0, 1.0, NAN, 1.0, 5.0, 9.0, 2.0, 6.0])
}

/// Eight text labels.
pub fn labels() -> Series {
    Series::from_strs(
        "labels",
        &["red", "green", "blue", "green", "red", "red", "yellow", "blue"],
    )
}

fn ints(xs: &[i64]) -> Vec<Value> {
    xs.iter().map(|&x| Value::Integer(x)).collect()
}

fn floats(xs: &[f64]) -> Vec<Value> {
    xs.iter().map(|&x| Value::float(x)).collect()
}

fn texts(xs: &[&str]) -> Vec<Value> {
    xs.iter().map(|&x| Value::from(x)).collect()
}

fn frame(columns: Vec<(&str, Vec<Value>)>) -> DataFrame {
    DataFrame::from_columns(columns).unwrap_or_else(|e| {
        log::error!("invalid sample frame: {e}");
        DataFrame::empty()
    })
}

/// Two numeric columns.
pub fn table() -> DataFrame {
    frame(vec![("A", ints(&[1, 2, 3, 4])), ("B", ints(&[10, 20, 30, 40]))])
}

/// Two numeric columns, one cell missing in `B`.
pub fn table_missing() -> DataFrame {
    frame(vec![
        ("A", ints(&[1, 2, 3, 4])),
        ("B", floats(&[10.0, NAN, 30.0, 40.0])),
    ])
}

/// Text, numeric with a missing value, and numeric columns.
pub fn mixed() -> DataFrame {
    frame(vec![
        ("name", texts(&["Ann", "Bob", "Ann", "Dee"])),
        ("age", floats(&[28.0, NAN, 35.0, 41.0])),
        ("score", floats(&[88.5, 92.0, 79.5, 95.0])),
    ])
}

/// Every dataset by name, series first.
pub fn catalogue() -> Vec<(&'static str, DataFrame)> {
    let series = [
        ("numbers", numbers()),
        ("with_missing", with_missing()),
        ("labels", labels()),
    ];
    let mut out: Vec<(&'static str, DataFrame)> = series
        .into_iter()
        .map(|(name, s)| (name, frame(vec![(name, s.values().to_vec())])))
        .collect();
    out.push(("table", table()));
    out.push(("table_missing", table_missing()));
    out.push(("mixed", mixed()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::DType;

    #[test]
    fn dataset_shapes() {
        assert_eq!(numbers().len(), 8);
        assert_eq!(with_missing().count(), 7);
        assert_eq!(labels().dtype(), DType::Object);
        assert_eq!(table().shape(), (4, 2));
        assert_eq!(table_missing().column("B").unwrap().dtype(), DType::Float64);
        assert_eq!(mixed().shape(), (4, 3));
    }

    #[test]
    fn catalogue_lists_all_six() {
        let names: Vec<&str> = catalogue().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec!["numbers", "with_missing", "labels", "table", "table_missing", "mixed"]
        );
    }
}
