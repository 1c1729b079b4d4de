use std::collections::BTreeSet;

use serde::Serialize;

use super::filter::{selected_columns, ColumnSelector};
use super::model::{DType, Value};
use super::series::{range_index, Series};
use super::stats::{Agg, AggOptions, Axis, CumOp};
use crate::error::{Result, StatsError};

// ---------------------------------------------------------------------------
// DataFrame – named columns over one shared row index
// ---------------------------------------------------------------------------

/// An ordered collection of equally long, uniquely named columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataFrame {
    index: Vec<String>,
    columns: Vec<Series>,
}

impl DataFrame {
    /// Build a frame with a positional index from `(name, values)` pairs.
    pub fn from_columns<N: Into<String>>(columns: Vec<(N, Vec<Value>)>) -> Result<Self> {
        let len = columns.first().map_or(0, |(_, v)| v.len());
        Self::with_index(range_index(len), columns)
    }

    /// Build a frame over explicit row labels.
    pub fn with_index<N: Into<String>>(
        index: Vec<String>,
        columns: Vec<(N, Vec<Value>)>,
    ) -> Result<Self> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            let name: String = name.into();
            if !seen.insert(name.clone()) {
                return Err(StatsError::DuplicateColumn(name));
            }
            out.push(Series::with_index(Some(name), index.clone(), values)?);
        }
        Ok(DataFrame {
            index,
            columns: out,
        })
    }

    /// A frame with no rows and no columns.
    pub fn empty() -> Self {
        DataFrame {
            index: Vec::new(),
            columns: Vec::new(),
        }
    }

    /// Reassemble a frame from series that already share `index`.
    fn from_series(index: Vec<String>, columns: Vec<Series>) -> Result<Self> {
        let pairs: Vec<(String, Vec<Value>)> = columns
            .into_iter()
            .map(|s| (s.name().unwrap_or_default().to_string(), s.values().to_vec()))
            .collect();
        Self::with_index(index, pairs)
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn columns(&self) -> &[Series] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.name().unwrap_or_default().to_string())
            .collect()
    }

    pub fn column(&self, name: &str) -> Result<&Series> {
        self.columns
            .iter()
            .find(|c| c.name() == Some(name))
            .ok_or_else(|| StatsError::ColumnNotFound(name.to_string()))
    }

    pub fn dtypes(&self) -> Vec<(String, DType)> {
        self.columns
            .iter()
            .map(|c| (c.name().unwrap_or_default().to_string(), c.dtype()))
            .collect()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.index.len(), self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty() || self.columns.is_empty()
    }

    /// One row as a series indexed by column name.
    pub fn row(&self, i: usize) -> Option<Series> {
        let label = self.index.get(i)?;
        self.row_of(i, label.clone(), &(0..self.columns.len()).collect::<Vec<_>>())
            .ok()
    }

    fn row_of(&self, i: usize, label: String, cols: &[usize]) -> Result<Series> {
        let names = cols
            .iter()
            .map(|&c| self.columns[c].name().unwrap_or_default().to_string())
            .collect();
        let values = cols
            .iter()
            .map(|&c| self.columns[c].values()[i].clone())
            .collect();
        Series::with_index(Some(label), names, values)
    }

    /// A row prepared for reducing across columns. When every selected
    /// column is numeric-like, booleans become 0/1 so the row is Int64 or
    /// Float64 rather than a mix of kinds.
    fn arithmetic_row(&self, i: usize, label: String, cols: &[usize]) -> Result<Series> {
        let row = self.row_of(i, label, cols)?;
        if !cols.iter().all(|&c| self.columns[c].dtype().is_numeric_like()) {
            return Ok(row);
        }
        let values = row
            .values()
            .iter()
            .map(|v| match v {
                Value::Bool(b) => Value::Integer(i64::from(*b)),
                other => other.clone(),
            })
            .collect();
        Series::with_index(row.name().map(String::from), row.index().to_vec(), values)
    }

    /// Sub-frame of the named columns, in the requested order.
    pub fn select(&self, names: &[&str]) -> Result<DataFrame> {
        let selector = ColumnSelector::Named(names.iter().map(|n| n.to_string()).collect());
        self.subset(&selected_columns(self, &selector)?)
    }

    pub(crate) fn subset(&self, cols: &[usize]) -> Result<DataFrame> {
        let columns = cols.iter().map(|&c| self.columns[c].clone()).collect();
        Self::from_series(self.index.clone(), columns)
    }

    // -----------------------------------------------------------------------
    // Aggregates
    // -----------------------------------------------------------------------

    pub fn count(&self) -> Result<Series> {
        self.agg(Agg::Count, &AggOptions::default())
    }

    pub fn sum(&self) -> Result<Series> {
        self.agg(Agg::Sum, &AggOptions::default())
    }

    pub fn prod(&self) -> Result<Series> {
        self.agg(Agg::Prod, &AggOptions::default())
    }

    pub fn mean(&self) -> Result<Series> {
        self.agg(Agg::Mean, &AggOptions::default())
    }

    pub fn median(&self) -> Result<Series> {
        self.agg(Agg::Median, &AggOptions::default())
    }

    pub fn min(&self) -> Result<Series> {
        self.agg(Agg::Min, &AggOptions::default())
    }

    pub fn max(&self) -> Result<Series> {
        self.agg(Agg::Max, &AggOptions::default())
    }

    pub fn std(&self) -> Result<Series> {
        self.agg(Agg::Std, &AggOptions::default())
    }

    pub fn var(&self) -> Result<Series> {
        self.agg(Agg::Var, &AggOptions::default())
    }

    /// Columns an aggregate runs over; without `numeric_only` a text column
    /// under a numbers-only aggregate is an error naming that column.
    fn agg_columns(
        &self,
        op: &'static str,
        requires_numeric: bool,
        numeric_only: bool,
    ) -> Result<Vec<usize>> {
        let cols = selected_columns(self, &ColumnSelector::for_numeric_only(numeric_only))?;
        if requires_numeric {
            if let Some(&c) = cols.iter().find(|&&c| self.columns[c].dtype() == DType::Object) {
                return Err(StatsError::NonNumeric {
                    op,
                    column: self.columns[c].name().unwrap_or_default().to_string(),
                });
            }
        }
        Ok(cols)
    }

    /// Reduce along `opts.axis`: one value per column (`Axis::Index`) or one
    /// value per row (`Axis::Columns`).
    pub fn agg(&self, agg: Agg, opts: &AggOptions) -> Result<Series> {
        let cols = self.agg_columns(agg.name(), agg.requires_numeric(), opts.numeric_only)?;
        match opts.axis {
            Axis::Index => {
                let mut names = Vec::with_capacity(cols.len());
                let mut values = Vec::with_capacity(cols.len());
                for &c in &cols {
                    let col = &self.columns[c];
                    names.push(col.name().unwrap_or_default().to_string());
                    values.push(col.agg(agg, opts)?);
                }
                Series::with_index(None, names, values)
            }
            Axis::Columns => {
                let mut values = Vec::with_capacity(self.index.len());
                for (i, label) in self.index.iter().enumerate() {
                    let row = self.arithmetic_row(i, label.clone(), &cols)?;
                    values.push(row.agg(agg, opts)?);
                }
                Series::with_index(None, self.index.clone(), values)
            }
        }
    }

    /// Quantile of each column.
    pub fn quantile(&self, q: f64, numeric_only: bool) -> Result<Series> {
        if !(0.0..=1.0).contains(&q) {
            return Err(StatsError::InvalidQuantile(q));
        }
        let cols = self.agg_columns("quantile", true, numeric_only)?;
        let mut names = Vec::with_capacity(cols.len());
        let mut values = Vec::with_capacity(cols.len());
        for &c in &cols {
            let col = &self.columns[c];
            names.push(col.name().unwrap_or_default().to_string());
            values.push(col.quantile(q)?);
        }
        Series::with_index(Some(format!("{q}")), names, values)
    }

    /// Row label of each column's minimum.
    pub fn idxmin(&self) -> Result<Series> {
        self.per_column_label(Series::idxmin)
    }

    /// Row label of each column's maximum.
    pub fn idxmax(&self) -> Result<Series> {
        self.per_column_label(Series::idxmax)
    }

    fn per_column_label(&self, f: fn(&Series) -> Result<String>) -> Result<Series> {
        let names = self.column_names();
        let values = self
            .columns
            .iter()
            .map(|c| f(c).map(Value::String))
            .collect::<Result<Vec<_>>>()?;
        Series::with_index(None, names, values)
    }

    /// Mode of every column; shorter columns are padded with missing values.
    pub fn mode(&self, dropna: bool) -> Result<DataFrame> {
        let modes: Vec<Series> = self.columns.iter().map(|c| c.mode(dropna)).collect();
        let len = modes.iter().map(Series::len).max().unwrap_or(0);
        let columns: Vec<(String, Vec<Value>)> = self
            .columns
            .iter()
            .zip(modes)
            .map(|(col, m)| {
                let mut values = m.values().to_vec();
                values.resize(len, Value::Null);
                (col.name().unwrap_or_default().to_string(), values)
            })
            .collect();
        Self::with_index(range_index(len), columns)
    }

    // -----------------------------------------------------------------------
    // Cumulative functions
    // -----------------------------------------------------------------------

    pub fn cumsum(&self) -> Result<DataFrame> {
        self.cum(CumOp::Sum, &AggOptions::default())
    }

    pub fn cumprod(&self) -> Result<DataFrame> {
        self.cum(CumOp::Prod, &AggOptions::default())
    }

    pub fn cummin(&self) -> Result<DataFrame> {
        self.cum(CumOp::Min, &AggOptions::default())
    }

    pub fn cummax(&self) -> Result<DataFrame> {
        self.cum(CumOp::Max, &AggOptions::default())
    }

    /// Running scan down each column (`Axis::Index`) or left to right
    /// across each row (`Axis::Columns`).
    pub fn cum(&self, op: CumOp, opts: &AggOptions) -> Result<DataFrame> {
        let cols = self.agg_columns(op.name(), op.requires_numeric(), opts.numeric_only)?;
        match opts.axis {
            Axis::Index => {
                let columns = cols
                    .iter()
                    .map(|&c| self.columns[c].cum(op, opts.skipna))
                    .collect::<Result<Vec<_>>>()?;
                Self::from_series(self.index.clone(), columns)
            }
            Axis::Columns => {
                let mut scanned: Vec<Vec<Value>> =
                    vec![Vec::with_capacity(self.index.len()); cols.len()];
                for (i, label) in self.index.iter().enumerate() {
                    let row = self
                        .arithmetic_row(i, label.clone(), &cols)?
                        .cum(op, opts.skipna)?;
                    for (slot, v) in scanned.iter_mut().zip(row.values()) {
                        slot.push(v.clone());
                    }
                }
                let columns: Vec<(String, Vec<Value>)> = cols
                    .iter()
                    .zip(scanned)
                    .map(|(&c, values)| {
                        let name = self.columns[c].name().unwrap_or_default().to_string();
                        (name, values)
                    })
                    .collect();
                Self::with_index(self.index.clone(), columns)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::samples;

    fn ints(xs: &[i64]) -> Vec<Value> {
        xs.iter().map(|&x| Value::Integer(x)).collect()
    }

    #[test]
    fn construction_checks_shape_and_names() {
        let dup = DataFrame::from_columns(vec![("A", ints(&[1])), ("A", ints(&[2]))]);
        assert_eq!(dup, Err(StatsError::DuplicateColumn("A".into())));

        let ragged = DataFrame::from_columns(vec![("A", ints(&[1, 2])), ("B", ints(&[3]))]);
        assert!(matches!(ragged, Err(StatsError::LengthMismatch { .. })));

        let table = samples::table();
        assert_eq!(table.shape(), (4, 2));
        assert_eq!(table.column_names(), vec!["A", "B"]);
        assert!(table.column("C").is_err());
    }

    #[test]
    fn column_and_row_sums() {
        let table = samples::table();
        let by_column = table.sum().unwrap();
        assert_eq!(by_column.index(), &["A", "B"]);
        assert_eq!(by_column.values(), ints(&[10, 100]).as_slice());

        let by_row = table
            .agg(Agg::Sum, &AggOptions::default().axis(Axis::Columns))
            .unwrap();
        assert_eq!(by_row.index(), &["0", "1", "2", "3"]);
        assert_eq!(by_row.values(), ints(&[11, 22, 33, 44]).as_slice());

        assert_eq!(
            table.mean().unwrap().values(),
            &[Value::Float(2.5), Value::Float(25.0)]
        );
    }

    #[test]
    fn missing_cells_in_frames() {
        let table = samples::table_missing();
        let sums = table.sum().unwrap();
        assert_eq!(sums.get("B"), Some(&Value::Float(80.0)));

        let row_means = table
            .agg(Agg::Mean, &AggOptions::default().axis(Axis::Columns))
            .unwrap();
        assert_eq!(
            row_means.values(),
            &[
                Value::Float(5.5),
                Value::Float(2.0),
                Value::Float(16.5),
                Value::Float(22.0)
            ]
        );

        let strict = AggOptions::default().axis(Axis::Columns).skipna(false);
        let row_means = table.agg(Agg::Mean, &strict).unwrap();
        assert_eq!(row_means.values()[1], Value::Null);
        assert_eq!(table.count().unwrap().values(), ints(&[4, 3]).as_slice());
    }

    #[test]
    fn numeric_only_on_mixed_frames() {
        let mixed = samples::mixed();
        assert_eq!(
            mixed.mean(),
            Err(StatsError::NonNumeric {
                op: "mean",
                column: "name".into()
            })
        );

        let means = mixed
            .agg(Agg::Mean, &AggOptions::default().numeric_only(true))
            .unwrap();
        assert_eq!(means.index(), &["age", "score"]);
        assert_eq!(means.get("score"), Some(&Value::Float(88.75)));

        // Count and max do not need numbers.
        assert_eq!(mixed.count().unwrap().values(), ints(&[4, 3, 4]).as_slice());
        assert_eq!(mixed.max().unwrap().get("name"), Some(&Value::from("Dee")));
    }

    #[test]
    fn row_reductions_over_boolean_columns() {
        let flags = DataFrame::from_columns(vec![
            ("flag", vec![Value::Bool(true), Value::Bool(false)]),
            ("n", ints(&[3, 4])),
        ])
        .unwrap();
        let rows = AggOptions::default().axis(Axis::Columns).numeric_only(true);
        assert_eq!(flags.agg(Agg::Sum, &rows).unwrap().values(), ints(&[4, 4]).as_slice());
        assert_eq!(
            flags.agg(Agg::Mean, &rows).unwrap().values(),
            &[Value::Float(2.0), Value::Float(2.0)]
        );
        let running = flags.cum(CumOp::Sum, &rows).unwrap();
        assert_eq!(running.column("n").unwrap().values(), ints(&[4, 4]).as_slice());

        let gappy = DataFrame::from_columns(vec![
            ("flag", vec![Value::Bool(true), Value::Null]),
            ("n", ints(&[3, 4])),
        ])
        .unwrap();
        let sums = gappy.agg(Agg::Sum, &AggOptions::default().numeric_only(true)).unwrap();
        assert_eq!(sums.index(), &["flag", "n"]);
        assert_eq!(sums.values(), ints(&[1, 7]).as_slice());
        assert_eq!(
            gappy.agg(Agg::Sum, &rows).unwrap().values(),
            &[Value::Float(4.0), Value::Float(4.0)]
        );
    }

    #[test]
    fn row_means_restricted_to_numbers() {
        let rows = AggOptions::default().axis(Axis::Columns).numeric_only(true);
        let means = samples::mixed().agg(Agg::Mean, &rows).unwrap();
        assert_eq!(
            means.values(),
            &[
                Value::Float(58.25),
                Value::Float(92.0),
                Value::Float(57.25),
                Value::Float(68.0)
            ]
        );
    }

    #[test]
    fn strict_scans_across_rows() {
        let frame = DataFrame::from_columns(vec![
            ("x", vec![Value::Null, Value::Float(1.0)]),
            ("y", ints(&[5, 2])),
        ])
        .unwrap();
        let strict = AggOptions::default().axis(Axis::Columns).skipna(false);
        let scanned = frame.cum(CumOp::Sum, &strict).unwrap();
        assert_eq!(scanned.column("y").unwrap().values(), &[Value::Null, Value::Float(3.0)]);

        let skipping = frame
            .cum(CumOp::Sum, &AggOptions::default().axis(Axis::Columns))
            .unwrap();
        assert_eq!(
            skipping.column("y").unwrap().values(),
            &[Value::Float(5.0), Value::Float(3.0)]
        );
    }

    #[test]
    fn cumulative_frames() {
        let table = samples::table();
        let down = table.cumsum().unwrap();
        assert_eq!(down.column("A").unwrap().values(), ints(&[1, 3, 6, 10]).as_slice());

        let across = table
            .cum(CumOp::Sum, &AggOptions::default().axis(Axis::Columns))
            .unwrap();
        assert_eq!(across.column("A").unwrap().values(), ints(&[1, 2, 3, 4]).as_slice());
        assert_eq!(across.column("B").unwrap().values(), ints(&[11, 22, 33, 44]).as_slice());

        let missing = samples::table_missing();
        let strict = missing
            .cum(CumOp::Max, &AggOptions::default().skipna(false))
            .unwrap();
        let b = strict.column("B").unwrap();
        assert_eq!(b.values()[0], Value::Float(10.0));
        assert!(b.values()[1..].iter().all(Value::is_null));

        assert!(samples::mixed().cumprod().is_err());
    }

    #[test]
    fn quantiles_modes_and_labels() {
        let table = samples::table();
        let q = table.quantile(0.5, false).unwrap();
        assert_eq!(q.values(), &[Value::Float(2.5), Value::Float(25.0)]);
        assert!(samples::mixed().quantile(0.5, false).is_err());
        let text_only = samples::mixed().select(&["name"]).unwrap();
        assert_eq!(text_only.quantile(1.5, true), Err(StatsError::InvalidQuantile(1.5)));

        let modes = samples::mixed().mode(true).unwrap();
        assert_eq!(modes.column("name").unwrap().values()[0], Value::from("Ann"));
        assert_eq!(modes.shape().0, 4);

        let idx = table.idxmax().unwrap();
        assert_eq!(idx.values(), &[Value::from("3"), Value::from("3")]);
    }

    #[test]
    fn rows_and_selection() {
        let mixed = samples::mixed();
        let row = mixed.row(0).unwrap();
        assert_eq!(row.name(), Some("0"));
        assert_eq!(row.index(), &["name", "age", "score"]);
        assert!(mixed.row(9).is_none());

        let picked = mixed.select(&["score", "age"]).unwrap();
        assert_eq!(picked.column_names(), vec!["score", "age"]);
    }
}
