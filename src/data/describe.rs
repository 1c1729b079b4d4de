//! Summary tables (`describe`) for series and frames.

use super::filter::{selected_columns, ColumnSelector};
use super::frame::DataFrame;
use super::model::Value;
use super::series::Series;
use super::stats;
use crate::error::{Result, StatsError};

/// Which frame columns `describe` summarises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Include {
    /// Numeric columns; falls back to text columns when there are none.
    #[default]
    Numeric,
    Object,
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescribeOptions {
    /// Requested percentiles in `[0, 1]`. The median is always reported.
    pub percentiles: Vec<f64>,
    pub include: Include,
}

impl Default for DescribeOptions {
    fn default() -> Self {
        Self {
            percentiles: vec![0.25, 0.5, 0.75],
            include: Include::Numeric,
        }
    }
}

impl DescribeOptions {
    pub fn percentiles(mut self, percentiles: Vec<f64>) -> Self {
        self.percentiles = percentiles;
        self
    }

    pub fn include(mut self, include: Include) -> Self {
        self.include = include;
        self
    }

    /// Validated, sorted percentiles with the median added.
    pub fn normalized_percentiles(&self) -> Result<Vec<f64>> {
        let mut out = Vec::with_capacity(self.percentiles.len() + 1);
        for &p in &self.percentiles {
            if !(0.0..=1.0).contains(&p) {
                return Err(StatsError::InvalidPercentiles(format!(
                    "{p} is outside [0, 1]"
                )));
            }
            if out.contains(&p) {
                return Err(StatsError::InvalidPercentiles(
                    "percentiles cannot contain duplicates".to_string(),
                ));
            }
            out.push(p);
        }
        if !out.contains(&0.5) {
            out.push(0.5);
        }
        out.sort_by(f64::total_cmp);
        Ok(out)
    }
}

type Summary = Vec<(String, Value)>;

const OBJECT_ROWS: [&str; 4] = ["count", "unique", "top", "freq"];

fn numeric_rows(percentiles: &[f64]) -> Vec<String> {
    let mut rows: Vec<String> = ["count", "mean", "std", "min"]
        .into_iter()
        .map(String::from)
        .collect();
    rows.extend(percentiles.iter().map(|&p| stats::percentile_label(p)));
    rows.push("max".to_string());
    rows
}

/// `count, mean, std, min, <percentiles>, max` over the valid values.
fn numeric_summary(col: &Series, percentiles: &[f64]) -> Summary {
    let xs: Vec<f64> = col.values().iter().filter_map(Value::as_f64).collect();
    let sorted = stats::sorted(&xs);
    let mut values = vec![
        Value::Float(xs.len() as f64),
        stats::mean(&xs).into(),
        stats::std(&xs, 1).into(),
        sorted.first().copied().into(),
    ];
    values.extend(
        percentiles
            .iter()
            .map(|&p| Value::from(stats::quantile_sorted(&sorted, p))),
    );
    values.push(sorted.last().copied().into());
    numeric_rows(percentiles).into_iter().zip(values).collect()
}

/// `count, unique, top, freq`; `top` is the first-seen most frequent value.
fn object_summary(col: &Series) -> Summary {
    let counts = col.first_seen_counts();
    let mut top: Option<(Value, usize)> = None;
    for (v, c) in &counts {
        if top.as_ref().map_or(true, |(_, best)| c > best) {
            top = Some((v.clone(), *c));
        }
    }
    let (top, freq) = match top {
        Some((v, c)) => (v, Value::Integer(c as i64)),
        None => (Value::Null, Value::Null),
    };
    let values = [
        Value::Integer(col.count() as i64),
        Value::Integer(counts.len() as i64),
        top,
        freq,
    ];
    OBJECT_ROWS
        .iter()
        .map(|s| s.to_string())
        .zip(values)
        .collect()
}

fn summarise(col: &Series, percentiles: &[f64]) -> Summary {
    if col.dtype().is_numeric() {
        numeric_summary(col, percentiles)
    } else {
        object_summary(col)
    }
}

impl Series {
    /// Summary statistics: numeric series get count/mean/std/min/
    /// percentiles/max, everything else count/unique/top/freq.
    pub fn describe(&self, opts: &DescribeOptions) -> Result<Series> {
        let percentiles = opts.normalized_percentiles()?;
        let (index, values) = summarise(self, &percentiles).into_iter().unzip();
        Series::with_index(self.name().map(String::from), index, values)
    }
}

impl DataFrame {
    /// One summary column per described input column.
    ///
    /// With mixed column kinds (`Include::All`) the rows are the union
    /// `count, unique, top, freq, mean, std, min, <percentiles>, max`, and
    /// cells that do not apply to a column are missing.
    pub fn describe(&self, opts: &DescribeOptions) -> Result<DataFrame> {
        let percentiles = opts.normalized_percentiles()?;

        let cols = match opts.include {
            Include::Numeric => {
                let numeric = selected_columns(self, &ColumnSelector::Numeric)?;
                if numeric.is_empty() {
                    selected_columns(self, &ColumnSelector::Object)?
                } else {
                    numeric
                }
            }
            Include::Object => selected_columns(self, &ColumnSelector::Object)?,
            Include::All => selected_columns(self, &ColumnSelector::All)?,
        };
        if cols.is_empty() {
            return Err(StatsError::NoColumnsSelected);
        }

        let described: Vec<&Series> = cols.iter().map(|&c| &self.columns()[c]).collect();
        let any_numeric = described.iter().any(|c| c.dtype().is_numeric());
        let any_object = described.iter().any(|c| !c.dtype().is_numeric());

        let numeric = numeric_rows(&percentiles);
        let rows: Vec<String> = match (any_numeric, any_object) {
            (true, true) => {
                let mut rows = vec!["count".to_string()];
                rows.extend(OBJECT_ROWS[1..].iter().map(|s| s.to_string()));
                rows.extend(numeric.into_iter().skip(1));
                rows
            }
            (true, false) => numeric,
            _ => OBJECT_ROWS.iter().map(|s| s.to_string()).collect(),
        };

        let columns: Vec<(String, Vec<Value>)> = described
            .iter()
            .map(|col| {
                let summary = summarise(col, &percentiles);
                let values: Vec<Value> = rows
                    .iter()
                    .map(|row| {
                        summary
                            .iter()
                            .find(|(label, _)| label == row)
                            .map_or(Value::Null, |(_, v)| v.clone())
                    })
                    .collect();
                (col.name().unwrap_or_default().to_string(), values)
            })
            .collect();
        DataFrame::with_index(rows, columns)
    }
}
