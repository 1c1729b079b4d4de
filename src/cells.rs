use crate::data::describe::{DescribeOptions, Include};
use crate::data::frame::DataFrame;
use crate::data::model::Value;
use crate::data::series::Series;
use crate::data::stats::{Agg, AggOptions, Axis, CumOp};
use crate::error::Result;
use crate::render::Output;
use crate::state::SessionState;

// ---------------------------------------------------------------------------
// Notebook cells
// ---------------------------------------------------------------------------

/// One demonstration: prose for the reader and the computation it explains.
pub struct Cell {
    /// Short machine name used by `run --cell`.
    pub name: &'static str,
    pub title: &'static str,
    pub prose: &'static str,
    pub run: fn(&SessionState) -> Result<Output>,
}

/// Turn an expected failure into output the reader can see.
fn rejected<T: Into<Output>>(result: Result<T>) -> Output {
    match result {
        Ok(v) => v.into(),
        Err(e) => Output::Rejected(e.to_string()),
    }
}

fn labelled(name: &str, pairs: Vec<(&str, Value)>) -> Result<Series> {
    let (index, values) = pairs.into_iter().map(|(l, v)| (l.to_string(), v)).unzip();
    Series::with_index(Some(name.to_string()), index, values)
}

/// The notebook, in reading order.
pub fn cells() -> Vec<Cell> {
    vec![
        // ---- Aggregates on a clean series ----
        Cell {
            name: "sum_numbers",
            title: "Sum of a series",
            prose: "Adding up the eight integers gives a single integer.",
            run: |s| Ok(s.numbers.sum()?.into()),
        },
        Cell {
            name: "mean_numbers",
            title: "Mean of a series",
            prose: "The mean is always a float, even for integer data.",
            run: |s| Ok(s.numbers.mean()?.into()),
        },
        Cell {
            name: "max_numbers",
            title: "Maximum of a series",
            prose: "The largest value keeps the integer type of the series.",
            run: |s| Ok(s.numbers.max()?.into()),
        },
        // ---- Missing values ----
        Cell {
            name: "sum_with_missing",
            title: "Missing values are skipped",
            prose: "By default the missing reading is ignored: the sum covers the seven \
                    values that are present.",
            run: |s| Ok(s.with_missing.sum()?.into()),
        },
        Cell {
            name: "sum_with_missing_strict",
            title: "Refusing to skip missing values",
            prose: "With skipna disabled a single missing value makes the whole sum missing.",
            run: |s| {
                let opts = AggOptions::default().skipna(false);
                Ok(s.with_missing.agg(Agg::Sum, &opts)?.into())
            },
        },
        Cell {
            name: "sum_min_count",
            title: "Requiring a minimum number of values",
            prose: "min_count asks for at least that many valid values; seven present \
                    values fall short of eight, so the sum is missing.",
            run: |s| {
                let opts = AggOptions::default().min_count(8);
                Ok(s.with_missing.agg(Agg::Sum, &opts)?.into())
            },
        },
        Cell {
            name: "count_with_missing",
            title: "Counting valid values",
            prose: "count reports the non-missing values only.",
            run: |s| Ok(Value::Integer(s.with_missing.count() as i64).into()),
        },
        // ---- Text series ----
        Cell {
            name: "labels_count",
            title: "Counting text values",
            prose: "count works on any column, text included.",
            run: |s| Ok(Value::Integer(s.labels.count() as i64).into()),
        },
        Cell {
            name: "labels_sum",
            title: "Summing text concatenates it",
            prose: "Adding strings joins them end to end, in order.",
            run: |s| Ok(s.labels.sum()?.into()),
        },
        Cell {
            name: "labels_min_max",
            title: "Text extremes are alphabetical",
            prose: "min and max compare text lexicographically.",
            run: |s| {
                let series = labelled(
                    "labels",
                    vec![("min", s.labels.min()?), ("max", s.labels.max()?)],
                )?;
                Ok(series.into())
            },
        },
        Cell {
            name: "labels_mode",
            title: "Most frequent label",
            prose: "mode returns every value that ties for the highest count.",
            run: |s| Ok(s.labels.mode(true).into()),
        },
        Cell {
            name: "labels_value_counts",
            title: "Frequency table",
            prose: "value_counts lists each label with its count, most frequent first; \
                    ties keep the order in which the labels first appear.",
            run: |s| Ok(s.labels.value_counts().into()),
        },
        Cell {
            name: "labels_mean",
            title: "Text has no mean",
            prose: "Numeric-only functions reject text columns instead of guessing.",
            run: |s| Ok(rejected(s.labels.mean())),
        },
        // ---- Frames ----
        Cell {
            name: "table_sum",
            title: "Column sums",
            prose: "On a table the default axis reduces each column to one value.",
            run: |s| Ok(s.table.sum()?.into()),
        },
        Cell {
            name: "table_sum_rows",
            title: "Row sums",
            prose: "Switching the axis reduces each row across its columns instead.",
            run: |s| {
                let opts = AggOptions::default().axis(Axis::Columns);
                Ok(s.table.agg(Agg::Sum, &opts)?.into())
            },
        },
        Cell {
            name: "table_missing_sum",
            title: "Column sums skip missing cells",
            prose: "Column B is summed over its three present values.",
            run: |s| Ok(s.table_missing.sum()?.into()),
        },
        Cell {
            name: "table_missing_row_means",
            title: "Row means with and without skipping",
            prose: "Row 1 has a missing B: skipped it averages A alone, strictly it is missing.",
            run: |s| {
                let rows = AggOptions::default().axis(Axis::Columns);
                let skipped = s.table_missing.agg(Agg::Mean, &rows)?;
                let strict = s.table_missing.agg(Agg::Mean, &rows.skipna(false))?;
                let frame = DataFrame::with_index(
                    s.table_missing.index().to_vec(),
                    vec![
                        ("skipna", skipped.values().to_vec()),
                        ("strict", strict.values().to_vec()),
                    ],
                )?;
                Ok(frame.into())
            },
        },
        Cell {
            name: "mixed_mean",
            title: "Means over a mixed table",
            prose: "The name column is text, so a plain mean is rejected.",
            run: |s| Ok(rejected(s.mixed.mean())),
        },
        Cell {
            name: "mixed_mean_numeric_only",
            title: "Restricting to numeric columns",
            prose: "numeric_only drops the text column; age still skips its missing value.",
            run: |s| {
                let opts = AggOptions::default().numeric_only(true);
                Ok(s.mixed.agg(Agg::Mean, &opts)?.into())
            },
        },
        // ---- Cumulative functions ----
        Cell {
            name: "numbers_cumsum",
            title: "Running total",
            prose: "Each position holds the sum of everything up to and including it.",
            run: |s| Ok(s.numbers.cumsum()?.into()),
        },
        Cell {
            name: "numbers_cummax",
            title: "Running maximum",
            prose: "The running maximum never decreases.",
            run: |s| Ok(s.numbers.cummax()?.into()),
        },
        Cell {
            name: "numbers_cummin",
            title: "Running minimum",
            prose: "The running minimum never increases.",
            run: |s| Ok(s.numbers.cummin()?.into()),
        },
        Cell {
            name: "numbers_cumprod",
            title: "Running product",
            prose: "The running product ends at the product of the whole series.",
            run: |s| Ok(s.numbers.cumprod()?.into()),
        },
        Cell {
            name: "with_missing_cumsum",
            title: "Running total over a gap",
            prose: "The missing position stays missing and the total carries on after it.",
            run: |s| Ok(s.with_missing.cumsum()?.into()),
        },
        Cell {
            name: "with_missing_cumsum_strict",
            title: "Running total that stops at a gap",
            prose: "Without skipping, every position after the gap is missing.",
            run: |s| Ok(s.with_missing.cum(CumOp::Sum, false)?.into()),
        },
        Cell {
            name: "table_cumsum",
            title: "Running totals down each column",
            prose: "Frames scan each column independently.",
            run: |s| Ok(s.table.cumsum()?.into()),
        },
        Cell {
            name: "table_cumsum_rows",
            title: "Running totals across each row",
            prose: "Along the column axis the scan runs left to right within a row.",
            run: |s| {
                let opts = AggOptions::default().axis(Axis::Columns);
                Ok(s.table.cum(CumOp::Sum, &opts)?.into())
            },
        },
        Cell {
            name: "table_missing_cummax",
            title: "Running maximum down a column with a gap",
            prose: "Skipping keeps the gap missing and carries the maximum past it.",
            run: |s| Ok(s.table_missing.cummax()?.into()),
        },
        Cell {
            name: "table_missing_cummax_strict",
            title: "Running maximum that stops at a gap",
            prose: "Without skipping, column B is missing from its gap onwards while A is \
                    unaffected.",
            run: |s| {
                let opts = AggOptions::default().skipna(false);
                Ok(s.table_missing.cum(CumOp::Max, &opts)?.into())
            },
        },
        // ---- Spread and position ----
        Cell {
            name: "numbers_quantiles",
            title: "Quartiles",
            prose: "Quantiles interpolate linearly between neighbouring sorted values.",
            run: |s| Ok(s.numbers.quantiles(&[0.25, 0.5, 0.75])?.into()),
        },
        Cell {
            name: "numbers_spread",
            title: "Spread and shape",
            prose: "Sample standard deviation and variance, standard error of the mean, \
                    skewness and excess kurtosis.",
            run: |s| {
                let opts = AggOptions::default();
                let mut pairs = Vec::new();
                for agg in [Agg::Std, Agg::Var, Agg::Sem, Agg::Skew, Agg::Kurt] {
                    pairs.push((agg.name(), s.numbers.agg(agg, &opts)?));
                }
                Ok(labelled("numbers", pairs)?.into())
            },
        },
        Cell {
            name: "numbers_idxmax",
            title: "Where the maximum sits",
            prose: "idxmax returns the label of the first occurrence of the maximum.",
            run: |s| Ok(Value::String(s.numbers.idxmax()?).into()),
        },
        // ---- describe ----
        Cell {
            name: "describe_numbers",
            title: "Summary of a numeric series",
            prose: "count, mean, std, min, the quartiles and max in one call.",
            run: |s| Ok(s.numbers.describe(&DescribeOptions::default())?.into()),
        },
        Cell {
            name: "describe_labels",
            title: "Summary of a text series",
            prose: "Text gets count, number of distinct values, the most frequent value and \
                    its frequency.",
            run: |s| Ok(s.labels.describe(&DescribeOptions::default())?.into()),
        },
        Cell {
            name: "describe_table_missing",
            title: "Summary of a table with a gap",
            prose: "The count row shows how many values each column contributed.",
            run: |s| Ok(s.table_missing.describe(&DescribeOptions::default())?.into()),
        },
        Cell {
            name: "describe_mixed",
            title: "Summary of a mixed table",
            prose: "By default only the numeric columns are summarised.",
            run: |s| Ok(s.mixed.describe(&DescribeOptions::default())?.into()),
        },
        Cell {
            name: "describe_mixed_all",
            title: "Summarising every column",
            prose: "Including all columns unions the text and numeric rows; cells that do \
                    not apply are missing.",
            run: |s| {
                let opts = DescribeOptions::default().include(Include::All);
                Ok(s.mixed.describe(&opts)?.into())
            },
        },
        Cell {
            name: "describe_percentiles",
            title: "Choosing percentiles",
            prose: "Custom percentiles replace the quartiles; the median is always kept.",
            run: |s| {
                let opts = DescribeOptions::default().percentiles(vec![0.1, 0.9]);
                Ok(s.numbers.describe(&opts)?.into())
            },
        },
        Cell {
            name: "describe_bad_percentiles",
            title: "Percentiles must lie between 0 and 1",
            prose: "Asking for the 150th percentile is rejected.",
            run: |s| {
                let opts = DescribeOptions::default().percentiles(vec![1.5]);
                Ok(rejected(s.numbers.describe(&opts)))
            },
        },
    ]
}

/// Look a cell up by name.
pub fn find(name: &str) -> Option<Cell> {
    cells().into_iter().find(|c| c.name == name)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn run(name: &str) -> Output {
        let state = SessionState::default();
        let cell = find(name).unwrap();
        (cell.run)(&state).unwrap()
    }

    #[test]
    fn every_cell_runs() {
        let state = SessionState::default();
        for cell in cells() {
            assert!((cell.run)(&state).is_ok(), "cell {} failed", cell.name);
        }
    }

    #[test]
    fn names_are_unique() {
        let all = cells();
        let names: BTreeSet<&str> = all.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn headline_results() {
        assert_eq!(run("sum_numbers"), Output::Scalar(Value::Integer(31)));
        assert_eq!(run("mean_numbers"), Output::Scalar(Value::Float(3.875)));
        assert_eq!(run("max_numbers"), Output::Scalar(Value::Integer(9)));
        assert_eq!(run("sum_with_missing"), Output::Scalar(Value::Float(27.0)));
        assert_eq!(run("sum_with_missing_strict"), Output::Scalar(Value::Null));
        assert_eq!(run("sum_min_count"), Output::Scalar(Value::Null));
        assert_eq!(run("numbers_idxmax"), Output::Scalar(Value::from("5")));
    }

    #[test]
    fn rejection_cells_explain_themselves() {
        match run("labels_mean") {
            Output::Rejected(msg) => assert!(msg.contains("non-numeric column 'labels'")),
            other => panic!("expected a rejection, got {other:?}"),
        }
        match run("mixed_mean") {
            Output::Rejected(msg) => assert!(msg.contains("'name'")),
            other => panic!("expected a rejection, got {other:?}"),
        }
        assert!(matches!(run("describe_bad_percentiles"), Output::Rejected(_)));
    }

    #[test]
    fn frame_scans_in_both_missing_value_modes() {
        let Output::Frame(skipped) = run("table_missing_cummax") else {
            panic!("expected a frame");
        };
        let b = skipped.column("B").unwrap().values();
        assert_eq!(b, &[Value::Float(10.0), Value::Null, Value::Float(30.0), Value::Float(40.0)]);

        let Output::Frame(strict) = run("table_missing_cummax_strict") else {
            panic!("expected a frame");
        };
        assert!(strict.column("B").unwrap().values()[1..].iter().all(Value::is_null));
        assert_eq!(strict.column("A").unwrap().values()[3], Value::Integer(4));
    }

    #[test]
    fn row_mean_comparison() {
        let Output::Frame(frame) = run("table_missing_row_means") else {
            panic!("expected a frame");
        };
        assert_eq!(frame.column("skipna").unwrap().values()[1], Value::Float(2.0));
        assert_eq!(frame.column("strict").unwrap().values()[1], Value::Null);
    }
}
