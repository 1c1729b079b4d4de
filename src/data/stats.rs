use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Operation catalogue
// ---------------------------------------------------------------------------

/// Aggregate functions: reduce a run of values to one summary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Agg {
    Count,
    Sum,
    Prod,
    Mean,
    Median,
    Min,
    Max,
    Std,
    Var,
    Sem,
    Skew,
    Kurt,
}

impl Agg {
    pub fn name(self) -> &'static str {
        match self {
            Agg::Count => "count",
            Agg::Sum => "sum",
            Agg::Prod => "prod",
            Agg::Mean => "mean",
            Agg::Median => "median",
            Agg::Min => "min",
            Agg::Max => "max",
            Agg::Std => "std",
            Agg::Var => "var",
            Agg::Sem => "sem",
            Agg::Skew => "skew",
            Agg::Kurt => "kurt",
        }
    }

    /// Whether text columns are rejected. Count, sum and the extrema also
    /// work on text (concatenation, lexicographic order).
    pub fn requires_numeric(self) -> bool {
        !matches!(self, Agg::Count | Agg::Sum | Agg::Min | Agg::Max)
    }
}

impl fmt::Display for Agg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Additive (cumulative) functions: one output per input position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CumOp {
    Sum,
    Prod,
    Min,
    Max,
}

impl CumOp {
    pub fn name(self) -> &'static str {
        match self {
            CumOp::Sum => "cumsum",
            CumOp::Prod => "cumprod",
            CumOp::Min => "cummin",
            CumOp::Max => "cummax",
        }
    }

    pub fn requires_numeric(self) -> bool {
        matches!(self, CumOp::Prod)
    }
}

/// Direction of a frame reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    /// Reduce each column down its rows (one result per column).
    #[default]
    Index,
    /// Reduce each row across its columns (one result per row).
    Columns,
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Knobs shared by the aggregate and cumulative functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggOptions {
    pub axis: Axis,
    /// Drop missing values before reducing. When false, any missing value
    /// makes the result missing.
    pub skipna: bool,
    /// Restrict frame reductions to numeric and boolean columns.
    pub numeric_only: bool,
    /// Sum and product become missing with fewer valid values than this.
    pub min_count: usize,
    /// Delta degrees of freedom for var/std/sem.
    pub ddof: usize,
}

impl Default for AggOptions {
    fn default() -> Self {
        Self {
            axis: Axis::Index,
            skipna: true,
            numeric_only: false,
            min_count: 0,
            ddof: 1,
        }
    }
}

impl AggOptions {
    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn skipna(mut self, skipna: bool) -> Self {
        self.skipna = skipna;
        self
    }

    pub fn numeric_only(mut self, numeric_only: bool) -> Self {
        self.numeric_only = numeric_only;
        self
    }

    pub fn min_count(mut self, min_count: usize) -> Self {
        self.min_count = min_count;
        self
    }

    pub fn ddof(mut self, ddof: usize) -> Self {
        self.ddof = ddof;
        self
    }
}

// ---------------------------------------------------------------------------
// Kernels over valid (non-missing) values
// ---------------------------------------------------------------------------

pub fn mean(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    Some(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// Sum of squared deviations from the mean, raised to `power`.
fn central_moment_sum(xs: &[f64], m: f64, power: i32) -> f64 {
    xs.iter().map(|x| (x - m).powi(power)).sum()
}

pub fn var(xs: &[f64], ddof: usize) -> Option<f64> {
    let n = xs.len();
    if n <= ddof {
        return None;
    }
    let m = mean(xs)?;
    Some(central_moment_sum(xs, m, 2) / (n - ddof) as f64)
}

pub fn std(xs: &[f64], ddof: usize) -> Option<f64> {
    var(xs, ddof).map(f64::sqrt)
}

/// Standard error of the mean.
pub fn sem(xs: &[f64], ddof: usize) -> Option<f64> {
    std(xs, ddof).map(|s| s / (xs.len() as f64).sqrt())
}

/// Adjusted Fisher–Pearson skewness; undefined below three values.
pub fn skew(xs: &[f64]) -> Option<f64> {
    let n = xs.len() as f64;
    if xs.len() < 3 {
        return None;
    }
    let m = mean(xs)?;
    let m2 = central_moment_sum(xs, m, 2);
    let m3 = central_moment_sum(xs, m, 3);
    if m2 == 0.0 {
        return Some(0.0);
    }
    let g1 = (m3 / n) / (m2 / n).powf(1.5);
    Some((n * (n - 1.0)).sqrt() / (n - 2.0) * g1)
}

/// Unbiased excess kurtosis; undefined below four values.
pub fn kurt(xs: &[f64]) -> Option<f64> {
    let n = xs.len() as f64;
    if xs.len() < 4 {
        return None;
    }
    let m = mean(xs)?;
    let m2 = central_moment_sum(xs, m, 2);
    let m4 = central_moment_sum(xs, m, 4);
    if m2 == 0.0 {
        return Some(0.0);
    }
    let adj = 3.0 * (n - 1.0).powi(2) / ((n - 2.0) * (n - 3.0));
    let numer = n * (n + 1.0) * (n - 1.0) * m4;
    let denom = (n - 2.0) * (n - 3.0) * m2 * m2;
    Some(numer / denom - adj)
}

pub fn sorted(xs: &[f64]) -> Vec<f64> {
    let mut out = xs.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Linear-interpolation quantile over already sorted values.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    match sorted.len() {
        0 => None,
        1 => Some(sorted[0]),
        len => {
            let pos = q * (len - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            if lower == upper {
                Some(sorted[lower])
            } else {
                let frac = pos - lower as f64;
                Some(sorted[lower] * (1.0 - frac) + sorted[upper] * frac)
            }
        }
    }
}

pub fn median(xs: &[f64]) -> Option<f64> {
    quantile_sorted(&sorted(xs), 0.5)
}

/// Row label for a percentile: `0.25` → `25%`, `0.125` → `12.5%`.
pub fn percentile_label(p: f64) -> String {
    let pct = (p * 100.0 * 1e6).round() / 1e6;
    format!("{pct}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMBERS: [f64; 8] = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn sample_variance_and_std() {
        let v = var(&NUMBERS, 1).unwrap();
        assert!(close(v, 52.875 / 7.0));
        assert!(close(std(&NUMBERS, 1).unwrap(), v.sqrt()));
        assert!(close(var(&NUMBERS, 0).unwrap(), 52.875 / 8.0));
        assert_eq!(var(&[1.0], 1), None);
        assert!(close(sem(&NUMBERS, 1).unwrap(), v.sqrt() / 8f64.sqrt()));
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let s = sorted(&NUMBERS);
        assert_eq!(s, vec![1.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 9.0]);
        assert!(close(quantile_sorted(&s, 0.25).unwrap(), 1.75));
        assert!(close(quantile_sorted(&s, 0.5).unwrap(), 3.5));
        assert!(close(quantile_sorted(&s, 0.75).unwrap(), 5.25));
        assert_eq!(quantile_sorted(&s, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&s, 1.0), Some(9.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
        assert_eq!(median(&NUMBERS), Some(3.5));
    }

    #[test]
    fn shape_statistics() {
        assert!(close(skew(&[1.0, 2.0, 3.0]).unwrap(), 0.0));
        assert!(close(kurt(&[1.0, 2.0, 3.0, 4.0]).unwrap(), -1.2));
        assert_eq!(skew(&[1.0, 2.0]), None);
        assert_eq!(kurt(&[1.0, 2.0, 3.0]), None);
        assert_eq!(skew(&[2.0, 2.0, 2.0]), Some(0.0));
        assert!(skew(&NUMBERS).unwrap() > 0.0);
    }

    #[test]
    fn percentile_labels_drop_trailing_zeros() {
        assert_eq!(percentile_label(0.25), "25%");
        assert_eq!(percentile_label(0.125), "12.5%");
        assert_eq!(percentile_label(0.1), "10%");
        assert_eq!(percentile_label(0.9), "90%");
        assert_eq!(percentile_label(1.0), "100%");
    }
}
