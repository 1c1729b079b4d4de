use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::model::{DType, Value};
use super::stats::{self, Agg, AggOptions, CumOp};
use crate::error::{Result, StatsError};

/// Positional row labels `"0".."n-1"`.
pub fn range_index(len: usize) -> Vec<String> {
    (0..len).map(|i| i.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Series – one labelled column of values
// ---------------------------------------------------------------------------

/// A one-dimensional, ordered, labelled sequence of values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    name: Option<String>,
    index: Vec<String>,
    values: Vec<Value>,
    dtype: DType,
}

impl Series {
    /// Build a named series with a positional index.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        let index = range_index(values.len());
        Self::build(Some(name.into()), index, values)
    }

    /// Build a series over explicit row labels.
    pub fn with_index(
        name: Option<String>,
        index: Vec<String>,
        values: Vec<Value>,
    ) -> Result<Self> {
        if index.len() != values.len() {
            return Err(StatsError::LengthMismatch {
                column: name.unwrap_or_default(),
                expected: index.len(),
                actual: values.len(),
            });
        }
        Ok(Self::build(name, index, values))
    }

    /// Float64 columns hold only floats: integers next to a float or a
    /// missing value are widened.
    fn build(name: Option<String>, index: Vec<String>, values: Vec<Value>) -> Self {
        let dtype = DType::infer(&values);
        let values: Vec<Value> = values
            .into_iter()
            .map(|v| match (dtype, v) {
                (_, Value::Float(f)) => Value::float(f),
                (DType::Float64, Value::Integer(i)) => Value::Float(i as f64),
                (_, other) => other,
            })
            .collect();
        Series {
            name,
            index,
            values,
            dtype,
        }
    }

    pub fn from_i64(name: impl Into<String>, values: &[i64]) -> Self {
        Self::new(name, values.iter().map(|&v| Value::Integer(v)).collect())
    }

    /// NaN entries become missing values.
    pub fn from_f64(name: impl Into<String>, values: &[f64]) -> Self {
        Self::new(name, values.iter().map(|&v| Value::float(v)).collect())
    }

    pub fn from_strs(name: impl Into<String>, values: &[&str]) -> Self {
        Self::new(name, values.iter().map(|&v| Value::from(v)).collect())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at a row label.
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.index
            .iter()
            .position(|l| l == label)
            .map(|i| &self.values[i])
    }

    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn column_label(&self) -> String {
        self.name.clone().unwrap_or_default()
    }

    fn has_missing(&self) -> bool {
        self.values.iter().any(Value::is_null)
    }

    /// Non-missing values as floats, rejecting text columns.
    fn valid_f64(&self, op: &'static str) -> Result<Vec<f64>> {
        if self.dtype == DType::Object {
            return Err(StatsError::NonNumeric {
                op,
                column: self.column_label(),
            });
        }
        Ok(self.values.iter().filter_map(Value::as_f64).collect())
    }

    /// A non-missing value prepared for ordering or accumulation.
    /// Text columns only accept text; booleans become 0/1 under arithmetic.
    fn operand(&self, v: &Value, arithmetic: bool) -> Result<Value> {
        match (self.dtype, v) {
            (DType::Object, Value::String(_)) => Ok(v.clone()),
            (DType::Object, other) => Err(StatsError::IncomparableTypes {
                column: self.column_label(),
                left: self.other_type_than(other),
                right: other.type_name(),
            }),
            (DType::Bool, Value::Bool(b)) if arithmetic => Ok(Value::Integer(i64::from(*b))),
            (DType::Float64, other) => Ok(other.as_f64().map_or(Value::Null, Value::Float)),
            _ => Ok(v.clone()),
        }
    }

    /// Type of the first valid value that differs in kind from `v`.
    fn other_type_than(&self, v: &Value) -> &'static str {
        self.values
            .iter()
            .filter(|x| !x.is_null())
            .map(Value::type_name)
            .find(|t| *t != v.type_name())
            .unwrap_or("str")
    }

    // -----------------------------------------------------------------------
    // Aggregates
    // -----------------------------------------------------------------------

    /// Number of non-missing values.
    pub fn count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_null()).count()
    }

    pub fn sum(&self) -> Result<Value> {
        self.agg(Agg::Sum, &AggOptions::default())
    }

    pub fn prod(&self) -> Result<Value> {
        self.agg(Agg::Prod, &AggOptions::default())
    }

    pub fn mean(&self) -> Result<Value> {
        self.agg(Agg::Mean, &AggOptions::default())
    }

    pub fn median(&self) -> Result<Value> {
        self.agg(Agg::Median, &AggOptions::default())
    }

    pub fn min(&self) -> Result<Value> {
        self.agg(Agg::Min, &AggOptions::default())
    }

    pub fn max(&self) -> Result<Value> {
        self.agg(Agg::Max, &AggOptions::default())
    }

    pub fn std(&self) -> Result<Value> {
        self.agg(Agg::Std, &AggOptions::default())
    }

    pub fn var(&self) -> Result<Value> {
        self.agg(Agg::Var, &AggOptions::default())
    }

    pub fn sem(&self) -> Result<Value> {
        self.agg(Agg::Sem, &AggOptions::default())
    }

    pub fn skew(&self) -> Result<Value> {
        self.agg(Agg::Skew, &AggOptions::default())
    }

    pub fn kurt(&self) -> Result<Value> {
        self.agg(Agg::Kurt, &AggOptions::default())
    }

    /// Reduce the series with `agg`. `opts.axis` and `opts.numeric_only`
    /// only matter for frames and are ignored here.
    pub fn agg(&self, agg: Agg, opts: &AggOptions) -> Result<Value> {
        if agg == Agg::Count {
            return Ok(Value::Integer(self.count() as i64));
        }
        if self.dtype == DType::Object && agg.requires_numeric() {
            return Err(StatsError::NonNumeric {
                op: agg.name(),
                column: self.column_label(),
            });
        }
        if !opts.skipna && self.has_missing() {
            return Ok(Value::Null);
        }
        match agg {
            Agg::Sum | Agg::Prod => self.fold_total(agg, opts.min_count),
            Agg::Min | Agg::Max => self.extreme(agg),
            _ => {
                let xs = self.valid_f64(agg.name())?;
                let out = match agg {
                    Agg::Mean => stats::mean(&xs),
                    Agg::Median => stats::median(&xs),
                    Agg::Std => stats::std(&xs, opts.ddof),
                    Agg::Var => stats::var(&xs, opts.ddof),
                    Agg::Sem => stats::sem(&xs, opts.ddof),
                    Agg::Skew => stats::skew(&xs),
                    Agg::Kurt => stats::kurt(&xs),
                    Agg::Count | Agg::Sum | Agg::Prod | Agg::Min | Agg::Max => None,
                };
                Ok(out.into())
            }
        }
    }

    /// Sum or product: integers stay integers, text concatenates.
    fn fold_total(&self, agg: Agg, min_count: usize) -> Result<Value> {
        if self.count() < min_count {
            return Ok(Value::Null);
        }
        let (op, seed) = match agg {
            Agg::Prod => (CumOp::Prod, 1),
            _ => (CumOp::Sum, 0),
        };
        let seed = match self.dtype {
            DType::Object => Value::String(String::new()),
            DType::Float64 => Value::Float(seed as f64),
            DType::Int64 | DType::Bool => Value::Integer(seed),
        };
        self.values
            .iter()
            .filter(|v| !v.is_null())
            .try_fold(seed, |acc, v| Ok(step(op, &acc, self.operand(v, true)?)))
    }

    fn extreme(&self, agg: Agg) -> Result<Value> {
        let op = if agg == Agg::Min { CumOp::Min } else { CumOp::Max };
        let mut acc: Option<Value> = None;
        for v in self.values.iter().filter(|v| !v.is_null()) {
            let v = self.operand(v, false)?;
            acc = Some(match acc {
                None => v,
                Some(a) => step(op, &a, v),
            });
        }
        Ok(acc.unwrap_or(Value::Null))
    }

    /// Linear-interpolation quantile of the valid values.
    pub fn quantile(&self, q: f64) -> Result<Value> {
        if !(0.0..=1.0).contains(&q) {
            return Err(StatsError::InvalidQuantile(q));
        }
        let xs = stats::sorted(&self.valid_f64("quantile")?);
        Ok(stats::quantile_sorted(&xs, q).into())
    }

    /// Several quantiles at once, labelled by `q`.
    pub fn quantiles(&self, qs: &[f64]) -> Result<Series> {
        let mut index = Vec::with_capacity(qs.len());
        let mut values = Vec::with_capacity(qs.len());
        for &q in qs {
            index.push(format!("{q}"));
            values.push(self.quantile(q)?);
        }
        Series::with_index(self.name.clone(), index, values)
    }

    /// Label of the first occurrence of the minimum.
    pub fn idxmin(&self) -> Result<String> {
        self.arg_extreme(CumOp::Min, "idxmin")
    }

    /// Label of the first occurrence of the maximum.
    pub fn idxmax(&self) -> Result<String> {
        self.arg_extreme(CumOp::Max, "idxmax")
    }

    fn arg_extreme(&self, op: CumOp, name: &'static str) -> Result<String> {
        let mut best: Option<(usize, Value)> = None;
        for (i, v) in self.values.iter().enumerate() {
            if v.is_null() {
                continue;
            }
            let v = self.operand(v, false)?;
            let better = match &best {
                None => true,
                Some((_, b)) if op == CumOp::Min => v < *b,
                Some((_, b)) => v > *b,
            };
            if better {
                best = Some((i, v));
            }
        }
        best.map(|(i, _)| self.index[i].clone())
            .ok_or_else(|| StatsError::Empty {
                op: name,
                column: self.column_label(),
            })
    }

    // -----------------------------------------------------------------------
    // Cumulative (additive) functions
    // -----------------------------------------------------------------------

    pub fn cumsum(&self) -> Result<Series> {
        self.cum(CumOp::Sum, true)
    }

    pub fn cumprod(&self) -> Result<Series> {
        self.cum(CumOp::Prod, true)
    }

    pub fn cummin(&self) -> Result<Series> {
        self.cum(CumOp::Min, true)
    }

    pub fn cummax(&self) -> Result<Series> {
        self.cum(CumOp::Max, true)
    }

    /// Running scan in index order. Missing positions stay missing; with
    /// `skipna = false` every later position is missing too.
    pub fn cum(&self, op: CumOp, skipna: bool) -> Result<Series> {
        if self.dtype == DType::Object && op.requires_numeric() {
            return Err(StatsError::NonNumeric {
                op: op.name(),
                column: self.column_label(),
            });
        }
        let arithmetic = matches!(op, CumOp::Sum | CumOp::Prod);
        let mut out = Vec::with_capacity(self.len());
        let mut acc: Option<Value> = None;
        let mut poisoned = false;
        for v in &self.values {
            if v.is_null() {
                poisoned |= !skipna;
                out.push(Value::Null);
                continue;
            }
            if poisoned {
                out.push(Value::Null);
                continue;
            }
            let v = self.operand(v, arithmetic)?;
            let next = match &acc {
                None => v,
                Some(a) => step(op, a, v),
            };
            out.push(next.clone());
            acc = Some(next);
        }
        Series::with_index(self.name.clone(), self.index.clone(), out)
    }

    // -----------------------------------------------------------------------
    // Frequencies
    // -----------------------------------------------------------------------

    /// Most frequent value(s), sorted. Several values tie for the mode.
    pub fn mode(&self, dropna: bool) -> Series {
        let mut counts: BTreeMap<Value, usize> = BTreeMap::new();
        for v in &self.values {
            if dropna && v.is_null() {
                continue;
            }
            *counts.entry(v.clone()).or_default() += 1;
        }
        let top = counts.values().copied().max().unwrap_or(0);
        let modes: Vec<Value> = counts
            .into_iter()
            .filter(|(_, c)| *c == top)
            .map(|(v, _)| v)
            .collect();
        Series::build(self.name.clone(), range_index(modes.len()), modes)
    }

    /// Counts of each distinct non-missing value, most frequent first.
    /// Ties keep first-seen order.
    pub fn value_counts(&self) -> Series {
        let counts = self.first_seen_counts();
        let mut ranked: Vec<(Value, usize)> = counts;
        ranked.sort_by(|(_, a), (_, b)| b.cmp(a));
        let index = ranked.iter().map(|(v, _)| v.to_string()).collect();
        let values = ranked
            .into_iter()
            .map(|(_, c)| Value::Integer(c as i64))
            .collect();
        Series::build(Some("count".to_string()), index, values)
    }

    /// Distinct non-missing values with their counts, in first-seen order.
    pub(crate) fn first_seen_counts(&self) -> Vec<(Value, usize)> {
        let mut position: HashMap<Value, usize> = HashMap::new();
        let mut counts: Vec<(Value, usize)> = Vec::new();
        for v in self.values.iter().filter(|v| !v.is_null()) {
            let key = v.clone();
            match position.get(&key) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    position.insert(key.clone(), counts.len());
                    counts.push((key, 1));
                }
            }
        }
        counts
    }

    /// Distinct non-missing values in first-seen order.
    pub fn unique(&self) -> Vec<Value> {
        self.first_seen_counts().into_iter().map(|(v, _)| v).collect()
    }

    pub fn nunique(&self) -> usize {
        self.first_seen_counts().len()
    }
}

/// One accumulation step on operands of the same variant.
fn step(op: CumOp, acc: &Value, v: Value) -> Value {
    match (op, acc, v) {
        (CumOp::Sum, Value::Integer(a), Value::Integer(b)) => Value::Integer(a.saturating_add(b)),
        (CumOp::Prod, Value::Integer(a), Value::Integer(b)) => Value::Integer(a.saturating_mul(b)),
        (CumOp::Sum, Value::Float(a), Value::Float(b)) => Value::float(a + b),
        (CumOp::Prod, Value::Float(a), Value::Float(b)) => Value::float(a * b),
        (CumOp::Sum, Value::String(a), Value::String(b)) => Value::String(format!("{a}{b}")),
        (CumOp::Min, a, b) => {
            if b < *a {
                b
            } else {
                a.clone()
            }
        }
        (CumOp::Max, a, b) => {
            if b > *a {
                b
            } else {
                a.clone()
            }
        }
        (_, _, b) => b,
    }
}
