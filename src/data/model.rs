use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Value – a single cell of a series or frame column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the common Pandas dtypes.
/// Values key `BTreeMap` / `BTreeSet` in frequency counts, so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    /// Never NaN: NaN is stored as [`Value::Null`].
    Float(f64),
    Bool(bool),
    String(String),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "NaN"),
        }
    }
}

impl Value {
    /// Build a float cell, mapping NaN to [`Value::Null`].
    pub fn float(v: f64) -> Self {
        if v.is_nan() {
            Value::Null
        } else {
            Value::Float(v)
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Interpret the value as an `f64` for arithmetic. Booleans count as 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::String(_) => "str",
            Value::Null => "NaN",
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ---------------------------------------------------------------------------
// DType – the inferred type of a column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Int64,
    Float64,
    Bool,
    Object,
}

impl DType {
    /// Infer the dtype of a column from its values.
    ///
    /// Integers stay `Int64` only when nothing is missing; a missing value
    /// promotes the column to `Float64`. Booleans stay `Bool` with gaps.
    /// Any text, or booleans mixed with numbers, makes the column `Object`.
    pub fn infer(values: &[Value]) -> Self {
        let mut has_null = false;
        let mut has_int = false;
        let mut has_float = false;
        let mut has_bool = false;
        for v in values {
            match v {
                Value::Null => has_null = true,
                Value::Integer(_) => has_int = true,
                Value::Float(_) => has_float = true,
                Value::Bool(_) => has_bool = true,
                Value::String(_) => return DType::Object,
            }
        }
        match (has_bool, has_int || has_float) {
            (true, true) => DType::Object,
            (true, false) => DType::Bool,
            (false, _) if has_int && !has_float && !has_null => DType::Int64,
            (false, _) => DType::Float64,
        }
    }

    /// Numbers proper: what `describe` summarises with mean/std/percentiles.
    pub fn is_numeric(self) -> bool {
        matches!(self, DType::Int64 | DType::Float64)
    }

    /// What `numeric_only` keeps: numbers and booleans.
    pub fn is_numeric_like(self) -> bool {
        matches!(self, DType::Int64 | DType::Float64 | DType::Bool)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Bool => "bool",
            DType::Object => "object",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_becomes_null() {
        assert_eq!(Value::from(f64::NAN), Value::Null);
        assert_eq!(Value::from(None::<f64>), Value::Null);
        assert_eq!(Value::Null.to_string(), "NaN");
    }

    #[test]
    fn dtype_inference_promotes_missing_integers() {
        let ints = [Value::Integer(1), Value::Integer(2)];
        assert_eq!(DType::infer(&ints), DType::Int64);

        let with_null = [Value::Integer(1), Value::Null];
        assert_eq!(DType::infer(&with_null), DType::Float64);

        let text = [Value::Integer(1), Value::from("a")];
        assert_eq!(DType::infer(&text), DType::Object);

        assert_eq!(DType::infer(&[]), DType::Float64);
        assert_eq!(DType::infer(&[Value::Bool(true)]), DType::Bool);
        assert_eq!(DType::infer(&[Value::Bool(true), Value::Null]), DType::Bool);
        assert_eq!(DType::infer(&[Value::Bool(true), Value::Integer(1)]), DType::Object);
    }

    #[test]
    fn float_display_keeps_decimal_point() {
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Integer(3).to_string(), "3");
    }
}
