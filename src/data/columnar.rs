use std::sync::Arc;

use anyhow::{bail, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Float64Array, Int64Array, StringArray,
};
use arrow::datatypes::{DataType, Field, Float32Type, Float64Type, Int32Type, Int64Type, Schema};
use arrow::record_batch::RecordBatch;

use super::frame::DataFrame;
use super::model::{DType, Value};

// ---------------------------------------------------------------------------
// Value columns → Arrow
// ---------------------------------------------------------------------------

fn arrow_type(dtype: DType) -> DataType {
    match dtype {
        DType::Int64 => DataType::Int64,
        DType::Float64 => DataType::Float64,
        DType::Bool => DataType::Boolean,
        DType::Object => DataType::Utf8,
    }
}

/// Build an Arrow array for a column. Missing values become nulls; object
/// columns are written as their display text.
pub fn value_array(values: &[Value], dtype: DType) -> ArrayRef {
    match dtype {
        DType::Int64 => {
            let ints: Vec<Option<i64>> = values
                .iter()
                .map(|v| match v {
                    Value::Integer(i) => Some(*i),
                    _ => None,
                })
                .collect();
            Arc::new(Int64Array::from(ints))
        }
        DType::Float64 => {
            let floats: Vec<Option<f64>> = values.iter().map(Value::as_f64).collect();
            Arc::new(Float64Array::from(floats))
        }
        DType::Bool => {
            let bools: Vec<Option<bool>> = values
                .iter()
                .map(|v| match v {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            Arc::new(BooleanArray::from(bools))
        }
        DType::Object => {
            let texts: Vec<Option<String>> = values
                .iter()
                .map(|v| (!v.is_null()).then(|| v.to_string()))
                .collect();
            Arc::new(StringArray::from(texts))
        }
    }
}

/// Convert a frame to one record batch. With `with_index` the row labels
/// come first as an unnamed text column.
pub fn to_record_batch(frame: &DataFrame, with_index: bool) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(frame.columns().len() + 1);
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(frame.columns().len() + 1);

    if with_index {
        fields.push(Field::new("", DataType::Utf8, false));
        arrays.push(Arc::new(StringArray::from(frame.index().to_vec())));
    }
    for col in frame.columns() {
        let name = col.name().unwrap_or_default();
        fields.push(Field::new(name, arrow_type(col.dtype()), true));
        arrays.push(value_array(col.values(), col.dtype()));
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?)
}

// ---------------------------------------------------------------------------
// Arrow → Value columns
// ---------------------------------------------------------------------------

/// Extract every cell of an Arrow column. Nulls become missing values.
pub fn column_values(col: &ArrayRef) -> Result<Vec<Value>> {
    let values: Vec<Value> = match col.data_type() {
        DataType::Int32 => col
            .as_primitive::<Int32Type>()
            .iter()
            .map(|v| Value::from(v.map(i64::from)))
            .collect(),
        DataType::Int64 => col
            .as_primitive::<Int64Type>()
            .iter()
            .map(Value::from)
            .collect(),
        DataType::Float32 => col
            .as_primitive::<Float32Type>()
            .iter()
            .map(|v| Value::from(v.map(f64::from)))
            .collect(),
        DataType::Float64 => col
            .as_primitive::<Float64Type>()
            .iter()
            .map(Value::from)
            .collect(),
        DataType::Boolean => col.as_boolean().iter().map(Value::from).collect(),
        DataType::Utf8 => col.as_string::<i32>().iter().map(Value::from).collect(),
        DataType::LargeUtf8 => col.as_string::<i64>().iter().map(Value::from).collect(),
        other => bail!("Unsupported column type {other:?}"),
    };
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::samples;

    #[test]
    fn frame_to_batch_and_back() {
        let mixed = samples::mixed();
        let batch = to_record_batch(&mixed, false).unwrap();
        assert_eq!(batch.num_columns(), 3);
        assert_eq!(batch.num_rows(), 4);
        assert_eq!(batch.schema().field(0).data_type(), &DataType::Utf8);

        let age = column_values(batch.column(1)).unwrap();
        assert_eq!(age, mixed.column("age").unwrap().values());
        assert!(batch.column(1).is_null(1));
    }

    #[test]
    fn index_column_comes_first() {
        let batch = to_record_batch(&samples::table(), true).unwrap();
        assert_eq!(batch.num_columns(), 3);
        assert_eq!(batch.schema().field(0).name(), "");
    }
}
