use std::collections::BTreeSet;

use super::frame::DataFrame;
use super::model::DType;
use crate::error::{Result, StatsError};

// ---------------------------------------------------------------------------
// Column selection: which columns an operation runs over
// ---------------------------------------------------------------------------

/// Predicate over the columns of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// Every column.
    All,
    /// Numbers and booleans (what `numeric_only` keeps).
    NumericLike,
    /// Numbers proper (what `describe` summarises with percentiles).
    Numeric,
    /// Text and other non-numeric columns.
    Object,
    /// Exactly these columns, in this order.
    Named(Vec<String>),
}

impl ColumnSelector {
    /// The selector implied by an aggregate's `numeric_only` flag.
    pub fn for_numeric_only(numeric_only: bool) -> Self {
        if numeric_only {
            ColumnSelector::NumericLike
        } else {
            ColumnSelector::All
        }
    }

    fn accepts(&self, dtype: DType) -> bool {
        match self {
            ColumnSelector::All | ColumnSelector::Named(_) => true,
            ColumnSelector::NumericLike => dtype.is_numeric_like(),
            ColumnSelector::Numeric => dtype.is_numeric(),
            ColumnSelector::Object => !dtype.is_numeric(),
        }
    }
}

/// Return positional indices of the columns that pass `selector`.
///
/// A column passes when:
/// * `Named`: its name is listed (listed names that do not exist are errors,
///   duplicates are ignored after their first mention)
/// * otherwise: its dtype is accepted by the selector
pub fn selected_columns(frame: &DataFrame, selector: &ColumnSelector) -> Result<Vec<usize>> {
    if let ColumnSelector::Named(names) = selector {
        let mut seen = BTreeSet::new();
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            if !seen.insert(name.as_str()) {
                continue;
            }
            let pos = frame
                .column_names()
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| StatsError::ColumnNotFound(name.clone()))?;
            out.push(pos);
        }
        return Ok(out);
    }

    Ok(frame
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, col)| selector.accepts(col.dtype()))
        .map(|(i, _)| i)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::samples;

    #[test]
    fn dtype_selectors() {
        let mixed = samples::mixed();
        assert_eq!(selected_columns(&mixed, &ColumnSelector::All).unwrap(), vec![0, 1, 2]);
        assert_eq!(selected_columns(&mixed, &ColumnSelector::Numeric).unwrap(), vec![1, 2]);
        assert_eq!(selected_columns(&mixed, &ColumnSelector::Object).unwrap(), vec![0]);
        assert_eq!(
            selected_columns(&mixed, &ColumnSelector::for_numeric_only(true)).unwrap(),
            vec![1, 2]
        );
    }

    #[test]
    fn named_selection_keeps_requested_order() {
        let mixed = samples::mixed();
        let sel = ColumnSelector::Named(vec!["score".into(), "name".into(), "score".into()]);
        assert_eq!(selected_columns(&mixed, &sel).unwrap(), vec![2, 0]);

        let missing = ColumnSelector::Named(vec!["height".into()]);
        assert_eq!(
            selected_columns(&mixed, &missing),
            Err(StatsError::ColumnNotFound("height".into()))
        );
    }
}
