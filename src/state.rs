use std::path::Path;

use anyhow::Result;

use crate::data::frame::DataFrame;
use crate::data::loader::load_file;
use crate::data::samples;
use crate::data::series::Series;

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything the cells read. The sample datasets are built once per
/// session and never mutated.
pub struct SessionState {
    pub numbers: Series,
    pub with_missing: Series,
    pub labels: Series,
    pub table: DataFrame,
    pub table_missing: DataFrame,
    pub mixed: DataFrame,

    /// A dataset loaded from disk (None until the user loads a file).
    pub loaded: Option<DataFrame>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            numbers: samples::numbers(),
            with_missing: samples::with_missing(),
            labels: samples::labels(),
            table: samples::table(),
            table_missing: samples::table_missing(),
            mixed: samples::mixed(),
            loaded: None,
        }
    }
}

impl SessionState {
    /// Load a file into the session, replacing any earlier one.
    pub fn load(&mut self, path: &Path) -> Result<&DataFrame> {
        match load_file(path) {
            Ok(frame) => {
                let (rows, cols) = frame.shape();
                log::info!(
                    "Loaded {rows} rows x {cols} columns from {}: {:?}",
                    path.display(),
                    frame.dtypes()
                );
                Ok(self.loaded.insert(frame))
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.loaded = None;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_load_clears_the_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("t.csv");
        std::fs::write(&good, "x\n1\n2\n").unwrap();

        let mut state = SessionState::default();
        assert_eq!(state.load(&good).unwrap().shape(), (2, 1));
        assert!(state.loaded.is_some());

        assert!(state.load(&dir.path().join("missing.csv")).is_err());
        assert!(state.loaded.is_none());
    }
}
