use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parquet::arrow::ArrowWriter;

use super::columnar::to_record_batch;
use super::frame::DataFrame;
use super::model::Value;
use super::samples;

/// Write a frame as a single-batch Parquet file.
pub fn write_parquet(frame: &DataFrame, path: &Path) -> Result<()> {
    let batch = to_record_batch(frame, false)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// Write a frame as CSV. Missing values become empty cells.
pub fn write_csv(frame: &DataFrame, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(frame.column_names())?;
    for row in 0..frame.shape().0 {
        let cells = frame.columns().iter().map(|col| match &col.values()[row] {
            Value::Null => String::new(),
            v => v.to_string(),
        });
        writer.write_record(cells)?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Export every sample dataset as `<name>.parquet` and `<name>.csv`.
pub fn export_samples(dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut written = Vec::new();
    for (name, frame) in samples::catalogue() {
        let parquet_path = dir.join(format!("{name}.parquet"));
        write_parquet(&frame, &parquet_path)?;
        let csv_path = dir.join(format!("{name}.csv"));
        write_csv(&frame, &csv_path)?;
        log::info!("Wrote {name} ({} rows) to {}", frame.shape().0, dir.display());
        written.push(parquet_path);
        written.push(csv_path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_file;

    #[test]
    fn exported_samples_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_samples(dir.path()).unwrap();
        assert_eq!(written.len(), 12);

        let mixed = load_file(&dir.path().join("mixed.parquet")).unwrap();
        assert_eq!(mixed, samples::mixed());

        let from_csv = load_file(&dir.path().join("table_missing.csv")).unwrap();
        assert_eq!(from_csv.sum().unwrap().get("B"), Some(&Value::Float(80.0)));
        assert_eq!(from_csv.column("B").unwrap().count(), 3);
    }
}
