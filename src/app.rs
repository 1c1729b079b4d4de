use std::io::Write;
use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::cells::{cells, find, Cell};
use crate::data::describe::DescribeOptions;
use crate::data::writer::export_samples;
use crate::render::{render, Format, Output};
use crate::state::SessionState;

// ---------------------------------------------------------------------------
// Headless notebook
// ---------------------------------------------------------------------------

pub struct NotebookApp {
    pub state: SessionState,
    pub format: Format,
}

impl Default for NotebookApp {
    fn default() -> Self {
        Self {
            state: SessionState::default(),
            format: Format::Table,
        }
    }
}

#[derive(Serialize)]
struct CellReport {
    name: &'static str,
    title: &'static str,
    prose: &'static str,
    output: Output,
}

impl NotebookApp {
    pub fn with_format(format: Format) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Run every cell top to bottom, or just `cell_filter`. Returns the
    /// number of cells run.
    pub fn run<W: Write>(&self, out: &mut W, cell_filter: Option<&str>) -> Result<usize> {
        let start = Instant::now();
        let selected: Vec<Cell> = match cell_filter {
            None => cells(),
            Some(name) => match find(name) {
                Some(cell) => vec![cell],
                None => {
                    let known: Vec<&str> = cells().iter().map(|c| c.name).collect();
                    bail!("unknown cell '{name}'; available: {}", known.join(", "))
                }
            },
        };

        let mut reports = Vec::with_capacity(selected.len());
        for cell in &selected {
            log::debug!("running cell {}", cell.name);
            let output = (cell.run)(&self.state)
                .with_context(|| format!("cell '{}' failed", cell.name))?;
            match self.format {
                Format::Table => {
                    writeln!(out, "## {}  [{}]", cell.title, cell.name)?;
                    writeln!(out, "{}", cell.prose)?;
                    writeln!(out)?;
                    writeln!(out, "{}", render(&output, Format::Table)?)?;
                    writeln!(out)?;
                }
                Format::Json => reports.push(CellReport {
                    name: cell.name,
                    title: cell.title,
                    prose: cell.prose,
                    output,
                }),
            }
        }
        if self.format == Format::Json {
            writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?;
        }

        log::info!(
            "Completed {} cells in {:.3}s",
            selected.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(selected.len())
    }

    /// One line per cell: name and title.
    pub fn list<W: Write>(&self, out: &mut W) -> Result<()> {
        for cell in cells() {
            writeln!(out, "{:<28} {}", cell.name, cell.title)?;
        }
        Ok(())
    }

    /// Load a file and print its summary table.
    pub fn describe_file<W: Write>(
        &mut self,
        out: &mut W,
        path: &Path,
        opts: &DescribeOptions,
    ) -> Result<()> {
        let format = self.format;
        let frame = self.state.load(path)?;
        let summary = frame.describe(opts)?;
        writeln!(out, "{}", render(&summary.into(), format)?)?;
        Ok(())
    }

    /// Export the sample datasets and print the written paths.
    pub fn export<W: Write>(&self, out: &mut W, dir: &Path) -> Result<()> {
        for path in export_samples(dir)? {
            writeln!(out, "{}", path.display())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_string(app: &NotebookApp, cell: Option<&str>) -> Result<String> {
        let mut buf = Vec::new();
        app.run(&mut buf, cell)?;
        Ok(String::from_utf8(buf)?)
    }

    #[test]
    fn single_cell_in_table_form() {
        let app = NotebookApp::default();
        let text = run_to_string(&app, Some("sum_numbers")).unwrap();
        assert!(text.starts_with("## Sum of a series  [sum_numbers]"));
        assert!(text.contains("\n31\n"));
    }

    #[test]
    fn whole_notebook_as_json() {
        let app = NotebookApp::with_format(Format::Json);
        let text = run_to_string(&app, None).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        let reports = parsed.as_array().unwrap();
        assert_eq!(reports.len(), cells().len());
        assert_eq!(reports[0]["name"], "sum_numbers");
        assert_eq!(reports[0]["output"]["data"], 31);
    }

    #[test]
    fn unknown_cell_lists_alternatives() {
        let app = NotebookApp::default();
        let err = run_to_string(&app, Some("nope")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown cell 'nope'"));
        assert!(msg.contains("describe_mixed_all"));
    }

    #[test]
    fn describe_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        std::fs::write(&path, "who,points\nA,1\nB,2\nC,\n").unwrap();

        let mut app = NotebookApp::default();
        let mut buf = Vec::new();
        app.describe_file(&mut buf, &path, &DescribeOptions::default())
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("points"));
        assert!(text.contains("1.5"));
        assert!(app.state.loaded.is_some());
    }
}
