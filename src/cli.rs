use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::data::describe::Include;
use crate::render::Format;

#[derive(Parser)]
#[command(name = "panda-stats")]
#[command(about = "Descriptive statistics walkthrough over small tabular datasets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the notebook cells in order
    Run {
        /// Run only a specific cell
        #[arg(long)]
        cell: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List the notebook cells
    List,

    /// Summarise a CSV, JSON or Parquet file
    Describe {
        /// Path to the data file
        path: PathBuf,

        /// Percentiles to report, e.g. `0.1,0.9` (the median is always added)
        #[arg(long, value_delimiter = ',')]
        percentiles: Vec<f64>,

        /// Which columns to summarise
        #[arg(long, value_enum, default_value_t = IncludeArg::Numeric)]
        include: IncludeArg,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Write the sample datasets as Parquet and CSV files
    Export {
        /// Output directory
        #[arg(short, long, default_value = "samples")]
        dir: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl From<OutputFormat> for Format {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Table => Format::Table,
            OutputFormat::Json => Format::Json,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IncludeArg {
    Numeric,
    Object,
    All,
}

impl From<IncludeArg> for Include {
    fn from(i: IncludeArg) -> Self {
        match i {
            IncludeArg::Numeric => Include::Numeric,
            IncludeArg::Object => Include::Object,
            IncludeArg::All => Include::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn describe_flags_parse() {
        let cli = Cli::parse_from([
            "panda-stats",
            "describe",
            "data.csv",
            "--percentiles",
            "0.1,0.9",
            "--include",
            "all",
        ]);
        match cli.command {
            Commands::Describe {
                percentiles,
                include,
                format,
                ..
            } => {
                assert_eq!(percentiles, vec![0.1, 0.9]);
                assert!(include == IncludeArg::All);
                assert!(format == OutputFormat::Table);
            }
            _ => panic!("expected describe"),
        }
    }
}
