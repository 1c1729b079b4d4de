use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;

use panda_stats::app::NotebookApp;
use panda_stats::cli::{Cli, Commands};
use panda_stats::data::describe::DescribeOptions;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Run { cell, format } => {
            let app = NotebookApp::with_format(format.into());
            app.run(&mut out, cell.as_deref())?;
        }
        Commands::List => NotebookApp::default().list(&mut out)?,
        Commands::Describe {
            path,
            percentiles,
            include,
            format,
        } => {
            let mut opts = DescribeOptions::default().include(include.into());
            if !percentiles.is_empty() {
                opts = opts.percentiles(percentiles);
            }
            let mut app = NotebookApp::with_format(format.into());
            app.describe_file(&mut out, &path, &opts)?;
        }
        Commands::Export { dir } => NotebookApp::default().export(&mut out, &dir)?,
    }

    out.flush()?;
    Ok(())
}
