// rotcheck - bitrot detection CLI
// Thin shell over the library: argument parsing, console rendering of
// status events and exit-code mapping.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use rotcheck::{Config, Severity, Status, StatusSink};

#[derive(Parser, Debug)]
#[command(name = "rotcheck", version)]
#[command(about = "Detect silent file corruption via per-directory hash indexes")]
struct Args {
    /// Directories to process
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Accept changed hashes and rebuild damaged indexes
    #[arg(short = 'f', long)]
    overwrite: bool,

    /// Verify without writing index files
    #[arg(short = 'r', long)]
    readonly: bool,

    /// Also report unchanged files and deleted indexes
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Delete index files instead of verifying
    #[arg(short = 'd', long)]
    delete: bool,

    /// Maximum hash computations in flight at once
    #[arg(long, default_value_t = 10)]
    workers: usize,
}

/// Renders status events as colored one-line reports.
struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn status(&self, status: Status, path: &Path) {
        let line = format!("{} {}", status.symbol(), path.display());
        match status.severity() {
            Severity::Error => eprintln!("{}", line.red()),
            Severity::Warning => eprintln!("{}", line.yellow()),
            Severity::Info => println!("{}", line),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(corrupted) if corrupted > 0 => {
            eprintln!("{}", format!("{} file(s) suspected corrupted", corrupted).red());
            ExitCode::from(1)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("error: {:#}", err).red());
            ExitCode::from(2)
        }
    }
}

async fn run(args: Args) -> Result<u64> {
    let config = Config {
        overwrite: args.overwrite,
        readonly: args.readonly,
        verbose: args.verbose,
        max_parallel_hashes: args.workers,
    };
    let sink: Arc<dyn StatusSink> = Arc::new(ConsoleSink);

    let mut corrupted = 0;
    for path in &args.paths {
        if args.delete {
            let removed = rotcheck::purge(path, &config, Arc::clone(&sink)).await?;
            if args.verbose {
                println!("{}: removed {} index file(s)", path.display(), removed);
            }
        } else {
            corrupted += rotcheck::verify(path, &config, Arc::clone(&sink)).await?;
        }
    }
    Ok(corrupted)
}
