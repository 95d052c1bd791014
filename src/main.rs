//! Relpack - source tree packager.
//!
//! Packages a directory and its install script for delivery:
//! - collects the tree (sweeping stale archives from earlier runs)
//! - writes a gzipped payload archive
//! - records the packaged file list in the install script
//! - assembles a delivery directory and re-archives it as `<output>.tgz`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use relpack::checksum;
use relpack::config::Config;
use relpack::error::{PackError, EXIT_OTHER};
use relpack::pipeline::{self, Pipeline};

#[derive(Parser)]
#[command(name = "relpack")]
#[command(about = "Package a source tree and its install script for delivery")]
#[command(
    after_help = "EXAMPLE:\n  relpack ./product ./dist/product-1.2\n  produces ./dist/product-1.2.tgz and its .sha256 sidecar"
)]
struct Cli {
    /// Directory to package
    source: Option<PathBuf>,

    /// Output location; the delivery directory is created here and the
    /// final archive lands at <OUTPUT>.tgz
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (source, output) = match (cli.source, cli.output) {
        (Some(source), Some(output)) => (source, output),
        // Missing arguments are a no-op, not a failure.
        _ => {
            print_usage();
            return ExitCode::SUCCESS;
        }
    };

    match run(source, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<PackError>()
                .map(PackError::exit_code)
                .unwrap_or(EXIT_OTHER);
            ExitCode::from(code)
        }
    }
}

fn run(source: PathBuf, output: PathBuf) -> Result<()> {
    pipeline::validate_source_dir(&source)?;
    pipeline::validate_output_path(&output)?;

    let config = Config::load(&std::env::current_dir()?);
    let pipeline = Pipeline::new(source, output, config);
    let artifact = pipeline.run()?;

    let sidecar = checksum::write_sidecar(&artifact)?;
    println!("  Checksum: {}", sidecar.display());
    println!("Packaged {}", artifact.display());
    Ok(())
}

fn print_usage() {
    println!("Usage: relpack <directory_to_archive> <output_path>");
    println!();
    println!("Packages <directory_to_archive> into <output_path>.tgz, recording");
    println!("the packaged file list in the tree's install script along the way.");
}
