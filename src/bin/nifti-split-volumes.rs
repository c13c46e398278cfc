//! Split the volumes of a NIfTI file on the given axis.
//!
//! Since reconstruction methods may require one NIfTI file per channel, a
//! file holding all channels in one volume needs to be split first.

use clap::Parser;
use env_logger::{Builder, Env};
use log::{error, info};
use nifti_split::{resolve_input_file, SplitError, SplitOptions};
use std::env;
use std::path::PathBuf;
use std::process;

const EXAMPLES: &str = "Examples:
  nifti-split-volumes volume.nii --axis=-1
  nifti-split-volumes volume.nii --axis=3
  nifti-split-volumes dwi -o channels";

/// Split the volumes on the given axis.
///
/// Axes are indexed zero-based; -1 addresses the last dimension, which is
/// also the default. Each volume is written to {name}_{index} with the
/// extension of the input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about, after_help = EXAMPLES)]
struct Args {
    /// The input volume, with or without its extension
    input_file: String,

    /// The axis to use for the split
    #[arg(short, long, default_value_t = -1, allow_hyphen_values = true)]
    axis: isize,

    /// The output directory, defaults to "split" next to the input file
    #[arg(short, long = "output_folder")]
    output_folder: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn working_directory() -> Result<PathBuf, SplitError> {
    env::current_dir().map_err(SplitError::WorkingDirectory)
}

fn run(args: &Args) -> Result<(), SplitError> {
    let input = resolve_input_file(&args.input_file, working_directory()?)?;

    let mut options = SplitOptions::new(&input).axis(args.axis);
    if let Some(folder) = &args.output_folder {
        options = options.output_folder(folder);
    }
    let output = options.output_directory()?;
    options.split()?;
    info!("Split volumes written to {}", output.display());
    Ok(())
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let mut builder = Builder::from_env(Env::default().default_filter_or(level));
    let _ = builder.format_timestamp(None);
    builder.init();

    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}
