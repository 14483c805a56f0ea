mod catalog;
mod choices;
mod discovery;
mod draft;
mod error;
mod executor;
mod file_picker;
mod keymap;
mod session;
mod text_input;
mod tui;
mod ui;

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, error};

use crate::catalog::{Catalog, DEFAULT_BINARY};
use crate::error::{Error, Result};

#[derive(Parser, Debug)]
#[command(name = "tmacs")]
#[command(about = "Build and run GROMACS commands from an interactive menu")]
struct Args {
    /// The GROMACS binary to run (e.g. "gmx" or "gmx_mpi")
    #[arg(long, default_value = DEFAULT_BINARY)]
    binary: String,

    /// Directory to search for input files and run the command in
    #[arg(short = 'C', long)]
    directory: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the subcommand and flag tables as JSON and exit
    #[arg(long)]
    debug: bool,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = log_file {
        let file = File::create(path).map_err(|source| Error::LogFile {
            path: path.to_path_buf(),
            source,
        })?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn working_directory(directory: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match directory {
        Some(dir) => dir,
        None => std::env::current_dir().map_err(Error::WorkingDirectory)?,
    };
    let dir = dir.canonicalize().map_err(Error::WorkingDirectory)?;
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir));
    }
    Ok(dir)
}

fn run(args: Args) -> Result<()> {
    init_logging(args.log_file.as_deref())?;

    if args.debug {
        println!("{}", Catalog::new(&args.binary).to_json()?);
        return Ok(());
    }

    let workdir = working_directory(args.directory)?;
    let picker_dir = dirs::home_dir().unwrap_or_else(|| workdir.clone());
    debug!("Working directory: {}", workdir.display());

    tui::run(&args.binary, &workdir, &picker_dir)
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
