use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use romflip::{transform_stream, write_table_dump, DumpFormat, Error, FlipTable};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(
    about = "romflip - Convert character-generator ROM images between C1P and C2/C4 bit order"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bit-reverse every byte of a ROM image
    Convert {
        /// Input image (stdin if omitted or "-")
        input: Option<PathBuf>,

        /// Output image (stdout if omitted or "-")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the bit-reversal table
    Dump {
        /// Listing format (text or json)
        #[arg(short, long, default_value_t = DumpFormat::Text)]
        format: DumpFormat,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let table = FlipTable::build_with(|entry| log::debug!("{entry}"));

    match cli.command {
        Commands::Convert { input, output } => {
            let n = match (stdio_or_path(input), stdio_or_path(output)) {
                (Some(input), Some(output)) => convert_paths(&table, &input, &output)?,
                (input, output) => convert_stream(&table, input.as_deref(), output.as_deref())?,
            };
            log::info!("converted {n} bytes");
        }
        Commands::Dump { format } => {
            write_table_dump(&table, format, io::stdout().lock())
                .context("failed to write table dump")?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Treat "-" the same as an omitted path
fn stdio_or_path(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| p.as_os_str() != "-")
}

#[cfg(feature = "mmap")]
fn convert_paths(table: &FlipTable, input: &Path, output: &Path) -> anyhow::Result<u64> {
    Ok(romflip::convert_file(table, input, output)?)
}

#[cfg(not(feature = "mmap"))]
fn convert_paths(table: &FlipTable, input: &Path, output: &Path) -> anyhow::Result<u64> {
    convert_stream(table, Some(input), Some(output))
}

fn convert_stream(
    table: &FlipTable,
    input: Option<&Path>,
    output: Option<&Path>,
) -> anyhow::Result<u64> {
    let reader: Box<dyn Read> = match input {
        Some(path) => Box::new(File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?),
        None => Box::new(io::stdin().lock()),
    };

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path).map_err(|source| {
            Error::Create {
                path: path.to_path_buf(),
                source,
            }
        })?)),
        None => Box::new(io::stdout().lock()),
    };

    Ok(transform_stream(table, reader, writer)?)
}
