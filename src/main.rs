use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "strata", version, about = "Frame-oriented compression codec")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compress a file into a strata frame.
    Compress {
        input: PathBuf,
        output: PathBuf,
        /// Compression level (0 means the default).
        #[arg(short, long, default_value_t = 0)]
        level: i32,
    },
    /// Decompress a frame of any supported format version.
    Decompress { input: PathBuf, output: PathBuf },
    /// Print a frame's header fields as JSON without decoding it.
    Inspect { input: PathBuf },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Compress {
            input,
            output,
            level,
        } => {
            let data = fs::read(&input)?;
            let frame = strata::compress(&data, level)?;
            fs::write(&output, &frame)?;
            eprintln!(
                "{} -> {} bytes ({})",
                data.len(),
                frame.len(),
                hex::encode(&frame[..4])
            );
        }
        Command::Decompress { input, output } => {
            let data = fs::read(&input)?;
            let out = strata::decompress(&data)?;
            fs::write(&output, &out)?;
            eprintln!("{} -> {} bytes", data.len(), out.len());
        }
        Command::Inspect { input } => {
            let data = fs::read(&input)?;
            let info = strata::frame_info(&data)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }
    Ok(())
}
