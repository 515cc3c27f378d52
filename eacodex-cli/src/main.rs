//! eacodex CLI
//!
//! A Pure Rust tool for inspecting and unpacking EA game containers in the
//! HUFF, JDLZ, REF, BTREE and COMP formats.

use clap::{Parser, Subcommand};
use eacodex::{Format, decompress, detect, query_size};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eacodex")]
#[command(
    author,
    version,
    about = "Inspect and unpack EA game compression containers"
)]
#[command(long_about = "
eacodex reads the self-describing containers found in EA game assets and
decompresses them. Supported formats: HUFF, JDLZ, REF, BTREE, COMP

Examples:
  eacodex detect GLOBALB.BUN
  eacodex info --json TRACKS.BIN
  eacodex unpack FRONTEND.BIN frontend.raw
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the container format of a file
    #[command(alias = "d")]
    Detect {
        /// File to detect
        file: PathBuf,
    },

    /// Show information about a compressed file
    #[command(alias = "i")]
    Info {
        /// File to inspect
        file: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Decompress a file
    #[command(alias = "x")]
    Unpack {
        /// Compressed input file
        input: PathBuf,

        /// Destination for the decompressed data
        output: PathBuf,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Detect { file } => cmd_detect(&file),
        Commands::Info { file, json } => cmd_info(&file, json),
        Commands::Unpack {
            input,
            output,
            verbose,
        } => cmd_unpack(&input, &output, verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_detect(file: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(file)?;
    let format = detect(&data);

    println!("File: {}", file.display());
    println!("Format: {}", format);
    println!("Magic bytes: {:02X?}", &data[..data.len().min(16)]);

    Ok(())
}

/// Machine-readable `info` output.
#[derive(Serialize)]
struct FileInfo {
    file: String,
    format: &'static str,
    compressed_size: u64,
    decompressed_size: Option<u64>,
    ratio_percent: Option<f64>,
}

fn cmd_info(file: &PathBuf, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(file)?;
    let format = detect(&data);
    let declared = query_size(&data).ok();

    let ratio = declared.and_then(|n| {
        if n > 0 {
            Some((1.0 - data.len() as f64 / n as f64) * 100.0)
        } else {
            None
        }
    });

    if json {
        let info = FileInfo {
            file: file.display().to_string(),
            format: format.name(),
            compressed_size: data.len() as u64,
            decompressed_size: declared.map(|n| n as u64),
            ratio_percent: ratio,
        };
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("File Information");
    println!("================");
    println!("File: {}", file.display());
    println!("Format: {}", format);
    println!("Compressed size: {} bytes", data.len());
    match declared {
        Some(n) => println!("Decompressed size: {} bytes", n),
        None => println!("Decompressed size: unknown"),
    }
    if let Some(r) = ratio {
        println!("Compression ratio: {:.1}%", r);
    }

    Ok(())
}

fn cmd_unpack(
    input: &PathBuf,
    output: &PathBuf,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let format = detect(&data);
    if format == Format::Unknown {
        return Err(format!("{}: unrecognized container format", input.display()).into());
    }

    println!(
        "Unpacking {} ({}) to {}",
        input.display(),
        format,
        output.display()
    );

    let size = query_size(&data)?;
    let mut out = vec![0u8; size];
    let written = decompress(&data, &mut out)?;
    fs::write(output, &out[..written])?;

    if verbose {
        println!("  Compressed: {} bytes", data.len());
        println!("  Decompressed: {} bytes", written);
        if written > 0 {
            println!(
                "  Ratio: {:.1}%",
                (1.0 - data.len() as f64 / written as f64) * 100.0
            );
        }
    }

    println!("Wrote {} bytes", written);
    Ok(())
}
