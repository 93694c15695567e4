//! bgm-split - BGM container splitter
//!
//! Splits a BGM container into its sequences (.SEQ) and its
//! reconstructed bank header (.VH)

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bgm-split")]
#[command(about = "Split a BGM container into SEQ and VH files")]
#[command(version)]
struct Cli {
    /// Input BGM container
    input: PathBuf,

    /// Output directory (defaults to the input's directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    tracing::info!("Splitting {:?}", cli.input);
    let written = bgm_split::split_file(&cli.input, cli.output.as_deref())?;
    tracing::info!("Done! {} files written", written.len());

    Ok(())
}
