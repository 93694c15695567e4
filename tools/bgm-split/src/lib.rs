//! bgm-split library
//!
//! Reads one BGM container, reconstructs its sequences and bank header with
//! `seqvab`, and writes them as `.SEQ` and `.VH` files.

pub mod output;

pub use output::{OutputNames, write_outputs};

use anyhow::{Context, Result};
use seqvab::{RawBankLayout, SeqHeader, split_container};
use std::path::{Path, PathBuf};

/// Split `input` and write its outputs, returning the paths written
pub fn split_file(input: &Path, output_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    let data = std::fs::read(input).with_context(|| format!("Failed to read {:?}", input))?;
    tracing::debug!("Read {} bytes from {:?}", data.len(), input);

    let split = split_container(&data).with_context(|| format!("Failed to split {:?}", input))?;

    for (index, chunk) in split.chunks.iter().enumerate() {
        if let Ok(header) = SeqHeader::from_raw_track(chunk.payload(&data)) {
            tracing::info!(
                "Sequence {}: offset 0x{:X}, {} bytes, {} ppqn, {:.1} bpm, {}/{}",
                index,
                chunk.offset,
                chunk.size,
                header.resolution,
                header.bpm().unwrap_or(0.0),
                header.rhythm[0],
                1u32.checked_shl(header.rhythm[1] as u32).unwrap_or(0),
            );
        }
    }
    if split.sequences.is_empty() {
        tracing::warn!("{:?} holds no sequences, writing bank header only", input);
    }

    if let Ok(layout) = RawBankLayout::parse(&data[split.bank_offset..]) {
        tracing::info!(
            "Bank at 0x{:X}: {} programs, {} tones, {} VAGs, waveform size {} bytes",
            split.bank_offset,
            layout.num_programs,
            layout.num_tones,
            layout.num_vags,
            layout.waveform_size,
        );
    }

    let names = OutputNames::for_input(input, output_dir)?;
    let written = write_outputs(&names, &split)?;
    for path in &written {
        tracing::info!("Wrote {:?}", path);
    }
    Ok(written)
}
