//! Seqvab: sequence and bank header reconstruction for concatenated BGM containers
//!
//! A BGM container stores one or more raw sequence chunks back-to-back,
//! followed by a single raw bank (VAB header) region. The container strips the
//! standard `pQES` and `pBAV` headers, and nothing records where one chunk ends
//! and the next begins. This crate recovers both:
//!
//! - [`scan_chunks`] partitions the sequence region by locating each chunk's
//!   end-of-track marker behind its declared size and trailing zero padding
//! - [`build_seq`] turns a raw track into a standalone `pQES` sequence file
//! - [`build_vab_header`] rebuilds a fixed-capacity `pBAV` header from the
//!   variably-sized raw bank dump
//! - [`split_container`] runs all three over one buffer
//!
//! # Container Layout
//!
//! ```text
//! [u32 size][track payload ... FF 2F 00][zero pad]   chunk 0
//! [u32 size][track payload ... FF 2F 00][zero pad]   chunk 1
//! ...
//! [raw bank region ......................................] <- bank_offset
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use seqvab::split_container;
//!
//! let data = std::fs::read("BGM_01.BIN")?;
//! let split = split_container(&data)?;
//!
//! for (i, seq) in split.sequences.iter().enumerate() {
//!     std::fs::write(format!("BGM_01_{i:02}.SEQ"), seq)?;
//! }
//! std::fs::write("BGM_01.VH", &split.vab_header)?;
//! ```

mod container;
mod error;
mod io;
mod scan;
mod seq;
mod vab;

pub use container::{SplitContainer, split_container};
pub use error::BgmError;
pub use scan::{Chunk, ChunkScan, probe_chunk, scan_chunks};
pub use seq::{SeqHeader, build_seq};
pub use vab::{RawBankLayout, build_vab_header, mask_tone_slot};

// =============================================================================
// Sequence Constants
// =============================================================================

/// End-of-track meta event closing every raw track
pub const END_OF_TRACK: [u8; 3] = [0xFF, 0x2F, 0x00];

/// Size of the little-endian chunk size field leading every chunk
pub const CHUNK_SIZE_FIELD: usize = 4;

/// Sequence file magic
pub const SEQ_MAGIC: &[u8; 4] = b"pQES";

/// Sequence file version (stored big-endian)
pub const SEQ_VERSION: u32 = 1;

// =============================================================================
// Bank Constants
// =============================================================================

/// Bank header magic
pub const VAB_MAGIC: &[u8; 4] = b"pBAV";

/// Bank header version (stored little-endian)
pub const VAB_VERSION: u32 = 5;

/// Program slots in a canonical bank header
pub const MAX_PROGRAMS: usize = 128;

/// Tone slots per program in a canonical bank header
pub const TONES_PER_PROGRAM: usize = 16;

/// Size of one program attribute record
pub const PROGRAM_SLOT_SIZE: usize = 16;

/// Size of one tone attribute record
pub const TONE_SLOT_SIZE: usize = 32;

/// Entries in the canonical VAG offset table
pub const VAG_TABLE_ENTRIES: usize = 256;

/// Offset of the program table in a canonical bank header
pub const VAB_PROGRAM_TABLE_OFFSET: usize = 0x20;

/// Offset of the tone table in a canonical bank header
pub const VAB_TONE_TABLE_OFFSET: usize =
    VAB_PROGRAM_TABLE_OFFSET + MAX_PROGRAMS * PROGRAM_SLOT_SIZE;

/// Offset of the VAG offset table in a canonical bank header
pub const VAB_VAG_TABLE_OFFSET: usize =
    VAB_TONE_TABLE_OFFSET + MAX_PROGRAMS * TONES_PER_PROGRAM * TONE_SLOT_SIZE;

/// Total size of a canonical bank header
pub const VAB_HEADER_SIZE: usize = VAB_VAG_TABLE_OFFSET + VAG_TABLE_ENTRIES * 2;

// =============================================================================
// Tests
// =============================================================================
