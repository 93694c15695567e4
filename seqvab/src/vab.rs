//! `pBAV` bank header reconstruction
//!
//! The container keeps only the occupied part of each bank table. The
//! canonical header has fixed capacities, so every table is padded back out.
//!
//! # Raw Bank Layout
//! ```text
//! 0x00: waveform total size (u32)
//! 0x04: unknown (u32)
//! 0x08: VAG offset table position (u32)
//! 0x0C: tone slots reserved per program (u32)
//! 0x10: metadata block (16 bytes, copied verbatim)
//!       0x12: program count (u16)
//!       0x14: tone count (u16)
//!       0x16: VAG count (u16)
//!       0x18: master volume, master pan, bank attributes 1/2 (u8 each)
//! 0x20: program table (program count * 16 bytes)
//! ....: tone table (program count * reserved tones * 32 bytes)
//! ....: VAG offset table (u16 entries) to end of region
//! ```
//!
//! # Canonical Header Layout
//! ```text
//! 0x00000: "pBAV", version 5, VAB id 0, waveform total size
//! 0x00010: metadata block
//! 0x00020: 128 program slots
//! 0x00820: 128 * 16 tone slots
//! 0x10820: 256 VAG offsets
//! ```

use crate::error::BgmError;
use crate::io::{read_bytes, read_u8, read_u16, read_u32};
use crate::{
    MAX_PROGRAMS, PROGRAM_SLOT_SIZE, TONE_SLOT_SIZE, TONES_PER_PROGRAM, VAB_HEADER_SIZE,
    VAB_MAGIC, VAB_VAG_TABLE_OFFSET, VAB_VERSION, VAG_TABLE_ENTRIES,
};

/// Fill pattern for program slots with no program
const UNUSED_PROGRAM: [u8; PROGRAM_SLOT_SIZE] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
];

/// Tone slot byte ranges cleared in padding copies
const MASKED_TONE_RANGES: [(usize, usize); 2] = [(0x00, 0x0C), (0x10, 0x18)];

/// Start of the metadata block in the raw bank
const RAW_META_OFFSET: usize = 0x10;

/// Start of the program table in the raw bank
const RAW_PROGRAM_TABLE: usize = 0x20;

/// Fixed-position fields of a raw bank region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBankLayout {
    /// Total size of the waveform body
    pub waveform_size: u32,
    /// Offset of the VAG offset table within the raw bank
    pub vag_table_offset: u32,
    /// Tone slots reserved per program in the raw tone table
    pub max_tones_per_program: u32,
    /// Number of programs stored
    pub num_programs: u16,
    /// Number of tones across all programs
    pub num_tones: u16,
    /// Number of VAG waveforms
    pub num_vags: u16,
    pub master_volume: u8,
    pub master_pan: u8,
    pub attributes: [u8; 2],
}

impl RawBankLayout {
    /// Size of the fixed fields preceding the program table
    pub const SIZE: usize = RAW_PROGRAM_TABLE;

    /// Read the fixed fields of a raw bank region
    pub fn parse(raw: &[u8]) -> Result<Self, BgmError> {
        read_bytes(raw, 0, Self::SIZE, "bank header")?;
        Ok(Self {
            waveform_size: read_u32(raw, 0x00, "waveform size")?,
            vag_table_offset: read_u32(raw, 0x08, "VAG table offset")?,
            max_tones_per_program: read_u32(raw, 0x0C, "tones per program")?,
            num_programs: read_u16(raw, 0x12, "program count")?,
            num_tones: read_u16(raw, 0x14, "tone count")?,
            num_vags: read_u16(raw, 0x16, "VAG count")?,
            master_volume: read_u8(raw, 0x18, "master volume")?,
            master_pan: read_u8(raw, 0x19, "master pan")?,
            attributes: [
                read_u8(raw, 0x1A, "bank attribute")?,
                read_u8(raw, 0x1B, "bank attribute")?,
            ],
        })
    }
}

/// Derive a padding tone slot from a real one
///
/// Clears bytes `0x00..0x0C` and `0x10..0x18`; the waveform reference fields
/// are kept.
pub fn mask_tone_slot(slot: &[u8; TONE_SLOT_SIZE]) -> [u8; TONE_SLOT_SIZE] {
    let mut masked = *slot;
    for (start, end) in MASKED_TONE_RANGES {
        masked[start..end].fill(0);
    }
    masked
}

/// Template repeated after a program's real tones
///
/// The last real tone when there is one. A program without tones falls back
/// to the first slot of its reserved stride, or a blank slot when the raw
/// table reserves none.
fn padding_template(
    raw: &[u8],
    cursor: usize,
    tones: &[u8],
    max_tones: usize,
) -> Result<[u8; TONE_SLOT_SIZE], BgmError> {
    let source = match tones.chunks_exact(TONE_SLOT_SIZE).last() {
        Some(last) => last,
        None if max_tones == 0 => return Ok([0; TONE_SLOT_SIZE]),
        None => read_bytes(raw, cursor, TONE_SLOT_SIZE, "tone table")?,
    };
    let mut slot = [0u8; TONE_SLOT_SIZE];
    slot.copy_from_slice(source);
    Ok(mask_tone_slot(&slot))
}

/// Rebuild a canonical bank header from a raw bank region
///
/// The result is always [`VAB_HEADER_SIZE`] bytes long.
///
/// # Errors
/// * `TruncatedInput` - a fixed field, the program table or a program's tones
///   run past the end of `raw`
/// * `InvalidTableLayout` - more than 128 programs, a tone count above 16 or
///   above the reserved stride, or a VAG table that is misplaced, odd-sized or
///   longer than 256 entries
pub fn build_vab_header(raw: &[u8]) -> Result<Vec<u8>, BgmError> {
    let layout = RawBankLayout::parse(raw)?;

    let ps = layout.num_programs as usize;
    if ps > MAX_PROGRAMS {
        return Err(BgmError::layout(
            "program count",
            0x12,
            format!("{ps} programs exceed the {MAX_PROGRAMS} slot table"),
        ));
    }
    let max_tones = layout.max_tones_per_program as usize;
    let stride = max_tones
        .checked_mul(TONE_SLOT_SIZE)
        .ok_or_else(|| BgmError::layout("tones per program", 0x0C, "stride overflows"))?;

    tracing::debug!(
        programs = ps,
        tones = layout.num_tones,
        vags = layout.num_vags,
        max_tones,
        "rebuilding bank header"
    );

    let mut out = Vec::with_capacity(VAB_HEADER_SIZE);
    out.extend_from_slice(VAB_MAGIC);
    out.extend_from_slice(&VAB_VERSION.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // VAB id
    out.extend_from_slice(&layout.waveform_size.to_le_bytes());
    out.extend_from_slice(&raw[RAW_META_OFFSET..RAW_PROGRAM_TABLE]);

    // Programs
    let programs = read_bytes(raw, RAW_PROGRAM_TABLE, ps * PROGRAM_SLOT_SIZE, "program table")?;
    out.extend_from_slice(programs);
    for _ in ps..MAX_PROGRAMS {
        out.extend_from_slice(&UNUSED_PROGRAM);
    }

    // Tones
    let mut cursor = RAW_PROGRAM_TABLE + programs.len();
    for (pn, program) in programs.chunks_exact(PROGRAM_SLOT_SIZE).enumerate() {
        let ts = program[0] as usize;
        let count_offset = RAW_PROGRAM_TABLE + pn * PROGRAM_SLOT_SIZE;
        if ts > TONES_PER_PROGRAM {
            return Err(BgmError::layout(
                "tone count",
                count_offset,
                format!("program {pn} has {ts} tones, at most {TONES_PER_PROGRAM} fit"),
            ));
        }
        if ts > max_tones {
            return Err(BgmError::layout(
                "tone count",
                count_offset,
                format!("program {pn} has {ts} tones in a stride of {max_tones}"),
            ));
        }

        let tones = read_bytes(raw, cursor, ts * TONE_SLOT_SIZE, "tone table")?;
        out.extend_from_slice(tones);

        let template = padding_template(raw, cursor, tones, max_tones)?;
        for _ in ts..TONES_PER_PROGRAM {
            out.extend_from_slice(&template);
        }

        cursor = cursor
            .checked_add(stride)
            .ok_or_else(|| BgmError::layout("tone table", cursor, "offset overflows"))?;
    }
    // Unused programs own blank tone slots
    out.resize(VAB_VAG_TABLE_OFFSET, 0);

    // VAG offsets
    let vag_offset = layout.vag_table_offset as usize;
    let table = raw.get(vag_offset..).ok_or_else(|| {
        BgmError::layout(
            "VAG offset table",
            0x08,
            format!("0x{vag_offset:X} lies past the end of a {}-byte bank", raw.len()),
        )
    })?;
    if table.len() % 2 != 0 {
        return Err(BgmError::layout(
            "VAG offset table",
            vag_offset,
            format!("{} bytes is not a whole number of entries", table.len()),
        ));
    }
    if table.len() / 2 > VAG_TABLE_ENTRIES {
        return Err(BgmError::layout(
            "VAG offset table",
            vag_offset,
            format!(
                "{} entries exceed the {VAG_TABLE_ENTRIES} entry table",
                table.len() / 2
            ),
        ));
    }
    out.extend_from_slice(table);
    out.resize(VAB_HEADER_SIZE, 0);

    Ok(out)
}
