//! Sequence chunk scanner
//!
//! Chunks carry no type tag and no delimiter. A chunk is recognised when its
//! declared size, minus trailing zero padding, lands on an end-of-track marker.
//! The first offset that fails this test is the start of the bank region.

use std::ops::Range;

use crate::error::BgmError;
use crate::io::read_u32;
use crate::{CHUNK_SIZE_FIELD, END_OF_TRACK};

/// One sequence chunk inside a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Offset of the chunk's size field
    pub offset: usize,
    /// Declared chunk size, including the size field and padding
    pub size: usize,
}

impl Chunk {
    /// Offset one past the last byte of the chunk
    pub fn end(&self) -> usize {
        self.offset + self.size
    }

    /// Full chunk range, size field included
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    /// Raw track range, size field excluded
    pub fn payload_range(&self) -> Range<usize> {
        self.offset + CHUNK_SIZE_FIELD..self.end()
    }

    /// Borrow the raw track from the container this chunk was scanned from
    pub fn payload<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        &data[self.payload_range()]
    }
}

/// Result of scanning a container's sequence region
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkScan {
    /// Chunks in file order, contiguous from offset 0
    pub chunks: Vec<Chunk>,
    /// First byte after the last chunk (start of the bank region)
    pub region_end: usize,
    /// Why the chunk at `region_end` was rejected
    pub stop: BgmError,
}

/// Test whether a sequence chunk starts at `offset`
///
/// Reads the chunk size, walks backward over trailing zero bytes from the
/// chunk's last byte, steps back once more to skip the marker's own trailing
/// zero, and compares the three bytes found there with [`END_OF_TRACK`].
///
/// # Errors
/// * `TruncatedInput` - the size field or the declared chunk runs past `data`
/// * `MissingTerminator` - the chunk is empty, all zeros, or has no marker
pub fn probe_chunk(data: &[u8], offset: usize) -> Result<Chunk, BgmError> {
    let size = read_u32(data, offset, "chunk size")? as usize;
    if size <= CHUNK_SIZE_FIELD {
        return Err(BgmError::MissingTerminator { offset });
    }

    let end = offset
        .checked_add(size)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| BgmError::truncated("chunk", offset, size, data.len() - offset))?;

    let payload_start = offset + CHUNK_SIZE_FIELD;
    let mut pos = end - 1;
    while data[pos] == 0 {
        if pos == payload_start {
            return Err(BgmError::MissingTerminator { offset });
        }
        pos -= 1;
    }

    // The zero-skip also consumed the marker's final 0x00
    if pos > offset {
        pos -= 1;
    }

    match data.get(pos..pos + END_OF_TRACK.len()) {
        Some(marker) if marker == END_OF_TRACK => Ok(Chunk { offset, size }),
        _ => Err(BgmError::MissingTerminator { offset }),
    }
}

/// Split the leading sequence region of a container into chunks
///
/// Scanning starts at offset 0 and stops at the first offset that does not
/// hold a valid chunk. This never fails: an empty chunk list with
/// `region_end == 0` means the container starts directly with bank data.
pub fn scan_chunks(data: &[u8]) -> ChunkScan {
    let mut chunks = Vec::new();
    let mut offset = 0;

    loop {
        match probe_chunk(data, offset) {
            Ok(chunk) => {
                tracing::debug!(
                    offset = chunk.offset,
                    size = chunk.size,
                    "found sequence chunk"
                );
                offset = chunk.end();
                chunks.push(chunk);
            }
            Err(stop) => {
                tracing::debug!(offset, %stop, "sequence region ends");
                return ChunkScan {
                    chunks,
                    region_end: offset,
                    stop,
                };
            }
        }
    }
}
