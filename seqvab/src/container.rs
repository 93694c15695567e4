//! Whole-container splitting

use crate::error::BgmError;
use crate::scan::{Chunk, scan_chunks};
use crate::seq::build_seq;
use crate::vab::build_vab_header;
use crate::CHUNK_SIZE_FIELD;

/// Resources recovered from one container
#[derive(Debug, Clone)]
pub struct SplitContainer {
    /// Sequence chunks in file order
    pub chunks: Vec<Chunk>,
    /// One `pQES` file per chunk
    pub sequences: Vec<Vec<u8>>,
    /// Canonical `pBAV` header
    pub vab_header: Vec<u8>,
    /// Start of the raw bank region in the container
    pub bank_offset: usize,
}

/// Split a container into sequence files and a bank header
///
/// # Errors
/// * `TruncatedInput` - the container cannot hold a chunk size field, or a
///   track or bank field runs past the end
/// * `InvalidTableLayout` - the bank tables are inconsistent
pub fn split_container(data: &[u8]) -> Result<SplitContainer, BgmError> {
    if data.len() < CHUNK_SIZE_FIELD {
        return Err(BgmError::truncated(
            "chunk size",
            0,
            CHUNK_SIZE_FIELD,
            data.len(),
        ));
    }

    let scan = scan_chunks(data);
    if scan.chunks.is_empty() {
        tracing::warn!(stop = %scan.stop, "no sequence chunks found, bank starts at offset 0");
    }

    let sequences = scan
        .chunks
        .iter()
        .map(|chunk| {
            build_seq(chunk.payload(data)).map_err(|e| rebase(e, chunk.offset + CHUNK_SIZE_FIELD))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let vab_header =
        build_vab_header(&data[scan.region_end..]).map_err(|e| rebase(e, scan.region_end))?;

    Ok(SplitContainer {
        chunks: scan.chunks,
        sequences,
        vab_header,
        bank_offset: scan.region_end,
    })
}

/// Shift an error's offset from a sub-slice to the container
fn rebase(err: BgmError, base: usize) -> BgmError {
    match err {
        BgmError::TruncatedInput {
            field,
            offset,
            needed,
            available,
        } => BgmError::TruncatedInput {
            field,
            offset: base + offset,
            needed,
            available,
        },
        BgmError::MissingTerminator { offset } => BgmError::MissingTerminator {
            offset: base + offset,
        },
        BgmError::InvalidTableLayout {
            field,
            offset,
            reason,
        } => BgmError::InvalidTableLayout {
            field,
            offset: base + offset,
            reason,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{END_OF_TRACK, SEQ_MAGIC, VAB_HEADER_SIZE, VAB_MAGIC};

    /// Chunk with an 8-byte track header, `events` filler bytes, marker and padding
    fn chunk(events: usize, pad: usize) -> Vec<u8> {
        let size = CHUNK_SIZE_FIELD + 8 + events + END_OF_TRACK.len() + pad;
        let mut out = (size as u32).to_le_bytes().to_vec();
        out.extend_from_slice(&[0x20, 0xA1, 0x07, 0x01, 0xE0, 0x00, 0x04, 0x02]);
        out.extend(std::iter::repeat_n(0x3C, events));
        out.extend_from_slice(&END_OF_TRACK);
        out.resize(size, 0);
        out
    }

    /// Bank with two programs of 1 and 2 tones in a 4-slot stride, 10 VAG entries
    fn bank() -> Vec<u8> {
        let vag_offset = 0x20 + 2 * 16 + 2 * 4 * 32;
        let mut raw = vec![0x55u8; vag_offset];
        raw[0x08..0x0C].copy_from_slice(&(vag_offset as u32).to_le_bytes());
        raw[0x0C..0x10].copy_from_slice(&4u32.to_le_bytes());
        raw[0x12..0x14].copy_from_slice(&2u16.to_le_bytes());
        raw[0x20] = 1;
        raw[0x30] = 2;
        raw.extend(std::iter::repeat_n(0x11, 20));
        raw
    }

    #[test]
    fn test_two_chunks_and_bank() {
        // 0x40 bytes of track + marker + 3 pad bytes, and a second 0x30 chunk
        let mut data = chunk(0x40 - 8, 3);
        let first_len = data.len();
        data.extend(chunk(0x30 - CHUNK_SIZE_FIELD - 8 - 3 - 1, 1));
        let bank_offset = data.len();
        data.extend(bank());

        let split = split_container(&data).unwrap();
        assert_eq!(split.chunks.len(), 2);
        assert_eq!(split.chunks[0].range(), 0..first_len);
        assert_eq!(split.chunks[1].size, 0x30);
        assert_eq!(split.bank_offset, bank_offset);

        assert_eq!(split.sequences.len(), 2);
        for seq in &split.sequences {
            assert_eq!(&seq[0..4], SEQ_MAGIC);
            assert_eq!(&seq[4..8], &[0, 0, 0, 1]);
        }
        assert_eq!(split.sequences[0].len(), 16 + 0x40 - 8 + 3 + 3);

        assert_eq!(split.vab_header.len(), VAB_HEADER_SIZE);
        assert_eq!(split.vab_header.len(), 16 + 16 + 2048 + 65536 + 512);
        assert_eq!(&split.vab_header[0..4], VAB_MAGIC);
    }

    #[test]
    fn test_bank_only_container() {
        let split = split_container(&bank()).unwrap();
        assert!(split.chunks.is_empty());
        assert!(split.sequences.is_empty());
        assert_eq!(split.bank_offset, 0);
        assert_eq!(split.vab_header.len(), VAB_HEADER_SIZE);
    }

    #[test]
    fn test_tiny_container() {
        assert_eq!(
            split_container(&[0x01, 0x02]).unwrap_err(),
            BgmError::truncated("chunk size", 0, 4, 2)
        );
    }

    #[test]
    fn test_short_track_reports_container_offset() {
        // A 7-byte chunk whose 3-byte track is just the marker
        let mut data = 7u32.to_le_bytes().to_vec();
        data.extend_from_slice(&END_OF_TRACK);
        data.extend(bank());
        let err = split_container(&data).unwrap_err();
        assert_eq!(err, BgmError::truncated("sequence header", 4, 8, 3));
    }

    #[test]
    fn test_bank_error_reports_container_offset() {
        let mut data = chunk(4, 0);
        let bank_offset = data.len();
        let mut raw = bank();
        raw[0x12..0x14].copy_from_slice(&200u16.to_le_bytes());
        data.extend(raw);
        let err = split_container(&data).unwrap_err();
        assert!(matches!(err, BgmError::InvalidTableLayout { field: "program count", .. }));
        assert_eq!(err.offset(), bank_offset + 0x12);
    }
}
