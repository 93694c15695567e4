//! `pQES` sequence header synthesis
//!
//! # Raw Track Layout
//! ```text
//! 0x00: tempo (3 bytes, reversed byte order)
//! 0x03: resolution of quarter note (u16 BE)
//! 0x05: unused
//! 0x06: rhythm (numerator, denominator exponent)
//! 0x08: score data (ends with FF 2F 00)
//! ```
//!
//! # Sequence File Layout
//! ```text
//! 0x00: "pQES"
//! 0x04: version (u32 BE, always 1)
//! 0x08: resolution (u16 BE)
//! 0x0A: tempo (3 bytes BE, microseconds per quarter note)
//! 0x0D: rhythm (2 bytes)
//! 0x0F: delta time placeholder (0x00)
//! 0x10: score data
//! ```

use crate::error::BgmError;
use crate::io::read_bytes;
use crate::{SEQ_MAGIC, SEQ_VERSION};

/// Timing fields recovered from the first 8 bytes of a raw track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqHeader {
    /// Ticks per quarter note
    pub resolution: u16,
    /// Tempo bytes in sequence file order
    pub tempo: [u8; 3],
    /// Time signature numerator and denominator exponent
    pub rhythm: [u8; 2],
}

impl SeqHeader {
    pub const SIZE: usize = 16;

    /// Size of the raw track prefix the header is taken from
    pub const RAW_SIZE: usize = 8;

    /// Read the header fields from a raw track
    pub fn from_raw_track(raw: &[u8]) -> Result<Self, BgmError> {
        let b = read_bytes(raw, 0, Self::RAW_SIZE, "sequence header")?;
        Ok(Self {
            resolution: u16::from_be_bytes([b[3], b[4]]),
            tempo: [b[2], b[1], b[0]],
            rhythm: [b[6], b[7]],
        })
    }

    /// Microseconds per quarter note
    pub fn tempo_micros(&self) -> u32 {
        u32::from_be_bytes([0, self.tempo[0], self.tempo[1], self.tempo[2]])
    }

    /// Beats per minute, if the tempo is non-zero
    pub fn bpm(&self) -> Option<f64> {
        match self.tempo_micros() {
            0 => None,
            micros => Some(60_000_000.0 / micros as f64),
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0x00..0x04].copy_from_slice(SEQ_MAGIC);
        out[0x04..0x08].copy_from_slice(&SEQ_VERSION.to_be_bytes());
        out[0x08..0x0A].copy_from_slice(&self.resolution.to_be_bytes());
        out[0x0A..0x0D].copy_from_slice(&self.tempo);
        out[0x0D..0x0F].copy_from_slice(&self.rhythm);
        out
    }
}

/// Build a standalone sequence file from a raw track
///
/// The score data, end-of-track marker and any padding after it are carried
/// through unchanged.
///
/// # Errors
/// * `TruncatedInput` - the raw track is shorter than 8 bytes
pub fn build_seq(raw: &[u8]) -> Result<Vec<u8>, BgmError> {
    let header = SeqHeader::from_raw_track(raw)?;
    let score = &raw[SeqHeader::RAW_SIZE..];

    let mut out = Vec::with_capacity(SeqHeader::SIZE + score.len());
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(score);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: [u8; 13] = [
        0x20, 0xA1, 0x07, // tempo, reversed (0x07A120 = 500000us)
        0x01, 0xE0, // resolution 480
        0x99, // dropped
        0x04, 0x02, // 4/4
        0x90, 0x3C, 0xFF, 0x2F, 0x00,
    ];

    #[test]
    fn test_header_fields() {
        let header = SeqHeader::from_raw_track(&RAW).unwrap();
        assert_eq!(header.resolution, 480);
        assert_eq!(header.tempo, [0x07, 0xA1, 0x20]);
        assert_eq!(header.tempo_micros(), 500_000);
        assert_eq!(header.bpm(), Some(120.0));
        assert_eq!(header.rhythm, [0x04, 0x02]);
    }

    #[test]
    fn test_build_seq_layout() {
        let seq = build_seq(&RAW).unwrap();
        assert_eq!(
            seq,
            vec![
                b'p', b'Q', b'E', b'S', 0x00, 0x00, 0x00, 0x01, 0x01, 0xE0, 0x07, 0xA1, 0x20,
                0x04, 0x02, 0x00, 0x90, 0x3C, 0xFF, 0x2F, 0x00,
            ]
        );
    }

    #[test]
    fn test_build_seq_header_only() {
        let seq = build_seq(&RAW[..8]).unwrap();
        assert_eq!(seq.len(), SeqHeader::SIZE);
    }

    #[test]
    fn test_build_seq_too_short() {
        assert_eq!(
            build_seq(&RAW[..7]),
            Err(BgmError::truncated("sequence header", 0, 8, 7))
        );
    }

    #[test]
    fn test_zero_tempo_has_no_bpm() {
        let header = SeqHeader {
            resolution: 96,
            tempo: [0; 3],
            rhythm: [4, 2],
        };
        assert_eq!(header.bpm(), None);
    }
}
