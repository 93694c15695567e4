//! Bounds-checked field readers over byte slices

use crate::error::BgmError;

/// Borrow `len` bytes at `offset`, naming `field` on failure
pub(crate) fn read_bytes<'a>(
    data: &'a [u8],
    offset: usize,
    len: usize,
    field: &'static str,
) -> Result<&'a [u8], BgmError> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| BgmError::truncated(field, offset, len, data.len().saturating_sub(offset)))
}

/// Read a single byte
pub(crate) fn read_u8(data: &[u8], offset: usize, field: &'static str) -> Result<u8, BgmError> {
    Ok(read_bytes(data, offset, 1, field)?[0])
}

/// Read a u16 in little-endian format
pub(crate) fn read_u16(data: &[u8], offset: usize, field: &'static str) -> Result<u16, BgmError> {
    let b = read_bytes(data, offset, 2, field)?;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

/// Read a u32 in little-endian format
pub(crate) fn read_u32(data: &[u8], offset: usize, field: &'static str) -> Result<u32, BgmError> {
    let b = read_bytes(data, offset, 4, field)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}
