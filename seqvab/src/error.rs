//! Container splitting error types

/// Errors raised while scanning a container or rebuilding its headers
///
/// Every variant names the field being read and the byte offset (relative to
/// the buffer handed to the failing operation) so malformed input can be
/// located with a hex editor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BgmError {
    /// A field or table extends past the end of the buffer
    #[error("truncated {field} at 0x{offset:X}: need {needed} bytes, {available} available")]
    TruncatedInput {
        field: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A declared chunk does not end in the end-of-track marker
    #[error("no end-of-track marker in chunk at 0x{offset:X}")]
    MissingTerminator { offset: usize },

    /// Table counts or offsets that cannot describe a valid bank
    #[error("invalid {field} at 0x{offset:X}: {reason}")]
    InvalidTableLayout {
        field: &'static str,
        offset: usize,
        reason: String,
    },
}

impl BgmError {
    pub(crate) fn truncated(
        field: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    ) -> Self {
        BgmError::TruncatedInput {
            field,
            offset,
            needed,
            available,
        }
    }

    pub(crate) fn layout(field: &'static str, offset: usize, reason: impl Into<String>) -> Self {
        BgmError::InvalidTableLayout {
            field,
            offset,
            reason: reason.into(),
        }
    }

    /// Byte offset the error refers to
    pub fn offset(&self) -> usize {
        match self {
            BgmError::TruncatedInput { offset, .. }
            | BgmError::MissingTerminator { offset }
            | BgmError::InvalidTableLayout { offset, .. } => *offset,
        }
    }
}
