//! Bounds-checked big-endian cursor over a payload

use super::Width;
use crate::error::DecodeError;
use bytes::Buf;

/// Reads fixed-width values left to right, failing instead of over-reading
pub(crate) struct FieldReader<'a> {
    rest: &'a [u8],
    len: usize,
}

impl<'a> FieldReader<'a> {
    /// Start reading `payload` at byte `offset`
    pub fn new(payload: &'a [u8], offset: usize) -> Self {
        Self {
            rest: payload.get(offset..).unwrap_or(&[]),
            len: payload.len(),
        }
    }

    /// Absolute position of the next unread byte
    pub fn offset(&self) -> usize {
        self.len - self.rest.remaining()
    }

    pub fn read(&mut self, width: Width, field: &'static str) -> Result<u32, DecodeError> {
        let needed = width.bytes();
        if self.rest.remaining() < needed {
            return Err(DecodeError::TruncatedBuffer {
                field,
                offset: self.offset(),
                needed,
                available: self.rest.remaining(),
            });
        }

        Ok(match width {
            Width::U8 => u32::from(self.rest.get_u8()),
            Width::U16 => u32::from(self.rest.get_u16()),
        })
    }
}
