//! Bitmask walk
//!
//! Reads the flag byte, normalizes it once, then visits the layout's flag
//! fields in ascending bit order. Each set bit consumes its parts from the
//! payload; each clear bit contributes only its explicit defaults.

use super::reader::FieldReader;
use super::{Fields, Layout, Width};
use crate::error::DecodeError;
use tracing::{debug, trace};

/// Result of walking one payload
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWalk {
    pub fields: Fields,
    /// Payload bytes consumed, header and flag byte included
    pub consumed: usize,
}

/// Decode the flag byte at `header_len` and every field it announces
pub fn decode_fields(
    layout: &Layout,
    payload: &[u8],
    header_len: usize,
) -> Result<FieldWalk, DecodeError> {
    let mut reader = FieldReader::new(payload, header_len);
    let raw_flags = reader.read(Width::U8, "flags")? as u8;
    let flags = layout.rule.normalize(raw_flags);

    let unknown = flags & !layout.known_bits();
    if unknown != 0 {
        debug!(
            flags = raw_flags,
            unknown, "Ignoring flag bits with no declared field"
        );
    }

    let mut fields = Fields::new();
    for flag in &layout.fields {
        if flags & flag.mask() == 0 {
            for part in &flag.parts {
                if let Some(value) = part.absent {
                    fields.insert(part.key, value);
                }
            }
            continue;
        }

        for part in &flag.parts {
            let raw = reader.read(part.width, part.key)?;
            let value = part.decode_raw(raw);
            trace!(key = part.key, raw, ?value, "Decoded field");
            fields.insert(part.key, value);
        }
    }

    Ok(FieldWalk {
        fields,
        consumed: reader.offset(),
    })
}
