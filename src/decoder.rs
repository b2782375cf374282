//! Decoder facade: registry lookup, then one bitmask walk
//!
//! `Decoder::decode` is a pure function of its inputs. It holds no mutable
//! state, never modifies the payload, and can be called concurrently
//! through a shared reference.

use crate::codec::{decode_fields, Fields};
use crate::error::{DecodeError, RegistryError};
use crate::format::{Metadata, Profile, Registry};
use serde::Serialize;
use tracing::debug;

/// Outcome of decoding one payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decoded {
    /// Name of the matched format (e.g. "0x15", "port2")
    pub format: &'static str,
    pub fields: Fields,
    pub metadata: Metadata,
    /// Payload bytes used, format byte and flag byte included
    pub consumed: usize,
}

/// Decodes payloads against a fixed registry
#[derive(Debug, Clone)]
pub struct Decoder {
    registry: Registry,
}

impl Decoder {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Decoder over the built-in Catena formats
    pub fn builtin(profile: Profile) -> Result<Self, RegistryError> {
        Registry::builtin(profile).map(Self::new)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Decode one uplink
    ///
    /// `port` is the LoRaWAN port when the transport provides one. Formats
    /// carrying a format byte also decode with no port at all.
    pub fn decode(&self, port: Option<u8>, payload: &[u8]) -> Result<Decoded, DecodeError> {
        let format = self.registry.lookup(port, payload)?;
        let walk = decode_fields(&format.layout, payload, format.key.header_len())?;

        debug!(
            format = format.name,
            fields = walk.fields.len(),
            consumed = walk.consumed,
            len = payload.len(),
            "Decoded payload"
        );

        Ok(Decoded {
            format: format.name,
            fields: walk.fields,
            metadata: format.metadata,
            consumed: walk.consumed,
        })
    }
}
