//! Format registry
//!
//! Maps a LoRaWAN port and/or leading format byte to the field layout and
//! static metadata of one message type. The registry is built once and is
//! read-only afterwards; `Registry` is `Send + Sync` and can be shared
//! freely between decoding threads.
//!
//! # Adding a new format
//!
//! 1. Write a constructor in `tables.rs` returning a `Format`
//! 2. Add it to `tables::builtin`
//! 3. No changes to the codec needed

pub mod tables;

use crate::codec::{FlagRule, Layout};
use crate::error::{DecodeError, RegistryError};
use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// Keys and metadata
// =============================================================================

/// How a format is addressed on the wire
///
/// - `code` set: `payload[0]` is the format byte; `port`, if set, must also
///   match whenever the caller supplies a port.
/// - `code` unset: the format is selected by `port` alone and the payload
///   starts with the flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatKey {
    pub port: Option<u8>,
    pub code: Option<u8>,
}

impl FormatKey {
    /// Format byte carried in the payload, optionally bound to a port
    pub const fn code(port: Option<u8>, code: u8) -> Self {
        Self {
            port,
            code: Some(code),
        }
    }

    /// Format selected by port alone
    pub const fn port(port: u8) -> Self {
        Self {
            port: Some(port),
            code: None,
        }
    }

    /// Bytes preceding the flag byte
    pub fn header_len(&self) -> usize {
        usize::from(self.code.is_some())
    }

    fn matches(&self, port: Option<u8>, first: u8) -> bool {
        match self.code {
            None => self.port.is_some() && self.port == port,
            Some(code) => {
                code == first && (port.is_none() || self.port.is_none() || self.port == port)
            }
        }
    }

    /// True when some input could select both keys
    fn overlaps(&self, other: &Self) -> bool {
        match (self.code, other.code) {
            (None, None) => self.port == other.port,
            (Some(a), Some(b)) => {
                a == b && (self.port.is_none() || other.port.is_none() || self.port == other.port)
            }
            _ => false,
        }
    }
}

/// Descriptive record attached to every decode of a format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub node_type: &'static str,
    pub platform_type: &'static str,
    pub radio_type: &'static str,
    pub application_name: &'static str,
}

/// Table variant set
///
/// `Legacy` reproduces the deployed Hualian garden flow bit for bit,
/// including its missing sign extension on the 0x15 one-wire and soil
/// temperatures.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    #[default]
    Strict,
    Legacy,
}

/// One registered message type
#[derive(Debug, Clone, PartialEq)]
pub struct Format {
    /// Short identifier used in logs and reports (e.g. "0x15", "port2")
    pub name: &'static str,
    pub key: FormatKey,
    pub layout: Layout,
    pub metadata: Metadata,
}

// =============================================================================
// Registry
// =============================================================================

/// Immutable set of formats
#[derive(Debug, Clone)]
pub struct Registry {
    formats: Vec<Format>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// All Catena formats for `profile`
    pub fn builtin(profile: Profile) -> Result<Self, RegistryError> {
        tables::builtin(profile)
            .into_iter()
            .fold(Self::builder(), RegistryBuilder::register)
            .build()
    }

    /// Find the format for a payload
    ///
    /// Port-only formats take precedence when a port is supplied; otherwise
    /// `payload[0]` is matched as a format byte.
    pub fn lookup(&self, port: Option<u8>, payload: &[u8]) -> Result<&Format, DecodeError> {
        let Some(&first) = payload.first() else {
            return Err(DecodeError::EmptyBuffer);
        };

        self.formats
            .iter()
            .find(|f| f.key.code.is_none() && f.key.matches(port, first))
            .or_else(|| {
                self.formats
                    .iter()
                    .find(|f| f.key.code.is_some() && f.key.matches(port, first))
            })
            .ok_or_else(|| {
                debug!(?port, code = first, "No format matches payload");
                DecodeError::UnknownFormat { port, code: first }
            })
    }

    pub fn get(&self, name: &str) -> Option<&Format> {
        self.formats.iter().find(|f| f.name == name)
    }

    pub fn formats(&self) -> impl Iterator<Item = &Format> {
        self.formats.iter()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

/// Collects formats and validates them as a set
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    formats: Vec<Format>,
}

impl RegistryBuilder {
    pub fn register(mut self, format: Format) -> Self {
        self.formats.push(format);
        self
    }

    pub fn build(self) -> Result<Registry, RegistryError> {
        for (i, format) in self.formats.iter().enumerate() {
            validate(format)?;
            if let Some(other) = self.formats[..i]
                .iter()
                .find(|other| other.key.overlaps(&format.key))
            {
                return Err(RegistryError::DuplicateKey {
                    first: other.name,
                    second: format.name,
                });
            }
        }

        Ok(Registry {
            formats: self.formats,
        })
    }
}

fn validate(format: &Format) -> Result<(), RegistryError> {
    if format.key.port.is_none() && format.key.code.is_none() {
        return Err(RegistryError::Unaddressable {
            format: format.name,
        });
    }

    if let FlagRule::InsertZeroBit { at } = format.layout.rule {
        if at > 7 {
            return Err(RegistryError::RuleOutOfRange {
                format: format.name,
                at,
            });
        }
    }

    let mut previous: Option<u8> = None;
    for field in &format.layout.fields {
        if field.bit > 15 {
            return Err(RegistryError::BitOutOfRange {
                format: format.name,
                bit: field.bit,
            });
        }
        if previous.is_some_and(|p| field.bit <= p) {
            return Err(RegistryError::UnorderedBits {
                format: format.name,
                bit: field.bit,
            });
        }
        previous = Some(field.bit);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Conversion, FieldSpec, FlagField, Width};

    const META: Metadata = Metadata {
        node_type: "test",
        platform_type: "test",
        radio_type: "test",
        application_name: "test",
    };

    fn format(name: &'static str, key: FormatKey, bits: &[u8]) -> Format {
        let fields = bits
            .iter()
            .map(|&bit| {
                FlagField::new(bit, FieldSpec::unsigned("x", Width::U8, Conversion::Count))
            })
            .collect();
        Format {
            name,
            key,
            layout: Layout::new(fields),
            metadata: META,
        }
    }

    #[test]
    fn test_builtin_registry_is_consistent() {
        for profile in [Profile::Strict, Profile::Legacy] {
            let registry = Registry::builtin(profile).unwrap();
            assert_eq!(registry.len(), 5);
        }
    }

    #[test]
    fn test_lookup_by_code_with_and_without_port() {
        let registry = Registry::builtin(Profile::Strict).unwrap();

        assert_eq!(registry.lookup(None, &[0x15, 0x00]).unwrap().name, "0x15");
        assert_eq!(registry.lookup(Some(1), &[0x14, 0x00]).unwrap().name, "0x14");
        assert!(matches!(
            registry.lookup(Some(4), &[0x14, 0x00]),
            Err(DecodeError::UnknownFormat {
                port: Some(4),
                code: 0x14
            })
        ));
    }

    #[test]
    fn test_lookup_by_port() {
        let registry = Registry::builtin(Profile::Strict).unwrap();

        // Flag byte 0x15 on port 2 is not the 0x15 format
        assert_eq!(registry.lookup(Some(2), &[0x15]).unwrap().name, "port2");
        assert_eq!(registry.lookup(Some(3), &[0x00]).unwrap().name, "port3");
    }

    #[test]
    fn test_lookup_unknown_and_empty() {
        let registry = Registry::builtin(Profile::Strict).unwrap();

        assert_eq!(
            registry.lookup(None, &[0x42, 0x00]).unwrap_err(),
            DecodeError::UnknownFormat {
                port: None,
                code: 0x42
            }
        );
        assert_eq!(
            registry.lookup(Some(2), &[]).unwrap_err(),
            DecodeError::EmptyBuffer
        );
    }

    #[test]
    fn test_build_rejects_overlapping_keys() {
        let err = Registry::builder()
            .register(format("a", FormatKey::code(Some(1), 0x20), &[0]))
            .register(format("b", FormatKey::code(None, 0x20), &[0]))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateKey {
                first: "a",
                second: "b"
            }
        );

        // Same code on distinct ports is fine
        assert!(Registry::builder()
            .register(format("a", FormatKey::code(Some(1), 0x20), &[0]))
            .register(format("b", FormatKey::code(Some(5), 0x20), &[0]))
            .build()
            .is_ok());
    }

    #[test]
    fn test_build_rejects_bad_layouts() {
        let unaddressable = FormatKey {
            port: None,
            code: None,
        };
        assert!(matches!(
            Registry::builder()
                .register(format("a", unaddressable, &[0]))
                .build(),
            Err(RegistryError::Unaddressable { format: "a" })
        ));

        assert!(matches!(
            Registry::builder()
                .register(format("a", FormatKey::port(9), &[0, 2, 2]))
                .build(),
            Err(RegistryError::UnorderedBits { bit: 2, .. })
        ));

        assert!(matches!(
            Registry::builder()
                .register(format("a", FormatKey::port(9), &[3, 1]))
                .build(),
            Err(RegistryError::UnorderedBits { bit: 1, .. })
        ));

        assert!(matches!(
            Registry::builder()
                .register(format("a", FormatKey::port(9), &[16]))
                .build(),
            Err(RegistryError::BitOutOfRange { bit: 16, .. })
        ));
    }

    #[test]
    fn test_build_rejects_insert_past_flag_byte() {
        let mut wide = format("a", FormatKey::port(9), &[0, 2]);
        wide.layout.rule = FlagRule::InsertZeroBit { at: 16 };
        let err = Registry::builder().register(wide).build().unwrap_err();
        assert_eq!(err, RegistryError::RuleOutOfRange { format: "a", at: 16 });
        assert_eq!(err.to_string(), "Format a: cannot insert flag bit at 16");

        let mut top = format("b", FormatKey::port(9), &[0, 2]);
        top.layout.rule = FlagRule::InsertZeroBit { at: 7 };
        assert!(Registry::builder().register(top).build().is_ok());
    }

    #[test]
    fn test_get_and_iterate_formats() {
        let registry = Registry::builtin(Profile::Legacy).unwrap();

        let c4410 = registry.get("0x11").unwrap();
        assert_eq!(c4410.key, FormatKey::code(Some(1), 0x11));
        assert_eq!(c4410.metadata.application_name, "Hualian garden");
        assert!(registry.get("0x12").is_none());

        let names: Vec<_> = registry.formats().map(|f| f.name).collect();
        assert_eq!(names, ["0x11", "0x14", "0x15", "port2", "port3"]);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }
}
