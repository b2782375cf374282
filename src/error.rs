//! Centralized error types
//!
//! - `DecodeError`: a single payload could not be decoded
//! - `RegistryError`: a format table set is inconsistent
//! - `Error`: everything around the decoder (config, input parsing)
//!
//! Use `Result<T>` as shorthand for `std::result::Result<T, Error>`.

use std::fmt;
use std::path::PathBuf;

// =============================================================================
// Decode
// =============================================================================

/// Failure to decode one uplink payload
///
/// Decode errors are local to the payload: the registry is untouched and
/// the next payload decodes independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Payload has no bytes at all
    EmptyBuffer,
    /// No registered format matches the port / leading byte
    UnknownFormat { port: Option<u8>, code: u8 },
    /// Flags announce a field that runs past the end of the payload
    TruncatedBuffer {
        field: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },
}

impl std::error::Error for DecodeError {}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBuffer => write!(f, "Empty payload"),
            Self::UnknownFormat {
                port: Some(port),
                code,
            } => write!(f, "Unknown format: port {} code 0x{:02X}", port, code),
            Self::UnknownFormat { port: None, code } => {
                write!(f, "Unknown format: code 0x{:02X}", code)
            }
            Self::TruncatedBuffer {
                field,
                offset,
                needed,
                available,
            } => write!(
                f,
                "Truncated payload: {} needs {} bytes at offset {}, {} left",
                field, needed, offset, available
            ),
        }
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Inconsistent format table set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Format has neither a port nor a format code
    Unaddressable { format: &'static str },
    /// Two formats answer to the same (port, code) pair
    DuplicateKey {
        first: &'static str,
        second: &'static str,
    },
    /// Flag fields of one format are not in strictly ascending bit order
    UnorderedBits { format: &'static str, bit: u8 },
    /// Flag field bit does not fit the normalized flag word
    BitOutOfRange { format: &'static str, bit: u8 },
    /// Flag rule inserts a bit outside the wire flag byte
    RuleOutOfRange { format: &'static str, at: u8 },
}

impl std::error::Error for RegistryError {}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unaddressable { format } => {
                write!(f, "Format {} has neither port nor code", format)
            }
            Self::DuplicateKey { first, second } => {
                write!(f, "Formats {} and {} share the same key", first, second)
            }
            Self::UnorderedBits { format, bit } => {
                write!(f, "Format {}: flag bit {} is out of order", format, bit)
            }
            Self::BitOutOfRange { format, bit } => {
                write!(f, "Format {}: flag bit {} is out of range", format, bit)
            }
            Self::RuleOutOfRange { format, at } => {
                write!(f, "Format {}: cannot insert flag bit at {}", format, at)
            }
        }
    }
}

// =============================================================================
// Application
// =============================================================================

/// Errors around the decoder: config files and payload input
#[derive(Debug)]
pub enum Error {
    /// Config file could not be read
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Config file is not valid TOML for `Config`
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Invalid config value
    ConfigValidation { field: &'static str, reason: String },
    /// Input line is not `[port:]hex`
    InvalidInput { input: String, reason: String },
    /// Built-in tables failed to register
    Registry(RegistryError),
    /// Payload failed to decode
    Decode(DecodeError),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigRead { source, .. } => Some(source),
            Self::ConfigParse { source, .. } => Some(source),
            Self::Registry(source) => Some(source),
            Self::Decode(source) => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigRead { path, .. } => {
                write!(f, "Cannot read config file: {}", path.display())
            }
            Self::ConfigParse { path, .. } => {
                write!(f, "Cannot parse config file: {}", path.display())
            }
            Self::ConfigValidation { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
            Self::InvalidInput { input, reason } => {
                write!(f, "Invalid payload '{}': {}", input, reason)
            }
            Self::Registry(e) => write!(f, "Format registry: {}", e),
            Self::Decode(e) => write!(f, "{}", e),
        }
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

/// Alias for Result with Error
pub type Result<T> = std::result::Result<T, Error>;
