//! Catena uplink decoder
//!
//! Turns the compact flag-driven payloads sent by MCCI Catena sensor nodes
//! into named, scaled measurements.
//!
//! ```
//! use catena_decode::{Decoder, Profile, Value};
//!
//! let decoder = Decoder::builtin(Profile::Strict).unwrap();
//! let decoded = decoder.decode(Some(1), &[0x14, 0x05, 0xF8, 0x00, 0x42]).unwrap();
//!
//! assert_eq!(decoded.fields["vBat"], Value::Float(-0.5));
//! assert_eq!(decoded.fields["boot"], Value::Int(66));
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod format;
pub mod input;
pub mod logging;
pub mod report;
pub mod runner;
pub mod stats;

pub use codec::{Fields, Value};
pub use decoder::{Decoded, Decoder};
pub use error::{DecodeError, RegistryError};
pub use format::{Format, FormatKey, Metadata, Profile, Registry};
