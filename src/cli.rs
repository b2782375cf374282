//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.

use crate::format::Profile;
use clap::Parser;
use std::path::PathBuf;

// =============================================================================
// CLI Definition
// =============================================================================

/// Decode Catena sensor uplinks to JSON
///
/// Payloads are hex strings, optionally prefixed with a LoRaWAN port
/// (`2:0DF80042`). With no payload arguments, one payload is read per
/// stdin line.
#[derive(Parser, Debug, Default)]
#[command(name = "catena-decode")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Port for payloads given without one (overrides config)
    #[arg(long, value_name = "PORT", value_parser = clap::value_parser!(u8).range(1..))]
    pub port: Option<u8>,

    /// Table profile (overrides config)
    #[arg(long, value_enum)]
    pub profile: Option<Profile>,

    /// Device EUI attached to every report
    #[arg(long, value_name = "EUI")]
    pub device: Option<String>,

    /// Pretty-print JSON
    #[arg(long)]
    pub pretty: bool,

    /// Leave the format metadata out of reports
    #[arg(long)]
    pub no_metadata: bool,

    /// Payloads as `[port:]hex`
    #[arg(value_name = "PAYLOAD")]
    pub payloads: Vec<String>,
}

// =============================================================================
// Tests
// =============================================================================
