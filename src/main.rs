//! catena-decode - decode Catena sensor uplinks to JSON
//!
//! Usage:
//!   catena-decode 15011800 2:0DF80042   Decode payloads given as arguments
//!   catena-decode < uplinks.txt         Decode one `[port:]hex` payload per line
//!   catena-decode --profile legacy ...  Match the deployed Hualian garden flow

use anyhow::Result;
use catena_decode::cli::Cli;
use catena_decode::config::Config;
use catena_decode::logging::init_tracing;
use catena_decode::report::Reporter;
use catena_decode::runner::{RunOptions, Runner};
use catena_decode::Decoder;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing::info;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load_optional(cli.config.as_deref())?;

    // Command line wins over config file
    let profile = cli.profile.unwrap_or(config.decoder.profile);
    let options = RunOptions {
        default_port: cli.port.or(config.decoder.default_port),
        device: cli.device,
        pretty: cli.pretty || config.output.pretty,
    };
    let include_metadata = config.output.include_metadata && !cli.no_metadata;

    let decoder = Decoder::builtin(profile)?;
    info!(?profile, formats = decoder.registry().len(), "Decoder ready");

    let runner = Runner::new(
        decoder,
        Reporter::new(config.devices, include_metadata),
        options,
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.payloads.is_empty() {
        runner.run_reader(io::stdin().lock(), &mut out)?;
    } else {
        runner.run_args(&cli.payloads, &mut out)?;
    }
    out.flush()?;

    let snap = runner.stats().snapshot();
    info!(
        decoded = snap.decoded,
        failed = snap.failed(),
        bytes = snap.bytes,
        "Run complete"
    );

    Ok(if snap.failed() == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
