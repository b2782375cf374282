//! Line-by-line decode loop
//!
//! Parses each input line, decodes it, and writes one JSON report per
//! payload. A bad line is logged and counted; it never stops the run.

use crate::decoder::Decoder;
use crate::input;
use crate::report::Reporter;
use crate::stats::Stats;
use anyhow::{Context, Result};
use chrono::Utc;
use std::io::{BufRead, Write};
use tracing::warn;

/// Output options for one run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Port for lines without one
    pub default_port: Option<u8>,
    /// Device EUI attached to every report
    pub device: Option<String>,
    pub pretty: bool,
}

pub struct Runner {
    decoder: Decoder,
    reporter: Reporter,
    options: RunOptions,
    stats: Stats,
}

impl Runner {
    pub fn new(decoder: Decoder, reporter: Reporter, options: RunOptions) -> Self {
        Self {
            decoder,
            reporter,
            options,
            stats: Stats::new(),
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Decode every non-comment line of `reader`
    pub fn run_reader(&self, reader: impl BufRead, out: &mut impl Write) -> Result<()> {
        for line in reader.lines() {
            let line = line.context("Failed to read input")?;
            if input::is_skippable(&line) {
                continue;
            }
            self.handle_line(&line, out)?;
        }
        Ok(())
    }

    /// Decode each given payload
    pub fn run_args(&self, payloads: &[String], out: &mut impl Write) -> Result<()> {
        for payload in payloads {
            self.handle_line(payload, out)?;
        }
        Ok(())
    }

    /// Decode one line; only output failures are returned as errors
    pub fn handle_line(&self, line: &str, out: &mut impl Write) -> Result<()> {
        let uplink = match input::parse_line(line) {
            Ok(uplink) => uplink.with_default_port(self.options.default_port),
            Err(e) => {
                warn!("{}", e);
                self.stats.record_invalid_input();
                return Ok(());
            }
        };

        let decoded = match self.decoder.decode(uplink.port, &uplink.payload) {
            Ok(decoded) => {
                self.stats.record_decoded(uplink.payload.len());
                decoded
            }
            Err(e) => {
                warn!(port = ?uplink.port, len = uplink.payload.len(), "{}", e);
                self.stats.record_failed(&e);
                return Ok(());
            }
        };

        let report = self.reporter.report(
            decoded,
            uplink.port,
            self.options.device.as_deref(),
            Utc::now(),
        );

        if self.options.pretty {
            serde_json::to_writer_pretty(&mut *out, &report)
        } else {
            serde_json::to_writer(&mut *out, &report)
        }
        .context("Failed to serialize report")?;
        writeln!(out).context("Failed to write report")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceNames;
    use crate::format::Profile;

    fn runner(options: RunOptions) -> Runner {
        Runner::new(
            Decoder::builtin(Profile::Strict).unwrap(),
            Reporter::new(DeviceNames::default(), false),
            options,
        )
    }

    fn lines(out: &[u8]) -> Vec<serde_json::Value> {
        std::str::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_one_report_per_payload() {
        let runner = runner(RunOptions::default());
        let mut out = Vec::new();

        let input = "# field vectors\n14 01 18 00\n\n2:01 F8 00\n";
        runner.run_reader(input.as_bytes(), &mut out).unwrap();

        let reports = lines(&out);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0]["format"], "0x14");
        assert_eq!(reports[0]["fields"]["vBat"], 1.5);
        assert_eq!(reports[1]["format"], "port2");
        assert_eq!(reports[1]["port"], 2);
        assert_eq!(reports[1]["fields"]["vBat"], -0.5);
    }

    #[test]
    fn test_failures_are_counted_not_fatal() {
        let runner = runner(RunOptions::default());
        let mut out = Vec::new();

        let payloads = vec![
            "99 00".to_string(),
            "15 01 18".to_string(),
            "not hex".to_string(),
            "15 05 F8 00 42".to_string(),
        ];
        runner.run_args(&payloads, &mut out).unwrap();

        assert_eq!(lines(&out).len(), 1);
        let snap = runner.stats().snapshot();
        assert_eq!(snap.decoded, 1);
        assert_eq!(snap.unknown_format, 1);
        assert_eq!(snap.truncated, 1);
        assert_eq!(snap.invalid_input, 1);
    }

    #[test]
    fn test_default_port_selects_port_format() {
        let runner = runner(RunOptions {
            default_port: Some(3),
            device: Some("0002CC01".into()),
            pretty: false,
        });
        let mut out = Vec::new();

        // Flags 0x08: t = 25.0, rh = 100%
        runner.handle_line("08 19 00 FF FF", &mut out).unwrap();

        let reports = lines(&out);
        assert_eq!(reports[0]["format"], "port3");
        assert_eq!(reports[0]["fields"]["t"], 25.0);
        assert_eq!(reports[0]["fields"]["rh"], 100.0);
        assert_eq!(reports[0]["device"]["eui"], "0002CC01");
    }
}
