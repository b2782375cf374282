//! Payload input parsing
//!
//! Translates text lines into uplinks. Line format: `[port:]hex`, where the
//! hex digits may be separated by spaces (as copied from a network console).
//!
//! ```text
//! 15 01 18 00
//! 1:150118 00
//! 2:0D F8 00 42 17 80 59 35 80
//! ```

use crate::error::{Error, Result};

/// One raw payload with its optional port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uplink {
    pub port: Option<u8>,
    pub payload: Vec<u8>,
}

impl Uplink {
    /// Use `port` when the line did not carry one
    pub fn with_default_port(mut self, port: Option<u8>) -> Self {
        self.port = self.port.or(port);
        self
    }
}

/// Parse one `[port:]hex` line
pub fn parse_line(line: &str) -> Result<Uplink> {
    let line = line.trim();
    let invalid = |reason: &str| Error::InvalidInput {
        input: line.to_string(),
        reason: reason.to_string(),
    };

    let (port, hex_part) = match line.split_once(':') {
        Some((port, rest)) => {
            let port = port
                .trim()
                .parse::<u8>()
                .map_err(|_| invalid("port must be 0-255"))?;
            (Some(port), rest)
        }
        None => (None, line),
    };

    let digits: String = hex_part.split_whitespace().collect();
    if digits.is_empty() {
        return Err(invalid("no payload bytes"));
    }

    let payload = hex::decode(&digits).map_err(|e| invalid(&e.to_string()))?;
    Ok(Uplink { port, payload })
}

/// True for blank lines and `#` comments
pub fn is_skippable(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_hex() {
        let uplink = parse_line("15011800").unwrap();
        assert_eq!(uplink.port, None);
        assert_eq!(uplink.payload, vec![0x15, 0x01, 0x18, 0x00]);
    }

    #[test]
    fn test_parse_spaced_hex_with_port() {
        let uplink = parse_line(" 2: 0d f8 00 42 \n").unwrap();
        assert_eq!(uplink.port, Some(2));
        assert_eq!(uplink.payload, vec![0x0D, 0xF8, 0x00, 0x42]);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_line("").is_err());
        assert!(parse_line("1:").is_err());
        assert!(parse_line("300:1500").is_err());
        assert!(parse_line("15 0").is_err());
        assert!(parse_line("zz").is_err());
    }

    #[test]
    fn test_default_port_only_fills_missing() {
        let uplink = parse_line("1500").unwrap().with_default_port(Some(1));
        assert_eq!(uplink.port, Some(1));

        let uplink = parse_line("3:00").unwrap().with_default_port(Some(1));
        assert_eq!(uplink.port, Some(3));
    }

    #[test]
    fn test_skippable_lines() {
        assert!(is_skippable("   "));
        assert!(is_skippable("# vectors from the field"));
        assert!(!is_skippable("15 00"));
    }
}
