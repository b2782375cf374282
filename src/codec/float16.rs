//! Engineering-notation float16
//!
//! Layout: `eeee mmmm mmmm mmmm`. The value is `(m / 4096) * 2^(e - 15)`,
//! so the representable range is `[0, 1)` with 12 significant bits.

use crate::constants::{FLOAT16_EXPONENT_BIAS, FLOAT16_MANTISSA_DIVISOR, PULSE_RATE_PER_HOUR};

/// Decode a raw float16 to its unit-less value
pub fn decode(raw: u16) -> f64 {
    let exponent = i32::from(raw >> 12);
    let mantissa = f64::from(raw & 0x0FFF) / FLOAT16_MANTISSA_DIVISOR;
    mantissa * 2f64.powi(exponent - FLOAT16_EXPONENT_BIAS)
}

/// Decode a pulse-rate float16 to pulses per hour
pub fn pulses_per_hour(raw: u16) -> f64 {
    decode(raw) * PULSE_RATE_PER_HOUR
}
