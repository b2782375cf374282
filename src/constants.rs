//! Application-wide constants
//!
//! Wire-level codes and scale factors shared by the format tables.

// =============================================================================
// Format codes (leading payload byte, port 1)
// =============================================================================

/// Catena 4410 soil/water record, legacy layout without boot counter
pub const FORMAT_CATENA_4410: u8 = 0x11;

/// Catena 4450-M101 power monitor record
pub const FORMAT_CATENA_4450_M101: u8 = 0x14;

/// Catena 4450-M102 soil/water record
pub const FORMAT_CATENA_4450_M102: u8 = 0x15;

// =============================================================================
// LoRaWAN ports
// =============================================================================

/// Port carrying records that start with a format byte
pub const PORT_FORMATTED: u8 = 1;

/// Catena 4612 simple sensor (flag byte first, no format byte)
pub const PORT_CATENA_4612: u8 = 2;

/// Catena 4617/4618 simple sensor (flag byte first, no format byte)
pub const PORT_CATENA_461X: u8 = 3;

// =============================================================================
// Scaling
// =============================================================================

/// Fixed-point divisor for voltages (Q4.12)
pub const VOLTS_DIVISOR: f64 = 4096.0;

/// Fixed-point divisor for temperatures (Q8.8)
pub const CELSIUS_DIVISOR: f64 = 256.0;

/// Pressure raw unit is 4 Pa
pub const PRESSURE_STEP_PA: u32 = 4;

/// Pascal per hectopascal
pub const PA_PER_HPA: f64 = 100.0;

/// Full-scale value of the 16-bit humidity reading
pub const HUMIDITY16_FULL_SCALE: f64 = 65535.0;

/// Exponent bias of the pulse-rate float16
pub const FLOAT16_EXPONENT_BIAS: i32 = 15;

/// Mantissa divisor of the pulse-rate float16
pub const FLOAT16_MANTISSA_DIVISOR: f64 = 4096.0;

/// Scale from pulse-rate float16 to pulses per hour
pub const PULSE_RATE_PER_HOUR: f64 = 60.0 * 60.0 * 4.0;
