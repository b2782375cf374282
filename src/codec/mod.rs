//! Flag-driven field codec
//!
//! Separates the wire walk from the format tables:
//! - **Codec**: how a flag byte and the fields it gates are read and scaled
//! - **Format**: which fields a given message type declares (see `format`)
//!
//! # Adding a new field kind
//!
//! 1. Add a variant to `Conversion`
//! 2. Handle it in `Conversion::apply`
//! 3. Reference it from a `FieldSpec` in a format table

pub mod engine;
pub mod float16;
mod reader;

pub use engine::{decode_fields, FieldWalk};

use crate::constants::{
    CELSIUS_DIVISOR, HUMIDITY16_FULL_SCALE, PA_PER_HPA, PRESSURE_STEP_PA, VOLTS_DIVISOR,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// One decoded measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Counters and unscaled raw readings
    Int(i64),
    /// Scaled physical quantities
    Float(f64),
}

impl Value {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Int(v) => Some(v),
            Self::Float(_) => None,
        }
    }
}

/// Decoded measurements keyed by output name
///
/// Only fields whose flag bit was set appear, plus explicit table defaults.
pub type Fields = BTreeMap<&'static str, Value>;

/// Wire width of one raw value (big-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    U8,
    U16,
}

impl Width {
    pub const fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
        }
    }
}

/// Raw-to-physical conversion of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `raw / 4096` volts
    Volts,
    /// `raw / 256` degrees Celsius
    Celsius,
    /// `raw * 4 / 100` hPa
    Hectopascal,
    /// `raw / 256 * 100` percent (8-bit reading)
    Percent8,
    /// `raw / 65535 * 100` percent (16-bit reading)
    Percent16,
    /// Unscaled integer
    Count,
    /// Engineering-notation float16, pulses per hour
    PulsesPerHour,
}

impl Conversion {
    /// Scale a raw (already sign-extended if needed) value
    pub fn apply(self, raw: i64) -> Value {
        match self {
            Self::Volts => Value::Float(raw as f64 / VOLTS_DIVISOR),
            Self::Celsius => Value::Float(raw as f64 / CELSIUS_DIVISOR),
            Self::Hectopascal => {
                Value::Float((raw * i64::from(PRESSURE_STEP_PA)) as f64 / PA_PER_HPA)
            }
            Self::Percent8 => Value::Float(raw as f64 / 256.0 * 100.0),
            Self::Percent16 => Value::Float(raw as f64 / HUMIDITY16_FULL_SCALE * 100.0),
            Self::Count => Value::Int(raw),
            Self::PulsesPerHour => Value::Float(float16::pulses_per_hour(raw as u16)),
        }
    }
}

/// One value read from the wire
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Output key
    pub key: &'static str,
    pub width: Width,
    /// Read as 16-bit two's complement before scaling
    pub signed: bool,
    pub conversion: Conversion,
    /// Value emitted when the flag bit is clear (almost always `None`)
    pub absent: Option<Value>,
}

impl FieldSpec {
    pub const fn unsigned(key: &'static str, width: Width, conversion: Conversion) -> Self {
        Self {
            key,
            width,
            signed: false,
            conversion,
            absent: None,
        }
    }

    /// 16-bit two's complement field
    pub const fn signed(key: &'static str, conversion: Conversion) -> Self {
        Self {
            key,
            width: Width::U16,
            signed: true,
            conversion,
            absent: None,
        }
    }

    /// Emit `value` when the gating flag bit is clear
    pub const fn or_absent(mut self, value: Value) -> Self {
        self.absent = Some(value);
        self
    }

    pub fn decode_raw(&self, raw: u32) -> Value {
        let raw = if self.signed {
            i64::from(raw as u16 as i16)
        } else {
            i64::from(raw)
        };
        self.conversion.apply(raw)
    }
}

/// One flag bit and the values it gates
///
/// Compound fields list several parts, consumed in order.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagField {
    pub bit: u8,
    pub parts: Vec<FieldSpec>,
}

impl FlagField {
    pub fn new(bit: u8, part: FieldSpec) -> Self {
        Self {
            bit,
            parts: vec![part],
        }
    }

    pub fn compound(bit: u8, parts: impl Into<Vec<FieldSpec>>) -> Self {
        Self {
            bit,
            parts: parts.into(),
        }
    }

    pub fn mask(&self) -> u16 {
        1 << self.bit
    }

    /// Number of payload bytes consumed when the bit is set
    pub fn wire_len(&self) -> usize {
        self.parts.iter().map(|p| p.width.bytes()).sum()
    }
}

/// Flag normalization applied once, before any bit is tested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagRule {
    #[default]
    Identity,
    /// Insert a zero bit at position `at`, shifting higher bits up by one
    ///
    /// Maps a legacy layout that lacks one field onto its successor's layout.
    InsertZeroBit { at: u8 },
}

impl FlagRule {
    pub fn normalize(self, flags: u8) -> u16 {
        let flags = u16::from(flags);
        match self {
            Self::Identity => flags,
            Self::InsertZeroBit { at } => {
                // A bit past the flag word leaves every flag in place
                let low = 1u16
                    .checked_shl(u32::from(at))
                    .map_or(u16::MAX, |bit| bit - 1);
                ((flags & !low) << 1) | (flags & low)
            }
        }
    }
}

/// Field layout of one message type
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    pub rule: FlagRule,
    /// Flag fields in ascending bit order
    pub fields: Vec<FlagField>,
}

impl Layout {
    pub fn new(fields: Vec<FlagField>) -> Self {
        Self {
            rule: FlagRule::Identity,
            fields,
        }
    }

    pub fn with_rule(mut self, rule: FlagRule) -> Self {
        self.rule = rule;
        self
    }

    /// Union of all bits that gate a field (after normalization)
    pub fn known_bits(&self) -> u16 {
        self.fields.iter().fold(0, |acc, f| acc | f.mask())
    }
}
