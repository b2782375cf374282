//! Catena message layouts
//!
//! Bit assignments follow the sensor firmware; keys follow the dashboard
//! flows that consume the decoded records.

use super::{Format, FormatKey, Metadata, Profile};
use crate::codec::{Conversion, FieldSpec, FlagField, FlagRule, Layout, Value, Width};
use crate::constants::{
    FORMAT_CATENA_4410, FORMAT_CATENA_4450_M101, FORMAT_CATENA_4450_M102, PORT_CATENA_4612,
    PORT_CATENA_461X, PORT_FORMATTED,
};

// =============================================================================
// Metadata
// =============================================================================

const FEATHER_RF95: (&str, &str) = ("Feather M0 LoRa", "RF95");
const CATENA_461X_MURATA: (&str, &str) = ("Catena 461x", "Murata");

const fn metadata(
    node_type: &'static str,
    (platform_type, radio_type): (&'static str, &'static str),
    application_name: &'static str,
) -> Metadata {
    Metadata {
        node_type,
        platform_type,
        radio_type,
        application_name,
    }
}

// =============================================================================
// Shared fields
// =============================================================================

fn volts(bit: u8, key: &'static str) -> FlagField {
    FlagField::new(bit, FieldSpec::signed(key, Conversion::Volts))
}

fn boot(bit: u8) -> FlagField {
    FlagField::new(bit, FieldSpec::unsigned("boot", Width::U8, Conversion::Count))
}

/// Temperature, pressure, humidity from the BME280
fn environment(bit: u8) -> FlagField {
    FlagField::compound(
        bit,
        [
            FieldSpec::signed("t", Conversion::Celsius),
            FieldSpec::unsigned("p", Width::U16, Conversion::Hectopascal),
            FieldSpec::unsigned("rh", Width::U8, Conversion::Percent8),
        ],
    )
}

fn lux() -> FieldSpec {
    FieldSpec::unsigned("lux", Width::U16, Conversion::Count)
}

fn irradiance(bit: u8) -> FlagField {
    FlagField::compound(
        bit,
        [
            FieldSpec::unsigned("irradiance.IR", Width::U16, Conversion::Count),
            FieldSpec::unsigned("irradiance.White", Width::U16, Conversion::Count),
            FieldSpec::unsigned("irradiance.UV", Width::U16, Conversion::Count),
        ],
    )
}

/// Soil/water probe fields of the 0x15 layout
///
/// `signed` is false only for the legacy profile, whose flow never
/// sign-extended these two temperatures.
fn probes(signed: bool) -> [FlagField; 2] {
    let celsius = |key: &'static str| {
        if signed {
            FieldSpec::signed(key, Conversion::Celsius)
        } else {
            FieldSpec::unsigned(key, Width::U16, Conversion::Celsius)
        }
    };

    [
        FlagField::new(5, celsius("tWater")),
        FlagField::compound(
            6,
            [
                celsius("tSoil"),
                FieldSpec::unsigned("rhSoil", Width::U8, Conversion::Percent8),
            ],
        ),
    ]
}

// =============================================================================
// Formats
// =============================================================================

/// Layout of 0x15, also used by 0x11 once its flags are widened
fn soil_water_layout(signed_probes: bool, lux_default: Option<Value>) -> Layout {
    let mut lux_spec = lux();
    if let Some(value) = lux_default {
        lux_spec = lux_spec.or_absent(value);
    }

    let mut fields = vec![
        volts(0, "vBat"),
        volts(1, "vBus"),
        boot(2),
        environment(3),
        FlagField::new(4, lux_spec),
    ];
    fields.extend(probes(signed_probes));
    Layout::new(fields)
}

/// 0x15: Catena 4450-M102 soil/water monitor
pub fn catena_4450_m102(profile: Profile) -> Format {
    Format {
        name: "0x15",
        key: FormatKey::code(Some(PORT_FORMATTED), FORMAT_CATENA_4450_M102),
        layout: soil_water_layout(profile == Profile::Strict, None),
        metadata: metadata("Catena 4450-M102", FEATHER_RF95, "Soil/Water monitoring"),
    }
}

/// 0x11: Catena 4410, the 0x15 layout without the boot counter bit
///
/// The flag byte is widened onto the 0x15 layout before decoding. The
/// sign extension of the probe temperatures is kept in both profiles.
pub fn catena_4410(profile: Profile) -> Format {
    let (lux_default, application_name) = match profile {
        Profile::Strict => (None, "Soil/Water monitoring"),
        Profile::Legacy => (Some(Value::Int(0)), "Hualian garden"),
    };

    Format {
        name: "0x11",
        key: FormatKey::code(Some(PORT_FORMATTED), FORMAT_CATENA_4410),
        layout: soil_water_layout(true, lux_default)
            .with_rule(FlagRule::InsertZeroBit { at: 2 }),
        metadata: metadata("Catena 4410", FEATHER_RF95, application_name),
    }
}

/// 0x14: Catena 4450-M101 AC power monitor
pub fn catena_4450_m101() -> Format {
    let fields = vec![
        volts(0, "vBat"),
        volts(1, "vBus"),
        boot(2),
        environment(3),
        FlagField::new(4, lux()),
        FlagField::compound(
            5,
            [
                FieldSpec::unsigned("powerUsed", Width::U16, Conversion::Count),
                FieldSpec::unsigned("powerRev", Width::U16, Conversion::Count),
            ],
        ),
        FlagField::compound(
            6,
            [
                FieldSpec::unsigned("powerUsedDeriv", Width::U16, Conversion::PulsesPerHour),
                FieldSpec::unsigned("powerRevDeriv", Width::U16, Conversion::PulsesPerHour),
            ],
        ),
    ];

    Format {
        name: "0x14",
        key: FormatKey::code(Some(PORT_FORMATTED), FORMAT_CATENA_4450_M101),
        layout: Layout::new(fields),
        metadata: metadata("Catena 4450-M101", FEATHER_RF95, "AC Power Monitoring"),
    }
}

/// Port 2: Catena 4612 simple sensor
pub fn catena_4612() -> Format {
    let fields = vec![
        volts(0, "vBat"),
        volts(1, "VDD"),
        boot(2),
        environment(3),
        irradiance(4),
        volts(5, "vBus"),
    ];

    Format {
        name: "port2",
        key: FormatKey::port(PORT_CATENA_4612),
        layout: Layout::new(fields),
        metadata: metadata("Catena 4612", CATENA_461X_MURATA, "Simple sensor"),
    }
}

/// Port 3: Catena 4617/4618 simple sensor, 16-bit humidity and no pressure
pub fn catena_461x() -> Format {
    let fields = vec![
        volts(0, "vBat"),
        volts(1, "VDD"),
        boot(2),
        FlagField::compound(
            3,
            [
                FieldSpec::signed("t", Conversion::Celsius),
                FieldSpec::unsigned("rh", Width::U16, Conversion::Percent16),
            ],
        ),
        irradiance(4),
        volts(5, "vBus"),
    ];

    Format {
        name: "port3",
        key: FormatKey::port(PORT_CATENA_461X),
        layout: Layout::new(fields),
        metadata: metadata("Catena 4617/4618", CATENA_461X_MURATA, "Simple sensor"),
    }
}

/// Every Catena format for `profile`
pub fn builtin(profile: Profile) -> Vec<Format> {
    vec![
        catena_4410(profile),
        catena_4450_m101(),
        catena_4450_m102(profile),
        catena_4612(),
        catena_461x(),
    ]
}
