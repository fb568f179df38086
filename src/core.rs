//! Plain data shared between the protocol engine and its consumers.
//!
//! The telemetry path writes the [`SensorSnapshot`], the query operations
//! write [`ConfigState`] and [`SpnAssignments`]; a display layer only reads
//! them. Every physical reading uses the [`NOT_AVAILABLE`] sentinel instead of
//! an `Option` so the structure stays `Copy` and layout-stable.

/// Sentinel stored in a snapshot field that has not been received or that the
/// module reported as "not available".
pub const NOT_AVAILABLE: f32 = -999.0;

/// Source address used by the OSSM module on the J1939 network.
pub const OSSM_SOURCE_ADDRESS: u8 = 0x95;

/// Number of temperature inputs on the module.
pub const TEMP_INPUT_COUNT: usize = 8;
/// Number of pressure inputs on the module.
pub const PRESSURE_INPUT_COUNT: usize = 7;
/// SPN value stored in an assignment slot whose input is disabled.
pub const SPN_UNASSIGNED: u16 = 0;

/// Snapshot age (ms) after which readings are considered stale.
pub const DEFAULT_STALE_AFTER_MS: u64 = 2000;

/// `true` unless `value` is the [`NOT_AVAILABLE`] sentinel.
#[inline]
pub fn is_available(value: f32) -> bool {
    value != NOT_AVAILABLE
}

//==================================================================================SENSOR_SNAPSHOT
/// Latest physical readings decoded from the module broadcasts.
///
/// Temperatures are in °C, pressures in kPa, humidity in %RH.
/// `last_update_ms` is refreshed once per decoded frame, so freshness is
/// tracked per frame and not per field.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSnapshot {
    pub oil_temperature_c: f32,
    pub coolant_temperature_c: f32,
    pub fuel_temperature_c: f32,
    pub boost_temperature_c: f32,
    pub cac_inlet_temperature_c: f32,
    pub transfer_pipe_temperature_c: f32,
    pub air_inlet_temperature_c: f32,
    pub engine_bay_temperature_c: f32,
    pub ambient_temperature_c: f32,
    pub egt_temperature_c: f32,

    pub oil_pressure_kpa: f32,
    pub coolant_pressure_kpa: f32,
    pub fuel_pressure_kpa: f32,
    pub boost_pressure_kpa: f32,
    pub air_inlet_pressure_kpa: f32,
    pub cac_inlet_pressure_kpa: f32,
    pub transfer_pipe_pressure_kpa: f32,
    pub barometric_pressure_kpa: f32,

    pub humidity_pct: f32,

    /// Monotonic time (ms) of the last decoded frame, `0` if none yet.
    pub last_update_ms: u64,
}

impl SensorSnapshot {
    /// Every reading set to [`NOT_AVAILABLE`], never updated.
    pub const fn new() -> Self {
        Self {
            oil_temperature_c: NOT_AVAILABLE,
            coolant_temperature_c: NOT_AVAILABLE,
            fuel_temperature_c: NOT_AVAILABLE,
            boost_temperature_c: NOT_AVAILABLE,
            cac_inlet_temperature_c: NOT_AVAILABLE,
            transfer_pipe_temperature_c: NOT_AVAILABLE,
            air_inlet_temperature_c: NOT_AVAILABLE,
            engine_bay_temperature_c: NOT_AVAILABLE,
            ambient_temperature_c: NOT_AVAILABLE,
            egt_temperature_c: NOT_AVAILABLE,
            oil_pressure_kpa: NOT_AVAILABLE,
            coolant_pressure_kpa: NOT_AVAILABLE,
            fuel_pressure_kpa: NOT_AVAILABLE,
            boost_pressure_kpa: NOT_AVAILABLE,
            air_inlet_pressure_kpa: NOT_AVAILABLE,
            cac_inlet_pressure_kpa: NOT_AVAILABLE,
            transfer_pipe_pressure_kpa: NOT_AVAILABLE,
            barometric_pressure_kpa: NOT_AVAILABLE,
            humidity_pct: NOT_AVAILABLE,
            last_update_ms: 0,
        }
    }

    /// `true` when nothing was decoded for more than `stale_after_ms`.
    pub fn is_stale(&self, now_ms: u64, stale_after_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_update_ms) > stale_after_ms
    }

    /// Display rows, grouped the way the module panels are laid out.
    pub fn readings(&self) -> [Reading; 19] {
        use ReadingGroup::*;
        [
            Reading::new("Oil Temp", 175, "C", Temperature, self.oil_temperature_c),
            Reading::new("Coolant", 110, "C", Temperature, self.coolant_temperature_c),
            Reading::new("Fuel Temp", 174, "C", Temperature, self.fuel_temperature_c),
            Reading::new("Boost Temp", 105, "C", Temperature, self.boost_temperature_c),
            Reading::new("CAC Inlet", 1131, "C", Temperature, self.cac_inlet_temperature_c),
            Reading::new("Xfer Pipe", 1132, "C", Temperature, self.transfer_pipe_temperature_c),
            Reading::new("Air Inlet", 172, "C", Temperature, self.air_inlet_temperature_c),
            Reading::new("Eng Bay", 441, "C", Temperature, self.engine_bay_temperature_c),
            Reading::new("Oil Pres", 100, "kPa", Pressure, self.oil_pressure_kpa),
            Reading::new("Coolant", 109, "kPa", Pressure, self.coolant_pressure_kpa),
            Reading::new("Fuel Pres", 94, "kPa", Pressure, self.fuel_pressure_kpa),
            Reading::new("Boost Pres", 102, "kPa", Pressure, self.boost_pressure_kpa),
            Reading::new("Air Inlet", 106, "kPa", Pressure, self.air_inlet_pressure_kpa),
            Reading::new("CAC Inlet", 1127, "kPa", Pressure, self.cac_inlet_pressure_kpa),
            Reading::new("Xfer Pipe", 1128, "kPa", Pressure, self.transfer_pipe_pressure_kpa),
            Reading::new("EGT", 173, "C", Egt, self.egt_temperature_c),
            Reading::new("Ambient", 171, "C", Ambient, self.ambient_temperature_c),
            Reading::new("Baro Pres", 108, "kPa", Ambient, self.barometric_pressure_kpa),
            Reading::new("Humidity", 354, "%", Ambient, self.humidity_pct),
        ]
    }
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Panel a reading belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadingGroup {
    Temperature,
    Pressure,
    Egt,
    Ambient,
}

/// One labelled snapshot value, ready for display.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub label: &'static str,
    pub spn: u16,
    pub unit: &'static str,
    pub group: ReadingGroup,
    /// Raw snapshot value, possibly [`NOT_AVAILABLE`].
    pub raw: f32,
}

impl Reading {
    const fn new(
        label: &'static str,
        spn: u16,
        unit: &'static str,
        group: ReadingGroup,
        raw: f32,
    ) -> Self {
        Self {
            label,
            spn,
            unit,
            group,
            raw,
        }
    }

    /// Physical value, `None` when the sentinel is stored.
    pub fn value(&self) -> Option<f32> {
        is_available(self.raw).then_some(self.raw)
    }
}

//==================================================================================CONFIG_STATE
/// Module configuration summary. Stale until a config query succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigState {
    /// Number of enabled temperature inputs.
    pub temp_count: u8,
    /// Number of enabled pressure inputs.
    pub pressure_count: u8,
    /// Exhaust gas temperature probe enabled.
    pub egt_enabled: bool,
    /// Onboard ambient (temperature/pressure/humidity) sensor enabled.
    pub ambient_sensor_enabled: bool,
    /// Address of the module that answered the query.
    pub source_address: u8,
    /// Last thermocouple type code acknowledged by the module.
    pub thermocouple_type: u8,
}

impl ConfigState {
    pub const fn new() -> Self {
        Self {
            temp_count: 0,
            pressure_count: 0,
            egt_enabled: false,
            ambient_sensor_enabled: false,
            source_address: 0,
            thermocouple_type: 0,
        }
    }
}

//==================================================================================SPN_ASSIGNMENTS
/// SPN assigned to each physical input; [`SPN_UNASSIGNED`] marks a disabled input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpnAssignments {
    pub temperature: [u16; TEMP_INPUT_COUNT],
    pub pressure: [u16; PRESSURE_INPUT_COUNT],
}

impl SpnAssignments {
    pub const fn new() -> Self {
        Self {
            temperature: [SPN_UNASSIGNED; TEMP_INPUT_COUNT],
            pressure: [SPN_UNASSIGNED; PRESSURE_INPUT_COUNT],
        }
    }

    /// Mark every input unassigned.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Assigned temperature inputs as `(input number starting at 1, spn)`.
    pub fn assigned_temperature(&self) -> impl Iterator<Item = (u8, u16)> + '_ {
        assigned(&self.temperature)
    }

    /// Assigned pressure inputs as `(input number starting at 1, spn)`.
    pub fn assigned_pressure(&self) -> impl Iterator<Item = (u8, u16)> + '_ {
        assigned(&self.pressure)
    }
}

fn assigned(slots: &[u16]) -> impl Iterator<Item = (u8, u16)> + '_ {
    slots
        .iter()
        .enumerate()
        .filter(|(_, spn)| **spn != SPN_UNASSIGNED)
        .map(|(idx, spn)| (idx as u8 + 1, *spn))
}
