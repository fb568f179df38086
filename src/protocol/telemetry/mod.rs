//! Telemetry decoding: turns the module's broadcast frames into readings of
//! the [`SensorSnapshot`].
//!
//! | PGN    | Bytes                                                                  |
//! |--------|------------------------------------------------------------------------|
//! | 0xFEF5 | baro `[0]`, ambient temp `[3..5]` hi-res, air inlet temp `[5]`         |
//! | 0xFEF6 | boost pres `[1]`, boost temp `[2]`, air inlet pres `[3]`, EGT `[5..7]` |
//! | 0xFEEE | coolant temp `[0]`, fuel temp `[1]`, oil temp `[2..4]` hi-res          |
//! | 0xFEEF | fuel pres `[0]` 4 kPa, oil pres `[3]` 4 kPa, coolant pres `[6]` 2 kPa  |
//! | 0xFE69 | accepted, nothing decoded                                              |
//! | 0xFE95 | CAC inlet temp `[0]`, transfer pipe temp `[1]`                         |
//! | 0xFE96 | CAC inlet pres `[0..2]`, transfer pipe pres `[2..4]`, 0.125 kPa        |
//! | 65164  | engine bay temp `[0]`, humidity `[6]`                                  |
use crate::{
    core::{SensorSnapshot, OSSM_SOURCE_ADDRESS},
    infra::codec::scalar::{
        barometric_pressure, humidity, pressure_2kpa, pressure_4kpa, pressure_eighth_kpa,
        temp_byte, temp_hi_res,
    },
    protocol::transport::can_frame::CanFrame,
};

pub const PGN_AMBIENT_CONDITIONS: u32 = 0xFEF5;
pub const PGN_INLET_EXHAUST: u32 = 0xFEF6;
pub const PGN_ENGINE_TEMPERATURE_1: u32 = 0xFEEE;
pub const PGN_ENGINE_FLUID_PRESSURE: u32 = 0xFEEF;
/// High-resolution engine temperatures. Not mapped to any snapshot field.
pub const PGN_ENGINE_TEMPERATURE_2: u32 = 0xFE69;
pub const PGN_ENGINE_TEMPERATURE_3: u32 = 0xFE95;
pub const PGN_TURBO_PRESSURE: u32 = 0xFE96;
/// Supply pressure group, carrying engine bay temperature and humidity.
pub const PGN_SUPPLY_PRESSURE: u32 = 65164;

//==================================================================================TELEMETRY_PGN
/// Parameter groups the module broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryPgn {
    AmbientConditions,
    InletExhaust,
    EngineTemperature1,
    EngineFluidPressure,
    EngineTemperature2,
    EngineTemperature3,
    TurboPressure,
    SupplyPressure,
}

impl TelemetryPgn {
    pub const ALL: [TelemetryPgn; 8] = [
        Self::AmbientConditions,
        Self::InletExhaust,
        Self::EngineTemperature1,
        Self::EngineFluidPressure,
        Self::EngineTemperature2,
        Self::EngineTemperature3,
        Self::TurboPressure,
        Self::SupplyPressure,
    ];

    pub const fn from_pgn(pgn: u32) -> Option<Self> {
        match pgn {
            PGN_AMBIENT_CONDITIONS => Some(Self::AmbientConditions),
            PGN_INLET_EXHAUST => Some(Self::InletExhaust),
            PGN_ENGINE_TEMPERATURE_1 => Some(Self::EngineTemperature1),
            PGN_ENGINE_FLUID_PRESSURE => Some(Self::EngineFluidPressure),
            PGN_ENGINE_TEMPERATURE_2 => Some(Self::EngineTemperature2),
            PGN_ENGINE_TEMPERATURE_3 => Some(Self::EngineTemperature3),
            PGN_TURBO_PRESSURE => Some(Self::TurboPressure),
            PGN_SUPPLY_PRESSURE => Some(Self::SupplyPressure),
            _ => None,
        }
    }

    pub const fn pgn(self) -> u32 {
        match self {
            Self::AmbientConditions => PGN_AMBIENT_CONDITIONS,
            Self::InletExhaust => PGN_INLET_EXHAUST,
            Self::EngineTemperature1 => PGN_ENGINE_TEMPERATURE_1,
            Self::EngineFluidPressure => PGN_ENGINE_FLUID_PRESSURE,
            Self::EngineTemperature2 => PGN_ENGINE_TEMPERATURE_2,
            Self::EngineTemperature3 => PGN_ENGINE_TEMPERATURE_3,
            Self::TurboPressure => PGN_TURBO_PRESSURE,
            Self::SupplyPressure => PGN_SUPPLY_PRESSURE,
        }
    }

    /// Write the fields this group carries into `snapshot`.
    pub fn apply(self, d: &[u8; 8], snapshot: &mut SensorSnapshot) {
        match self {
            Self::AmbientConditions => {
                snapshot.barometric_pressure_kpa = barometric_pressure(d[0]);
                snapshot.ambient_temperature_c = temp_hi_res(d[3], d[4]);
                snapshot.air_inlet_temperature_c = temp_byte(d[5]);
            }
            Self::InletExhaust => {
                snapshot.boost_pressure_kpa = pressure_2kpa(d[1]);
                snapshot.boost_temperature_c = temp_byte(d[2]);
                snapshot.air_inlet_pressure_kpa = pressure_2kpa(d[3]);
                snapshot.egt_temperature_c = temp_hi_res(d[5], d[6]);
            }
            Self::EngineTemperature1 => {
                snapshot.coolant_temperature_c = temp_byte(d[0]);
                snapshot.fuel_temperature_c = temp_byte(d[1]);
                snapshot.oil_temperature_c = temp_hi_res(d[2], d[3]);
            }
            Self::EngineFluidPressure => {
                snapshot.fuel_pressure_kpa = pressure_4kpa(d[0]);
                snapshot.oil_pressure_kpa = pressure_4kpa(d[3]);
                snapshot.coolant_pressure_kpa = pressure_2kpa(d[6]);
            }
            Self::EngineTemperature2 => {}
            Self::EngineTemperature3 => {
                snapshot.cac_inlet_temperature_c = temp_byte(d[0]);
                snapshot.transfer_pipe_temperature_c = temp_byte(d[1]);
            }
            Self::TurboPressure => {
                snapshot.cac_inlet_pressure_kpa = pressure_eighth_kpa(d[0], d[1]);
                snapshot.transfer_pipe_pressure_kpa = pressure_eighth_kpa(d[2], d[3]);
            }
            Self::SupplyPressure => {
                snapshot.engine_bay_temperature_c = temp_byte(d[0]);
                snapshot.humidity_pct = humidity(d[6]);
            }
        }
    }
}

//==================================================================================DECODER
/// Decode one frame into `snapshot`.
///
/// Returns `true` when the frame came from the module and carries a known
/// group; `last_update_ms` is then set to `now_ms`. Foreign, standard-id and
/// unknown frames return `false` and leave the snapshot untouched.
pub fn decode_frame(frame: &CanFrame, snapshot: &mut SensorSnapshot, now_ms: u64) -> bool {
    if !frame.extended || frame.id.source_address() != OSSM_SOURCE_ADDRESS {
        return false;
    }
    let Some(group) = TelemetryPgn::from_pgn(frame.id.pgn()) else {
        #[cfg(feature = "defmt")]
        defmt::trace!("telemetry: ignoring PGN {=u32:#x}", frame.id.pgn());
        return false;
    };

    group.apply(&frame.data, snapshot);
    snapshot.last_update_ms = now_ms;

    #[cfg(feature = "defmt")]
    defmt::trace!("telemetry: decoded {}", group);
    true
}
