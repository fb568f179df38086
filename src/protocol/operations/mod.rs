//! Configuration operations offered by the module, one function per action.
//!
//! Every operation is a single [`transact`] round trip, except
//! [`query_spn_assignments`] which chains six of them. Results follow the
//! engine's three tiers: `Ok`, [`CommandError::Module`] with the firmware
//! code, or a no-response error (see [`CommandError::is_no_response`]).
use crate::{
    core::{ConfigState, SpnAssignments, OSSM_SOURCE_ADDRESS},
    error::CommandError,
    protocol::{
        command::{transact, Command, ResponseTiming, ResultBlock},
        transport::traits::{can_bus::CanBus, ossm_timer::OssmTimer},
    },
};

/// Sub-queries per SPN table; each answers three slots.
pub const SPN_SUB_QUERIES: u8 = 3;
/// SPNs carried by one sub-query response.
pub const SPNS_PER_RESPONSE: usize = 3;
/// SPN value marking an unused slot in a sub-query response.
pub const SPN_SLOT_UNUSED: u16 = 0xFFFF;

//==================================================================================ENUMS
/// First parameter byte of [`Command::Query`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueryType {
    /// Enabled input counts and feature flags.
    Counts = 0,
    TemperatureSpns = 1,
    PressureSpns = 2,
}

/// Thermocouple type of the EGT input.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThermocoupleType {
    B = 0,
    E = 1,
    J = 2,
    K = 3,
    N = 4,
    R = 5,
    S = 6,
    T = 7,
}

impl ThermocoupleType {
    pub const ALL: [ThermocoupleType; 8] = [
        Self::B,
        Self::E,
        Self::J,
        Self::K,
        Self::N,
        Self::R,
        Self::S,
        Self::T,
    ];

    pub const fn from_u8(value: u8) -> Option<Self> {
        if (value as usize) < Self::ALL.len() {
            Some(Self::ALL[value as usize])
        } else {
            None
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::B => "B",
            Self::E => "E",
            Self::J => "J",
            Self::K => "K",
            Self::N => "N",
            Self::R => "R",
            Self::S => "S",
            Self::T => "T",
        }
    }
}

/// Calibration presets for NTC temperature inputs.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NtcPreset {
    Aem = 0,
    Bosch = 1,
    Gm = 2,
}

impl NtcPreset {
    pub const ALL: [NtcPreset; 3] = [Self::Aem, Self::Bosch, Self::Gm];

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Aem),
            1 => Some(Self::Bosch),
            2 => Some(Self::Gm),
            _ => None,
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Aem => "AEM",
            Self::Bosch => "Bosch",
            Self::Gm => "GM",
        }
    }
}

/// Pressure sensor ranges.
///
/// Absolute sensors (bar) use codes 0-15, gauge sensors (PSI) 20-30. The
/// firmware switches on these literal values, 16-19 are not presets.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressurePreset {
    Bar1 = 0,
    Bar1_5 = 1,
    Bar2 = 2,
    Bar2_5 = 3,
    Bar3 = 4,
    Bar4 = 5,
    Bar5 = 6,
    Bar7 = 7,
    Bar10 = 8,
    Bar50 = 9,
    Bar100 = 10,
    Bar150 = 11,
    Bar200 = 12,
    Bar1000 = 13,
    Bar2000 = 14,
    Bar3000 = 15,
    Psi15 = 20,
    Psi30 = 21,
    Psi50 = 22,
    Psi100 = 23,
    Psi150 = 24,
    Psi200 = 25,
    Psi250 = 26,
    Psi300 = 27,
    Psi350 = 28,
    Psi400 = 29,
    Psi500 = 30,
}

impl PressurePreset {
    pub const BAR: [PressurePreset; 16] = [
        Self::Bar1,
        Self::Bar1_5,
        Self::Bar2,
        Self::Bar2_5,
        Self::Bar3,
        Self::Bar4,
        Self::Bar5,
        Self::Bar7,
        Self::Bar10,
        Self::Bar50,
        Self::Bar100,
        Self::Bar150,
        Self::Bar200,
        Self::Bar1000,
        Self::Bar2000,
        Self::Bar3000,
    ];

    pub const PSI: [PressurePreset; 11] = [
        Self::Psi15,
        Self::Psi30,
        Self::Psi50,
        Self::Psi100,
        Self::Psi150,
        Self::Psi200,
        Self::Psi250,
        Self::Psi300,
        Self::Psi350,
        Self::Psi400,
        Self::Psi500,
    ];

    const PSI_BASE: u8 = 20;

    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0..=15 => Some(Self::BAR[value as usize]),
            20..=30 => Some(Self::PSI[(value - Self::PSI_BASE) as usize]),
            _ => None,
        }
    }

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Absolute (bar) family.
    pub const fn is_absolute(self) -> bool {
        self.as_u8() < Self::PSI_BASE
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Bar1 => "1 bar",
            Self::Bar1_5 => "1.5 bar",
            Self::Bar2 => "2 bar",
            Self::Bar2_5 => "2.5 bar",
            Self::Bar3 => "3 bar",
            Self::Bar4 => "4 bar",
            Self::Bar5 => "5 bar",
            Self::Bar7 => "7 bar",
            Self::Bar10 => "10 bar",
            Self::Bar50 => "50 bar",
            Self::Bar100 => "100 bar",
            Self::Bar150 => "150 bar",
            Self::Bar200 => "200 bar",
            Self::Bar1000 => "1000 bar",
            Self::Bar2000 => "2000 bar",
            Self::Bar3000 => "3000 bar",
            Self::Psi15 => "15 PSI",
            Self::Psi30 => "30 PSI",
            Self::Psi50 => "50 PSI",
            Self::Psi100 => "100 PSI",
            Self::Psi150 => "150 PSI",
            Self::Psi200 => "200 PSI",
            Self::Psi250 => "250 PSI",
            Self::Psi300 => "300 PSI",
            Self::Psi350 => "350 PSI",
            Self::Psi400 => "400 PSI",
            Self::Psi500 => "500 PSI",
        }
    }
}

//==================================================================================OPERATIONS
/// Enable or disable monitoring of `spn` on `input`.
/// Parameters: `[spn_hi, spn_lo, enable, input]`.
pub async fn enable_spn<C: CanBus, T: OssmTimer>(
    can_bus: &mut C,
    timer: &mut T,
    timing: &ResponseTiming,
    spn: u16,
    enable: bool,
    input: u8,
) -> Result<(), CommandError<C::Error>> {
    let [spn_hi, spn_lo] = spn.to_be_bytes();
    let params = [spn_hi, spn_lo, enable as u8, input];
    transact(can_bus, timer, timing, Command::EnableSpn, &params).await?;
    Ok(())
}

/// Apply an NTC calibration preset to temperature `input`.
pub async fn set_ntc_preset<C: CanBus, T: OssmTimer>(
    can_bus: &mut C,
    timer: &mut T,
    timing: &ResponseTiming,
    input: u8,
    preset: NtcPreset,
) -> Result<(), CommandError<C::Error>> {
    let params = [input, preset.as_u8()];
    transact(can_bus, timer, timing, Command::NtcPreset, &params).await?;
    Ok(())
}

/// Apply a pressure range preset to pressure `input`.
pub async fn set_pressure_preset<C: CanBus, T: OssmTimer>(
    can_bus: &mut C,
    timer: &mut T,
    timing: &ResponseTiming,
    input: u8,
    preset: PressurePreset,
) -> Result<(), CommandError<C::Error>> {
    let params = [input, preset.as_u8()];
    transact(can_bus, timer, timing, Command::PressurePreset, &params).await?;
    Ok(())
}

/// Select the thermocouple type of the EGT input.
pub async fn set_tc_type<C: CanBus, T: OssmTimer>(
    can_bus: &mut C,
    timer: &mut T,
    timing: &ResponseTiming,
    tc_type: ThermocoupleType,
) -> Result<(), CommandError<C::Error>> {
    transact(can_bus, timer, timing, Command::SetTcType, &[tc_type.as_u8()]).await?;
    Ok(())
}

/// Read input counts and feature flags into `state`.
///
/// Result bytes: `[temp_count, pressure_count, egt, ambient, ..]`. `state` is
/// only written when the module reports success.
pub async fn query_config<C: CanBus, T: OssmTimer>(
    can_bus: &mut C,
    timer: &mut T,
    timing: &ResponseTiming,
    state: &mut ConfigState,
) -> Result<(), CommandError<C::Error>> {
    let result = transact(
        can_bus,
        timer,
        timing,
        Command::Query,
        &[QueryType::Counts as u8],
    )
    .await?;

    state.temp_count = result[0];
    state.pressure_count = result[1];
    state.egt_enabled = result[2] != 0;
    state.ambient_sensor_enabled = result[3] != 0;
    state.source_address = OSSM_SOURCE_ADDRESS;
    Ok(())
}

/// Read the SPN assigned to every temperature and pressure input.
///
/// `assignments` is cleared, then filled by three temperature sub-queries
/// followed by three pressure sub-queries. The first failing sub-query aborts
/// the rest and its error is returned; slots written before the failure are
/// kept, so the table must be treated as invalid on error.
pub async fn query_spn_assignments<C: CanBus, T: OssmTimer>(
    can_bus: &mut C,
    timer: &mut T,
    timing: &ResponseTiming,
    assignments: &mut SpnAssignments,
) -> Result<(), CommandError<C::Error>> {
    assignments.clear();
    query_spn_table(
        can_bus,
        timer,
        timing,
        QueryType::TemperatureSpns,
        &mut assignments.temperature,
    )
    .await?;
    query_spn_table(
        can_bus,
        timer,
        timing,
        QueryType::PressureSpns,
        &mut assignments.pressure,
    )
    .await
}

async fn query_spn_table<C: CanBus, T: OssmTimer>(
    can_bus: &mut C,
    timer: &mut T,
    timing: &ResponseTiming,
    query: QueryType,
    slots: &mut [u16],
) -> Result<(), CommandError<C::Error>> {
    for sub_query in 0..SPN_SUB_QUERIES {
        #[cfg(feature = "defmt")]
        defmt::debug!("SPN query {} sub-query {=u8}", query, sub_query);

        let params = [query as u8, sub_query];
        let result = transact(can_bus, timer, timing, Command::Query, &params).await?;
        store_spns(&result, sub_query, slots);
    }
    Ok(())
}

/// Write the three big-endian SPNs of one response into their slots.
/// Slot index is `sub_query * 3 + i`; indices past the table and
/// [`SPN_SLOT_UNUSED`] entries are skipped.
fn store_spns(result: &ResultBlock, sub_query: u8, slots: &mut [u16]) {
    for (i, pair) in result.chunks_exact(2).take(SPNS_PER_RESPONSE).enumerate() {
        let index = sub_query as usize * SPNS_PER_RESPONSE + i;
        let spn = u16::from_be_bytes([pair[0], pair[1]]);
        if spn == SPN_SLOT_UNUSED {
            continue;
        }
        if let Some(slot) = slots.get_mut(index) {
            *slot = spn;
        }
    }
}

/// Persist the current configuration in the module.
pub async fn save_config<C: CanBus, T: OssmTimer>(
    can_bus: &mut C,
    timer: &mut T,
    timing: &ResponseTiming,
) -> Result<(), CommandError<C::Error>> {
    transact(can_bus, timer, timing, Command::Save, &[]).await?;
    Ok(())
}

/// Restore the module's factory configuration.
pub async fn reset_config<C: CanBus, T: OssmTimer>(
    can_bus: &mut C,
    timer: &mut T,
    timing: &ResponseTiming,
) -> Result<(), CommandError<C::Error>> {
    transact(can_bus, timer, timing, Command::Reset, &[]).await?;
    Ok(())
}
