//! Command/response engine.
//!
//! A command is one eight-byte frame on PGN 0xFF00 (`[cmd][params..]`, unused
//! bytes `0xFF`). The module answers on PGN 0xFF01 with
//! `[cmd][error][6 result bytes]`. The wire format carries no request
//! identifier, so only one command may be outstanding at a time: a response
//! whose command byte differs from the one awaited is dropped.
//!
//! Timing of a round trip: a fixed grace period, then one poll of the bus per
//! interval until the timeout elapses (50 ms + 1000 ms by default).
use crate::{
    core::OSSM_SOURCE_ADDRESS,
    error::CommandError,
    protocol::transport::{
        can_frame::{CanFrame, PAD_BYTE},
        can_id::CanId,
        traits::{can_bus::CanBus, ossm_timer::OssmTimer},
    },
};

/// Host to module.
pub const COMMAND_PGN: u32 = 0xFF00;
/// Module to host.
pub const RESPONSE_PGN: u32 = 0xFF01;
pub const COMMAND_PRIORITY: u8 = 6;
/// Source address used by the host for commands.
pub const HOST_SOURCE_ADDRESS: u8 = 0x00;
/// Parameter bytes that fit after the command byte. Extra bytes are dropped.
pub const MAX_COMMAND_PARAMS: usize = 7;
/// Size of the result block of a response.
pub const RESULT_LEN: usize = 6;

/// Result bytes 2..8 of a response frame.
pub type ResultBlock = [u8; RESULT_LEN];

//==================================================================================COMMAND
/// Command codes understood by the module firmware.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    EnableSpn = 0x01,
    /// Low-level NTC coefficients. Superseded by [`Command::NtcPreset`].
    SetNtcParam = 0x02,
    /// Low-level pressure range. Superseded by [`Command::PressurePreset`].
    SetPressureRange = 0x03,
    SetTcType = 0x04,
    Query = 0x05,
    Save = 0x06,
    Reset = 0x07,
    NtcPreset = 0x08,
    PressurePreset = 0x09,
}

impl Command {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0x01 => Self::EnableSpn,
            0x02 => Self::SetNtcParam,
            0x03 => Self::SetPressureRange,
            0x04 => Self::SetTcType,
            0x05 => Self::Query,
            0x06 => Self::Save,
            0x07 => Self::Reset,
            0x08 => Self::NtcPreset,
            0x09 => Self::PressurePreset,
            _ => return None,
        })
    }
}

//==================================================================================ERROR_CODE
/// Error byte of a response. Numbering is owned by the firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    Ok,
    UnknownCommand,
    ParseFailed,
    UnknownSpn,
    InvalidTemperatureInput,
    InvalidPressureInput,
    InvalidNtcParameter,
    InvalidThermocoupleType,
    InvalidQueryType,
    SaveFailed,
    InvalidPreset,
    /// Code outside the known taxonomy, kept verbatim.
    Other(u8),
}

impl ErrorCode {
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0x00 => Self::Ok,
            0x01 => Self::UnknownCommand,
            0x02 => Self::ParseFailed,
            0x03 => Self::UnknownSpn,
            0x04 => Self::InvalidTemperatureInput,
            0x05 => Self::InvalidPressureInput,
            0x06 => Self::InvalidNtcParameter,
            0x07 => Self::InvalidThermocoupleType,
            0x08 => Self::InvalidQueryType,
            0x09 => Self::SaveFailed,
            0x0A => Self::InvalidPreset,
            other => Self::Other(other),
        }
    }

    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Ok => 0x00,
            Self::UnknownCommand => 0x01,
            Self::ParseFailed => 0x02,
            Self::UnknownSpn => 0x03,
            Self::InvalidTemperatureInput => 0x04,
            Self::InvalidPressureInput => 0x05,
            Self::InvalidNtcParameter => 0x06,
            Self::InvalidThermocoupleType => 0x07,
            Self::InvalidQueryType => 0x08,
            Self::SaveFailed => 0x09,
            Self::InvalidPreset => 0x0A,
            Self::Other(code) => code,
        }
    }

    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Human-readable message for status lines.
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ok => "Success",
            Self::UnknownCommand => "Unknown command",
            Self::ParseFailed => "Parse failed",
            Self::UnknownSpn => "Unknown SPN",
            Self::InvalidTemperatureInput => "Invalid temperature input",
            Self::InvalidPressureInput => "Invalid pressure input",
            Self::InvalidNtcParameter => "Invalid NTC parameter",
            Self::InvalidThermocoupleType => "Invalid thermocouple type",
            Self::InvalidQueryType => "Invalid query type",
            Self::SaveFailed => "Save failed",
            Self::InvalidPreset => "Invalid preset",
            Self::Other(_) => "Unknown error",
        }
    }
}

//==================================================================================TIMING
/// Response window of a command round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResponseTiming {
    /// Delay before the first poll, for the module to process the command.
    pub grace_ms: u32,
    /// Delay between two polls of the bus.
    pub poll_interval_ms: u32,
    /// Polling budget after the grace period.
    pub timeout_ms: u32,
}

impl ResponseTiming {
    pub const DEFAULT: Self = Self {
        grace_ms: 50,
        poll_interval_ms: 5,
        timeout_ms: 1000,
    };

    /// Worst-case duration of a round trip without a response.
    pub const fn total_window_ms(&self) -> u32 {
        self.grace_ms.saturating_add(self.timeout_ms)
    }
}

impl Default for ResponseTiming {
    fn default() -> Self {
        Self::DEFAULT
    }
}

//==================================================================================RESPONSE
/// Decoded PGN 0xFF01 frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Response {
    /// Command byte echoed by the module.
    pub command: u8,
    pub error: ErrorCode,
    pub result: ResultBlock,
}

impl Response {
    /// Parse a frame sent by the module on the response PGN. Anything else
    /// yields `None`.
    pub fn parse(frame: &CanFrame) -> Option<Self> {
        if !frame.extended
            || frame.id.pgn() != RESPONSE_PGN
            || frame.id.source_address() != OSSM_SOURCE_ADDRESS
        {
            return None;
        }
        let mut result = [0u8; RESULT_LEN];
        result.copy_from_slice(&frame.data[2..8]);
        Some(Self {
            command: frame.data[0],
            error: ErrorCode::from_u8(frame.data[1]),
            result,
        })
    }

    /// `Ok(result)` for error code 0, the module error otherwise.
    pub fn into_result<E: core::fmt::Debug>(self) -> Result<ResultBlock, CommandError<E>> {
        if self.error.is_ok() {
            Ok(self.result)
        } else {
            Err(CommandError::Module(self.error))
        }
    }
}

//==================================================================================ENGINE
/// Build the command frame: `[cmd][params..]`, padded with `0xFF`.
/// Parameters past [`MAX_COMMAND_PARAMS`] are truncated.
pub fn build_command_frame(command: Command, params: &[u8]) -> CanFrame {
    let id = CanId::builder(COMMAND_PGN, HOST_SOURCE_ADDRESS)
        .with_priority(COMMAND_PRIORITY)
        .build();
    let mut data = [PAD_BYTE; 8];
    data[0] = command.as_u8();
    let len = params.len().min(MAX_COMMAND_PARAMS);
    data[1..1 + len].copy_from_slice(&params[..len]);
    CanFrame::new_j1939(id, data)
}

/// Transmit a command frame. A bus failure is returned as-is, no retry.
pub async fn send_command<C: CanBus>(
    can_bus: &mut C,
    command: Command,
    params: &[u8],
) -> Result<(), CommandError<C::Error>> {
    let frame = build_command_frame(command, params);

    #[cfg(feature = "defmt")]
    defmt::debug!("TX command {} params={=[u8]:x}", command, params);

    can_bus.send(&frame).await.map_err(CommandError::Send)
}

/// Wait for the response to `expected`.
///
/// Sleeps `grace_ms`, then drains at most one frame per `poll_interval_ms`
/// until `timeout_ms` has elapsed. Frames other than a module response to
/// `expected` are discarded. A failed receive does not end the wait; if no
/// response arrives, the last receive error is returned instead of
/// [`CommandError::Timeout`].
pub async fn check_response<C: CanBus, T: OssmTimer>(
    can_bus: &mut C,
    timer: &mut T,
    timing: &ResponseTiming,
    expected: Command,
) -> Result<ResultBlock, CommandError<C::Error>> {
    let poll_interval = timing.poll_interval_ms.max(1);
    timer.delay_ms(timing.grace_ms).await;

    let mut last_error = None;
    let mut elapsed = 0u32;
    while elapsed < timing.timeout_ms {
        match can_bus.try_recv().await {
            Ok(Some(frame)) => match Response::parse(&frame) {
                Some(response) if response.command == expected.as_u8() => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("RX response {} error={}", expected, response.error);
                    return response.into_result();
                }
                Some(_response) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!(
                        "Discarding response to command {=u8:#x} while waiting for {}",
                        _response.command,
                        expected
                    );
                }
                None => {}
            },
            Ok(None) => {}
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "Receive error while waiting for {}: {}",
                    expected,
                    defmt::Debug2Format(&e)
                );
                last_error = Some(e);
            }
        }
        timer.delay_ms(poll_interval).await;
        elapsed = elapsed.saturating_add(poll_interval);
    }

    #[cfg(feature = "defmt")]
    defmt::warn!("No response to {} after {=u32} ms", expected, timing.total_window_ms());
    Err(match last_error {
        Some(e) => CommandError::Receive(e),
        None => CommandError::Timeout,
    })
}

/// One full round trip: [`send_command`] then [`check_response`].
pub async fn transact<C: CanBus, T: OssmTimer>(
    can_bus: &mut C,
    timer: &mut T,
    timing: &ResponseTiming,
    command: Command,
    params: &[u8],
) -> Result<ResultBlock, CommandError<C::Error>> {
    send_command(can_bus, command, params).await?;
    check_response(can_bus, timer, timing, command).await
}
