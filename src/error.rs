//! Error definitions shared across library modules.
//! Transport failures, missing responses and errors reported by the module
//! firmware are kept in distinct variants and never conflated.
use crate::protocol::command::ErrorCode;
use thiserror_no_std::Error;

/// Integer returned by [`CommandError::code`] when the module never answered
/// (transport failure or timeout).
pub const NO_RESPONSE_CODE: i16 = -1;

//==================================================================================COMMAND_ERROR
#[derive(Error, Debug)]
/// Errors raised by a command round trip (send, then wait for the response).
pub enum CommandError<E: core::fmt::Debug> {
    /// CAN bus rejected the command frame.
    #[error("CAN bus send error: {0:?}")]
    Send(E),

    /// CAN bus failed while polling for the response.
    #[error("CAN bus receive error: {0:?}")]
    Receive(E),

    /// No matching response arrived within the response window.
    #[error("No response from module")]
    Timeout,

    /// The module answered with a non-zero error code.
    #[error("Module error {0:?}")]
    Module(ErrorCode),
}

impl<E: core::fmt::Debug> CommandError<E> {
    /// Legacy integer form of the error: `-1` when nothing was heard from the
    /// module, the firmware error code otherwise.
    pub fn code(&self) -> i16 {
        match self {
            CommandError::Send(_) | CommandError::Receive(_) | CommandError::Timeout => {
                NO_RESPONSE_CODE
            }
            CommandError::Module(code) => code.as_u8() as i16,
        }
    }

    /// `true` for transport failures and timeouts. Callers cannot tell a dead
    /// bus from a silent module at this level.
    pub fn is_no_response(&self) -> bool {
        !matches!(self, CommandError::Module(_))
    }

    /// Firmware error code, when the module did answer.
    pub fn module_code(&self) -> Option<ErrorCode> {
        match self {
            CommandError::Module(code) => Some(*code),
            _ => None,
        }
    }
}

/// Collapse a command result into the legacy tri-state integer:
/// `0` success, positive firmware code, or `-1` for no response.
pub fn result_code<T, E: core::fmt::Debug>(result: &Result<T, CommandError<E>>) -> i16 {
    match result {
        Ok(_) => 0,
        Err(err) => err.code(),
    }
}
