//! `ossm-j1939` library: SAE J1939 protocol engine used to configure and
//! monitor the OSSM sensor module over a CAN bus in a `no_std` environment.
//! The crate exposes the identifier codec, the telemetry decoder, the
//! command/response engine and the high-level configuration operations. The
//! raw transport and any user interface stay outside, behind the traits in
//! [`protocol::transport::traits`].
#![no_std]
//==================================================================================
/// Shared domain data: sensor snapshot, configuration state, SPN assignments.
pub mod core;
/// Transport and module-level errors (send/receive failures, timeouts,
/// firmware error codes).
pub mod error;
/// Byte-level decoding helpers for J1939 scalar parameters.
pub mod infra;
/// J1939 protocol implementation: CAN transport, telemetry decoding,
/// command/response engine, high-level operations and SPN lookups.
pub mod protocol;
//==================================================================================
