//! Conversions between raw J1939 payload bytes and physical values.
pub mod scalar;
