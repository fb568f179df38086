//! Scalar decodings for the SAE J1939 parameters broadcast by the module.
//!
//! Every function maps raw payload bytes to a physical value, returning
//! [`NOT_AVAILABLE`] when the bytes carry the J1939 "not available" marker
//! (`0xFF` for one byte, `0xFFFF` for two). Multi-byte values are little-endian
//! (low byte first), as J1939 mandates.
use crate::core::NOT_AVAILABLE;

/// One-byte "not available" marker.
pub const NA_U8: u8 = 0xFF;
/// Two-byte "not available" marker.
pub const NA_U16: u16 = 0xFFFF;

/// Temperature offset of one-byte temperatures (°C).
const TEMP_BYTE_OFFSET_C: f32 = 40.0;
/// Resolution of two-byte temperatures (°C/bit).
const TEMP_HI_RES_C_PER_BIT: f32 = 0.03125;
/// Offset of two-byte temperatures (°C).
const TEMP_HI_RES_OFFSET_C: f32 = 273.0;

/// Assemble a little-endian `u16` from its two payload bytes.
#[inline]
pub fn le_u16(low: u8, high: u8) -> u16 {
    u16::from_le_bytes([low, high])
}

#[inline]
fn scaled_u8(raw: u8, resolution: f32) -> f32 {
    if raw == NA_U8 {
        return NOT_AVAILABLE;
    }
    raw as f32 * resolution
}

/// Temperature on one byte: 1 °C/bit, -40 °C offset.
pub fn temp_byte(raw: u8) -> f32 {
    if raw == NA_U8 {
        return NOT_AVAILABLE;
    }
    raw as f32 - TEMP_BYTE_OFFSET_C
}

/// High-resolution temperature on two bytes: 0.03125 °C/bit, -273 °C offset.
pub fn temp_hi_res(low: u8, high: u8) -> f32 {
    let raw = le_u16(low, high);
    if raw == NA_U16 {
        return NOT_AVAILABLE;
    }
    raw as f32 * TEMP_HI_RES_C_PER_BIT - TEMP_HI_RES_OFFSET_C
}

/// Pressure on one byte, 2 kPa/bit.
pub fn pressure_2kpa(raw: u8) -> f32 {
    scaled_u8(raw, 2.0)
}

/// Pressure on one byte, 4 kPa/bit.
pub fn pressure_4kpa(raw: u8) -> f32 {
    scaled_u8(raw, 4.0)
}

/// Barometric pressure on one byte, 0.5 kPa/bit.
pub fn barometric_pressure(raw: u8) -> f32 {
    scaled_u8(raw, 0.5)
}

/// Relative humidity on one byte, 0.4 %/bit.
pub fn humidity(raw: u8) -> f32 {
    scaled_u8(raw, 0.4)
}

/// Pressure on two bytes, 0.125 kPa/bit. Only the `0xFF`/`0xFF` pair is "not available".
pub fn pressure_eighth_kpa(low: u8, high: u8) -> f32 {
    let raw = le_u16(low, high);
    if raw == NA_U16 {
        return NOT_AVAILABLE;
    }
    raw as f32 * 0.125
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
