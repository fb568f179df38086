//! Unit tests for the scalar decodings.
use super::*;

#[test]
/// One-byte temperatures remove the 40 °C offset.
fn test_temp_byte() {
    assert_eq!(temp_byte(0), -40.0);
    assert_eq!(temp_byte(40), 0.0);
    assert_eq!(temp_byte(130), 90.0);
    assert_eq!(temp_byte(0xFE), 214.0);
    assert_eq!(temp_byte(0xFF), NOT_AVAILABLE);
}

#[test]
/// Two-byte temperatures are little-endian, 0.03125 °C/bit, -273 °C.
fn test_temp_hi_res() {
    // 0x2220 = 8736 -> 273.0 - 273 = 0 °C
    assert_eq!(temp_hi_res(0x20, 0x22), 0.0);
    // 0x2620 = 9760 -> 305.0 - 273 = 32 °C
    assert_eq!(temp_hi_res(0x20, 0x26), 32.0);
    assert_eq!(temp_hi_res(0x00, 0x00), -273.0);
    assert_eq!(temp_hi_res(0xFF, 0xFF), NOT_AVAILABLE);
    // A single 0xFF byte is still a value
    assert_ne!(temp_hi_res(0xFF, 0x20), NOT_AVAILABLE);
}

#[test]
/// One-byte pressures, barometric pressure and humidity scale linearly.
fn test_one_byte_scalings() {
    assert_eq!(pressure_2kpa(50), 100.0);
    assert_eq!(pressure_4kpa(50), 200.0);
    assert_eq!(barometric_pressure(202), 101.0);
    assert_eq!(humidity(100), 40.0);

    assert_eq!(pressure_2kpa(0xFF), NOT_AVAILABLE);
    assert_eq!(pressure_4kpa(0xFF), NOT_AVAILABLE);
    assert_eq!(barometric_pressure(0xFF), NOT_AVAILABLE);
    assert_eq!(humidity(0xFF), NOT_AVAILABLE);
}

#[test]
/// 0.125 kPa/bit pair only flags 0xFFFF.
fn test_pressure_eighth_kpa() {
    assert_eq!(pressure_eighth_kpa(0x10, 0x00), 2.0);
    assert_eq!(pressure_eighth_kpa(0x20, 0x03), 100.0);
    assert_eq!(pressure_eighth_kpa(0xFF, 0xFF), NOT_AVAILABLE);
    assert_eq!(pressure_eighth_kpa(0xFF, 0x00), 31.875);
}

#[test]
fn test_le_u16() {
    assert_eq!(le_u16(0x34, 0x12), 0x1234);
}
