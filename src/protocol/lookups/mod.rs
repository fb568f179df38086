//! Known-SPN registry: names, units and categories of the Suspect Parameter
//! Numbers the module can be configured with.
//!
//! The table is generated by the build script from
//! `build_core/var/spn_registry.json`.

/// Sensor family an SPN belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpnCategory {
    Temperature,
    Pressure,
    Egt,
    /// Onboard ambient sensor (temperature, barometric pressure, humidity).
    Ambient,
    Unknown,
}

/// Registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpnInfo {
    pub spn: u16,
    pub name: &'static str,
    pub unit: &'static str,
    pub category: SpnCategory,
}

include!(concat!(env!("OUT_DIR"), "/generated_spns.rs"));

/// Name shown for SPNs missing from the registry.
pub const UNKNOWN_SPN_NAME: &str = "Unknown";

pub fn lookup_spn(spn: u16) -> Option<&'static SpnInfo> {
    spn_index(spn).map(|index| &KNOWN_SPNS[index])
}

/// Display name, [`UNKNOWN_SPN_NAME`] when the SPN is not registered.
pub fn spn_name(spn: u16) -> &'static str {
    lookup_spn(spn).map_or(UNKNOWN_SPN_NAME, |info| info.name)
}

pub fn category_of(spn: u16) -> SpnCategory {
    lookup_spn(spn).map_or(SpnCategory::Unknown, |info| info.category)
}

/// Registered SPNs of one category, in registry order.
pub fn spns_in(category: SpnCategory) -> impl Iterator<Item = &'static SpnInfo> {
    KNOWN_SPNS.iter().filter(move |info| info.category == category)
}
