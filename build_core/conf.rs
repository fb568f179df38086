//! Paths and constants used during build-time code generation.
//==================================================================================CONF
/// Known-SPN registry shipped with the crate.
pub(crate) const SPN_REGISTRY_PATH: &str = "build_core/var/spn_registry.json";
/// Environment variable pointing to a replacement registry.
pub(crate) const SPN_REGISTRY_ENV: &str = "OSSM_SPN_REGISTRY_PATH";
/// Generated registry file name (written to `OUT_DIR`).
pub(crate) const OUT_DIR_SPN_FILE_NAME: &str = "generated_spns.rs";
/// SPN values with a wire meaning of their own: 0 is an unassigned input,
/// 0xFFFF an unused sub-query slot.
pub(crate) const RESERVED_SPNS: &[u32] = &[0, 0xFFFF];
