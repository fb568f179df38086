//! Data model of the known-SPN registry, as read from JSON.
use serde::Deserialize;

//==================================================================================REGISTRY
#[derive(Debug, Deserialize)]
/// Root of `spn_registry.json`.
pub(crate) struct Registry {
    pub(crate) spns: Vec<SpnEntry>,
}

#[derive(Debug, Deserialize, Clone)]
/// One known Suspect Parameter Number.
pub(crate) struct SpnEntry {
    pub(crate) spn: u32,
    pub(crate) name: String,
    pub(crate) unit: String,
    pub(crate) category: Category,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
/// Mirrors `SpnCategory` of the library. `Unknown` is not accepted in the file.
pub(crate) enum Category {
    Temperature,
    Pressure,
    Egt,
    Ambient,
}

impl Category {
    /// Path of the matching variant in the generated code.
    pub(crate) fn rust_path(self) -> &'static str {
        match self {
            Category::Temperature => "SpnCategory::Temperature",
            Category::Pressure => "SpnCategory::Pressure",
            Category::Egt => "SpnCategory::Egt",
            Category::Ambient => "SpnCategory::Ambient",
        }
    }
}
