//! Error set that can occur while generating code during the build step.
use std::env::VarError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the build script (JSON parsing, registry checks, I/O).
pub(crate) enum BuildError {
    /// Failed to read the `OUT_DIR` environment variable.
    #[error("[MESSAGE]:OUT_DIR error. [ERROR]:{source}")]
    OutDirErr {
        #[source]
        source: VarError,
    },

    /// Failure while parsing the registry.
    #[error("[MESSAGE]:Invalid JSON format [Error]:{0:?}")]
    ParseJson(#[from] serde_json::Error),

    /// Unable to read a file from disk.
    #[error("[MESSAGE]:Failed to read file [PATH]:{path} [ERROR]:{source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the generated code to disk.
    #[error("[MESSAGE]:Failed to write file [PATH]:{path} [ERROR]:{source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Formatting error while writing generated code.
    #[error("[MESSAGE]:Failed to display writeln! macro [ERROR]:{source}")]
    WritelnErr {
        #[from]
        source: std::fmt::Error,
    },

    /// The same SPN appears twice in the registry.
    #[error("[MESSAGE]:Duplicate entry [SPN]:{spn}")]
    DuplicateSpn { spn: u32 },

    /// SPN carrying a wire meaning (unassigned or unused slot).
    #[error("[MESSAGE]:Reserved value [SPN]:{spn}")]
    ReservedSpn { spn: u32 },

    /// SPN that does not fit the two bytes of a sub-query response.
    #[error("[MESSAGE]:Out of range [SPN]:{spn}")]
    SpnOutOfRange { spn: u32 },

    /// Empty name or unit.
    #[error("[MESSAGE]:Missing {field} [SPN]:{spn}")]
    MissingText { spn: u32, field: &'static str },
}
