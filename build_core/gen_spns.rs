//! Generate the known-SPN table from the registry.
use super::conf::RESERVED_SPNS;
use super::domain::*;
use super::errors::*;

use std::collections::HashSet;
use std::fmt::Write;

/// Validate the registry and emit `KNOWN_SPNS` plus the `spn_index` lookup.
pub(crate) fn run_spn_gen(registry: &Registry) -> Result<String, BuildError> {
    validate(registry)?;

    let mut buffer = String::new();
    writeln!(buffer, "// Generated from spn_registry.json, do not edit.")?;
    writeln!(buffer)?;

    //======================Table
    writeln!(buffer, "/// Every SPN the configuration tool can name.")?;
    writeln!(
        buffer,
        "pub static KNOWN_SPNS: [SpnInfo; {}] = [",
        registry.spns.len()
    )?;
    for entry in &registry.spns {
        writeln!(
            buffer,
            "\tSpnInfo {{ spn: {}, name: {:?}, unit: {:?}, category: {} }},",
            entry.spn,
            entry.name,
            entry.unit,
            entry.category.rust_path()
        )?;
    }
    writeln!(buffer, "];")?;
    writeln!(buffer)?;

    //======================Index
    writeln!(buffer, "/// Position of `spn` in [`KNOWN_SPNS`].")?;
    writeln!(buffer, "pub const fn spn_index(spn: u16) -> Option<usize> {{")?;
    writeln!(buffer, "\tmatch spn {{")?;
    for (index, entry) in registry.spns.iter().enumerate() {
        writeln!(buffer, "\t\t{} => Some({}),", entry.spn, index)?;
    }
    writeln!(buffer, "\t\t_ => None,")?;
    writeln!(buffer, "\t}}")?;
    writeln!(buffer, "}}")?;

    Ok(buffer)
}

fn validate(registry: &Registry) -> Result<(), BuildError> {
    let mut seen = HashSet::new();
    for entry in &registry.spns {
        if RESERVED_SPNS.contains(&entry.spn) {
            return Err(BuildError::ReservedSpn { spn: entry.spn });
        }
        if entry.spn > u16::MAX as u32 {
            return Err(BuildError::SpnOutOfRange { spn: entry.spn });
        }
        if entry.name.trim().is_empty() {
            return Err(BuildError::MissingText {
                spn: entry.spn,
                field: "name",
            });
        }
        if entry.unit.trim().is_empty() {
            return Err(BuildError::MissingText {
                spn: entry.spn,
                field: "unit",
            });
        }
        if !seen.insert(entry.spn) {
            return Err(BuildError::DuplicateSpn { spn: entry.spn });
        }
    }
    Ok(())
}
