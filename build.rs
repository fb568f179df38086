//! Cargo build script: generates the known-SPN registry.

mod build_core;
use crate::build_core::{conf::*, domain::Registry, errors::BuildError, gen_spns::run_spn_gen};

use std::fs;
use std::path::PathBuf;

// The registry of SPN names, units and categories is data, kept in JSON so it
// can be extended or replaced without touching the library. This script checks
// it and turns it into a static table included by `src/protocol/lookups`.

//==================================================================================MAIN
fn main() -> Result<(), BuildError> {
    // Tell Cargo to rerun this script whenever one of these inputs changes.
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=build_core");
    println!("cargo:rerun-if-changed={}", SPN_REGISTRY_PATH);
    println!("cargo:rerun-if-env-changed={}", SPN_REGISTRY_ENV);

    // 1. Locate the registry.
    // Priority order:
    //   1. OSSM_SPN_REGISTRY_PATH environment variable (absolute or relative path)
    //   2. Default registry shipped with the crate
    let default_registry_path = PathBuf::from(SPN_REGISTRY_PATH);
    let user_registry_path = std::env::var(SPN_REGISTRY_ENV).ok().map(PathBuf::from);

    let registry_path = match user_registry_path {
        Some(path) if path.exists() => {
            println!("cargo:warning=Using custom spn_registry.json from {:?}", path);
            println!("cargo:rerun-if-changed={}", path.display());
            path
        }
        Some(path) => {
            println!(
                "cargo:warning=Custom registry path specified but file not found: {:?}",
                path
            );
            println!("cargo:warning=Falling back to the default spn_registry");
            default_registry_path
        }
        None => default_registry_path,
    };

    // 2. Parse and generate.
    let registry_string =
        fs::read_to_string(&registry_path).map_err(|e| BuildError::ReadFile {
            path: registry_path.clone(),
            source: e,
        })?;
    let registry: Registry = serde_json::from_str(&registry_string)?;
    let buffer_spn_code = run_spn_gen(&registry)?;

    // 3. Write the generated code into `OUT_DIR`, picked up by `include!`.
    let out_dir_str = std::env::var("OUT_DIR").map_err(|e| BuildError::OutDirErr { source: e })?;
    let spn_file_path = PathBuf::from(out_dir_str).join(OUT_DIR_SPN_FILE_NAME);

    fs::write(&spn_file_path, &buffer_spn_code).map_err(|e| BuildError::WriteFile {
        path: spn_file_path,
        source: e,
    })?;

    Ok(())
}
