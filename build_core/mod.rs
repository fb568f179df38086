//! Workspace for the build script: registry model and code generator.
pub mod conf;
pub mod domain;
pub mod errors;
pub mod gen_spns;
